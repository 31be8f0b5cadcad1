use serde::{Deserialize, Serialize};

/// Resident memory of the current process, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub resident_bytes: u64,
    pub peak_resident_bytes: u64,
}

impl MemorySnapshot {
    /// Best-effort read; `None` off Linux or when `/proc` is unavailable
    #[must_use]
    pub fn current() -> Option<Self> {
        let contents = std::fs::read_to_string("/proc/self/status").ok()?;
        parse_status(&contents)
    }

    #[must_use]
    pub fn resident_mb(&self) -> u64 {
        self.resident_bytes / 1024 / 1024
    }
}

fn parse_status(contents: &str) -> Option<MemorySnapshot> {
    let mut resident_kb = None;
    let mut peak_kb = None;
    for line in contents.lines() {
        let line = line.trim_start();
        let slot = if line.starts_with("VmRSS:") {
            &mut resident_kb
        } else if line.starts_with("VmHWM:") {
            &mut peak_kb
        } else {
            continue;
        };
        *slot = line
            .split_whitespace()
            .nth(1)
            .and_then(|v| v.parse::<u64>().ok());
    }

    let resident_kb = resident_kb?;
    Some(MemorySnapshot {
        resident_bytes: resident_kb * 1024,
        peak_resident_bytes: peak_kb.unwrap_or(resident_kb) * 1024,
    })
}
