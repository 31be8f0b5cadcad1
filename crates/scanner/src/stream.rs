use crate::config::ScanConfig;
use crate::error::Result;
use crate::memory::MemorySnapshot;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Files strictly larger than this are streamed
    pub threshold_bytes: u64,
    pub chunk_lines: usize,
    pub batch_delay: Duration,
    pub memory_soft_limit_bytes: Option<u64>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for StreamConfig {
    fn from(config: &ScanConfig) -> Self {
        Self {
            threshold_bytes: config.stream_threshold_bytes,
            chunk_lines: config.stream_chunk_lines.max(1),
            batch_delay: config.batch_delay(),
            memory_soft_limit_bytes: config.memory_soft_limit_bytes(),
        }
    }
}

/// Bounded-memory file reading and throttled batch scheduling
#[derive(Debug, Clone, Default)]
pub struct StreamManager {
    config: StreamConfig,
}

impl StreamManager {
    pub fn new(config: StreamConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    #[must_use]
    pub fn should_stream(&self, size_bytes: u64) -> bool {
        size_bytes > self.config.threshold_bytes
    }

    /// Feed `path` to `processor` in whole-line chunks of `chunk_lines` lines.
    ///
    /// `processor` receives the chunk text and the 1-based line number of its first line.
    /// A processor error aborts the read and is returned. Returns the number of lines read.
    pub async fn read_file_streaming<F>(&self, path: &Path, mut processor: F) -> Result<usize>
    where
        F: FnMut(&str, usize) -> Result<()>,
    {
        let file = tokio::fs::File::open(path).await?;
        let mut lines = BufReader::new(file).lines();

        let mut chunk = String::new();
        let mut chunk_len = 0usize;
        let mut start_line = 1usize;
        let mut total = 0usize;

        while let Some(line) = lines.next_line().await? {
            chunk.push_str(&line);
            chunk.push('\n');
            chunk_len += 1;
            total += 1;

            if chunk_len == self.config.chunk_lines {
                processor(&chunk, start_line)?;
                start_line += chunk_len;
                chunk.clear();
                chunk_len = 0;
            }
        }

        if chunk_len > 0 {
            processor(&chunk, start_line)?;
        }

        log::debug!("Streamed {} ({total} lines)", path.display());
        Ok(total)
    }

    /// Run `processor` over fixed-size batches, one batch at a time.
    ///
    /// Batches are separated by the configured delay. A failing batch is logged and its
    /// items contribute nothing; the remaining batches still run.
    pub async fn process_batches<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        batch_size: usize,
        mut processor: F,
    ) -> Vec<R>
    where
        F: FnMut(Vec<T>) -> Fut,
        Fut: Future<Output = Result<Vec<R>>>,
    {
        let batch_size = batch_size.max(1);
        let batch_count = items.len().div_ceil(batch_size);
        let mut results = Vec::new();
        let mut items = items.into_iter();

        for index in 0..batch_count {
            if index > 0 {
                self.check_memory();
                if !self.config.batch_delay.is_zero() {
                    tokio::time::sleep(self.config.batch_delay).await;
                }
            }

            let batch: Vec<T> = items.by_ref().take(batch_size).collect();
            match processor(batch).await {
                Ok(mut out) => results.append(&mut out),
                Err(e) => log::warn!("Batch {}/{batch_count} failed: {e}", index + 1),
            }
        }

        results
    }

    fn check_memory(&self) {
        let Some(limit) = self.config.memory_soft_limit_bytes else {
            return;
        };
        if let Some(snapshot) = MemorySnapshot::current() {
            if snapshot.resident_bytes > limit {
                log::warn!(
                    "Resident memory {} MB exceeds soft limit {} MB",
                    snapshot.resident_mb(),
                    limit / 1024 / 1024
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use pretty_assertions::assert_eq;

    fn manager(chunk_lines: usize) -> StreamManager {
        StreamManager::new(StreamConfig {
            threshold_bytes: 16,
            chunk_lines,
            batch_delay: Duration::ZERO,
            memory_soft_limit_bytes: None,
        })
    }

    #[test]
    fn threshold_is_exclusive() {
        let streams = manager(10);
        assert!(!streams.should_stream(16));
        assert!(streams.should_stream(17));
        assert!(!StreamManager::default().should_stream(10 * 1024 * 1024));
    }

    #[tokio::test]
    async fn chunks_never_split_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.js");
        let body: String = (1..=25).map(|i| format!("line{i}\n")).collect();
        std::fs::write(&path, &body).unwrap();

        let mut chunks = Vec::new();
        let total = manager(10)
            .read_file_streaming(&path, |chunk, start| {
                chunks.push((start, chunk.lines().count(), chunk.to_string()));
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(total, 25);
        let shape: Vec<_> = chunks.iter().map(|(s, n, _)| (*s, *n)).collect();
        assert_eq!(shape, vec![(1, 10), (11, 10), (21, 5)]);
        assert!(chunks[1].2.starts_with("line11\n"));
        let joined: String = chunks.into_iter().map(|(_, _, text)| text).collect();
        assert_eq!(joined, body);
    }

    #[tokio::test]
    async fn processor_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.css");
        std::fs::write(&path, "a\n".repeat(30)).unwrap();

        let mut calls = 0;
        let err = manager(10)
            .read_file_streaming(&path, |_, start| {
                calls += 1;
                if start == 11 {
                    Err(ScanError::Other("boom".to_string()))
                } else {
                    Ok(())
                }
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = manager(10)
            .read_file_streaming(&dir.path().join("nope.js"), |_, _| Ok(()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failed_batches_are_skipped() {
        let items: Vec<u32> = (0..10).collect();
        let results = manager(10)
            .process_batches(items, 3, |batch| async move {
                if batch.contains(&4) {
                    Err(ScanError::Other("bad batch".to_string()))
                } else {
                    Ok(batch.into_iter().map(|n| n * 10).collect())
                }
            })
            .await;
        assert_eq!(results, vec![0, 10, 20, 60, 70, 80, 90]);
    }
}
