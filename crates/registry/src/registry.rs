use crate::error::{RegistryError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Cross-browser availability of a feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineStatus {
    /// Widely available
    High,
    /// Newly available
    Low,
    /// Not yet interoperable
    #[default]
    Limited,
}

impl BaselineStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Limited => "limited",
        }
    }
}

// Registry data encodes "not baseline" as `false` and the levels as strings.
impl<'de> Deserialize<'de> for BaselineStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Level(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Self::Limited),
            Raw::Flag(true) => Ok(Self::Low),
            Raw::Level(level) => match level.to_lowercase().as_str() {
                "high" => Ok(Self::High),
                "low" => Ok(Self::Low),
                "limited" | "false" => Ok(Self::Limited),
                other => Err(serde::de::Error::custom(format!(
                    "unknown baseline level `{other}`"
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStatus {
    #[serde(default)]
    pub baseline: BaselineStatus,

    #[serde(default)]
    pub baseline_low_date: Option<String>,

    #[serde(default)]
    pub baseline_high_date: Option<String>,

    /// Browser id → first supporting version
    #[serde(default)]
    pub support: BTreeMap<String, String>,
}

/// One registry record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: FeatureStatus,
}

impl FeatureEntry {
    pub fn new(name: impl Into<String>, baseline: BaselineStatus) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: FeatureStatus {
                baseline,
                ..FeatureStatus::default()
            },
        }
    }
}

/// Read-only dataset of known platform features, keyed by canonical id
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: HashMap<String, FeatureEntry>,
}

impl FeatureRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FeatureEntry)>,
        K: Into<String>,
    {
        Self {
            features: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Parse a registry document.
    ///
    /// Accepts `{"features": {id: entry}}` or a bare `{id: entry}` map. Records that are not
    /// feature entries (moved/split redirects, malformed rows) are skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        let map = match document.get("features") {
            Some(serde_json::Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(RegistryError::InvalidDocument(
                    "`features` must be an object".to_string(),
                ))
            }
            None => match document {
                serde_json::Value::Object(map) => map,
                _ => {
                    return Err(RegistryError::InvalidDocument(
                        "expected a JSON object".to_string(),
                    ))
                }
            },
        };

        let mut features = HashMap::with_capacity(map.len());
        for (id, raw) in map {
            if raw.get("kind").and_then(|k| k.as_str()).is_some_and(|k| k != "feature") {
                continue;
            }
            match serde_json::from_value::<FeatureEntry>(raw) {
                Ok(entry) => {
                    features.insert(id, entry);
                }
                Err(e) => log::debug!("Skipping registry record {id}: {e}"),
            }
        }

        Ok(Self { features })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load `path`, degrading to an empty registry when it is missing or unreadable
    #[must_use]
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::warn!("No feature registry configured; every detected feature will be dropped");
            return Self::empty();
        };

        match Self::load(path) {
            Ok(registry) => {
                log::info!(
                    "Loaded {} registry features from {}",
                    registry.len(),
                    path.display()
                );
                registry
            }
            Err(e) => {
                log::warn!(
                    "Feature registry {} unavailable ({e}); every detected feature will be dropped",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    /// Process-wide registry. The first caller's `path` wins; later calls return the same
    /// instance.
    pub fn shared(path: Option<&Path>) -> Arc<Self> {
        static SHARED: OnceLock<Arc<FeatureRegistry>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(Self::load_or_empty(path)))
            .clone()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.features.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FeatureEntry> {
        self.features.get(id)
    }

    #[must_use]
    pub fn baseline(&self, id: &str) -> Option<BaselineStatus> {
        self.get(id).map(|entry| entry.status.baseline)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
