use serde::{Deserialize, Serialize};
use serde_json::Value;

/// one channel as listed by the upstream directory. the id is whatever the directory assigned and
/// is only ever compared as a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: String,
    pub name: String,
    pub country: String,
}

/// raw directory entry, ids show up as both numbers and strings so they're normalized later
#[derive(Debug, Clone, Deserialize)]
struct RawChannel {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl ChannelRecord {
    /// parse a single directory entry, anything without a usable id is dropped
    pub fn from_value(value: Value) -> Option<Self> {
        let raw: RawChannel = serde_json::from_value(value).ok()?;

        let id = match raw.id {
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        Some(Self {
            id,
            name: raw.name.unwrap_or_default(),
            country: raw.country.unwrap_or_default(),
        })
    }
}

/// keep channels for one market, first occurrence of an id wins
pub fn filter_by_country(records: Vec<ChannelRecord>, country: &str) -> Vec<ChannelRecord> {
    let mut seen = std::collections::HashSet::new();

    records
        .into_iter()
        .filter(|record| record.country == country)
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}
