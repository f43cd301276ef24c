use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

pub const GENERAL_GENRE: &str = "GENERAL";

// order matters, the first genre with a matching keyword wins
const GENRE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "SPORT",
        &["sport", "calcio", "football", "tennis", "basket", "motogp", "f1", "golf"],
    ),
    ("NEWS", &["news", "tg", "24", "meteo", "giornale", "notizie"]),
    (
        "KIDS",
        &["kids", "bambini", "cartoon", "disney", "nick", "boing", "junior"],
    ),
    ("MOVIES", &["cinema", "film", "movie", "premium", "comedy"]),
    (
        "DOCUMENTARIES",
        &["discovery", "history", "national", "geo", "natura", "science"],
    ),
    ("MUSIC", &["music", "mtv", "vh1", "radio", "hit", "rock"]),
];

/// keyword match on the lowercase channel name
pub fn channel_genre(name: &str) -> &'static str {
    if name.is_empty() {
        return GENERAL_GENRE;
    }

    let lower = name.to_lowercase();
    GENRE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(genre, _)| *genre)
        .unwrap_or(GENERAL_GENRE)
}

#[derive(Deserialize)]
struct LogoEntry {
    name: Option<String>,
    logo: Option<String>,
}

/// channel name -> logo url, exact string match only
#[derive(Debug, Clone, Default)]
pub struct ChannelLogos {
    logos: HashMap<String, String>,
}

impl ChannelLogos {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<LogoEntry> = serde_json::from_str(json)?;

        let logos = entries
            .into_iter()
            .filter_map(|entry| Some((entry.name?, entry.logo.unwrap_or_default())))
            .collect();

        Ok(Self { logos })
    }

    /// a missing or broken file isn't fatal, every channel just gets a placeholder
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                warn!("logo file {} not loaded: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(logos) => {
                info!("loaded {} channel logos", logos.len());
                logos
            }
            Err(e) => {
                error!("failed to parse logo file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.logos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }

    pub fn logo_for(&self, name: &str) -> String {
        match self.logos.get(name) {
            Some(logo) if !name.is_empty() => logo.clone(),
            _ => placeholder_logo(name),
        }
    }
}

pub fn placeholder_logo(name: &str) -> String {
    let text = if name.is_empty() { "TV" } else { name };
    format!(
        "https://placehold.co/300x300?text={}&.jpg",
        urlencoding::encode(text)
    )
}

pub fn placeholder_background(name: &str) -> String {
    format!(
        "https://via.placeholder.com/1280x720/000080/FFFFFF?text={}",
        urlencoding::encode(name)
    )
}
