use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

/// query parameters starting with this (ascii case-insensitive) carry a header for upstream
pub const HEADER_PARAM_PREFIX: &str = "header_";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidHeader {
    #[error("invalid header name '{0}'")]
    Name(String),
    #[error("invalid value for header '{0}'")]
    Value(String),
}

/// headers sent upstream, names are case-insensitive and kept lowercase so iteration (and the
/// query strings built from it) is deterministic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, String>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// insert or replace a header, the name and value have to be valid on the wire
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), InvalidHeader> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| InvalidHeader::Name(name.to_string()))?;
        HeaderValue::from_str(value).map_err(|_| InvalidHeader::Value(name.to_string()))?;

        self.entries
            .insert(header_name.as_str().to_string(), value.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// base set with `overrides` applied on top, overrides win on collisions
    pub fn merged(&self, overrides: &HeaderSet) -> HeaderSet {
        let mut entries = self.entries.clone();
        entries.extend(
            overrides
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        HeaderSet { entries }
    }

    pub fn to_header_map(&self) -> HeaderMap {
        // everything in here was validated on insert
        self.entries
            .iter()
            .filter_map(|(k, v)| {
                Some((
                    HeaderName::from_bytes(k.as_bytes()).ok()?,
                    HeaderValue::from_str(v).ok()?,
                ))
            })
            .collect()
    }

    /// `header_<name>=<value>` pairs joined with `&`, both sides percent-encoded. names go out
    /// as-is, there's no hyphen/underscore swapping so any valid header name round trips
    pub fn to_query(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}{}={}",
                    HEADER_PARAM_PREFIX,
                    urlencoding::encode(k),
                    urlencoding::encode(v)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// pull the `header_*` parameters out of an already decoded query, values are trimmed
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<HeaderSet, InvalidHeader>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut headers = HeaderSet::new();
        for (key, value) in pairs {
            if let Some(name) = header_param_name(key) {
                headers.insert(name, value.trim())?;
            }
        }
        Ok(headers)
    }
}

/// `header_X-Test` -> `X-Test`
pub fn header_param_name(key: &str) -> Option<&str> {
    let prefix = key.get(..HEADER_PARAM_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(HEADER_PARAM_PREFIX) {
        return None;
    }
    let name = &key[HEADER_PARAM_PREFIX.len()..];
    (!name.is_empty()).then_some(name)
}
