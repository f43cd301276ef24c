use serde::{Deserialize, Serialize};

/// add-on descriptor served at /manifest.json
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonManifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: &'static str,
    pub description: String,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub catalogs: Vec<CatalogDescriptor>,
    pub behavior_hints: BehaviorHints,
    pub logo: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'static str,
    pub name: String,
    pub extra: Vec<CatalogExtra>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExtra {
    pub name: &'static str,
    pub is_required: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub configurable: bool,
    pub configuration_required: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub genres: Vec<&'static str>,
    pub poster: String,
    pub poster_shape: &'static str,
    pub background: String,
    pub logo: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaItem>,
}

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub meta: Option<MetaItem>,
}

#[derive(Debug, Serialize)]
pub struct StreamItem {
    pub url: String,
    pub title: String,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StreamResponse {
    pub streams: Vec<StreamItem>,
}

/// the `search=..&skip=..` path segment of catalog requests
#[derive(Debug, Default, Deserialize)]
pub struct CatalogExtraQuery {
    pub search: Option<String>,
    pub skip: Option<String>,
}
