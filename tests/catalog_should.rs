use std::sync::Arc;
use std::time::Duration;

use tvrelay::directory::{ChannelRecord, MockDirectorySource};
use tvrelay::server::api::addon_controller::parse_extra;
use tvrelay::server::extractors::PublicBaseUrl;
use tvrelay::server::services::{
    catalog_services::{CATALOG_PAGE_SIZE, CatalogService},
    channel_services::ChannelService,
    directory_services::ChannelDirectory,
};
use tvrelay::server::utils::catalog_utils::{ChannelLogos, channel_genre, placeholder_logo};

fn italian_channels(count: usize) -> Vec<ChannelRecord> {
    (0..count)
        .map(|i| ChannelRecord {
            id: i.to_string(),
            name: format!("Canale {}", i),
            country: "Italy".to_string(),
        })
        .collect()
}

fn catalog_over(records: Vec<ChannelRecord>, logos: ChannelLogos) -> CatalogService {
    let mut source = MockDirectorySource::new();
    source
        .expect_fetch_channels()
        .returning(move || Ok(records.clone()));

    let directory = Arc::new(ChannelDirectory::new(
        Arc::new(source),
        "Italy".to_string(),
        Duration::from_secs(600),
    ));
    CatalogService::new(directory, logos)
}

#[test]
fn test_genre_follows_keyword_order() {
    assert_eq!(channel_genre("Sky Sport 24"), "SPORT");
    assert_eq!(channel_genre("Rai News 24"), "NEWS");
    assert_eq!(channel_genre("Boing"), "KIDS");
    assert_eq!(channel_genre("Sky Cinema Uno"), "MOVIES");
    assert_eq!(channel_genre("Discovery Channel"), "DOCUMENTARIES");
    assert_eq!(channel_genre("MTV Hits"), "MUSIC");
    assert_eq!(channel_genre("Rai 1"), "GENERAL");
    assert_eq!(channel_genre(""), "GENERAL");
}

#[test]
fn test_logo_lookup_is_exact() {
    let logos = ChannelLogos::from_json(
        r#"[{"name": "Rai 1", "logo": "https://logos/rai1.png"}, {"logo": "orphan"}]"#,
    )
    .unwrap();

    assert_eq!(logos.len(), 1);
    assert_eq!(logos.logo_for("Rai 1"), "https://logos/rai1.png");
    // no normalization
    assert_eq!(logos.logo_for("RAI 1"), placeholder_logo("RAI 1"));
}

#[test]
fn test_placeholder_logo_is_deterministic() {
    assert_eq!(
        placeholder_logo("Rai 1"),
        "https://placehold.co/300x300?text=Rai%201&.jpg"
    );
    assert_eq!(
        placeholder_logo(""),
        "https://placehold.co/300x300?text=TV&.jpg"
    );
}

#[test]
fn test_missing_logo_file_is_not_fatal() {
    let logos = ChannelLogos::load("/definitely/not/here/logos.json");
    assert!(logos.is_empty());
}

#[tokio::test]
async fn test_catalog_pages_and_searches() {
    let catalog = catalog_over(italian_channels(150), ChannelLogos::default());

    let first = catalog.catalog(None, 0).await;
    assert_eq!(first.len(), CATALOG_PAGE_SIZE);
    assert_eq!(first[0].id, "0");

    let second = catalog.catalog(None, 100).await;
    assert_eq!(second.len(), 50);
    assert_eq!(second[0].id, "100");

    let searched = catalog.catalog(Some("CANALE 14"), 0).await;
    let ids: Vec<&str> = searched.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["14", "140", "141", "142", "143", "144", "145", "146", "147", "148", "149"]);
}

#[tokio::test]
async fn test_meta_carries_genre_and_logo() {
    let records = vec![ChannelRecord {
        id: "1".to_string(),
        name: "Rai Sport".to_string(),
        country: "Italy".to_string(),
    }];
    let logos =
        ChannelLogos::from_json(r#"[{"name": "Rai Sport", "logo": "https://logos/rs.png"}]"#)
            .unwrap();
    let catalog = catalog_over(records, logos);

    let meta = catalog.meta("1").await.expect("meta");
    assert_eq!(meta.kind, "tv");
    assert_eq!(meta.genres, vec!["SPORT"]);
    assert_eq!(meta.poster, "https://logos/rs.png");
    assert_eq!(meta.logo, "https://logos/rs.png");
    assert_eq!(meta.poster_shape, "square");

    assert!(catalog.meta("404").await.is_none());
}

#[test]
fn test_stream_points_back_at_the_relay() {
    let stream = CatalogService::stream_for("https://relay.example", "12 34", "Rai 1");

    assert_eq!(stream.url, "https://relay.example/channel/12%2034/manifest");
    assert_eq!(stream.title, "Rai 1 - Live");
}

#[test]
fn test_manifest_url_comes_from_the_template() {
    let url = ChannelService::manifest_url_for("https://vavoo.to/play/{id}/index.m3u8", "2891")
        .unwrap();
    assert_eq!(url.as_str(), "https://vavoo.to/play/2891/index.m3u8");

    assert!(ChannelService::manifest_url_for("not a url {id}", "1").is_err());
}

#[test]
fn test_catalog_extra_parsing() {
    let extra = parse_extra("search=rai%20uno&skip=100&genre=x");
    assert_eq!(extra.search.as_deref(), Some("rai uno"));
    assert_eq!(extra.skip.as_deref(), Some("100"));
}

#[test]
fn test_public_base_url_derivation() {
    assert_eq!(
        PublicBaseUrl::derive(Some("https://relay.example/"), None, "ignored"),
        "https://relay.example"
    );
    assert_eq!(
        PublicBaseUrl::derive(None, Some("https"), "relay.example"),
        "https://relay.example"
    );
    assert_eq!(
        PublicBaseUrl::derive(None, None, "localhost:10000"),
        "http://localhost:10000"
    );
    assert_eq!(
        PublicBaseUrl::derive(None, None, "relay.example"),
        "https://relay.example"
    );
}
