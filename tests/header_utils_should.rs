use tvrelay::server::extractors::RelayQuery;
use tvrelay::server::utils::header_utils::{HeaderSet, InvalidHeader, header_param_name};

#[test]
fn test_header_names_are_case_insensitive() {
    let mut headers = HeaderSet::new();
    headers.insert("X-Test", "one").unwrap();
    headers.insert("x-test", "two").unwrap();

    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get("X-TEST"), Some("two"));
}

#[test]
fn test_overrides_win_when_merged() {
    let mut base = HeaderSet::new();
    base.insert("User-Agent", "default agent").unwrap();
    base.insert("Referer", "https://vavoo.to/").unwrap();

    let mut overrides = HeaderSet::new();
    overrides.insert("referer", "https://elsewhere.example/").unwrap();
    overrides.insert("X-Test", "abc").unwrap();

    let merged = base.merged(&overrides);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged.get("user-agent"), Some("default agent"));
    assert_eq!(merged.get("Referer"), Some("https://elsewhere.example/"));
    assert_eq!(merged.get("x-test"), Some("abc"));
    // base is untouched
    assert_eq!(base.get("referer"), Some("https://vavoo.to/"));
}

#[test]
fn test_invalid_headers_are_rejected() {
    let mut headers = HeaderSet::new();
    assert_eq!(
        headers.insert("bad header", "x"),
        Err(InvalidHeader::Name("bad header".to_string()))
    );
    assert_eq!(
        headers.insert("X-Test", "line\nbreak"),
        Err(InvalidHeader::Value("X-Test".to_string()))
    );
    assert!(headers.is_empty());
}

#[test]
fn test_header_param_prefix_is_case_insensitive() {
    assert_eq!(header_param_name("header_X-Test"), Some("X-Test"));
    assert_eq!(header_param_name("HEADER_Referer"), Some("Referer"));
    assert_eq!(header_param_name("header_"), None);
    assert_eq!(header_param_name("url"), None);
    assert_eq!(header_param_name("head"), None);
}

#[test]
fn test_query_round_trips_names_with_hyphens_and_underscores() {
    let mut headers = HeaderSet::new();
    headers.insert("X-Forwarded-For", "1.2.3.4").unwrap();
    headers.insert("x_custom_token", " a&b=c ").unwrap();

    let query = format!("url=https%3A%2F%2Fh%2Fpl.m3u8&{}", headers.to_query());
    let parsed = RelayQuery::parse(&query).unwrap();

    assert_eq!(parsed.url, "https://h/pl.m3u8");
    assert_eq!(parsed.headers.get("x-forwarded-for"), Some("1.2.3.4"));
    // values are trimmed on the way in
    assert_eq!(parsed.headers.get("x_custom_token"), Some("a&b=c"));
    assert_eq!(parsed.headers.len(), 2);
}

#[test]
fn test_relay_query_requires_url() {
    assert!(RelayQuery::parse("header_X-Test=abc").is_err());
    assert!(RelayQuery::parse("url=%20%20").is_err());
    assert!(RelayQuery::parse("").is_err());
}

#[test]
fn test_relay_query_decodes_header_values() {
    let parsed =
        RelayQuery::parse("url=https://h/pl.m3u8&header_X-Test=abc&header_Referer=https%3A%2F%2Fr%2F")
            .unwrap();

    assert_eq!(parsed.url, "https://h/pl.m3u8");
    assert_eq!(parsed.headers.get("x-test"), Some("abc"));
    assert_eq!(parsed.headers.get("referer"), Some("https://r/"));
}
