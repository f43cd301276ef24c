use tvrelay::server::utils::{
    header_utils::HeaderSet,
    playlist_utils::{
        PlaylistKind, base_url, classify, resolve_reference, rewrite_manifest, segment_proxy_url,
    },
};
use url::Url;

fn headers() -> HeaderSet {
    let mut headers = HeaderSet::new();
    headers.insert("Referer", "https://vavoo.to/").unwrap();
    headers.insert("User-Agent", "relay test").unwrap();
    headers
}

/// pull the decoded `url` parameter back out of a rewritten line
fn proxied_target(line: &str) -> Url {
    let query = line
        .strip_prefix("/proxy/segment?")
        .expect("line should point at the segment relay");
    let target = url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
        .expect("url parameter");
    Url::parse(&target).expect("absolute url")
}

#[test]
fn test_classify_requires_both_markers() {
    assert_eq!(
        classify("#EXTM3U\n#EXTINF:-1,Ch\nseg1.ts\n"),
        PlaylistKind::MultiSegmentManifest
    );
    assert_eq!(
        classify("#EXTM3U\n#EXT-X-VERSION:3\n"),
        PlaylistKind::SimplePlaylist
    );
    assert_eq!(classify("#EXTINF:-1,Ch\nseg1.ts\n"), PlaylistKind::SimplePlaylist);
    assert_eq!(classify(""), PlaylistKind::SimplePlaylist);
    assert_eq!(classify("<html>nope</html>"), PlaylistKind::SimplePlaylist);
}

#[test]
fn test_base_url_strips_last_segment_and_query() {
    let final_url = Url::parse("https://h/a/b/playlist.m3u8?token=abc#frag").unwrap();
    assert_eq!(base_url(&final_url).as_str(), "https://h/a/b/");

    let root = Url::parse("https://h/playlist.m3u8").unwrap();
    assert_eq!(base_url(&root).as_str(), "https://h/");

    let with_port = Url::parse("http://127.0.0.1:8080/live/index.m3u8").unwrap();
    assert_eq!(base_url(&with_port).as_str(), "http://127.0.0.1:8080/live/");
}

#[test]
fn test_relative_reference_resolves_against_manifest_directory() {
    let base = base_url(&Url::parse("https://h/a/b/playlist.m3u8").unwrap());

    assert_eq!(
        resolve_reference(&base, "segment001.ts").unwrap().as_str(),
        "https://h/a/b/segment001.ts"
    );
    assert_eq!(
        resolve_reference(&base, "../c/seg.ts").unwrap().as_str(),
        "https://h/a/c/seg.ts"
    );
    assert_eq!(
        resolve_reference(&base, "/root.ts").unwrap().as_str(),
        "https://h/root.ts"
    );
}

#[test]
fn test_absolute_reference_is_left_pointing_at_itself() {
    let base = base_url(&Url::parse("https://h/a/b/playlist.m3u8").unwrap());
    let absolute = "https://cdn.example.com/x/y/seg-7.ts?sig=123";

    assert_eq!(resolve_reference(&base, absolute).unwrap().as_str(), absolute);
}

#[test]
fn test_rewrite_routes_references_through_the_relay() {
    let final_url = Url::parse("https://u/p/q/pl.m3u8").unwrap();
    let body = "#EXTM3U\n#EXTINF:-1,Ch\nseg1.ts\n";

    let rewritten = rewrite_manifest(body, &final_url, &headers());

    assert_eq!(
        rewritten,
        "#EXTM3U\n#EXTINF:-1,Ch\n/proxy/segment?url=https%3A%2F%2Fu%2Fp%2Fq%2Fseg1.ts\
         &header_referer=https%3A%2F%2Fvavoo.to%2F&header_user-agent=relay%20test\n"
    );
}

#[test]
fn test_rewrite_leaves_only_valid_proxy_urls() {
    let final_url = Url::parse("https://h/a/b/playlist.m3u8").unwrap();
    let body = "#EXTM3U\r\n\
                #EXT-X-TARGETDURATION:6\r\n\
                #EXTINF:6.0,\r\n\
                  segment001.ts  \r\n\
                \r\n\
                #EXTINF:6.0,\r\n\
                https://other.host/abs/segment002.ts\r\n";

    let rewritten = rewrite_manifest(body, &final_url, &headers());

    let references: Vec<&str> = rewritten
        .lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();

    assert_eq!(references.len(), 2);
    assert_eq!(
        proxied_target(references[0]).as_str(),
        "https://h/a/b/segment001.ts"
    );
    assert_eq!(
        proxied_target(references[1]).as_str(),
        "https://other.host/abs/segment002.ts"
    );
    // directives survive, trimmed
    assert!(rewritten.contains("\n#EXT-X-TARGETDURATION:6\n"));
}

#[test]
fn test_rewrite_passes_unresolvable_lines_through() {
    let final_url = Url::parse("https://h/a/b/playlist.m3u8").unwrap();
    let body = "#EXTM3U\n#EXTINF:-1,Broken\nhttp://[broken\n#EXTINF:-1,Ok\nok.ts";

    let rewritten = rewrite_manifest(body, &final_url, &HeaderSet::new());
    let lines: Vec<&str> = rewritten.split('\n').collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2], "http://[broken");
    assert_eq!(lines[4], "/proxy/segment?url=https%3A%2F%2Fh%2Fa%2Fb%2Fok.ts");
}

#[test]
fn test_segment_proxy_url_without_headers_has_no_trailing_separator() {
    let target = Url::parse("https://h/seg.ts").unwrap();
    assert_eq!(
        segment_proxy_url(&target, &HeaderSet::new()),
        "/proxy/segment?url=https%3A%2F%2Fh%2Fseg.ts"
    );
}
