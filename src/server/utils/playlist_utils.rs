use tracing::{debug, warn};
use url::Url;

use crate::server::utils::header_utils::HeaderSet;

pub const MANIFEST_START_MARKER: &str = "#EXTM3U";
pub const SEGMENT_INFO_MARKER: &str = "#EXTINF";

/// where rewritten media references point to
pub const SEGMENT_PROXY_PATH: &str = "/proxy/segment";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    /// anything we don't understand, handed back untouched
    SimplePlaylist,
    /// has segment references that have to go through the relay
    MultiSegmentManifest,
}

/// cheap content sniff, not a parser. a body is only rewritten when it has both the header tag and
/// at least one segment tag, everything else is passed through as an opaque playlist
pub fn classify(body: &str) -> PlaylistKind {
    if body.contains(MANIFEST_START_MARKER) && body.contains(SEGMENT_INFO_MARKER) {
        PlaylistKind::MultiSegmentManifest
    } else {
        PlaylistKind::SimplePlaylist
    }
}

/// directory of the manifest, relative references resolve against this. query and fragment of
/// the manifest url never carry over
pub fn base_url(final_url: &Url) -> Url {
    let mut base = final_url.clone();
    base.set_query(None);
    base.set_fragment(None);

    let dir_len = base.path().rfind('/').map_or(0, |idx| idx + 1);
    let dir = base.path()[..dir_len].to_string();
    base.set_path(if dir.is_empty() { "/" } else { &dir });
    base
}

/// resolve a single media reference, absolute references come back as the url they name
pub fn resolve_reference(base: &Url, reference: &str) -> Result<Url, url::ParseError> {
    base.join(reference)
}

/// `/proxy/segment?url=<absolute>&header_<name>=<value>...`
pub fn segment_proxy_url(target: &Url, headers: &HeaderSet) -> String {
    let mut proxied = format!(
        "{}?url={}",
        SEGMENT_PROXY_PATH,
        urlencoding::encode(target.as_str())
    );
    if !headers.is_empty() {
        proxied.push('&');
        proxied.push_str(&headers.to_query());
    }
    proxied
}

/// rewrite every media reference of a manifest so it goes back through the relay. lines are
/// trimmed, directives and blank lines are kept, a reference that can't be resolved is left as it
/// was so the manifest stays complete
pub fn rewrite_manifest(body: &str, final_url: &Url, headers: &HeaderSet) -> String {
    let base = base_url(final_url);
    let mut rewritten = 0usize;

    let lines: Vec<String> = body
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                return trimmed.to_string();
            }

            match resolve_reference(&base, trimmed) {
                Ok(target) => {
                    rewritten += 1;
                    segment_proxy_url(&target, headers)
                }
                Err(e) => {
                    warn!("Failed to resolve: {} - {}", trimmed, e);
                    line.to_string()
                }
            }
        })
        .collect();

    debug!("Rewrote {} media references against {}", rewritten, base);
    lines.join("\n")
}
