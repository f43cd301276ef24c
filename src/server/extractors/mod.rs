mod public_url_extractor;
mod relay_query_extractor;

pub use public_url_extractor::*;
pub use relay_query_extractor::*;
