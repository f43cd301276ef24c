pub mod catalog_services;
pub mod channel_services;
pub mod directory_services;
pub mod relay_services;
pub mod upstream_services;

pub use relay_services::RelayServices;
pub use upstream_services::DynUpstreamService;
