pub mod addon_controller;
pub mod channel_controller;
pub mod proxy_controller;
pub mod status_controller;
