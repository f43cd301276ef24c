pub mod addon_dto;
pub mod status_dto;
