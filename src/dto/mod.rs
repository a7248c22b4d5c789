pub mod auth_dto;
pub mod generation_dto;
pub mod history_dto;
