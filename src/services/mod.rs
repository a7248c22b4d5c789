pub mod ai_service;
pub mod prompt_builder;
pub mod proxy_service;
pub mod response_validator;
pub mod study_service;
pub mod user_service;
