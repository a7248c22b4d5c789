pub mod quiz;
pub mod quiz_result;
pub mod study_session;
pub mod user;
