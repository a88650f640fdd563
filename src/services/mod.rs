pub mod analysis_service;
pub mod completion_client;
pub mod generation_service;
pub mod question_validator;
pub mod scoring_service;
pub mod session_service;
