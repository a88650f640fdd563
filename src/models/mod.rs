pub mod analysis;
pub mod answer;
pub mod question;
pub mod quiz_config;
