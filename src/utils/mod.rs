pub mod fence;
pub mod time;
