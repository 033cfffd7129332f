// Settings domain models
pub mod setting;

pub use setting::*;
