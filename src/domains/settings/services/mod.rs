// Settings domain services
pub mod settings_service;
pub mod state;

pub use settings_service::*;
pub use state::*;
