// Domain modules
pub mod auth;
pub mod settings;
pub mod wallet;
