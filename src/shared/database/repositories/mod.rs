// All repositories module
pub mod auth;
pub mod settings;
pub mod wallet;

// Re-export all repositories for convenience
pub use auth::*;
pub use settings::*;
pub use wallet::*;
