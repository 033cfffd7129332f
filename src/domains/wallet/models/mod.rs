// Wallet domain models
pub mod wallet;
pub mod transaction;

pub use wallet::*;
pub use transaction::*;
