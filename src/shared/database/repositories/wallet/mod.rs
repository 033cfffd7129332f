// Wallet repositories
pub mod wallet_repository;
pub mod wallet_transaction_repository;

pub use wallet_repository::*;
pub use wallet_transaction_repository::*;
