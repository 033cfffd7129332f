// Wallet domain services
pub mod ledger;
pub mod wallet_service;
pub mod expiry_scheduler;
pub mod state;

pub use wallet_service::*;
pub use expiry_scheduler::*;
pub use state::*;
