// Wallet domain handlers
pub mod wallet_handler;
pub mod admin_handler;
pub mod webhook_handler;
