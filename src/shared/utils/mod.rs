/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - Snowflake ID 생성기 (User, Wallet, WalletTransaction 등)
pub mod id_generator;

pub use id_generator::*;
