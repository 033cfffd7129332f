use std::sync::Arc;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use adpay_api::build_app;
use adpay_api::shared::clients::NowPaymentsClient;
use adpay_api::shared::config::AppConfig;
use adpay_api::shared::database::Database;
use adpay_api::shared::services::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // .env 로드 (없어도 됨)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,adpay_api=debug,sqlx=warn")),
        )
        .init();

    // 설정 로드: 기본값 → config.toml → APP__* 환경 변수
    let config = AppConfig::load("config.toml")?;

    // DB 연결 + 마이그레이션
    let db = Database::new(&config.database.url, config.database.max_connections).await?;
    db.initialize().await?;

    // 결제 게이트웨이 클라이언트
    let gateway = NowPaymentsClient::new(&config.gateway)?;

    let bind_address = config.bind_address();

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(db, config, Arc::new(gateway))?;
    app_state.start_background_jobs();

    let app = build_app(app_state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server running on http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/api", bind_address);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
