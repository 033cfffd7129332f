// AdPay API server library
// 지갑 원장 + 결제 게이트웨이 + 설정 저장소

pub mod domains;
pub mod routes;
pub mod shared;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::{create_router, openapi::ApiDoc};
use crate::shared::services::AppState;

/// 전체 애플리케이션 Router 생성 (라우터 + Swagger + CORS + 요청 로그)
/// Build the full application router
pub fn build_app(app_state: AppState) -> Router {
    let cors = build_cors(&app_state.config.server.allowed_origin);

    Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

// CORS 설정 (origin 파싱 실패 시 CORS 헤더 없이 동작)
fn build_cors(allowed_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!(allowed_origin, "invalid CORS origin; cross-origin requests disabled");
            cors
        }
    }
}
