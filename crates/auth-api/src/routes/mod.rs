//! API 라우트.
//!
//! 모든 REST 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `POST /auth/register` - 회원가입 + 즉시 사용 가능한 토큰 발급
//! - `POST /auth/login` - 로그인 및 토큰 발급
//! - `GET /auth/validate` - 토큰 검증 (항상 200)
//! - `GET /metrics` - Prometheus 텍스트 노출

pub mod auth;

pub use auth::{CredentialsRequest, LoginResponse, RegisterResponse, ValidateParams};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::metrics::Metrics;
use crate::middleware::metrics_layer;
use crate::state::AppState;

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> String {
    metrics.render()
}

/// 전체 라우터 생성.
///
/// 메트릭 미들웨어는 모든 요청에 적용됩니다 (`/metrics` 스크레이프 포함).
pub fn create_router(state: Arc<AppState>) -> Router {
    let metrics = state.metrics.clone();

    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics.clone());

    // 인증 라우터
    let auth_router = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/validate", get(auth::validate))
        .with_state(state);

    Router::new()
        .merge(metrics_router)
        .merge(auth_router)
        // 메트릭 미들웨어 (모든 요청에 적용)
        .layer(middleware::from_fn_with_state(metrics, metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (10초)
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
}
