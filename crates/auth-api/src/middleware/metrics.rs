//! HTTP 요청 metrics middleware.
//!
//! 모든 HTTP 요청에 대해 메트릭을 수집합니다.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::{Metrics, RequestTimer};

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// 각 요청에 대해 다음 메트릭을 기록합니다:
/// - `http_requests_total`: 총 요청 수 (service, method, path, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램
/// - `http_in_flight_requests`: 진입 시 증가, 종료 시 감소 (에러 경로 포함)
///
/// 경로 라벨은 라우트 템플릿(MatchedPath)을 사용해 카디널리티를 제한합니다.
pub async fn metrics_layer(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let timer = RequestTimer::start(metrics, method, path);

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    timer.finish(&status);

    response
}
