//! 통합 API 에러 응답 타입.
//!
//! 모든 HTTP 엔드포인트에서 일관된 에러 형식을 제공하고,
//! 도메인 에러 분류를 HTTP 상태 코드로 매핑합니다.

use auth_core::AuthError;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "INVALID_CREDENTIALS",
///   "message": "자격증명이 유효하지 않습니다"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl ApiErrorResponse {
    /// 에러 응답 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 도메인 에러를 HTTP 응답으로 매핑합니다.
///
/// 인프라 장애는 내부 상세를 숨긴 일반 메시지로 응답하고
/// 상세는 서버 로그에만 남깁니다. 클라이언트 에러는 장애 로그를
/// 남기지 않습니다.
pub fn into_response(err: AuthError) -> (StatusCode, Json<ApiErrorResponse>) {
    match err {
        AuthError::InvalidInput(_) => (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new("INVALID_INPUT", "잘못된 요청입니다")),
        ),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            Json(ApiErrorResponse::new(
                "INVALID_CREDENTIALS",
                "자격증명이 유효하지 않습니다",
            )),
        ),
        AuthError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiErrorResponse::new("NOT_FOUND", "찾을 수 없습니다")),
        ),
        AuthError::Conflict(_) => (
            StatusCode::CONFLICT,
            Json(ApiErrorResponse::new(
                "CONFLICT",
                "이미 존재하는 username입니다",
            )),
        ),
        AuthError::Database(ref detail) | AuthError::Internal(ref detail) => {
            error!(error = %detail, "Internal error while handling request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse::new(
                    "INTERNAL_ERROR",
                    "내부 에러가 발생했습니다",
                )),
            )
        }
    }
}
