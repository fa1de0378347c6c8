//! 인증 HTTP 어댑터.
//!
//! 요청 파싱, 도메인 연산 호출, 상태 코드 매핑만 담당합니다.
//! 비즈니스 로직은 [`crate::services::auth`]에 있습니다.
//!
//! 구조적으로 잘못된 페이로드도 실패 카운터와 감사 이벤트를 남겨야 하므로
//! Json 추출기는 `Result`로 받아 거부를 핸들러 안에서 처리합니다.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auth_core::AuthError;

use crate::error::{into_response, ApiErrorResponse};
use crate::metrics::{STATUS_FAILED, STATUS_SUCCESS};
use crate::services;
use crate::state::AppState;

/// 로그인/회원가입 요청 본문.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub credential: String,
}

/// 회원가입 성공 응답.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// 로그인 성공 응답.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub username: String,
}

/// 토큰 검증 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub token: Option<String>,
}

/// 요청 헤더에서 request id를 읽습니다. 없으면 새로 생성합니다.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Authorization 헤더에서 Bearer 토큰을 추출합니다.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// POST /auth/register
///
/// 201 + `{id, username, token}` | 400 (구조적 오류) | 409 (중복)
pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);

    let Json(req) = match payload {
        Ok(json) => json,
        Err(_) => {
            state.metrics.inc_register(STATUS_FAILED);
            state.audit.emit_background(
                "warn",
                "register rejected: malformed payload",
                &request_id,
                None,
            );
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorResponse::new("INVALID_INPUT", "잘못된 요청입니다")),
            )
                .into_response();
        }
    };

    match services::register(
        &state.db_pool,
        &state.jwt_secret,
        state.token_ttl_minutes,
        &req.username,
        &req.credential,
    )
    .await
    {
        Ok(session) => {
            state.metrics.inc_register(STATUS_SUCCESS);
            state.audit.emit_background(
                "info",
                &format!("user registered: {}", session.user.username),
                &request_id,
                Some(session.user.id),
            );
            (
                StatusCode::CREATED,
                Json(RegisterResponse {
                    id: session.user.id,
                    username: session.user.username,
                    token: session.token,
                }),
            )
                .into_response()
        }
        Err(err) => {
            state.metrics.inc_register(STATUS_FAILED);
            state.audit.emit_background(
                "warn",
                &format!("register failed: {}", audit_reason(&err)),
                &request_id,
                None,
            );
            into_response(err).into_response()
        }
    }
}

/// POST /auth/login
///
/// 200 + `{token, id, username}` | 400 (구조적 오류) | 401 (자격증명 불일치)
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);

    let Json(req) = match payload {
        Ok(json) => json,
        Err(_) => {
            state.metrics.inc_login(STATUS_FAILED);
            state.audit.emit_background(
                "warn",
                "login rejected: malformed payload",
                &request_id,
                None,
            );
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorResponse::new("INVALID_INPUT", "잘못된 요청입니다")),
            )
                .into_response();
        }
    };

    match services::login(
        &state.db_pool,
        &state.jwt_secret,
        state.token_ttl_minutes,
        &req.username,
        &req.credential,
    )
    .await
    {
        Ok(session) => {
            state.metrics.inc_login(STATUS_SUCCESS);
            state.audit.emit_background(
                "info",
                &format!("user logged in: {}", session.user.username),
                &request_id,
                Some(session.user.id),
            );
            (
                StatusCode::OK,
                Json(LoginResponse {
                    token: session.token,
                    id: session.user.id,
                    username: session.user.username,
                }),
            )
                .into_response()
        }
        Err(err) => {
            state.metrics.inc_login(STATUS_FAILED);
            state.audit.emit_background(
                "warn",
                &format!("login failed: {}", audit_reason(&err)),
                &request_id,
                None,
            );
            into_response(err).into_response()
        }
    }
}

/// GET /auth/validate
///
/// `?token=` 또는 `Authorization: Bearer` 헤더로 토큰을 받습니다.
/// 유효하지 않은 토큰은 에러가 아니라 `{valid:false}`이며, 항상 200입니다.
/// 순수 검증이므로 감사 이벤트를 남기지 않습니다.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ValidateParams>,
    headers: HeaderMap,
) -> Json<services::TokenValidation> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .or_else(|| bearer_token(&headers))
        .unwrap_or_default();

    Json(services::validate_token(&state.jwt_secret, &token))
}

/// 감사 이벤트용 실패 사유.
///
/// 내부 상세(쿼리, 연결 정보)는 포함하지 않습니다.
fn audit_reason(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidInput(_) => "invalid input",
        AuthError::InvalidCredentials => "invalid credentials",
        AuthError::NotFound(_) => "not found",
        AuthError::Conflict(_) => "username conflict",
        AuthError::Database(_) | AuthError::Internal(_) => "internal error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "req-123".parse().unwrap());
        assert_eq!(request_id(&headers), "req-123");
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let headers = HeaderMap::new();
        let id = request_id(&headers);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc.def.ghi".parse().unwrap(),
        );
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic dXNlcjpwdw==".parse().unwrap(),
        );
        assert!(bearer_token(&headers).is_none());
    }
}
