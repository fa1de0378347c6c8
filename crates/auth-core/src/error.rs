//! 인증 서비스의 에러 타입.
//!
//! 이 모듈은 인증 서비스 전반에서 사용되는 에러 분류 체계를 정의합니다.
//! 트랜스포트 어댑터(HTTP/gRPC)는 이 분류를 각 프로토콜의 상태 코드로 매핑합니다.

use thiserror::Error;

/// 핵심 인증 에러.
///
/// 분류 기준:
/// - 클라이언트 잘못 (`InvalidInput`, `InvalidCredentials`, `NotFound`, `Conflict`)은
///   4xx 계열로 매핑되며 장애 로그를 남기지 않습니다.
/// - 인프라 장애 (`Database`, `Internal`)는 5xx 계열로 매핑되며
///   내부 상세를 응답에 노출하지 않습니다.
#[derive(Debug, Error)]
pub enum AuthError {
    /// 잘못된 입력 (구조적으로 유효하지 않은 요청)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 자격증명 불일치 (형식은 올바르나 인증 실패)
    #[error("자격증명이 유효하지 않습니다")]
    InvalidCredentials,

    /// 찾을 수 없음 (정상적인 비즈니스 결과)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 중복 생성 (username 고유 제약 위반)
    #[error("이미 존재함: {0}")]
    Conflict(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// 인프라 장애인지 확인합니다.
    ///
    /// 인프라 장애만 5xx로 매핑되고 내부 로그에 기록됩니다.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AuthError::Database(_) | AuthError::Internal(_))
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}
