//! JWT 토큰 처리.
//!
//! Bearer 토큰 생성/검증 로직. 순수 함수이며 I/O를 수행하지 않습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT 토큰 페이로드.
///
/// 사용자 식별 정보와 발급/만료 시간을 포함합니다.
/// `sub`는 i64로 인코딩되어 식별자가 정밀도 손실 없이 왕복합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: i64,
    /// 사용자 이름
    pub username: String,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `username` - 사용자 이름
    /// * `ttl_minutes` - 만료 시간 (분)
    pub fn new(user_id: i64, username: impl Into<String>, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.into(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        }
    }
}

/// JWT 토큰 처리 에러.
///
/// 호출자는 모든 변형을 "미인증"으로 취급해야 하며,
/// 서버 에러로 승격해서는 안 됩니다.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
    #[error("토큰 디코딩 실패")]
    DecodingError,
}

/// 토큰 발급.
///
/// # Arguments
///
/// * `user_id` - 사용자 ID
/// * `username` - 사용자 이름
/// * `secret` - 서명 비밀 키
/// * `ttl_minutes` - 만료 시간 (분)
///
/// # Returns
///
/// 인코딩된 JWT 문자열
pub fn issue_token(
    user_id: i64,
    username: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, username, ttl_minutes);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 빈 토큰, 형식 오류, 서명 불일치, 만료 모두 에러로 반환됩니다.
/// 변조되거나 만료된 토큰에서 부분적인 클레임을 반환하지 않습니다.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    // 기본 60초 유예를 제거: exp가 지난 토큰은 즉시 무효
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
        _ => JwtError::DecodingError,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    #[test]
    fn test_issue_and_decode_token() {
        let token = issue_token(123, "testuser", TEST_SECRET, 60).unwrap();
        assert!(!token.is_empty());

        let claims = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, 123);
        assert_eq!(claims.username, "testuser");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_large_user_id_roundtrip() {
        // 식별자는 보안에 민감하므로 i64 전 범위에서 정확히 왕복해야 함
        let id = i64::MAX - 1;
        let token = issue_token(id, "edge", TEST_SECRET, 60).unwrap();
        let claims = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, id);
    }

    #[test]
    fn test_empty_token() {
        assert!(decode_token("", TEST_SECRET).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let result = decode_token("invalid.token.here", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_token(123, "testuser", TEST_SECRET, 60).unwrap();
        let result = decode_token(&token, "wrong-secret-key-for-testing-minimum-32-chars");
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = issue_token(123, "testuser", TEST_SECRET, 60).unwrap();

        // 토큰의 각 바이트를 하나씩 뒤집어도 부분 클레임 없이 실패해야 함
        let bytes = token.as_bytes();
        for i in (0..bytes.len()).step_by(7) {
            let mut tampered = bytes.to_vec();
            tampered[i] ^= 0x01;
            if let Ok(tampered_str) = String::from_utf8(tampered) {
                if tampered_str == token {
                    continue;
                }
                assert!(
                    decode_token(&tampered_str, TEST_SECRET).is_err(),
                    "byte {} 변조가 통과됨",
                    i
                );
            }
        }
    }

    #[test]
    fn test_just_expired_token_rejected() {
        // 만료 직후(수 초 경과) 토큰도 유예 없이 거부되어야 함
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 123,
            username: "testuser".to_string(),
            iat: now - 300,
            exp: now - 5,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_token(&token, TEST_SECRET),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_expired_token() {
        // 음수 TTL로 이미 만료된 토큰 생성
        let token = issue_token(123, "testuser", TEST_SECRET, -5).unwrap();
        let result = decode_token(&token, TEST_SECRET);
        assert!(matches!(
            result,
            Err(JwtError::TokenExpired) | Err(JwtError::InvalidToken)
        ));
    }
}
