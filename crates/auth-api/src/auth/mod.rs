//! 인증 기본 요소.
//!
//! JWT 토큰 코덱과 Argon2 비밀번호 해싱을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - 토큰 발급/검증 함수 ([`issue_token`], [`decode_token`])
//! - 비밀번호 해싱/검증 함수 ([`hash_password`], [`verify_password`])

mod jwt;
mod password;

pub use jwt::{decode_token, issue_token, Claims, JwtError};
pub use password::{hash_password, verify_password, PasswordError};
