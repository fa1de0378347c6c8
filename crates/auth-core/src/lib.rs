//! # Auth Core
//!
//! 인증 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 인증 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자(Identity) 도메인 모델
//! - 에러 분류 체계
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;

pub use domain::*;
pub use error::*;
pub use logging::*;
