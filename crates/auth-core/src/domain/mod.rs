//! 인증 서비스의 도메인 모델.

mod user;

pub use user::*;
