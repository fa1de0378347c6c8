//! 트랜스포트 중립 비즈니스 로직.

pub mod auth;

pub use auth::{get_user, login, register, validate_token, Session, TokenValidation};
