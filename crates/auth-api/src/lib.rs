//! 인증 마이크로서비스: REST + gRPC 토큰 발급/검증.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (register/login/validate)
//! - Tonic 기반 gRPC 서비스 (ValidateToken/GetUser)
//! - JWT 발급 및 검증 (HS256, i64 사용자 ID 보존)
//! - Prometheus 메트릭 (명시적 레지스트리, 시작 시 등록)
//! - AMQP 감사 이벤트 발행 (브로커 부재 시 no-op 강등)
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`grpc`]: gRPC 서비스 어댑터
//! - [`services`]: 전송 계층과 무관한 비즈니스 로직
//! - [`auth`]: JWT 발급/검증 및 비밀번호 해싱
//! - [`repository`]: 사용자 영속성 계층
//! - [`audit`]: 감사 이벤트 발행
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`lifecycle`]: 시작/드레인 수명 주기

pub mod audit;
pub mod auth;
pub mod error;
pub mod grpc;
pub mod lifecycle;
pub mod metrics;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{decode_token, hash_password, issue_token, verify_password, Claims, JwtError};
pub use error::{ApiErrorResponse, ApiResult};
pub use metrics::{Metrics, RequestTimer, STATUS_FAILED, STATUS_SUCCESS};
pub use middleware::metrics_layer;
pub use routes::create_router;
pub use services::{get_user, login, register, validate_token, Session, TokenValidation};
pub use state::AppState;
