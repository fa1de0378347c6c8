//! 감사 이벤트 발행 (best-effort).
//!
//! 구조화된 감사 이벤트를 메시지 익스체인지로 비동기 발행합니다.
//! 브로커가 없으면 시작 시점에 no-op 구현체로 강등되며,
//! 어떤 경우에도 감사 경로가 사용자 요청의 정확성/지연에 영향을 주지 않습니다.

mod emitter;
mod publisher;

pub use emitter::{AuditEmitter, AuditEnvelope, AuditError, AuditPayload};
pub use publisher::{connect, AmqpPublisher, EventPublisher, NoopPublisher, PublishError};
