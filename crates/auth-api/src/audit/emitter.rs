//! 감사 이벤트 빌더 및 전송.
//!
//! 보안 관련 동작 1건당 하나의 감사 엔벨로프를 만들어
//! `<service>.audit` 라우팅 키로 발행합니다.
//! 발행 실패는 로그로만 남고 원 요청의 결과에 영향을 주지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::publisher::{EventPublisher, PublishError};

/// 요청 응답 경로와 독립적인 발행 데드라인.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// 감사 이벤트 스키마 버전.
const SCHEMA_VERSION: u32 = 1;

/// 감사 이벤트 페이로드.
#[derive(Debug, Clone, Serialize)]
pub struct AuditPayload {
    pub level: String,
    pub text: String,
}

/// 감사 이벤트 엔벨로프.
///
/// 생성 후 불변이며, 소유권은 전송을 위해 발행기로 이동합니다.
/// `event_id`는 발행마다 새로 생성됩니다.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEnvelope {
    pub schema_version: u32,
    pub event_id: String,
    pub event_type: String,
    /// UTC, 나노초 정밀도 RFC 3339
    pub occurred_at: String,
    pub service: String,
    pub environment: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub payload: AuditPayload,
}

/// 감사 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("엔벨로프 직렬화 실패: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// 감사 이벤트 방출기.
///
/// 발행기 구현체(연결형/no-op)를 알지 못한 채 엔벨로프를 만들어 전달합니다.
#[derive(Clone)]
pub struct AuditEmitter {
    publisher: Arc<dyn EventPublisher>,
    service: String,
    environment: String,
}

impl AuditEmitter {
    pub fn new(
        publisher: Arc<dyn EventPublisher>,
        service: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            publisher,
            service: service.into(),
            environment: environment.into(),
        }
    }

    fn build_envelope(
        &self,
        level: &str,
        text: &str,
        request_id: &str,
        user_id: Option<i64>,
    ) -> AuditEnvelope {
        let request_id = if request_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            request_id.to_string()
        };

        AuditEnvelope {
            schema_version: SCHEMA_VERSION,
            event_id: Uuid::new_v4().to_string(),
            event_type: "audit_log".to_string(),
            occurred_at: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
            service: self.service.clone(),
            environment: self.environment.clone(),
            request_id,
            user_id,
            payload: AuditPayload {
                level: level.to_string(),
                text: text.to_string(),
            },
        }
    }

    /// 감사 이벤트를 발행합니다.
    ///
    /// 실패는 Result로 보고되지만 호출자는 log-and-continue 해야 합니다.
    pub async fn emit(
        &self,
        level: &str,
        text: &str,
        request_id: &str,
        user_id: Option<i64>,
    ) -> Result<(), AuditError> {
        let envelope = self.build_envelope(level, text, request_id, user_id);
        let payload = serde_json::to_vec(&envelope)?;
        let routing_key = format!("{}.audit", self.service);
        self.publisher.publish(&routing_key, payload).await?;
        Ok(())
    }

    /// 응답 경로를 기다리게 하지 않는 fire-and-forget 발행.
    ///
    /// 자체 데드라인으로 스폰되며, 실패/타임아웃은 경고 로그로만 남습니다.
    pub fn emit_background(&self, level: &str, text: &str, request_id: &str, user_id: Option<i64>) {
        let emitter = self.clone();
        let level = level.to_string();
        let text = text.to_string();
        let request_id = request_id.to_string();

        tokio::spawn(async move {
            let result = tokio::time::timeout(
                PUBLISH_TIMEOUT,
                emitter.emit(&level, &text, &request_id, user_id),
            )
            .await;

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Audit publish failed"),
                Err(_) => warn!("Audit publish timed out"),
            }
        });
    }

    /// 하부 발행기를 닫습니다. 반복 호출에 멱등합니다.
    pub async fn close(&self) {
        self.publisher.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::publisher::NoopPublisher;

    fn test_emitter() -> AuditEmitter {
        AuditEmitter::new(
            Arc::new(NoopPublisher::new("test")),
            "auth-service",
            "test",
        )
    }

    #[test]
    fn test_envelope_schema() {
        let emitter = test_emitter();
        let envelope = emitter.build_envelope("info", "user logged in", "req-1", Some(42));

        assert_eq!(envelope.schema_version, 1);
        assert_eq!(envelope.event_type, "audit_log");
        assert_eq!(envelope.service, "auth-service");
        assert_eq!(envelope.environment, "test");
        assert_eq!(envelope.request_id, "req-1");
        assert_eq!(envelope.user_id, Some(42));

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""schema_version":1"#));
        assert!(json.contains(r#""level":"info""#));
        assert!(json.contains(r#""text":"user logged in""#));
    }

    #[test]
    fn test_envelope_omits_missing_user_id() {
        let emitter = test_emitter();
        let envelope = emitter.build_envelope("warn", "login failed", "req-2", None);

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("user_id"));
    }

    #[test]
    fn test_request_id_generated_when_absent() {
        let emitter = test_emitter();
        let envelope = emitter.build_envelope("info", "x", "", None);
        assert!(!envelope.request_id.is_empty());
        assert!(Uuid::parse_str(&envelope.request_id).is_ok());
    }

    #[test]
    fn test_event_id_unique_per_emission() {
        let emitter = test_emitter();
        let a = emitter.build_envelope("info", "x", "req", None);
        let b = emitter.build_envelope("info", "x", "req", None);
        assert_ne!(a.event_id, b.event_id);
    }

    #[tokio::test]
    async fn test_emit_through_noop_succeeds() {
        let emitter = test_emitter();
        assert!(emitter.emit("info", "x", "req", Some(1)).await.is_ok());
        emitter.close().await;
        emitter.close().await;
    }
}
