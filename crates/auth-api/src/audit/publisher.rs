//! 감사 이벤트 발행기.
//!
//! AMQP 토픽 익스체인지로 이벤트를 발행하는 케이퍼빌리티 인터페이스와
//! 두 구현체(브로커 연결형, no-op)를 제공합니다.
//!
//! 브로커는 선택적 의존성입니다. 주소가 비어 있거나 연결/채널/익스체인지
//! 설정이 실패해도 서비스 시작은 실패하지 않으며, no-op 구현체로
//! 조용히 강등됩니다. 호출자는 어느 구현체가 활성인지 알 수 없습니다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, ExchangeDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind,
};
use tracing::{debug, info, warn};

/// 발행 실패 에러.
///
/// 호출자에게 Result로 보고되지만, 원 요청의 실패로 전파되어서는 안 됩니다.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("브로커 발행 실패: {0}")]
    Broker(#[from] lapin::Error),
}

/// 이벤트 발행 케이퍼빌리티.
///
/// `publish`는 직렬화된 페이로드를 라우팅 키와 함께 전송하고,
/// `close`는 하부 전송 자원을 해제합니다. `close`는 반복 호출에
/// 멱등해야 합니다.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, routing_key: &str, payload: Vec<u8>) -> Result<(), PublishError>;
    async fn close(&self);
}

/// RabbitMQ 연결형 발행기.
///
/// lapin 채널은 동시 발행에 안전하므로 호출자 측 직렬화가 필요 없습니다.
pub struct AmqpPublisher {
    conn: Connection,
    channel: Channel,
    exchange: String,
    closed: AtomicBool,
}

#[async_trait]
impl EventPublisher for AmqpPublisher {
    async fn publish(&self, routing_key: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            // persistent delivery
            .with_delivery_mode(2);

        self.channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await?
            .await?;

        Ok(())
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.channel.close(200, "shutdown").await {
            warn!(error = %e, "Failed to close RabbitMQ channel");
        }
        if let Err(e) = self.conn.close(200, "shutdown").await {
            warn!(error = %e, "Failed to close RabbitMQ connection");
        }
        info!("Audit publisher closed");
    }
}

/// 브로커가 없을 때 사용되는 no-op 발행기.
///
/// `publish`는 네트워크 I/O 없이 항상 성공합니다.
pub struct NoopPublisher {
    reason: String,
}

impl NoopPublisher {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _routing_key: &str, _payload: Vec<u8>) -> Result<(), PublishError> {
        debug!(reason = %self.reason, "Audit publish skipped (noop publisher)");
        Ok(())
    }

    async fn close(&self) {
        debug!(reason = %self.reason, "Noop audit publisher closed");
    }
}

/// 브로커에 연결하여 발행기를 구성합니다.
///
/// 어떤 단계가 실패해도 에러를 반환하지 않고 no-op 발행기로 강등됩니다.
/// 감사 싱크 장애로 서비스 시작이 막혀서는 안 됩니다.
pub async fn connect(amqp_url: &str, exchange: &str) -> Arc<dyn EventPublisher> {
    if amqp_url.trim().is_empty() {
        warn!("Audit publishing disabled: AMQP_URL is empty");
        return Arc::new(NoopPublisher::new("empty AMQP_URL"));
    }

    let conn = match Connection::connect(amqp_url, ConnectionProperties::default()).await {
        Ok(conn) => conn,
        Err(e) => {
            warn!(error = %e, "Failed to connect to RabbitMQ, audit degraded to noop");
            return Arc::new(NoopPublisher::new("connection error"));
        }
    };

    let channel = match conn.create_channel().await {
        Ok(channel) => channel,
        Err(e) => {
            warn!(error = %e, "Failed to open RabbitMQ channel, audit degraded to noop");
            return Arc::new(NoopPublisher::new("channel error"));
        }
    };

    let declare = channel
        .exchange_declare(
            exchange,
            ExchangeKind::Topic,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await;

    if let Err(e) = declare {
        warn!(exchange = %exchange, error = %e, "Failed to declare exchange, audit degraded to noop");
        return Arc::new(NoopPublisher::new("exchange declare error"));
    }

    info!(exchange = %exchange, "Audit publisher connected");
    Arc::new(AmqpPublisher {
        conn,
        channel,
        exchange: exchange.to_string(),
        closed: AtomicBool::new(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_url_degrades_to_noop() {
        let publisher = connect("", "logs.events").await;

        // no-op 발행은 네트워크 없이 항상 성공
        assert!(publisher.publish("auth.audit", b"{}".to_vec()).await.is_ok());

        // close는 반복 호출에 멱등
        publisher.close().await;
        publisher.close().await;
    }

    #[tokio::test]
    async fn test_noop_publish_always_succeeds() {
        let publisher = NoopPublisher::new("test");
        for _ in 0..10 {
            assert!(publisher.publish("any.key", vec![1, 2, 3]).await.is_ok());
        }
    }
}
