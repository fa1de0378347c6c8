//! 서비스 수명 주기 관리.
//!
//! 상태 머신: `Starting → Running → Draining → Stopped`.
//!
//! 종료 시그널을 받으면 HTTP부터 드레인하고, 다음으로 gRPC 리스너를
//! 같은 방식으로 멈춘 뒤 마지막에 감사 채널을 닫습니다. 각 단계는
//! 독립적인 타임아웃을 가지며, 멈춘 단계는 로그만 남기고 다음 단계로
//! 진행합니다. 프로세스가 무한정 매달리는 일은 없습니다.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::audit::AuditEmitter;

/// 수명 주기 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 리스너 바인딩 중 (바인딩 실패는 치명적)
    Starting,
    /// 두 리스너가 동시에, 독립적으로 요청 수락 중
    Running,
    /// 종료 시그널 수신, 순서대로 드레인 중
    Draining,
    /// 종료 (터미널 상태)
    Stopped,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Starting => "starting",
            Stage::Running => "running",
            Stage::Draining => "draining",
            Stage::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

/// 드레인 단계별 기본 타임아웃.
pub const DRAIN_STEP_TIMEOUT: Duration = Duration::from_secs(10);

/// 종료 시그널 대기 (Ctrl+C 또는 SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// 단일 드레인 단계: 리스너 태스크 종료를 제한 시간까지 대기.
async fn drain_step(name: &str, handle: JoinHandle<()>, step_timeout: Duration) {
    match tokio::time::timeout(step_timeout, handle).await {
        Ok(Ok(())) => info!(step = name, "Drain step completed"),
        Ok(Err(e)) => warn!(step = name, error = %e, "Drain step task failed"),
        Err(_) => warn!(step = name, "Drain step timed out, proceeding to next step"),
    }
}

/// 순서가 보장된 드레인: HTTP → gRPC → 감사 채널.
///
/// 토큰 취소로 각 리스너의 신규 수락이 먼저 멈추고, 진행 중인 요청은
/// 단계 타임아웃 안에서 완료됩니다. 감사 채널은 정확히 한 번 닫힙니다
/// (드레인 경로가 단일하며 close 자체도 멱등).
pub async fn drain(
    http_token: CancellationToken,
    http_handle: JoinHandle<()>,
    grpc_token: CancellationToken,
    grpc_handle: JoinHandle<()>,
    audit: &AuditEmitter,
    step_timeout: Duration,
) {
    info!(stage = %Stage::Draining, "Shutdown signal received, draining");

    http_token.cancel();
    drain_step("http", http_handle, step_timeout).await;

    grpc_token.cancel();
    drain_step("grpc", grpc_handle, step_timeout).await;

    if tokio::time::timeout(step_timeout, audit.close())
        .await
        .is_err()
    {
        warn!("Audit channel close timed out");
    }

    info!(stage = %Stage::Stopped, "Servers stopped gracefully");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::audit::{AuditEmitter, NoopPublisher};

    fn test_audit() -> AuditEmitter {
        AuditEmitter::new(Arc::new(NoopPublisher::new("test")), "auth-service", "test")
    }

    #[tokio::test]
    async fn test_drain_cancels_in_order_and_completes() {
        let http_token = CancellationToken::new();
        let grpc_token = CancellationToken::new();

        // 취소 시점에 종료되는 모의 리스너
        let http = {
            let token = http_token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };
        let grpc = {
            let token = grpc_token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        let audit = test_audit();
        drain(
            http_token,
            http,
            grpc_token,
            grpc,
            &audit,
            Duration::from_secs(1),
        )
        .await;
    }

    #[tokio::test]
    async fn test_drain_skips_stuck_step() {
        let http_token = CancellationToken::new();
        let grpc_token = CancellationToken::new();

        // 취소를 무시하고 매달리는 리스너: 타임아웃 후 다음 단계로 진행해야 함
        let stuck_http = tokio::spawn(async move { std::future::pending::<()>().await });
        let grpc = {
            let token = grpc_token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        let audit = test_audit();
        let started = std::time::Instant::now();
        drain(
            http_token,
            stuck_http,
            grpc_token,
            grpc,
            &audit,
            Duration::from_millis(50),
        )
        .await;

        // 매달린 단계가 전체 드레인을 막지 않음
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Starting.to_string(), "starting");
        assert_eq!(Stage::Running.to_string(), "running");
        assert_eq!(Stage::Draining.to_string(), "draining");
        assert_eq!(Stage::Stopped.to_string(), "stopped");
    }
}
