//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 HTTP/gRPC 어댑터가 공유하는 리소스를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use sqlx::PgPool;

use crate::audit::AuditEmitter;
use crate::metrics::Metrics;

/// 애플리케이션 공유 상태.
///
/// 요청 간 공유되는 가변 상태는 연결 풀과 메트릭 수집기뿐이며,
/// 둘 다 설계상 동시 접근에 안전하므로 별도 락이 없습니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 (PostgreSQL)
    pub db_pool: PgPool,

    /// JWT 서명 비밀 키
    pub jwt_secret: String,

    /// 발급 토큰의 TTL (분)
    pub token_ttl_minutes: i64,

    /// 메트릭 수집기 (시작 시 1회 등록 완료)
    pub metrics: Arc<Metrics>,

    /// 감사 이벤트 방출기 (브로커 부재 시 no-op)
    pub audit: AuditEmitter,
}
