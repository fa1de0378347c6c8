//! Prometheus 메트릭 수집기.
//!
//! HTTP/gRPC 요청 메트릭과 인증 도메인 메트릭을 수집하고
//! `/metrics` 엔드포인트로 노출합니다.
//!
//! 전역 기본 레지스트리를 쓰지 않고, 시작 시점에 명시적으로 생성한
//! `Registry` 인스턴스에 모든 수집기를 정확히 한 번 등록합니다.
//! 리스너가 요청을 받기 전에 등록이 끝나므로 지연 등록 가드가 필요 없습니다.

use std::sync::Arc;
use std::time::Instant;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

/// 인증 결과 라벨: 성공.
pub const STATUS_SUCCESS: &str = "success";
/// 인증 결과 라벨: 실패.
pub const STATUS_FAILED: &str = "failed";

/// 허용된 인증 결과 라벨인지 확인.
///
/// 카디널리티 제한을 위해 `success`/`failed` 이외의 값은
/// 에러 없이 버려집니다.
fn is_valid_auth_status(status: &str) -> bool {
    status == STATUS_SUCCESS || status == STATUS_FAILED
}

/// 프로세스 전역 메트릭 수집기.
///
/// 내부 카운터는 모두 동시 접근에 안전하므로 호출자 측 락이 필요 없습니다.
pub struct Metrics {
    service: String,
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
    in_flight: IntGauge,
    logins_total: IntCounterVec,
    registers_total: IntCounterVec,
}

impl Metrics {
    /// 새 레지스트리를 생성하고 모든 수집기를 등록합니다.
    ///
    /// 서비스 시작 시 한 번만 호출됩니다.
    pub fn new(service: impl Into<String>) -> Result<Arc<Self>, prometheus::Error> {
        let service = service.into();
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "http_requests_total",
                "Total number of requests processed.",
            ),
            &["service", "method", "path", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of requests in seconds.",
            ),
            &["service", "method", "path", "status"],
        )?;
        let in_flight = IntGauge::new(
            "http_in_flight_requests",
            "Current number of in-flight requests.",
        )?;
        let logins_total = IntCounterVec::new(
            Opts::new(
                "auth_logins_total",
                "Total number of authentication login attempts.",
            ),
            &["status"],
        )?;
        let registers_total = IntCounterVec::new(
            Opts::new(
                "auth_registers_total",
                "Total number of authentication registrations.",
            ),
            &["status"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;
        registry.register(Box::new(logins_total.clone()))?;
        registry.register(Box::new(registers_total.clone()))?;

        Ok(Arc::new(Self {
            service,
            registry,
            requests_total,
            request_duration,
            in_flight,
            logins_total,
            registers_total,
        }))
    }

    /// 요청 1건의 처리 결과를 기록합니다.
    ///
    /// 카운터 증가와 지연 시간 히스토그램 기록을 함께 수행합니다.
    pub fn observe_request(&self, method: &str, path: &str, status: &str, duration_secs: f64) {
        let labels = [self.service.as_str(), method, path, status];
        self.requests_total.with_label_values(&labels).inc();
        self.request_duration
            .with_label_values(&labels)
            .observe(duration_secs);
    }

    /// 로그인 결과 카운터 증가.
    ///
    /// `success`/`failed` 이외의 값은 무시됩니다.
    pub fn inc_login(&self, status: &str) {
        if !is_valid_auth_status(status) {
            return;
        }
        self.logins_total.with_label_values(&[status]).inc();
    }

    /// 회원가입 결과 카운터 증가.
    ///
    /// `success`/`failed` 이외의 값은 무시됩니다.
    pub fn inc_register(&self, status: &str) {
        if !is_valid_auth_status(status) {
            return;
        }
        self.registers_total.with_label_values(&[status]).inc();
    }

    /// 현재 메트릭 상태를 Prometheus 텍스트 형식으로 렌더링합니다.
    ///
    /// 호출 시점까지의 모든 증가를 반영합니다.
    pub fn render(&self) -> String {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// 요청 수명을 감싸는 RAII 타이머.
///
/// 생성 시 in-flight 게이지를 올리고, finish 또는 drop 시 내립니다.
/// 패닉으로 핸들러가 풀려도 게이지가 복원됩니다.
pub struct RequestTimer {
    metrics: Arc<Metrics>,
    method: String,
    path: String,
    start: Instant,
}

impl RequestTimer {
    /// 타이머 시작. in-flight 게이지를 증가시킵니다.
    pub fn start(metrics: Arc<Metrics>, method: impl Into<String>, path: impl Into<String>) -> Self {
        metrics.in_flight.inc();
        Self {
            metrics,
            method: method.into(),
            path: path.into(),
            start: Instant::now(),
        }
    }

    /// 최종 상태와 함께 요청 메트릭을 기록하고 타이머를 종료합니다.
    ///
    /// 상태는 모든 검증 단계가 끝난 실제 최종 결과여야 합니다.
    pub fn finish(self, status: &str) {
        let duration = self.start.elapsed().as_secs_f64();
        self.metrics
            .observe_request(&self.method, &self.path, status, duration);
        // drop에서 in-flight 게이지 감소
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.metrics.in_flight.dec();
    }
}
