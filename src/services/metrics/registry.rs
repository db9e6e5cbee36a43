use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the API
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Verification Metrics
    pub otp_requests_total: CounterVec,
    pub otp_verifications_total: CounterVec,

    // Policy Metrics
    pub quota_decisions_total: CounterVec,
    pub admission_decisions_total: CounterVec,
    pub password_resets_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("twiller"),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("twiller")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "route"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let otp_requests_total = CounterVec::new(
            Opts::new("otp_requests_total", "One-time passcodes requested").namespace("twiller"),
            &["purpose", "channel", "outcome"],
        )?;
        registry.register(Box::new(otp_requests_total.clone()))?;

        let otp_verifications_total = CounterVec::new(
            Opts::new("otp_verifications_total", "One-time passcode verification attempts")
                .namespace("twiller"),
            &["purpose", "outcome"],
        )?;
        registry.register(Box::new(otp_verifications_total.clone()))?;

        let quota_decisions_total = CounterVec::new(
            Opts::new("quota_decisions_total", "Posting quota evaluations").namespace("twiller"),
            &["tier", "outcome"],
        )?;
        registry.register(Box::new(quota_decisions_total.clone()))?;

        let admission_decisions_total = CounterVec::new(
            Opts::new("admission_decisions_total", "Payment admission gate decisions")
                .namespace("twiller"),
            &["outcome"],
        )?;
        registry.register(Box::new(admission_decisions_total.clone()))?;

        let password_resets_total = CounterVec::new(
            Opts::new("password_resets_total", "Password recovery requests").namespace("twiller"),
            &["method", "outcome"],
        )?;
        registry.register(Box::new(password_resets_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            otp_requests_total,
            otp_verifications_total,
            quota_decisions_total,
            admission_decisions_total,
            password_resets_total,
        }))
    }

    pub fn record_otp_request(&self, purpose: &str, channel: &str, outcome: &str) {
        self.otp_requests_total
            .with_label_values(&[purpose, channel, outcome])
            .inc();
    }

    pub fn record_otp_verification(&self, purpose: &str, outcome: &str) {
        self.otp_verifications_total
            .with_label_values(&[purpose, outcome])
            .inc();
    }

    pub fn record_quota_decision(&self, tier: &str, allowed: bool) {
        let outcome = if allowed { "allowed" } else { "limit_exceeded" };
        self.quota_decisions_total
            .with_label_values(&[tier, outcome])
            .inc();
    }

    pub fn record_admission(&self, open: bool) {
        let outcome = if open { "admitted" } else { "denied" };
        self.admission_decisions_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_password_reset(&self, method: &str, outcome: &str) {
        self.password_resets_total
            .with_label_values(&[method, outcome])
            .inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
