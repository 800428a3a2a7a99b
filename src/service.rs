//! PayPal payment service: encode, call, parse, track health

use crate::config::PayPalConfig;
use crate::encoder::RequestEncoder;
use crate::health::HealthTracker;
use crate::id::{IdGenerator, UuidIdGenerator};
use crate::nvp::NvpResponse;
use crate::transport::{HttpTransport, NvpTransport};
use crate::types::*;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

/// Name reported by [`PayPalPaymentService::service_name`]
pub const SERVICE_NAME: &str = "paypal-nvp";

const ATTEMPT_ID_TYPE: &str = "PayPalPaymentAttempt";
const UNKNOWN_ATTEMPT_ID: &str = "unknown";

/// Adapter between the checkout workflow and the PayPal NVP API
///
/// One instance is meant to be shared (e.g. behind an `Arc`) by every caller;
/// the health tracker is the only mutable state.
pub struct PayPalPaymentService<T: NvpTransport = HttpTransport> {
    config: PayPalConfig,
    encoder: RequestEncoder,
    transport: T,
    health: HealthTracker,
    id_generator: Arc<dyn IdGenerator>,
}

impl<T: NvpTransport> std::fmt::Debug for PayPalPaymentService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPalPaymentService")
            .field("config", &self.config)
            .field("health", &self.health)
            .field("id_generator", &"<generator>")
            .finish()
    }
}

impl PayPalPaymentService<HttpTransport> {
    /// Create a service talking HTTP to the configured endpoint
    pub fn new(config: PayPalConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: NvpTransport> PayPalPaymentService<T> {
    /// Create a service over a custom transport
    pub fn with_transport(config: PayPalConfig, transport: T) -> Self {
        let encoder = RequestEncoder::new(config.credentials.clone(), config.lib_version.clone());
        let health = HealthTracker::new(config.failure_reporting_threshold);

        Self {
            config,
            encoder,
            transport,
            health,
            id_generator: Arc::new(UuidIdGenerator),
        }
    }

    /// Replace the identifier generator
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// Perform one gateway call for `request`
    ///
    /// An id generator failure only affects the span tag; the call still runs.
    ///
    /// Transport failures are counted against service health and returned as
    /// [`PaymentError::Transport`](crate::PaymentError::Transport); a vendor-side
    /// failure acknowledgement comes back as a response with `error_detected`
    /// set.
    pub async fn process(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        let attempt_id = self
            .id_generator
            .next_id(ATTEMPT_ID_TYPE)
            .unwrap_or_else(|e| {
                warn!(error = %e, "attempt id unavailable");
                UNKNOWN_ATTEMPT_ID.to_string()
            });
        let span = info_span!(
            "paypal_process",
            attempt_id = %attempt_id,
            method = %request.method_type
        );

        self.call_gateway(request).instrument(span).await
    }

    async fn call_gateway(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        let nvps = self.encoder.encode(request);
        debug!(
            endpoint = %self.config.server_url,
            fields = nvps.len(),
            "sending NVP request"
        );

        let body = match self
            .transport
            .post_form(&self.config.server_url, nvps.as_pairs())
            .await
        {
            Ok(body) => body,
            Err(e) => {
                let status = self.health.record_failure();
                warn!(
                    error = %e,
                    failures = self.health.failure_count(),
                    status = %status,
                    "PayPal call failed"
                );
                return Err(e.into());
            }
        };
        self.health.record_success();

        let nvp = if self.config.lenient_parsing {
            NvpResponse::parse_lenient(&body)?
        } else {
            NvpResponse::parse(&body)?
        };

        let response = PaymentResponse::new(request.transaction_type, request.method_type);
        let response = nvp.build_response(response)?;
        debug!(
            successful = response.successful,
            errors = response.error_responses.len(),
            "PayPal response parsed"
        );
        Ok(response)
    }

    /// Up/down signal for external health checks
    pub fn service_status(&self) -> ServiceStatus {
        self.health.status()
    }

    /// Consecutive transport failures since the last successful call
    pub fn failure_count(&self) -> u32 {
        self.health.failure_count()
    }

    pub fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    pub fn user(&self) -> &str {
        &self.config.credentials.user
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    pub fn lib_version(&self) -> &str {
        &self.config.lib_version
    }

    pub fn failure_reporting_threshold(&self) -> u32 {
        self.config.failure_reporting_threshold
    }

    pub fn id_generator(&self) -> &Arc<dyn IdGenerator> {
        &self.id_generator
    }

    pub fn config(&self) -> &PayPalConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::error::TransportError;
    use crate::PaymentError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays canned outcomes and records what was sent
    struct ScriptedTransport {
        outcomes: Mutex<Vec<Option<String>>>,
        sent: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Option<&str>>) -> Self {
            Self {
                outcomes: Mutex::new(
                    outcomes
                        .into_iter()
                        .rev()
                        .map(|o| o.map(String::from))
                        .collect(),
                ),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NvpTransport for ScriptedTransport {
        async fn post_form(
            &self,
            _url: &str,
            pairs: &[(String, String)],
        ) -> std::result::Result<String, TransportError> {
            self.sent.lock().unwrap().push(pairs.to_vec());
            match self.outcomes.lock().unwrap().pop().flatten() {
                Some(body) => Ok(body),
                None => Err(TransportError::Status { status: 500 }),
            }
        }
    }

    struct CountingIds(AtomicUsize);

    impl IdGenerator for CountingIds {
        fn next_id(&self, id_type: &str) -> Result<String> {
            Ok(format!("{}-{}", id_type, self.0.fetch_add(1, Ordering::SeqCst)))
        }
    }

    struct FailingIds;

    impl IdGenerator for FailingIds {
        fn next_id(&self, id_type: &str) -> Result<String> {
            Err(PaymentError::config(format!("no sequence for {}", id_type)))
        }
    }

    fn config(threshold: u32) -> PayPalConfig {
        PayPalConfig::new(
            "https://api-3t.sandbox.paypal.com/nvp",
            Credentials::new("merchant_api1.example.com", "secret", "sig"),
        )
        .with_failure_reporting_threshold(threshold)
    }

    fn request() -> PaymentRequest {
        PaymentRequest::new(
            TransactionType::AuthorizeAndDebit,
            MethodType::Checkout,
            OrderSummary {
                sub_total: Decimal::from(10),
                total_tax: Decimal::ZERO,
                total_shipping: Decimal::ZERO,
                shipping_discount: Decimal::ZERO,
                grand_total: Decimal::from(10),
            },
            "https://shop.example.com/return",
            "https://shop.example.com/cancel",
        )
        .with_item(LineItem::new("Mug", "SKU-1", "Coffee mug", Decimal::from(10), 1))
    }

    #[tokio::test]
    async fn test_process_returns_populated_response() {
        let transport = ScriptedTransport::new(vec![Some("ACK=Success&TOKEN=EC-42&")]);
        let service = PayPalPaymentService::with_transport(config(3), transport);

        let response = service.process(&request()).await.unwrap();
        assert!(response.successful);
        assert_eq!(response.response_token.as_deref(), Some("EC-42"));
        assert_eq!(response.transaction_type, TransactionType::AuthorizeAndDebit);
        assert_eq!(response.method_type, MethodType::Checkout);

        let sent = service.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), 5 + 13);
    }

    #[tokio::test]
    async fn test_transport_failure_counts_and_propagates() {
        let transport = ScriptedTransport::new(vec![None, None]);
        let service = PayPalPaymentService::with_transport(config(2), transport);

        let err = service.process(&request()).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(service.failure_count(), 1);
        assert_eq!(service.service_status(), ServiceStatus::Up);

        service.process(&request()).await.unwrap_err();
        assert_eq!(service.service_status(), ServiceStatus::Down);
    }

    #[tokio::test]
    async fn test_success_after_failures_resets_health() {
        let transport = ScriptedTransport::new(vec![None, Some("ACK=Success&TOKEN=t&")]);
        let service = PayPalPaymentService::with_transport(config(1), transport);

        service.process(&request()).await.unwrap_err();
        assert_eq!(service.service_status(), ServiceStatus::Down);

        service.process(&request()).await.unwrap();
        assert_eq!(service.service_status(), ServiceStatus::Up);
        assert_eq!(service.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_error_does_not_count_as_failure() {
        let transport = ScriptedTransport::new(vec![Some("ACK=Success&TOKEN=abc")]);
        let service = PayPalPaymentService::with_transport(config(1), transport);

        let err = service.process(&request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Parse { .. }));
        assert_eq!(service.service_status(), ServiceStatus::Up);
        assert_eq!(service.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_lenient_parsing() {
        let transport = ScriptedTransport::new(vec![Some("ACK=Success&TOKEN=abc")]);
        let service = PayPalPaymentService::with_transport(
            config(1).with_lenient_parsing(true),
            transport,
        );

        let response = service.process(&request()).await.unwrap();
        assert_eq!(response.response_token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_id_generator_is_consulted_per_attempt() {
        let ids = Arc::new(CountingIds(AtomicUsize::new(0)));
        let transport = ScriptedTransport::new(vec![Some("ACK=Success&"), Some("ACK=Success&")]);
        let service = PayPalPaymentService::with_transport(config(1), transport)
            .with_id_generator(ids.clone());

        service.process(&request()).await.unwrap();
        service.process(&request()).await.unwrap();
        assert_eq!(ids.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_id_generator_failure_does_not_block_call() {
        let transport = ScriptedTransport::new(vec![Some("ACK=Success&TOKEN=EC-7&")]);
        let service = PayPalPaymentService::with_transport(config(1), transport)
            .with_id_generator(Arc::new(FailingIds));

        let response = service.process(&request()).await.unwrap();
        assert!(response.successful);
        assert_eq!(response.response_token.as_deref(), Some("EC-7"));
        assert_eq!(service.transport.sent.lock().unwrap().len(), 1);
        assert_eq!(service.service_status(), ServiceStatus::Up);
    }

    #[test]
    fn test_accessors() {
        let service =
            PayPalPaymentService::with_transport(config(4), ScriptedTransport::new(vec![]));
        assert_eq!(service.service_name(), "paypal-nvp");
        assert_eq!(service.user(), "merchant_api1.example.com");
        assert_eq!(service.server_url(), "https://api-3t.sandbox.paypal.com/nvp");
        assert_eq!(service.lib_version(), "78.0");
        assert_eq!(service.failure_reporting_threshold(), 4);
        assert!(service.id_generator().next_id("x").is_ok());
        assert!(!format!("{:?}", service).contains("secret"));
    }

    #[test]
    fn test_new_validates_config() {
        let bad = PayPalConfig::new("ftp://nope", Credentials::new("u", "p", "s"));
        assert!(PayPalPaymentService::new(bad).is_err());
    }
}
