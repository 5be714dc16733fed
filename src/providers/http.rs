use crate::core::{
    ConversionRequest, ConversionResult, QuoteError, QuoteResult, QuoteService, ResponsePolicy,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const PREQUOTE_PATH: &str = "/api/prequote";
const CONVERT_PATH: &str = "/api/convert";

/// Quote service reached over HTTP. Each call is a single attempt.
pub struct HttpQuoteService {
    base_url: String,
    client: reqwest::Client,
    policy: ResponsePolicy,
}

impl HttpQuoteService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bridge/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(HttpQuoteService {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            policy: ResponsePolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: ResponsePolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn post(&self, path: &str, request: &ConversionRequest) -> Result<Value, QuoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting quote from {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        debug!(status = %response.status(), "Received quote response");

        let body = response.json::<Value>().await?;
        debug!(%body, "Parsed quote response");
        Ok(body)
    }
}

#[async_trait]
impl QuoteService for HttpQuoteService {
    #[instrument(name = "PreQuote", skip(self, request), fields(amount = request.amount))]
    async fn pre_quote(&self, request: &ConversionRequest) -> Result<QuoteResult, QuoteError> {
        let body = self.post(PREQUOTE_PATH, request).await?;
        QuoteResult::from_json(&body)
    }

    #[instrument(name = "Convert", skip(self, request), fields(amount = request.amount))]
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, QuoteError> {
        let body = self.post(CONVERT_PATH, request).await?;
        ConversionResult::from_json(&body, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CurrencyCode, request::build};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(
        endpoint: &str,
        response: ResponseTemplate,
    ) -> wiremock::MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn service(mock_server: &MockServer) -> HttpQuoteService {
        HttpQuoteService::new(&mock_server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn btc_to_usd() -> ConversionRequest {
        build(
            "1",
            CurrencyCode::parse("BTC").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
        )
    }

    const CONVERT_JSON: &str = r#"{
        "direct_amount": 60000,
        "converted_amount": 60500,
        "savings": 500,
        "commission": 50,
        "exchange_path": ["BTC", "USD"]
    }"#;

    #[tokio::test]
    async fn test_pre_quote_sends_wire_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/prequote"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "amount": 1.0,
                "from_currency": "BTC",
                "to_currency": "USD"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"direct_amount": 42000}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = service(&mock_server).pre_quote(&btc_to_usd()).await.unwrap();
        assert_eq!(result.direct_amount, 42000.0);
    }

    #[tokio::test]
    async fn test_pre_quote_missing_direct_amount_is_malformed() {
        let mock_server = create_mock_server(
            "/api/prequote",
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;

        let err = service(&mock_server).pre_quote(&btc_to_usd()).await.unwrap_err();
        assert!(matches!(err, QuoteError::MalformedResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport_error() {
        let mock_server = create_mock_server(
            "/api/prequote",
            ResponseTemplate::new(200).set_body_string("<html>gateway</html>"),
        )
        .await;

        let err = service(&mock_server).pre_quote(&btc_to_usd()).await.unwrap_err();
        assert!(matches!(err, QuoteError::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_server_error_status_is_transport_error() {
        let mock_server = create_mock_server(
            "/api/convert",
            ResponseTemplate::new(500).set_body_string(CONVERT_JSON),
        )
        .await;

        let err = service(&mock_server).convert(&btc_to_usd()).await.unwrap_err();
        match err {
            QuoteError::Transport(e) => assert!(e.is_status()),
            other => panic!("Expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let provider = HttpQuoteService::new("http://127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let err = provider.convert(&btc_to_usd()).await.unwrap_err();
        assert!(matches!(err, QuoteError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let mock_server = create_mock_server(
            "/api/convert",
            ResponseTemplate::new(200)
                .set_body_string(CONVERT_JSON)
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let provider =
            HttpQuoteService::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();
        let err = provider.convert(&btc_to_usd()).await.unwrap_err();
        match err {
            QuoteError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("Expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_convert_success() {
        let mock_server = create_mock_server(
            "/api/convert",
            ResponseTemplate::new(200).set_body_string(CONVERT_JSON),
        )
        .await;

        let result = service(&mock_server).convert(&btc_to_usd()).await.unwrap();
        assert_eq!(result.direct_amount, Some(60000.0));
        assert_eq!(result.converted_amount, Some(60500.0));
        assert_eq!(result.savings, Some(500.0));
        assert_eq!(result.commission, Some(50.0));
        assert!(result.optimized_rate.is_none());
        assert!(result.arbitrage_profit.is_none());
    }

    #[tokio::test]
    async fn test_convert_is_lenient_by_default() {
        let mock_server = create_mock_server(
            "/api/convert",
            ResponseTemplate::new(200).set_body_string(r#"{"direct_amount": 10}"#),
        )
        .await;

        let result = service(&mock_server).convert(&btc_to_usd()).await.unwrap();
        assert_eq!(result.direct_amount, Some(10.0));
        assert!(result.converted_amount.is_none());
        assert!(result.exchange_path.is_none());
    }

    #[tokio::test]
    async fn test_convert_strict_policy() {
        let mock_server = create_mock_server(
            "/api/convert",
            ResponseTemplate::new(200).set_body_string(r#"{"direct_amount": 10}"#),
        )
        .await;

        let provider = service(&mock_server).with_policy(ResponsePolicy::Strict);
        let err = provider.convert(&btc_to_usd()).await.unwrap_err();
        assert!(matches!(err, QuoteError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_identical_requests_yield_identical_results() {
        let mock_server = create_mock_server(
            "/api/convert",
            ResponseTemplate::new(200).set_body_string(CONVERT_JSON),
        )
        .await;

        let provider = service(&mock_server);
        let first = provider.convert(&btc_to_usd()).await.unwrap();
        let second = provider.convert(&btc_to_usd()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = create_mock_server(
            "/api/prequote",
            ResponseTemplate::new(200).set_body_string(r#"{"direct_amount": 1}"#),
        )
        .await;

        let provider =
            HttpQuoteService::new(&format!("{}/", mock_server.uri()), Duration::from_secs(5))
                .unwrap();
        assert!(provider.pre_quote(&btc_to_usd()).await.is_ok());
    }
}
