use super::types::*;
use crate::config::OllamaConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Best-effort liveness check. Never fails; any transport error reads as `false`.
    async fn check_health(&self) -> bool;

    async fn list_models(&self) -> ModelListing;

    async fn generate(&self, request: GenerationRequest) -> GenerationResult;

    /// Sends a generation request and reports only whether the backend accepted it.
    async fn load_model(&self, request: GenerationRequest) -> LoadResult;
}

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
    generate_timeout: Duration,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        health_timeout: Duration,
        generate_timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            health_timeout,
            generate_timeout,
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.health_timeout(),
            config.generate_timeout(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn check_health(&self) -> bool {
        match self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                warn!("Ollama health check returned status {}", response.status());
                false
            }
            Err(e) => {
                warn!("Ollama server not available: {}", e);
                false
            }
        }
    }

    async fn list_models(&self) -> ModelListing {
        let response = match self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Ollama server is offline or unreachable: {}", e);
                return ModelListing::Unreachable(e.to_string());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Ollama ping failed with status {}", status);
            return ModelListing::Unhealthy(status.as_u16());
        }

        match response.json::<TagsResponse>().await {
            Ok(tags) => {
                let names = tags.into_names();
                debug!("Ollama lists {} models", names.len());
                ModelListing::Available(names)
            }
            Err(e) => {
                warn!("Could not read Ollama model list: {}", e);
                ModelListing::Malformed(e.to_string())
            }
        }
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        info!(
            model = %request.model,
            "Sending prompt to {}",
            self.base_url
        );

        let response = match self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .timeout(self.generate_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return classify_transport_error(e),
        };

        let status = response.status();
        debug!("Ollama status code: {}", status);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return classify_transport_error(e),
        };
        debug!("Ollama raw response: {}", preview(&body));

        if !status.is_success() {
            // Dead tunnels answer with HTML error pages rather than Ollama's JSON.
            if serde_json::from_str::<serde_json::Value>(&body).is_err() {
                warn!("Received non-JSON {} response from Ollama", status);
                return GenerationResult::InvalidResponse;
            }
            let message = backend_error_message(&body);
            warn!("Ollama rejected generation ({}): {}", status, message);
            return GenerationResult::NetworkError(NetworkFailure::status(
                status.as_u16(),
                format!("Ollama responded with status {}: {}", status.as_u16(), message),
            ));
        }

        let result = parse_generation_body(&body);
        if result == GenerationResult::InvalidResponse {
            warn!("Received non-JSON response from Ollama");
        }
        result
    }

    async fn load_model(&self, request: GenerationRequest) -> LoadResult {
        info!(model = %request.model, "Warming up model on {}", self.base_url);

        match self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .timeout(self.generate_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => LoadResult::Loaded,
            Ok(response) => LoadResult::Status(response.status().as_u16()),
            Err(e) if e.is_timeout() => LoadResult::TimedOut,
            Err(e) => {
                warn!("Warmup request failed, host unreachable: {}", e);
                LoadResult::Unreachable(e.to_string())
            }
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> GenerationResult {
    if err.is_timeout() {
        warn!("Request to Ollama timed out");
        GenerationResult::NetworkTimeout
    } else if err.is_connect() {
        warn!("Could not connect to Ollama server: {}", err);
        GenerationResult::NetworkError(NetworkFailure::connection_refused(err.to_string()))
    } else {
        warn!("Ollama request failed: {}", err);
        GenerationResult::NetworkError(NetworkFailure::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(
            server.uri(),
            Duration::from_millis(500),
            Duration::from_millis(500),
        )
    }

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }

    #[tokio::test]
    async fn test_generate_success_posts_non_streaming_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({
                "model": "mistral",
                "prompt": "Hi",
                "stream": false
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": " Hello! ", "done": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .generate(GenerationRequest::new("mistral", "Hi"))
            .await;

        assert_eq!(result, GenerationResult::Success("Hello!".to_string()));
    }

    #[tokio::test]
    async fn test_generate_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .generate(GenerationRequest::new("mistral", "Hi"))
            .await;

        assert_eq!(result, GenerationResult::InvalidResponse);
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .generate(GenerationRequest::new("mistral", "Hi"))
            .await;

        assert_eq!(result, GenerationResult::NetworkTimeout);
    }

    #[tokio::test]
    async fn test_generate_connection_refused() {
        let client = OllamaClient::new(
            closed_port_url(),
            Duration::from_millis(500),
            Duration::from_millis(500),
        );

        let result = client.generate(GenerationRequest::new("mistral", "Hi")).await;

        match result {
            GenerationResult::NetworkError(failure) => {
                assert_eq!(failure.kind, FailureKind::ConnectionRefused)
            }
            other => panic!("expected connection failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_error_status_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "model 'nope' not found"})),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .generate(GenerationRequest::new("nope", "Hi"))
            .await;

        match result {
            GenerationResult::NetworkError(failure) => {
                assert_eq!(failure.kind, FailureKind::Status(404));
                assert!(failure.detail.contains("model 'nope' not found"));
            }
            other => panic!("expected status failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_html_error_page_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(530).set_body_string("<html>Origin unreachable</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .generate(GenerationRequest::new("mistral", "Hi"))
            .await;

        assert_eq!(result, GenerationResult::InvalidResponse);
    }

    #[tokio::test]
    async fn test_load_model_reports_status_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        assert_eq!(
            client_for(&server)
                .load_model(GenerationRequest::new("mistral", "Hello"))
                .await,
            LoadResult::Loaded
        );

        let gateway = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
            .mount(&gateway)
            .await;
        assert_eq!(
            client_for(&gateway)
                .load_model(GenerationRequest::new("mistral", "Hello"))
                .await,
            LoadResult::Status(502)
        );

        let offline = OllamaClient::new(
            closed_port_url(),
            Duration::from_millis(500),
            Duration::from_millis(500),
        );
        assert!(matches!(
            offline
                .load_model(GenerationRequest::new("mistral", "Hello"))
                .await,
            LoadResult::Unreachable(_)
        ));
    }

    #[tokio::test]
    async fn test_check_health_reports_reachable_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
            .mount(&server)
            .await;

        assert!(client_for(&server).check_health().await);
    }

    #[tokio::test]
    async fn test_check_health_false_on_error_status_or_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        assert!(!client_for(&server).check_health().await);

        let offline = OllamaClient::new(
            closed_port_url(),
            Duration::from_millis(500),
            Duration::from_millis(500),
        );
        assert!(!offline.check_health().await);
    }

    #[tokio::test]
    async fn test_list_models_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"models": [{"name": "mistral:latest"}]})),
            )
            .mount(&server)
            .await;

        assert_eq!(
            client_for(&server).list_models().await,
            ModelListing::Available(vec!["mistral:latest".to_string()])
        );

        let broken = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&broken)
            .await;
        assert!(matches!(
            client_for(&broken).list_models().await,
            ModelListing::Malformed(_)
        ));

        let failing = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&failing)
            .await;
        assert_eq!(
            client_for(&failing).list_models().await,
            ModelListing::Unhealthy(500)
        );
    }
}
