use jenggpt::{
    Result,
    config::{Config, ImageConfig, OllamaConfig, ServerConfig},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test configuration pointing at the given backends
pub fn create_test_config(ollama_url: &str, image_url: Option<&str>) -> Config {
    Config {
        ollama: OllamaConfig::new(ollama_url),
        image: image_url.map(ImageConfig::new),
        server: ServerConfig::default(),
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Mounts a healthy `/api/tags` listing the given models
pub async fn mount_tags(server: &MockServer, models: &[&str]) {
    let models: Vec<Value> = models.iter().map(|name| json!({ "name": name })).collect();
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
        .mount(server)
        .await;
}

/// Mounts `/api/generate` answering with the given text, expecting `calls` requests
pub async fn mount_generate(server: &MockServer, answer: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": answer, "done": true })),
        )
        .expect(calls)
        .mount(server)
        .await;
}

/// A local URL nothing is listening on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Minimal configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
ollama:
  base_url: "http://127.0.0.1:11434/"

server:
  host: "127.0.0.1"
  port: 8080
  logs:
    level: "debug"
"#;

/// Configuration with every section filled in
pub const FULL_CONFIG_YAML: &str = r#"
ollama:
  base_url: "https://aims-injection.trycloudflare.com"
  default_model: "llama2"
  health_timeout_secs: 3
  generate_timeout_secs: 20
  check_health_first: false
  warmup_prompt: "ping"

image:
  base_url: "http://127.0.0.1:7860"
  steps: 30

server:
  host: "0.0.0.0"
  port: 9090
  logs:
    level: "warn"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
ollama:
  default_model: "mistral"
  # missing base_url

server:
  port: "not-a-number"
"#;
