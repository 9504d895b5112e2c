use once_cell::sync::Lazy;
use secrecy::SecretString;
use signup_relay::configuration::{get_configuration, Settings, TelemetrySettings};
use signup_relay::startup::Application;
use signup_relay::telemetry::{get_subscriber, init_subscriber};
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_layer = "info".to_string();
    let subscriber_name = "test".to_string();

    let telemetry_settings = TelemetrySettings::default();

    if std::env::var("TEST_LOG").is_ok_and(|x| x.to_lowercase() == "true")  {
        let subscriber = get_subscriber(subscriber_name, default_filter_layer, std::io::stdout, &telemetry_settings)
            .expect("Failed to build subscriber");
        init_subscriber(subscriber).expect("Failed to initialize subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_layer, std::io::sink, &telemetry_settings)
            .expect("Failed to build subscriber");
        init_subscriber(subscriber).expect("Failed to initialize subscriber");
    }
});

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_ALLOWED_ORIGIN: &str = "http://localhost:5173";

pub struct TestApp {
    pub address: String,
    pub provider_server: MockServer,
    pub api_client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_without_api_key() -> TestApp {
    spawn_app_with(|c| c.provider.api_key = None).await
}

/// Spawn the application against a mock provider, letting the caller tweak settings first.
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let provider_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to get configuration");
        c.application.host = "127.0.0.1".to_string();
        c.application.port = 0;
        c.provider.base_url = provider_server.uri();
        c.provider.api_key = Some(SecretString::from(TEST_API_KEY.to_string()));
        c.provider.timeout_milliseconds = 2_000;
        c.cors.allowed_origin = Some(TEST_ALLOWED_ORIGIN.to_string());
        customise(&mut c);
        c
    };

    let application = Application::build(configuration).await.expect("Failed to build application");
    let port = application.port();
    tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        provider_server,
        api_client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub async fn post_subscriptions(&self, body: serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/subscribe", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscriptions_raw(&self, body: &'static str, content_type: &str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/subscribe", &self.address))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn request_subscriptions(&self, method: reqwest::Method) -> reqwest::Response {
        self.api_client
            .request(method, &format!("{}/api/subscribe", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
