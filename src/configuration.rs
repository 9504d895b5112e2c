use secrecy::SecretString;
use config::Config;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    // Missing key is a per-request error, not a startup one.
    pub api_key: Option<SecretString>,
    pub timeout_milliseconds: u64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct CorsSettings {
    pub allowed_origin: Option<String>,
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct TelemetrySettings {
    pub otlp_endpoint: Option<String>,
}


pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(config::File::from(configuration_directory.join("base")).required(true))
        .add_source(config::File::from(configuration_directory.join(environment.as_str())).required(true))
        .add_source(
            config::Environment::with_prefix("app")
                .prefix_separator("_")
                .separator("__"),
        )
        // Variables the site was historically deployed with.
        .set_override_option("provider.api_key", std::env::var("BREVO_API_KEY").ok())?
        .set_override_option("cors.allowed_origin", std::env::var("FRONTEND_URL").ok())?
        .set_override_option("application.port", std::env::var("PORT").ok())?
        .build()?;

    settings.try_deserialize()
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local", Environment::Production => "production",
        } }
}
impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!("{} is not a supported environment. Use either `local` or `production`.", other )),
    } }
}
