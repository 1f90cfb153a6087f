use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;
use telemetry::TelemetrySettings;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub telemetry: TelemetrySettings,
    pub application: ApplicationSettings,
    pub email_settings: EmailClientSettings,
    /// Human verification is only enforced when this section is present.
    #[serde(default)]
    pub verification: Option<VerificationSettings>,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub application_port: u16,
    pub host_name: String,
}

#[derive(Deserialize, Clone)]
pub struct EmailClientSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Upgrade a plain connection with STARTTLS instead of connecting over implicit TLS.
    #[serde(default)]
    pub starttls: bool,
    /// Mailbox used both to authenticate and as the `From` address.
    pub account: String,
    pub app_password: Secret<String>,
    /// Every contact message is delivered to this single address.
    pub recipient: String,
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Clone)]
pub struct VerificationSettings {
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    pub secret: Secret<String>,
    #[serde(default = "default_verification_timeout")]
    pub timeout_milliseconds: u64,
}

impl VerificationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_verification_timeout() -> u64 {
    5000
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;

    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let environment_filename = format!("{}.yaml", environment.as_str());

    // Init configuration reader
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_EMAIL_SETTINGS__APP_PASSWORD=secret` would set `Settings.email_settings.app_password`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a support environment. Use either local or production",
                other
            )),
        }
    }
}
