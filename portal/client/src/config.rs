use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl ClientConfig {
    /// Loads configuration from `PORTAL_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("PORTAL"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}
