pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        pub admin_email: String,
        pub admin_password: String,
        pub jwt_secret: String,
    }

    impl Config {
        /// Loads configuration from `PORTAL_*` environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::with_prefix("PORTAL"))
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        5000
    }
}

pub mod attendance;
pub mod auth;
pub mod entities;
pub mod event;
pub mod task;
pub mod volunteer;
pub mod web;
