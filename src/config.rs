#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

impl CargoEnv {
    pub fn is_development(self) -> bool {
        matches!(self, CargoEnv::Development)
    }
}

#[derive(clap::Parser)]
pub struct AppConfig {
    // production or development
    #[clap(long, env, value_enum, default_value = "development")]
    pub cargo_env: CargoEnv,

    // port that the app will bind to
    #[clap(long, env, default_value = "3000")]
    pub port: u16,

    // origin the browser client is served from, the only origin cors will accept.
    // leave unset to fall back per environment (local client in dev, open in prod
    // where deployments are expected to set this explicitly anyway)
    #[clap(long, env)]
    pub client_url: Option<String>,

    // optional sentry integration
    #[clap(long, env)]
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    /// cors origin after applying the per-environment fallback
    pub fn resolved_client_url(&self) -> String {
        match &self.client_url {
            Some(url) => url.clone(),
            None => match self.cargo_env {
                CargoEnv::Development => "http://localhost:4200".to_string(),
                CargoEnv::Production => "*".to_string(),
            },
        }
    }
}

impl Default for AppConfig {
    // defaults aren't really needed here but it's here as a bad fallback
    fn default() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            port: 3000,
            client_url: None,
            sentry_dsn: None,
        }
    }
}
