use std::{path::PathBuf, time::Duration};

pub use clap::Parser;
use greenlight_app::state::AppConfig;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "Greenlight movies API server")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 4000,
        env = "GREENLIGHT_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "GREENLIGHT_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "GREENLIGHT_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/greenlight.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "GREENLIGHT_DATA_DIR",
        help = "Data directory, default is system default like ~/.local/share/greenlight"
    )]
    data_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "GREENLIGHT_DB_MAX_CONNECTIONS",
        default_value_t = greenlight_dal::DEFAULT_MAX_CONNECTIONS,
        help = "Maximum number of pooled database connections"
    )]
    pub db_max_connections: u32,

    #[arg(
        long,
        env = "GREENLIGHT_DB_TIMEOUT",
        help = "Timeout for a single database statement in human friendly format (e.g. 3s, 500ms), unbounded if not set",
        value_parser = humantime::parse_duration
    )]
    pub db_timeout: Option<Duration>,

    #[arg(long, env = "GREENLIGHT_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

impl ServerConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("greenlight"))
                .unwrap_or_else(|| PathBuf::from("greenlight"))
        })
    }

    pub fn database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            format!("sqlite://{}", self.data_dir().join("greenlight.db").display())
        })
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            db_timeout: config.db_timeout,
        }
    }
}
