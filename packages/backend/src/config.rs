use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Versioned scorer artifact (JSON). Required: the composer cannot run
    /// without the frozen model.
    pub scorer_path: PathBuf,
    /// Optional catalog seed file (languages and units).
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let scorer_path = std::env::var("SCORER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("model_data/recall_scorer.json"));

        let catalog_path = std::env::var("CATALOG_PATH").ok().map(PathBuf::from);

        Self {
            host,
            port,
            log_level,
            scorer_path,
            catalog_path,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
