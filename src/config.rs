use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

const LOG_DIR: &str = "MATCHBOOK_LOG_DIR";
const LISTEN_ADDR: &str = "MATCHBOOK_LISTEN_ADDR";
const SEGMENT_BYTES: &str = "MATCHBOOK_SEGMENT_BYTES";

/// Process configuration. The order-log directory is the only setting that
/// matters for correctness; everything else has a sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_dir: PathBuf,
    pub listen_addr: SocketAddr,
    pub segment_bytes: u64,
}

impl Config {
    pub fn from_env() -> Config {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_from_env() -> Result<Config, String> {
        // Load .env file if present
        dotenv().ok();

        let log_dir = match env::var(LOG_DIR) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                // Development fallback only; production deployments should
                // point this at persistent storage.
                let fallback = PathBuf::from("/tmp/matchbook-log");
                warn!(
                    "{} not set, using development default {}",
                    LOG_DIR,
                    fallback.display()
                );
                fallback
            }
        };

        let listen_addr = env::var(LISTEN_ADDR)
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("failed to parse {}: {}", LISTEN_ADDR, e))?;

        let segment_bytes = match env::var(SEGMENT_BYTES) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("failed to parse {}: {}", SEGMENT_BYTES, e))?,
            Err(_) => 64 * 1024 * 1024,
        };

        Ok(Config {
            log_dir,
            listen_addr,
            segment_bytes,
        })
    }
}
