use std::env;
use std::path::PathBuf;

/// Name of the storage directory, resolved next to the running executable.
pub const STORAGE_DIR_NAME: &str = "files";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port (default: 3000)
    pub port: u16,

    /// Bind address (default: "0.0.0.0")
    pub bind_address: String,

    /// Directory holding uploaded files (default: `files/` beside the binary)
    pub storage_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            bind_address: env::var("BIND_ADDRESS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.bind_address),

            storage_dir: env::var("STORAGE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.storage_dir),
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// `files/` next to the executable, or relative to the working directory when
/// the executable path is unavailable.
pub fn default_storage_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(STORAGE_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(STORAGE_DIR_NAME))
}
