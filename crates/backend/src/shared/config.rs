use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the built frontend (index.html + wasm bundle)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Report API the gateway forwards to.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
static_dir = "dist"

[upstream]
base_url = "http://127.0.0.1:8080"
timeout_secs = 120
"#;

/// Environment variable with an explicit config path
pub const CONFIG_ENV: &str = "GATEWAY_CONFIG";

/// Load configuration from config.toml
///
/// Search order:
/// 1. Path from `GATEWAY_CONFIG`
/// 2. Next to the executable (for production)
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        tracing::info!("Loading config from {}: {}", CONFIG_ENV, path);
        return read_config(Path::new(&path));
    }

    if let Some(exe_dir) = exe_dir() {
        let config_path = exe_dir.join("config.toml");
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            return read_config(&config_path);
        }
        tracing::warn!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.upstream.base_url.trim().is_empty() {
        anyhow::bail!("upstream.base_url must not be empty");
    }
    Ok(config)
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

/// Resolve the static directory; relative paths are taken from the executable directory
pub fn get_static_dir(config: &Config) -> PathBuf {
    let dir = Path::new(&config.server.static_dir);
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match exe_dir() {
        Some(exe_dir) => exe_dir.join(dir),
        None => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.upstream.timeout_secs, 120);
    }

    #[test]
    fn test_server_section_is_optional() {
        let config = parse_config(
            r#"
            [upstream]
            base_url = "https://reports.example.com/api/"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.upstream.timeout_secs, 120);
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(parse_config("[upstream]\nbase_url = \" \"\n").is_err());
        assert!(parse_config("[server]\nport = 1\n").is_err());
    }

    #[test]
    fn test_absolute_static_dir_kept() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        let abs = std::env::temp_dir().join("sales-report-dist");
        config.server.static_dir = abs.display().to_string();
        assert_eq!(get_static_dir(&config), abs);
    }
}
