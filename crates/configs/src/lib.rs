use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Token signing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    #[serde(default = "default_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { secret_key: default_secret_key(), access_token_expire_minutes: default_token_expire_minutes() }
    }
}

fn default_secret_key() -> String { "change-me-in-env".into() }
fn default_token_expire_minutes() -> i64 { 30 }

/// Where uploaded resumes land and how large they may be.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    #[serde(default = "default_max_resume_size_mb")]
    pub max_resume_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { dir: default_upload_dir(), max_resume_size_mb: default_max_resume_size_mb() }
    }
}

impl UploadConfig {
    pub fn max_resume_bytes(&self) -> usize {
        (self.max_resume_size_mb as usize) * 1024 * 1024
    }
}

fn default_upload_dir() -> String { "uploads".into() }
fn default_max_resume_size_mb() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// "json" switches to structured output; anything else is compact text.
    #[serde(default)]
    pub format: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        matches!(self.format.as_deref(), Some(f) if f.eq_ignore_ascii_case("json"))
    }
}

/// `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_optional(&path)
}

/// Defaults when `path` does not exist; read and parse errors propagate.
pub fn load_optional(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|e| anyhow!("invalid config file {path}: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read config file {path}: {e}")),
    }
}

impl AppConfig {
    /// Load `config.toml` if present (defaults otherwise), apply environment
    /// overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env_with(|k| std::env::var(k).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup("SECRET_KEY").filter(|v| !v.trim().is_empty()) {
            self.auth.secret_key = secret;
        }
        if let Some(mins) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES").and_then(|v| v.parse::<i64>().ok()) {
            self.auth.access_token_expire_minutes = mins;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(dir) = lookup("UPLOAD_DIR").filter(|v| !v.trim().is_empty()) {
            self.uploads.dir = dir;
        }
        if let Some(fmt) = lookup("LOG_FORMAT") {
            self.logging.format = Some(fmt);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        if self.uploads.max_resume_size_mb == 0 {
            return Err(anyhow!("uploads.max_resume_size_mb must be >= 1"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            return Err(anyhow!("auth.secret_key is empty; set SECRET_KEY"));
        }
        if self.access_token_expire_minutes <= 0 {
            return Err(anyhow!("auth.access_token_expire_minutes must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn parses_toml_sections_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://u:p@db/jobs"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.auth.access_token_expire_minutes, 30);
        assert_eq!(cfg.uploads.dir, "uploads");
        assert_eq!(cfg.uploads.max_resume_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn env_overrides_database_and_secret() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_with(env(&[
            ("DATABASE_URL", "postgresql://localhost/jobs"),
            ("SECRET_KEY", "s3cret"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "90"),
            ("SERVER_PORT", "8123"),
        ]));
        assert_eq!(cfg.database.url, "postgresql://localhost/jobs");
        assert_eq!(cfg.auth.secret_key, "s3cret");
        assert_eq!(cfg.auth.access_token_expire_minutes, 90);
        assert_eq!(cfg.server.port, 8123);
        assert!(cfg.normalize_and_validate().is_ok());
    }

    #[test]
    fn blank_env_values_do_not_clobber() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://keep".into();
        cfg.apply_env_with(env(&[("DATABASE_URL", "  "), ("SECRET_KEY", "")]));
        assert_eq!(cfg.database.url, "postgres://keep");
        assert_eq!(cfg.auth.secret_key, "change-me-in-env");
    }

    #[test]
    fn rejects_missing_or_foreign_database_url() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_and_validate().is_err());
        cfg.database.url = "mysql://localhost/jobs".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/jobs".into();
        cfg.database.min_connections = 5;
        cfg.database.max_connections = 2;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn zero_worker_threads_fall_back() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/jobs".into();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    fn scratch_file(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("jt-configs-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("jt-configs-does-not-exist.toml");
        let cfg = load_optional(&path.to_string_lossy()).unwrap();
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_file("bad.toml", "[server]\nport = 9999\n[database]\nmax_connections = \"lots\"\n");
        let err = load_optional(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config file"), "{err}");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn existing_file_is_loaded() {
        let path = scratch_file("good.toml", "[server]\nhost = \"0.0.0.0\"\nport = 9999\n");
        let cfg = load_optional(&path).unwrap();
        assert_eq!(cfg.server.port, 9999);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn log_format_switch() {
        let mut cfg = AppConfig::default();
        assert!(!cfg.logging.is_json());
        cfg.apply_env_with(env(&[("LOG_FORMAT", "JSON")]));
        assert!(cfg.logging.is_json());
    }
}
