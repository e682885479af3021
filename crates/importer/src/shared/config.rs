use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Базовый URL REST API дашборда (без завершающего '/')
    pub base_url: String,
    /// Bearer-токен; получение и обновление токена — забота внешнего слоя
    pub token: String,
}

/// Настройки конвейера импорта. Значения по умолчанию совпадают с
/// поведением продакшен-дашборда.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImportConfig {
    pub max_file_size_bytes: usize,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub rate_limit_backoff_ms: u64,
    /// Всего попыток на строку при rate limit: 1 исходная + 2 повтора
    pub max_attempts: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024,
            batch_size: 10,
            batch_delay_ms: 300,
            rate_limit_backoff_ms: 2000,
            max_attempts: 3,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:8080/api"
token = ""
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}
