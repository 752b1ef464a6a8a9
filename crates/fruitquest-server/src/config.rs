use serde::Deserialize;

/// Top-level server configuration, loaded from `fruitquest.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Allow cross-origin requests from browser builds of the game.
    pub permissive_cors: bool,
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            permissive_cors: true,
            limits: LimitsConfig::default(),
        }
    }
}

/// Storage and input limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_records: usize,
    pub max_user_id_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_records: 10_000,
            max_user_id_len: 128,
        }
    }
}

impl ServerConfig {
    /// Check the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            ));
        }
        if self.limits.max_records == 0 {
            return Err("limits.max_records must be > 0".to_string());
        }
        if self.limits.max_user_id_len == 0 {
            return Err("limits.max_user_id_len must be > 0".to_string());
        }
        Ok(())
    }

    /// Load config from `fruitquest.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("fruitquest.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from fruitquest.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse fruitquest.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No fruitquest.toml found, using defaults");
                ServerConfig::default()
            },
        };

        if let Ok(addr) = std::env::var("FRUITQUEST_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(val) = std::env::var("FRUITQUEST_MAX_RECORDS")
            && let Ok(n) = val.parse::<usize>()
        {
            config.limits.max_records = n;
        }

        config
    }
}
