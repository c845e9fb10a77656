use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // bytes
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub sentinel_enabled: bool,
    pub sentinel_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
    pub seed_password: String,  // shared by the demo accounts
}

impl Config {
    /// `config/default.toml`, overridden by `APP_`-prefixed environment
    /// variables such as `APP_SERVER__PORT=8080`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                max_body_size: 64 * 1024,
            },
            store: StoreConfig { backend: StoreBackend::Memory },
            redis: RedisConfig {
                url: "redis://127.0.0.1/".into(),
                sentinel_enabled: false,
                sentinel_url: None,
            },
            auth: AuthConfig {
                bcrypt_cost: 4,
                seed_password: "password123".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_loads() {
        let config = Config::load().unwrap();
        assert!(config.server.port > 0);
        assert!(config.auth.bcrypt_cost >= 4);
        assert!(!config.redis.sentinel_enabled || config.redis.sentinel_url.is_some());
    }
}
