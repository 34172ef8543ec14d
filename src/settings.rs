use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize)]
pub struct Settings {
    pub log_level: String,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn url(&self) -> &str {
        self.url.expose_secret()
    }
}

impl Settings {
    /// Layers defaults, an optional config file and `TRIVIA__*` variables, in that order.
    ///
    /// The file is `trivia.toml` in the working directory unless `TRIVIA_CONFIG` names
    /// another one.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let file = dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| "trivia.toml".to_owned());
        Self::from_sources(
            File::with_name(&file).required(false),
            Environment::with_prefix("TRIVIA")
                .prefix_separator("__")
                .separator("__"),
        )
    }

    fn from_sources(
        file: File<FileSourceFile, FileFormat>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:trivia.db")?
            .set_default("database.max_connections", 5)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("TRIVIA")
            .prefix_separator("__")
            .separator("__")
            .source(Some(source))
    }

    fn no_file() -> File<FileSourceFile, FileFormat> {
        File::with_name("does-not-exist.toml").required(false)
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_sources(no_file(), env(&[])).unwrap();
        assert_eq!(settings.server.address(), "0.0.0.0:8080");
        assert_eq!(settings.database.url(), "sqlite:trivia.db");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_sources(
            no_file(),
            env(&[
                ("TRIVIA__SERVER__PORT", "3000"),
                ("TRIVIA__DATABASE__URL", "sqlite::memory:"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database.url(), "sqlite::memory:");
    }
}
