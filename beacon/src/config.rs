use ingest_proxy::config::Config as ProxyConfig;
use serde::Deserialize;
use std::fs::File;

#[derive(Deserialize, Debug)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Deserialize, Debug)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Deserialize, Default, Debug)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub proxy: ProxyConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.proxy.validate()?;

        Ok(config)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ingest_proxy::config::ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
            proxy:
                listener:
                    host: 0.0.0.0
                    port: 8000
                admin_listener:
                    host: 127.0.0.1
                    port: 8001
                forward_extra_headers: true
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: https://key@sentry.example.com/1
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.proxy.listener.port, 8000);
        assert!(config.proxy.forward_extra_headers);
        assert_eq!(config.common.metrics.expect("metrics").statsd_port, 8125);
        assert_eq!(
            config.common.logging.expect("logging").sentry_dsn,
            "https://key@sentry.example.com/1"
        );
    }

    #[test]
    fn test_common_sections_are_optional() {
        let yaml = r#"
            proxy:
                listener:
                    host: 0.0.0.0
                    port: 8000
                admin_listener:
                    host: 127.0.0.1
                    port: 8001
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert!(config.common.metrics.is_none());
        assert!(config.common.logging.is_none());
        assert!(!config.proxy.forward_extra_headers);
    }

    #[test]
    fn test_invalid_listener_is_rejected() {
        let yaml = r#"
            proxy:
                listener:
                    host: 0.0.0.0
                    port: 0
                admin_listener:
                    host: 127.0.0.1
                    port: 8001
            "#;
        let tmp = write_tmp_file(yaml);

        assert!(matches!(
            Config::from_file(tmp.path()).unwrap_err(),
            ConfigError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = std::path::Path::new("/nonexistent/beacon.yaml");
        assert!(matches!(
            Config::from_file(path).unwrap_err(),
            ConfigError::LoadError(_)
        ));
    }
}
