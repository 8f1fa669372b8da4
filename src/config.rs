use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// PostgreSQL connection URL for the durable stores; in-memory
    /// stores are used when absent (demo/test only)
    #[serde(default)]
    pub postgres_url: Option<String>,
    /// Per-statement timeout for the PostgreSQL stores, in milliseconds.
    /// Bounds how long one store query can hold a worker.
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub risk: RiskConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "ledgerd.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            postgres_url: None,
            statement_timeout_ms: default_statement_timeout_ms(),
            pipeline: PipelineConfig::default(),
            retry: RetryConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Parallel intent workers
    pub workers: usize,
    /// Intent channel depth
    pub queue_size: usize,
    /// Seconds before a dead worker's reservation may be reclaimed
    pub reservation_stale_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_size: 1024,
            reservation_stale_secs: 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Bounded retries for optimistic version conflicts
    pub max_conflict_retries: u32,
    /// First backoff delay in milliseconds; doubles per retry
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 3,
            backoff_base_ms: 50,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RiskConfig {
    /// Amounts above this limit are flagged FRAUD by the threshold screen
    pub fraud_threshold: Decimal,
    /// Risk screen call budget in milliseconds; expiry fails open
    pub timeout_ms: u64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            fraud_threshold: Decimal::new(1000, 0),
            timeout_ms: 2000,
        }
    }
}

fn default_statement_timeout_ms() -> u64 {
    5000
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.workers, 4);
        assert_eq!(config.retry.max_conflict_retries, 3);
        assert_eq!(config.risk.fraud_threshold, Decimal::new(1000, 0));
        assert!(config.postgres_url.is_none());
        assert_eq!(config.statement_timeout_ms, 5000);
    }

    #[test]
    fn test_parse_yaml_with_partial_sections() {
        let yaml = r#"
log_level: debug
log_dir: ./logs
log_file: test.log
use_json: true
rotation: hourly
risk:
  fraud_threshold: "2500.00"
  timeout_ms: 500
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.use_json);
        assert_eq!(config.risk.fraud_threshold, "2500.00".parse().unwrap());
        // Omitted sections fall back to defaults
        assert_eq!(config.pipeline.queue_size, 1024);
        assert_eq!(config.retry.backoff_base_ms, 50);
    }
}
