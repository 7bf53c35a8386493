// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads an optional environment variable, falling back to a default.
///
/// Appropriate for settings with a sensible local-development default,
/// where absence is not a deployment error.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub redis: redis::RedisConfig,
    pub metrics: metrics::MetricsConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any configuration is invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            redis: redis::RedisConfig::from_env()?,
            metrics: metrics::MetricsConfig::from_env()?,
        })
    }
}

// ============================================================
// Redis configuration
// ============================================================

mod redis {
    // ---
    use super::*;

    /// Redis-related configuration used for task persistence.
    #[derive(Debug, Clone)]
    pub struct RedisConfig {
        /// Redis connection string.
        pub url: String,
    }

    impl RedisConfig {
        /// Builds a [`RedisConfig`] from environment variables.
        pub fn from_env() -> Result<Self> {
            // ---
            let url = optional_env!("TASKAPI_REDIS_URL", "redis://127.0.0.1:6379");

            Ok(Self { url })
        }
    }
}
pub use redis::RedisConfig;

// ============================================================
// Metrics configuration
// ============================================================

mod metrics {
    // ---
    use super::*;
    use anyhow::{bail, Context};

    /// Latency buckets covering sub-second handler times up to slow
    /// multi-second outliers.
    pub const DEFAULT_LATENCY_BUCKETS: &[f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    /// Metrics-related configuration consumed by the instrumentation core.
    #[derive(Debug, Clone)]
    pub struct MetricsConfig {
        /// Name prefix for every registered metric (e.g. `taskapi`).
        pub prefix: String,

        /// Ascending histogram bucket upper bounds, in seconds.
        pub buckets: Vec<f64>,
    }

    impl MetricsConfig {
        /// Builds a [`MetricsConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error for a malformed prefix or a bucket list that is
        /// not a comma-separated, strictly ascending sequence of positive
        /// numbers. Startup fails fast rather than running with a registry
        /// that would emit unusable series.
        pub fn from_env() -> Result<Self> {
            // ---
            let prefix = optional_env!("TASKAPI_METRICS_PREFIX", "taskapi");
            validate_prefix(&prefix)?;

            let buckets = match std::env::var("TASKAPI_METRICS_BUCKETS") {
                Ok(raw) => parse_buckets(&raw)?,
                Err(_) => DEFAULT_LATENCY_BUCKETS.to_vec(),
            };

            Ok(Self { prefix, buckets })
        }
    }

    fn validate_prefix(prefix: &str) -> Result<()> {
        // ---
        let mut chars = prefix.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            bail!("Invalid metric name prefix: {prefix:?}");
        }
        Ok(())
    }

    fn parse_buckets(raw: &str) -> Result<Vec<f64>> {
        // ---
        let mut buckets = Vec::new();
        for part in raw.split(',') {
            let bound: f64 = part
                .trim()
                .parse()
                .with_context(|| format!("Invalid histogram bucket bound: {part:?}"))?;
            if !bound.is_finite() || bound <= 0.0 {
                bail!("Histogram bucket bounds must be positive and finite, got {bound}");
            }
            if let Some(&prev) = buckets.last() {
                if bound <= prev {
                    bail!("Histogram bucket bounds must be strictly ascending: {prev} then {bound}");
                }
            }
            buckets.push(bound);
        }
        Ok(buckets)
    }
}
pub use metrics::{MetricsConfig, DEFAULT_LATENCY_BUCKETS};

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use anyhow::Result;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_applied() -> Result<()> {
        // ---
        std::env::remove_var("TASKAPI_REDIS_URL");
        std::env::remove_var("TASKAPI_METRICS_PREFIX");
        std::env::remove_var("TASKAPI_METRICS_BUCKETS");

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.redis.url, "redis://127.0.0.1:6379");
        assert_eq!(cfg.metrics.prefix, "taskapi");
        assert_eq!(cfg.metrics.buckets, DEFAULT_LATENCY_BUCKETS);

        Ok(())
    }

    #[test]
    #[serial]
    fn overrides_defaults() -> Result<()> {
        // ---
        std::env::set_var("TASKAPI_REDIS_URL", "redis://redis.internal:6380");
        std::env::set_var("TASKAPI_METRICS_PREFIX", "tasks_prod");
        std::env::set_var("TASKAPI_METRICS_BUCKETS", "0.1, 0.5, 2.5");

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.redis.url, "redis://redis.internal:6380");
        assert_eq!(cfg.metrics.prefix, "tasks_prod");
        assert_eq!(cfg.metrics.buckets, [0.1, 0.5, 2.5]);

        std::env::remove_var("TASKAPI_REDIS_URL");
        std::env::remove_var("TASKAPI_METRICS_PREFIX");
        std::env::remove_var("TASKAPI_METRICS_BUCKETS");

        Ok(())
    }

    #[test]
    #[serial]
    fn invalid_prefix_fails() {
        // ---
        std::env::set_var("TASKAPI_METRICS_PREFIX", "1-bad prefix");

        let err = AppConfig::from_env().expect_err("expected configuration error");
        assert!(err.to_string().contains("Invalid metric name prefix"));

        std::env::remove_var("TASKAPI_METRICS_PREFIX");
    }

    #[test]
    #[serial]
    fn bucket_lists_must_ascend() {
        // ---
        for bad in ["0.5,0.1", "0.5,0.5", "0.5,abc", "-1.0,0.5", ""] {
            std::env::set_var("TASKAPI_METRICS_BUCKETS", bad);
            assert!(
                MetricsConfig::from_env().is_err(),
                "bucket list {bad:?} should be rejected"
            );
        }

        std::env::remove_var("TASKAPI_METRICS_BUCKETS");
    }
}
