use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
/// Enumerates supported `ConfigError` values.
pub enum ConfigError {
    #[error("base URL must not be empty")]
    EmptyBaseUrl,
    #[error("max concurrent requests must be greater than 0")]
    ZeroConcurrency,
    #[error("request timeout must be greater than 0")]
    ZeroTimeout,
    #[error("discovery sample size must be greater than 0")]
    ZeroSampleSize,
    #[error("discovery identifier ceiling must be greater than 1")]
    DiscoveryCeilingTooSmall,
    #[error("gap search identifier ceiling must be greater than 1")]
    GapCeilingTooSmall,
    #[error("give-up threshold must be greater than 0")]
    ZeroGiveUpThreshold,
}

#[derive(Debug, Clone)]
/// Public struct `SolverConfig` used across Mosaic components.
///
/// Every tuning constant of the search is carried here rather than
/// hard-coded. `max_concurrent_requests` doubles as the probe batch size.
/// Identifier ceilings are exclusive upper bounds of ranges starting at 1.
pub struct SolverConfig {
    pub base_url: String,
    pub max_concurrent_requests: usize,
    pub request_timeout_ms: u64,
    pub discovery_sample_size: usize,
    pub discovery_id_ceiling: u64,
    pub gap_search_id_ceiling: u64,
    pub give_up_threshold: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888".to_string(),
            max_concurrent_requests: 30,
            request_timeout_ms: 5_000,
            discovery_sample_size: 50,
            discovery_id_ceiling: 1_000,
            gap_search_id_ceiling: 10_000,
            give_up_threshold: 100,
        }
    }
}

impl SolverConfig {
    /// Rejects configuration mistakes before any network activity begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.discovery_sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        if self.discovery_id_ceiling < 2 {
            return Err(ConfigError::DiscoveryCeilingTooSmall);
        }
        if self.gap_search_id_ceiling < 2 {
            return Err(ConfigError::GapCeilingTooSmall);
        }
        if self.give_up_threshold == 0 {
            return Err(ConfigError::ZeroGiveUpThreshold);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SolverConfig};

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(SolverConfig::default().validate(), Ok(()));
    }

    #[test]
    fn unit_zero_concurrency_is_rejected() {
        let config = SolverConfig {
            max_concurrent_requests: 0,
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn unit_zero_sample_size_is_rejected() {
        let config = SolverConfig {
            discovery_sample_size: 0,
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleSize));
    }

    #[test]
    fn unit_zero_give_up_threshold_is_rejected() {
        let config = SolverConfig {
            give_up_threshold: 0,
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroGiveUpThreshold));
    }

    #[test]
    fn unit_degenerate_identifier_ranges_are_rejected() {
        let config = SolverConfig {
            discovery_id_ceiling: 1,
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DiscoveryCeilingTooSmall));

        let config = SolverConfig {
            gap_search_id_ceiling: 0,
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GapCeilingTooSmall));
    }

    #[test]
    fn blank_base_url_is_rejected() {
        let config = SolverConfig {
            base_url: "  ".to_string(),
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseUrl));
    }
}
