//! Event broadcast configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Event broadcast configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Events retained in the sliding history window
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// History events replayed to a freshly connected live client
    #[serde(default = "default_backfill_limit")]
    pub backfill_limit: usize,

    /// Per-client outbound queue capacity for the live feed
    #[serde(default = "default_client_buffer")]
    pub client_buffer: usize,
}

impl NotifyConfig {
    /// Validate broadcast configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_capacity == 0 {
            return Err(ValidationError::InvalidHistoryCapacity);
        }
        if self.backfill_limit > self.history_capacity {
            return Err(ValidationError::BackfillExceedsHistory);
        }
        if self.client_buffer == 0 {
            return Err(ValidationError::InvalidClientBuffer);
        }
        Ok(())
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            backfill_limit: default_backfill_limit(),
            client_buffer: default_client_buffer(),
        }
    }
}

fn default_history_capacity() -> usize {
    1000
}

fn default_backfill_limit() -> usize {
    50
}

fn default_client_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_config_defaults() {
        let config = NotifyConfig::default();
        assert_eq!(config.history_capacity, 1000);
        assert_eq!(config.backfill_limit, 50);
        assert_eq!(config.client_buffer, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_history_capacity_rejected() {
        let config = NotifyConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backfill_larger_than_history_rejected() {
        let config = NotifyConfig {
            history_capacity: 10,
            backfill_limit: 11,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_client_buffer_rejected() {
        let config = NotifyConfig {
            client_buffer: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
