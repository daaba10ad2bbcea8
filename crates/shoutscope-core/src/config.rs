//! Channel configuration shared by the runtime and the CLI

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShoutscopeError};

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Buffer sizes for the bounded channels around the watch task
///
/// Network events are delivered on an unbounded channel owned by the overlay
/// and are not configured here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Buffer size for the Command channel (command loop → watch task)
    pub command_buffer_size: usize,
    /// Buffer size for the AppEvent channel (watch task → operator output)
    pub app_event_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,   // operator commands are infrequent
            app_event_buffer_size: 64, // shouts can be bursty
        }
    }
}

impl ChannelConfig {
    /// Small buffers, useful for tests that want to exercise backpressure
    pub fn testing() -> Self {
        Self {
            command_buffer_size: 4,
            app_event_buffer_size: 4,
        }
    }

    /// tokio's bounded mpsc panics on a zero capacity, so reject it here
    pub fn validate(&self) -> Result<()> {
        if self.command_buffer_size == 0 {
            return Err(ShoutscopeError::config_error(
                "command_buffer_size must be greater than zero",
            ));
        }
        if self.app_event_buffer_size == 0 {
            return Err(ShoutscopeError::config_error(
                "app_event_buffer_size must be greater than zero",
            ));
        }
        Ok(())
    }
}
