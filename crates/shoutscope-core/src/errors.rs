//! Error types for the shoutscope inspector
//!
//! `OverlayError` covers failures reported by the wrapped peer-to-peer
//! overlay; `ShoutscopeError` unifies them with the channel and configuration
//! failures of the inspector itself.

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// Failures reported by an overlay implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    #[error("Peer not found: {peer_id}")]
    PeerNotFound { peer_id: String },
    /// Group names must be non-empty and at most 255 bytes
    #[error("Invalid group name: {group:?}")]
    InvalidGroupName { group: String },
    #[error("Overlay unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("Overlay node has been stopped")]
    Shutdown,
}

// ----------------------------------------------------------------------------
// Top-level Error
// ----------------------------------------------------------------------------

/// Core error type for the inspector
#[derive(Debug, thiserror::Error)]
pub enum ShoutscopeError {
    #[error("Overlay error: {0}")]
    Overlay(#[from] OverlayError),

    /// Channel communication error between the command loop and the watch task
    #[error("Channel error: {reason}")]
    Channel { reason: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl ShoutscopeError {
    /// Create a channel error with a reason
    pub fn channel_error<T: Into<String>>(reason: T) -> Self {
        ShoutscopeError::Channel {
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        ShoutscopeError::Configuration {
            reason: reason.into(),
        }
    }

    /// Whether the watch task must stop after seeing this error
    pub fn is_unrecoverable(&self) -> bool {
        matches!(
            self,
            ShoutscopeError::Channel { .. } | ShoutscopeError::Configuration { .. }
        )
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, ShoutscopeError>;
pub type ShoutscopeResult<T> = Result<T>;
