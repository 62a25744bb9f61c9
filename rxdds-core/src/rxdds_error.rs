// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Error types for reactive streams over keyed pub/sub data.
//!
//! Errors travel in-band as [`StreamItem::Error`](crate::StreamItem::Error).
//! Nothing is retried and nothing is logged globally: a failure is observable
//! only through the error channel of the stream it terminates.
//!
//! # Examples
//!
//! ```
//! use rxdds_core::{InstanceState, Result, RxDdsError};
//!
//! fn interpreted(state: InstanceState) -> Result<InstanceState> {
//!     if state.is_alive() {
//!         return Err(RxDdsError::configuration_error("ALIVE cannot be interpreted"));
//!     }
//!     Ok(state)
//! }
//!
//! assert!(interpreted(InstanceState::Alive).is_err());
//! ```

use crate::{InstanceHandle, InstanceState};
use std::sync::Arc;

/// Boxed error produced by user callbacks and collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Root error type for all stream operators.
///
/// Cloneable so that one failure can be broadcast to several subscribers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RxDdsError {
    /// General stream processing failure that fits no other category.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// Error raised by user code and forwarded unchanged.
    #[error("User error: {0}")]
    UserError(#[source] SharedError),

    /// An operator was constructed with an invalid argument.
    ///
    /// Raised at construction time only, never while a stream is running.
    #[error("Configuration error: {context}")]
    ConfigurationError {
        /// Which precondition was violated
        context: String,
    },

    /// A sample referenced an instance in a state the operator cannot explain,
    /// such as the disposal of an instance that was never observed alive.
    #[error("Unexpected instance state {state} for instance {handle}")]
    UnexpectedInstanceState {
        /// The offending instance
        handle: InstanceHandle,
        /// The state reported by the sample
        state: InstanceState,
    },

    /// No writer remains alive for the instance.
    #[error("Liveliness lost for instance {handle}: no alive writers")]
    LivelinessLost {
        /// The instance that lost its writers
        handle: InstanceHandle,
    },

    /// Writing a value into the pub/sub system failed.
    #[error("Write failure: {0}")]
    WriteFailure(#[source] SharedError),

    /// Retiring (registering + disposing) the published instance failed.
    #[error("Retire failure: {0}")]
    RetireFailure(#[source] SharedError),

    /// A side-effect callback failed.
    #[error("Callback failure: {0}")]
    CallbackFailure(#[source] SharedError),
}

impl RxDdsError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create a configuration error with the given context
    pub fn configuration_error(context: impl Into<String>) -> Self {
        Self::ConfigurationError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Wrap a failed write
    pub fn write_failure(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::WriteFailure(Arc::new(error))
    }

    /// Wrap a failed retirement
    pub fn retire_failure(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::RetireFailure(Arc::new(error))
    }

    /// Wrap a failed side-effect callback
    pub fn callback_failure(error: BoxError) -> Self {
        Self::CallbackFailure(Arc::from(error))
    }

    /// Check if this error is fatal for a whole pipeline rather than for the
    /// single subscription or instance it was raised on.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError { .. } | Self::UnexpectedInstanceState { .. }
        )
    }

    /// Check if this error indicates a permanent failure
    ///
    /// No operator retries, so every error is permanent for the subscription
    /// it terminates; liveliness loss is the only state the substrate may
    /// later recover from with a new writer.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        !matches!(self, Self::LivelinessLost { .. })
    }
}

/// Specialized Result type for stream operators
pub type Result<T> = std::result::Result<T, RxDdsError>;
