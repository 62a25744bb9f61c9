// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Samples delivered by the keyed data source.
//!
//! Every [`Sample`] belongs to an instance, identified by its
//! [`InstanceHandle`], and reports the lifecycle state the instance was in when
//! the sample was taken. Samples with `valid_data == false` are metadata-only
//! updates (typically lifecycle transitions): their payload carries no
//! meaningful data.

use crate::InstanceHandle;
use core::fmt;

/// Lifecycle state of an instance at the time a sample was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceState {
    /// At least one writer is alive and the instance has not been disposed.
    Alive,
    /// The instance was explicitly disposed: end of life.
    NotAliveDisposed,
    /// No writer remains for the instance, but it was never disposed.
    NotAliveNoWriters,
}

impl InstanceState {
    /// Returns `true` for [`InstanceState::Alive`].
    pub const fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Returns `true` for either of the not-alive states.
    pub const fn is_not_alive(&self) -> bool {
        !self.is_alive()
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alive => write!(f, "ALIVE"),
            Self::NotAliveDisposed => write!(f, "NOT_ALIVE_DISPOSED"),
            Self::NotAliveNoWriters => write!(f, "NOT_ALIVE_NO_WRITERS"),
        }
    }
}

/// Metadata attached to every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleInfo {
    /// The instance the sample belongs to.
    pub instance_handle: InstanceHandle,
    /// The instance's lifecycle state when the sample was taken.
    pub instance_state: InstanceState,
    /// `false` for metadata-only samples.
    pub valid_data: bool,
}

/// One delivered update for an instance. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample<T> {
    data: T,
    info: SampleInfo,
}

impl<T> Sample<T> {
    /// Build a sample from its payload and metadata.
    pub const fn new(data: T, info: SampleInfo) -> Self {
        Self { data, info }
    }

    /// A valid sample of an alive instance.
    pub const fn alive(handle: InstanceHandle, data: T) -> Self {
        Self::new(
            data,
            SampleInfo {
                instance_handle: handle,
                instance_state: InstanceState::Alive,
                valid_data: true,
            },
        )
    }

    /// The disposal notification of an instance.
    ///
    /// Disposal samples are metadata-only, `data` usually only carries the key.
    pub const fn disposed(handle: InstanceHandle, data: T) -> Self {
        Self::metadata(handle, InstanceState::NotAliveDisposed, data)
    }

    /// The notification that no writer remains for an instance.
    pub const fn no_writers(handle: InstanceHandle, data: T) -> Self {
        Self::metadata(handle, InstanceState::NotAliveNoWriters, data)
    }

    /// A metadata-only sample (`valid_data == false`) in the given state.
    pub const fn metadata(handle: InstanceHandle, state: InstanceState, data: T) -> Self {
        Self::new(
            data,
            SampleInfo {
                instance_handle: handle,
                instance_state: state,
                valid_data: false,
            },
        )
    }

    pub const fn data(&self) -> &T {
        &self.data
    }

    pub const fn info(&self) -> &SampleInfo {
        &self.info
    }

    pub const fn instance_handle(&self) -> InstanceHandle {
        self.info.instance_handle
    }

    pub const fn instance_state(&self) -> InstanceState {
        self.info.instance_state
    }

    /// Returns `false` for metadata-only samples.
    pub const fn is_valid(&self) -> bool {
        self.info.valid_data
    }

    /// Discard the metadata and keep the payload.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Split the sample into payload and metadata.
    pub fn into_parts(self) -> (T, SampleInfo) {
        (self.data, self.info)
    }
}
