// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// Opaque identity of a logical instance in the keyed data source.
///
/// Handles are assigned by the pub/sub substrate and stay stable for the whole
/// lifetime of an instance. They are only ever compared and hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(u64);

impl InstanceHandle {
    /// Wrap a raw handle value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The reserved handle that refers to no instance.
    pub const fn nil() -> Self {
        Self(0)
    }

    /// Returns `true` for the reserved [`nil`](Self::nil) handle.
    pub const fn is_nil(&self) -> bool {
        self.0 == 0
    }

    /// The raw value assigned by the substrate.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for InstanceHandle {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
