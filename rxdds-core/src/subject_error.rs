// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Errors specific to subject operations (lifecycle and broadcasting).
///
/// These are distinct from stream errors: they report misuse of a subject,
/// not a failure travelling through a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject has been closed and accepts neither items nor subscribers.
    #[error("Subject is closed")]
    Closed,
}
