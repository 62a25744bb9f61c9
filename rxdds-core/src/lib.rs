// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for reactive streams over keyed publish/subscribe data.
//!
//! This crate holds the push-stream primitive the operators in `rxdds-stream`
//! are built on, and the domain model of the keyed data source:
//!
//! - [`StreamItem`]: a value or an error travelling through a stream. The end
//!   of the underlying `futures::Stream` is the completion signal.
//! - [`RxDdsSubject`]: a hot, multi-subscriber source used to fan samples out
//!   to per-instance consumers.
//! - [`CancellationToken`]: idempotent, hierarchical cancellation.
//! - [`Sample`], [`SampleInfo`], [`InstanceHandle`], [`InstanceState`]: what the
//!   pub/sub substrate delivers.
//! - [`InstanceWriter`]: the publish-side collaborator interface.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod cancellation_token;
pub mod instance_handle;
pub mod instance_writer;
pub mod rxdds_error;
pub mod rxdds_subject;
pub mod sample;
pub mod stream_item;
pub mod subject_error;

pub use self::cancellation_token::{CancellationToken, Cancelled, CancelledOwned, DropGuard};
pub use self::instance_handle::InstanceHandle;
pub use self::instance_writer::InstanceWriter;
pub use self::rxdds_error::{BoxError, Result, RxDdsError};
pub use self::rxdds_subject::{RxDdsSubject, SubjectStream};
pub use self::sample::{InstanceState, Sample, SampleInfo};
pub use self::stream_item::StreamItem;
pub use self::subject_error::SubjectError;
