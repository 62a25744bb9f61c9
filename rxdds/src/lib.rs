// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # rxdds
//!
//! Reactive stream operators for keyed publish/subscribe data.
//!
//! ## Overview
//!
//! A keyed topic delivers samples of many *instances* interleaved on one
//! stream, each sample tagged with an instance handle and a lifecycle state.
//! rxdds turns that stream into something a reactive pipeline can consume:
//!
//! - lifecycle filters that end a stream on disposal or fail it on liveliness loss,
//! - instance grouping, one sub-stream per instance with a key fixed at creation,
//! - projections that drop metadata-only samples and keep only payloads,
//! - a publish operator that writes every value and retires the published
//!   instance exactly once,
//! - a side-effect operator with fallible callbacks.
//!
//! Streams are plain `futures::Stream`s of [`StreamItem`]; operators are
//! applied with extension methods or with [`PipeExt::pipe`](prelude::PipeExt::pipe)
//! and the factories in [`ops`].
//!
//! ## Quick Start
//!
//! ```rust
//! use rxdds::prelude::*;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let temp = InstanceHandle::new(1);
//! let samples = stream::iter(vec![
//!     StreamItem::Value(Sample::alive(temp, 21)),
//!     StreamItem::Value(Sample::alive(temp, 22)),
//!     StreamItem::Value(Sample::disposed(temp, 0)),
//! ]);
//!
//! let readings: Vec<i32> = samples
//!     .pipe(ops::complete_on_dispose())
//!     .pipe(ops::skip_invalid_samples())
//!     .pipe(ops::map_sample_to_data())
//!     .map(StreamItem::unwrap)
//!     .collect()
//!     .await;
//!
//! assert_eq!(readings, vec![21, 22]);
//! # }
//! ```

pub use rxdds_core::{
    BoxError, CancellationToken, InstanceHandle, InstanceState, InstanceWriter, Result,
    RxDdsError, RxDdsSubject, Sample, SampleInfo, StreamItem, SubjectError,
};
pub use rxdds_stream::{ops, DoEffect, GroupedStream, InstanceGroups, UnkeyedStream};

/// Prelude module for convenient imports
pub mod prelude {
    pub use rxdds_stream::prelude::*;
    pub use rxdds_core::{CancellationToken, SampleInfo};
}
