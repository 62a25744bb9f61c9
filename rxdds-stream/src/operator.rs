// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The uniform operator contract.
//!
//! Every operator in this crate is a value that turns one stream into another.
//! Operators are built by the factories in [`ops`](crate::ops) and applied
//! left to right with [`PipeExt::pipe`]:
//!
//! ```
//! use rxdds_stream::ops;
//! use rxdds_stream::PipeExt;
//! use rxdds_core::{InstanceHandle, Sample, StreamItem};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = InstanceHandle::new(1);
//! let samples = stream::iter(vec![
//!     StreamItem::Value(Sample::alive(handle, 10)),
//!     StreamItem::Value(Sample::disposed(handle, 0)),
//!     StreamItem::Value(Sample::alive(handle, 20)),
//! ]);
//!
//! let data: Vec<i32> = samples
//!     .pipe(ops::complete_on_dispose())
//!     .pipe(ops::map_sample_to_data())
//!     .map(StreamItem::unwrap)
//!     .collect()
//!     .await;
//!
//! assert_eq!(data, vec![10]);
//! # }
//! ```

use futures::Stream;

/// An arity-1 stream transform: stream of X in, stream of Y out.
pub trait StreamOperator<S: Stream> {
    /// The stream produced by this operator.
    type Output: Stream;

    /// Consume the operator and wrap `upstream`.
    fn apply(self, upstream: S) -> Self::Output;
}

/// Left-to-right application of [`StreamOperator`]s.
pub trait PipeExt: Stream + Sized {
    /// Apply `operator` to this stream.
    fn pipe<O>(self, operator: O) -> O::Output
    where
        O: StreamOperator<Self>,
    {
        operator.apply(self)
    }
}

impl<S: Stream> PipeExt for S {}
