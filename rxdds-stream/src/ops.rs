// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Operator factories, for use with [`PipeExt::pipe`](crate::PipeExt::pipe).
//!
//! Every factory is pure: it only packages its arguments into an operator
//! value. Nothing runs until the resulting stream is polled.
//!
//! ```
//! use rxdds_stream::{ops, PipeExt};
//! use rxdds_core::{InstanceHandle, Sample, StreamItem};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = InstanceHandle::new(4);
//! let mut groups = stream::iter(vec![
//!     StreamItem::Value(Sample::alive(handle, 21_u32)),
//!     StreamItem::Value(Sample::disposed(handle, 0)),
//! ])
//! .pipe(ops::group_by_instance::<u64, _>(|v: &u32| *v * 2));
//!
//! let group = groups.next().await.unwrap().unwrap();
//! assert_eq!(group.key(), &42);
//! assert!(groups.next().await.is_none());
//!
//! let data: Vec<u32> = group
//!     .pipe(ops::to_unkeyed())
//!     .pipe(ops::map_sample_to_data())
//!     .map(StreamItem::unwrap)
//!     .collect()
//!     .await;
//! assert_eq!(data, vec![21]);
//! # }
//! ```

use crate::do_effect::DoEffect;
use crate::group_by_instance::GroupByInstance;
use crate::instance_state::InstanceStateInterpreter;
use crate::map_sample_to_data::MapSampleToData;
use crate::publish_and_retire::PublishAndRetire;
use crate::skip_invalid_samples::SkipInvalidSamples;
use crate::unkey::Unkey;
use rxdds_core::{BoxError, InstanceState, InstanceWriter, Result};

/// Lifecycle filter completing the stream on disposal.
pub const fn complete_on_dispose() -> InstanceStateInterpreter {
    InstanceStateInterpreter::complete_on_dispose()
}

/// Lifecycle filter failing the stream on liveliness loss.
pub const fn error_on_no_writers() -> InstanceStateInterpreter {
    InstanceStateInterpreter::error_on_no_writers()
}

/// Lifecycle filter for an arbitrary terminal state.
///
/// # Errors
///
/// Returns a configuration error for [`InstanceState::Alive`].
pub fn interpret_instance_state(state: InstanceState) -> Result<InstanceStateInterpreter> {
    InstanceStateInterpreter::new(state)
}

/// Instance grouping with an explicit key type.
///
/// The selector may return anything convertible into `K`.
pub fn group_by_instance<K, F>(key_selector: F) -> GroupByInstance<K, F> {
    GroupByInstance::new(key_selector)
}

/// Instance grouping with the key type taken from the selector.
pub fn group_by_key<T, K, F>(key_selector: F) -> GroupByInstance<K, F>
where
    F: FnMut(&T) -> K,
{
    GroupByInstance::new(key_selector)
}

pub const fn skip_invalid_samples() -> SkipInvalidSamples {
    SkipInvalidSamples
}

pub const fn map_sample_to_data() -> MapSampleToData {
    MapSampleToData
}

pub const fn to_unkeyed() -> Unkey {
    Unkey
}

/// Publish through `writer`, retiring `sentinel`'s instance exactly once.
pub fn publish_and_retire<W, T>(writer: W, sentinel: T) -> PublishAndRetire<W, T>
where
    W: InstanceWriter<T>,
{
    PublishAndRetire::new(writer, sentinel)
}

/// Side effect on values only. Use [`DoEffect`]'s builder for the error
/// and completion callbacks.
pub fn do_effect<T, F, E>(on_next: F) -> DoEffect<T>
where
    T: 'static,
    F: FnMut(&T) -> core::result::Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    DoEffect::new().on_next(on_next)
}
