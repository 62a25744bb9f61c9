// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream operators for instance-keyed publish/subscribe data.
//!
//! The operators in this crate turn the raw sample stream of a keyed topic
//! into composable streams: lifecycle states become stream termination,
//! interleaved instances become one sub-stream each, and a publish pipeline
//! retires its instance when it ends.
//!
//! Every stream carries [`StreamItem`](rxdds_core::StreamItem)s: a value or
//! an error. The end of the stream is the completion signal.
//!
//! # Operators
//!
//! | Operator | Extension method | Factory |
//! |----------|------------------|---------|
//! | [`InstanceStateInterpreter`] | [`complete_on_dispose`](InstanceStateExt::complete_on_dispose), [`error_on_no_writers`](InstanceStateExt::error_on_no_writers) | [`ops::complete_on_dispose`], [`ops::error_on_no_writers`] |
//! | [`GroupByInstance`] | [`group_by_instance`](GroupByInstanceExt::group_by_instance) | [`ops::group_by_instance`], [`ops::group_by_key`] |
//! | [`SkipInvalidSamples`] | [`skip_invalid_samples`](SkipInvalidSamplesExt::skip_invalid_samples) | [`ops::skip_invalid_samples`] |
//! | [`MapSampleToData`] | [`map_sample_to_data`](MapSampleToDataExt::map_sample_to_data) | [`ops::map_sample_to_data`] |
//! | [`Unkey`] | [`GroupedStream::into_unkeyed`] | [`ops::to_unkeyed`] |
//! | [`PublishAndRetire`] | [`publish_and_retire`](PublishAndRetireExt::publish_and_retire) | [`ops::publish_and_retire`] |
//! | [`DoEffect`] | [`do_effect`](DoEffectExt::do_effect) | [`ops::do_effect`] |
//!
//! Operators are values implementing [`StreamOperator`]; [`PipeExt::pipe`]
//! applies them left to right.
//!
//! # Typical pipeline
//!
//! ```
//! use rxdds_stream::prelude::*;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (a, b) = (InstanceHandle::new(1), InstanceHandle::new(2));
//! let samples = stream::iter(vec![
//!     StreamItem::Value(Sample::alive(a, ("a", 1))),
//!     StreamItem::Value(Sample::alive(b, ("b", 1))),
//!     StreamItem::Value(Sample::no_writers(b, ("b", 0))),
//!     StreamItem::Value(Sample::alive(a, ("a", 2))),
//!     StreamItem::Value(Sample::disposed(a, ("a", 0))),
//! ]);
//!
//! let mut groups = samples.group_by_instance(|(name, _): &(&str, i32)| name.to_string());
//! let mut announced = Vec::new();
//! while let Some(group) = groups.next().await {
//!     announced.push(group.unwrap());
//! }
//!
//! let b_group = announced.pop().unwrap();
//! let a_group = announced.pop().unwrap();
//!
//! let a_values: Vec<_> = a_group.complete_on_dispose().map_sample_to_data().collect().await;
//! assert_eq!(a_values.len(), 2);
//!
//! let mut b_values = b_group.error_on_no_writers();
//! assert!(b_values.next().await.unwrap().is_value());
//! assert!(matches!(
//!     b_values.next().await,
//!     Some(StreamItem::Error(RxDdsError::LivelinessLost { .. }))
//! ));
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod do_effect;
pub mod group_by_instance;
pub mod instance_state;
pub mod map_sample_to_data;
pub mod operator;
pub mod ops;
pub mod prelude;
pub mod publish_and_retire;
pub mod skip_invalid_samples;
pub mod unkey;

pub use self::do_effect::{DoEffect, DoEffectExt, DoEffectStream};
pub use self::group_by_instance::{
    GroupByInstance, GroupByInstanceExt, GroupedStream, InstanceGroups, UnkeyedStream,
};
pub use self::instance_state::{InstanceStateExt, InstanceStateInterpreter, InterpretedStream};
pub use self::map_sample_to_data::{MapSampleToData, MapSampleToDataExt, SampleData};
pub use self::operator::{PipeExt, StreamOperator};
pub use self::publish_and_retire::{PublishAndRetire, PublishAndRetireExt, PublishStream};
pub use self::skip_invalid_samples::{SkipInvalidSamples, SkipInvalidSamplesExt, ValidSamples};
pub use self::unkey::Unkey;
