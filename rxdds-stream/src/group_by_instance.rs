// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Instance grouping: one sub-stream per instance of a keyed topic.
//!
//! [`group_by_instance`](GroupByInstanceExt::group_by_instance) demultiplexes
//! an interleaved sample stream into a stream of [`GroupedStream`]s, one per
//! instance handle. Each group carries a key, computed once from the payload
//! of the instance's first valid sample.
//!
//! ## Per-sample protocol
//!
//! - **Disposal of a known instance**: the group's sub-stream completes and
//!   the instance is forgotten. A later sample with the same handle opens a
//!   new group.
//! - **Disposal of an unknown instance**: the shared output fails with
//!   [`RxDdsError::UnexpectedInstanceState`](rxdds_core::RxDdsError::UnexpectedInstanceState),
//!   every group ends and the upstream is dropped.
//! - **First valid sample of a new instance**: the group is announced on the
//!   shared output, then the sample is delivered to it.
//! - **Any other sample of a known instance** (including metadata-only ones)
//!   is delivered to that instance's group.
//! - **Metadata-only sample of an unknown instance**: dropped.
//!
//! An upstream error is forwarded on the shared output and cancels every
//! group. Upstream completion ends the shared output but leaves groups open;
//! they end once the [`InstanceGroups`] value is dropped.
//!
//! ## Delivery
//!
//! The operator spawns nothing. The upstream is pulled by whichever consumer
//! needs data: the shared output, or a group whose buffer is empty. Samples
//! for other instances are buffered in their groups, and groups discovered
//! meanwhile are queued on the shared output. Groups may therefore be read
//! one at a time (for example with `flatten`), or concurrently from spawned
//! tasks.
//!
//! ## Example
//!
//! ```
//! use rxdds_stream::GroupByInstanceExt;
//! use rxdds_core::{InstanceHandle, Sample, StreamItem};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (a, b) = (InstanceHandle::new(1), InstanceHandle::new(2));
//! let samples = stream::iter(vec![
//!     StreamItem::Value(Sample::alive(a, "a1")),
//!     StreamItem::Value(Sample::alive(b, "b1")),
//!     StreamItem::Value(Sample::alive(a, "a2")),
//!     StreamItem::Value(Sample::disposed(a, "")),
//!     StreamItem::Value(Sample::disposed(b, "")),
//! ]);
//!
//! let mut groups = samples.group_by_instance(|s: &&str| s.chars().next());
//! let mut first = groups.next().await.unwrap().unwrap();
//! let mut second = groups.next().await.unwrap().unwrap();
//! assert!(groups.next().await.is_none());
//!
//! assert_eq!(first.key(), &Some('a'));
//! assert_eq!(second.key(), &Some('b'));
//! assert_eq!(first.next().await.unwrap().unwrap().into_data(), "a1");
//! assert_eq!(first.next().await.unwrap().unwrap().into_data(), "a2");
//! assert!(first.next().await.is_none());
//! assert_eq!(second.next().await.unwrap().unwrap().into_data(), "b1");
//! assert!(second.next().await.is_none());
//! # }
//! ```

mod grouped_stream;
mod instance_groups;

pub use grouped_stream::{GroupedStream, UnkeyedStream};
pub use instance_groups::InstanceGroups;

use crate::operator::StreamOperator;
use core::marker::PhantomData;
use futures::Stream;
use rxdds_core::{Sample, StreamItem};

/// Operator that groups samples by instance, keyed by `F`'s result.
pub struct GroupByInstance<K, F> {
    key_selector: F,
    _key: PhantomData<fn() -> K>,
}

impl<K, F> GroupByInstance<K, F> {
    pub fn new(key_selector: F) -> Self {
        Self {
            key_selector,
            _key: PhantomData,
        }
    }
}

impl<K, F> core::fmt::Debug for GroupByInstance<K, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GroupByInstance").finish_non_exhaustive()
    }
}

impl<S, K, T, F, R> StreamOperator<S> for GroupByInstance<K, F>
where
    S: Stream<Item = StreamItem<Sample<T>>> + Send + 'static,
    K: Send + 'static,
    T: Clone + Send + Sync + 'static,
    F: FnMut(&T) -> R + Send + 'static,
    R: Into<K>,
{
    type Output = InstanceGroups<S, K, T, F>;

    fn apply(self, upstream: S) -> Self::Output {
        InstanceGroups::new(upstream, self.key_selector)
    }
}

/// Extension trait providing instance grouping.
pub trait GroupByInstanceExt<T>: Stream<Item = StreamItem<Sample<T>>> + Send + Sized + 'static
where
    T: Clone + Send + Sync + 'static,
{
    /// Group samples by instance, with the key type inferred from the selector.
    ///
    /// See the [module-level documentation](crate::group_by_instance) for the
    /// full protocol.
    fn group_by_instance<K, F>(self, key_selector: F) -> InstanceGroups<Self, K, T, F>
    where
        K: Send + 'static,
        F: FnMut(&T) -> K + Send + 'static,
    {
        GroupByInstance::new(key_selector).apply(self)
    }

    /// Group samples by instance, converting the selector's result into `K`.
    ///
    /// ```
    /// use rxdds_stream::GroupByInstanceExt;
    /// use rxdds_core::{InstanceHandle, Sample, StreamItem};
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let samples = stream::iter(vec![StreamItem::Value(Sample::alive(
    ///     InstanceHandle::new(1),
    ///     7_u32,
    /// ))]);
    ///
    /// let mut groups = samples.group_by_instance_into::<u64, _, _>(|id: &u32| *id);
    /// let group = groups.next().await.unwrap().unwrap();
    /// assert_eq!(group.key(), &7_u64);
    /// # }
    /// ```
    fn group_by_instance_into<K, R, F>(self, key_selector: F) -> InstanceGroups<Self, K, T, F>
    where
        K: Send + 'static,
        F: FnMut(&T) -> R + Send + 'static,
        R: Into<K>,
    {
        GroupByInstance::new(key_selector).apply(self)
    }
}

impl<S, T> GroupByInstanceExt<T> for S
where
    S: Stream<Item = StreamItem<Sample<T>>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
}
