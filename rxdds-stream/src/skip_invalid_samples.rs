// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Skip-invalid operator that drops metadata-only samples.

use crate::operator::StreamOperator;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;
use rxdds_core::{Sample, StreamItem};

/// Operator that drops samples whose validity flag is false.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipInvalidSamples;

impl<S, T> StreamOperator<S> for SkipInvalidSamples
where
    S: Stream<Item = StreamItem<Sample<T>>>,
{
    type Output = ValidSamples<S>;

    fn apply(self, upstream: S) -> Self::Output {
        ValidSamples { upstream }
    }
}

/// Stream returned by [`SkipInvalidSamples`].
#[pin_project]
#[derive(Debug)]
pub struct ValidSamples<S> {
    #[pin]
    upstream: S,
}

impl<S, T> Stream for ValidSamples<S>
where
    S: Stream<Item = StreamItem<Sample<T>>>,
{
    type Item = StreamItem<Sample<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            match ready!(this.upstream.as_mut().poll_next(cx)) {
                Some(StreamItem::Value(sample)) if !sample.is_valid() => continue,
                other => return Poll::Ready(other),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }
}

/// Extension trait providing the skip-invalid operator.
pub trait SkipInvalidSamplesExt<T>: Stream<Item = StreamItem<Sample<T>>> + Sized {
    /// Drop samples that carry no valid payload. Errors pass through.
    ///
    /// ```
    /// use rxdds_stream::SkipInvalidSamplesExt;
    /// use rxdds_core::{InstanceHandle, InstanceState, Sample, StreamItem};
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let handle = InstanceHandle::new(3);
    /// let valid: Vec<_> = stream::iter(vec![
    ///     StreamItem::Value(Sample::metadata(handle, InstanceState::Alive, 0)),
    ///     StreamItem::Value(Sample::alive(handle, 5)),
    /// ])
    /// .skip_invalid_samples()
    /// .map(|item| item.unwrap().into_data())
    /// .collect()
    /// .await;
    ///
    /// assert_eq!(valid, vec![5]);
    /// # }
    /// ```
    fn skip_invalid_samples(self) -> ValidSamples<Self> {
        SkipInvalidSamples.apply(self)
    }
}

impl<S, T> SkipInvalidSamplesExt<T> for S where S: Stream<Item = StreamItem<Sample<T>>> {}
