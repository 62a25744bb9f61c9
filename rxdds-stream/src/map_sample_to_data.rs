// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Map-to-payload operator that strips instance metadata from samples.

use crate::operator::StreamOperator;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;
use rxdds_core::{Sample, StreamItem};

/// Operator that projects each sample onto its payload.
///
/// The payload of a metadata-only sample is forwarded as is; combine with
/// [`SkipInvalidSamples`](crate::SkipInvalidSamples) to keep meaningful data only.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapSampleToData;

impl<S, T> StreamOperator<S> for MapSampleToData
where
    S: Stream<Item = StreamItem<Sample<T>>>,
{
    type Output = SampleData<S>;

    fn apply(self, upstream: S) -> Self::Output {
        SampleData { upstream }
    }
}

/// Stream returned by [`MapSampleToData`].
#[pin_project]
#[derive(Debug)]
pub struct SampleData<S> {
    #[pin]
    upstream: S,
}

impl<S, T> Stream for SampleData<S>
where
    S: Stream<Item = StreamItem<Sample<T>>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let item = ready!(self.project().upstream.poll_next(cx));
        Poll::Ready(item.map(|item| match item {
            StreamItem::Value(sample) => StreamItem::Value(sample.into_data()),
            StreamItem::Error(error) => StreamItem::Error(error),
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

/// Extension trait providing the map-to-payload operator.
pub trait MapSampleToDataExt<T>: Stream<Item = StreamItem<Sample<T>>> + Sized {
    /// Replace every sample by its payload.
    fn map_sample_to_data(self) -> SampleData<Self> {
        MapSampleToData.apply(self)
    }
}

impl<S, T> MapSampleToDataExt<T> for S where S: Stream<Item = StreamItem<Sample<T>>> {}
