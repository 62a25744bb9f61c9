// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lifecycle filter: turns a terminal instance state into a stream termination.
//!
//! An [`InstanceStateInterpreter`] is bound to exactly one not-alive state:
//!
//! | Interpreted state | On a matching sample |
//! |-------------------|----------------------|
//! | `NotAliveDisposed` | the stream completes |
//! | `NotAliveNoWriters` | the stream fails with [`RxDdsError::LivelinessLost`] |
//!
//! In both cases the upstream is dropped right away, so nothing produced
//! afterwards is delivered. Every other sample, every upstream error and the
//! upstream completion pass through unchanged.
//!
//! The filter is usually stacked on a per-instance sub-stream so that disposal
//! and liveliness loss end that instance's consumer:
//!
//! ```
//! use rxdds_stream::InstanceStateExt;
//! use rxdds_core::{InstanceHandle, RxDdsError, Sample, StreamItem};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = InstanceHandle::new(1);
//! let mut samples = stream::iter(vec![
//!     StreamItem::Value(Sample::alive(handle, 1)),
//!     StreamItem::Value(Sample::no_writers(handle, 1)),
//!     StreamItem::Value(Sample::alive(handle, 2)),
//! ])
//! .error_on_no_writers();
//!
//! assert_eq!(samples.next().await.unwrap().unwrap().into_data(), 1);
//! assert!(matches!(
//!     samples.next().await,
//!     Some(StreamItem::Error(RxDdsError::LivelinessLost { .. }))
//! ));
//! assert!(samples.next().await.is_none());
//! # }
//! ```

use crate::operator::StreamOperator;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;
use rxdds_core::{InstanceState, Result, RxDdsError, Sample, StreamItem};

/// Operator that interprets one terminal instance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceStateInterpreter {
    interpreted: InstanceState,
}

impl InstanceStateInterpreter {
    /// Bind an interpreter to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`RxDdsError::ConfigurationError`] unless `state` is
    /// `NotAliveDisposed` or `NotAliveNoWriters`.
    pub fn new(state: InstanceState) -> Result<Self> {
        match state {
            InstanceState::NotAliveDisposed | InstanceState::NotAliveNoWriters => {
                Ok(Self { interpreted: state })
            }
            InstanceState::Alive => Err(RxDdsError::configuration_error(format!(
                "only NOT_ALIVE_DISPOSED and NOT_ALIVE_NO_WRITERS can be interpreted, got {state}"
            ))),
        }
    }

    /// Interpreter that completes the stream on disposal.
    pub const fn complete_on_dispose() -> Self {
        Self {
            interpreted: InstanceState::NotAliveDisposed,
        }
    }

    /// Interpreter that fails the stream when no writer remains.
    pub const fn error_on_no_writers() -> Self {
        Self {
            interpreted: InstanceState::NotAliveNoWriters,
        }
    }

    pub const fn interpreted_state(&self) -> InstanceState {
        self.interpreted
    }
}

impl<S, T> StreamOperator<S> for InstanceStateInterpreter
where
    S: Stream<Item = StreamItem<Sample<T>>>,
{
    type Output = InterpretedStream<S>;

    fn apply(self, upstream: S) -> Self::Output {
        InterpretedStream {
            upstream: Some(upstream),
            interpreted: self.interpreted,
        }
    }
}

/// Stream returned by an [`InstanceStateInterpreter`].
#[pin_project]
#[derive(Debug)]
pub struct InterpretedStream<S> {
    #[pin]
    upstream: Option<S>,
    interpreted: InstanceState,
}

impl<S, T> Stream for InterpretedStream<S>
where
    S: Stream<Item = StreamItem<Sample<T>>>,
{
    type Item = StreamItem<Sample<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let Some(upstream) = this.upstream.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };

        match ready!(upstream.poll_next(cx)) {
            Some(StreamItem::Value(sample)) if sample.instance_state() == *this.interpreted => {
                this.upstream.set(None);
                let handle = sample.instance_handle();
                match this.interpreted {
                    InstanceState::NotAliveNoWriters => {
                        warn!("liveliness lost for instance {}", handle);
                        Poll::Ready(Some(StreamItem::Error(RxDdsError::LivelinessLost {
                            handle,
                        })))
                    }
                    _ => {
                        debug!("instance {} disposed, completing stream", handle);
                        Poll::Ready(None)
                    }
                }
            }
            None => {
                this.upstream.set(None);
                Poll::Ready(None)
            }
            other => Poll::Ready(other),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.upstream {
            Some(upstream) => (0, upstream.size_hint().1),
            None => (0, Some(0)),
        }
    }
}

/// Extension trait providing the lifecycle filter as stream methods.
pub trait InstanceStateExt<T>: Stream<Item = StreamItem<Sample<T>>> + Sized {
    /// Complete the stream at the first `NotAliveDisposed` sample.
    fn complete_on_dispose(self) -> InterpretedStream<Self> {
        InstanceStateInterpreter::complete_on_dispose().apply(self)
    }

    /// Fail the stream with [`RxDdsError::LivelinessLost`] at the first
    /// `NotAliveNoWriters` sample.
    fn error_on_no_writers(self) -> InterpretedStream<Self> {
        InstanceStateInterpreter::error_on_no_writers().apply(self)
    }
}

impl<S, T> InstanceStateExt<T> for S where S: Stream<Item = StreamItem<Sample<T>>> {}
