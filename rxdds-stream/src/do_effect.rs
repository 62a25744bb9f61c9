// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Side-effect operator with fallible callbacks.
//!
//! [`do_effect`](DoEffectExt::do_effect) runs a callback for every value,
//! error and completion of the upstream, then forwards the signal unchanged.
//! Each callback is optional and defaults to a no-op.
//!
//! A callback returns `Result<(), E>`. When it fails, the signal it was
//! observing is replaced by a [`RxDdsError::CallbackFailure`] and the stream
//! ends; this holds for the error callback too, so a failure while observing
//! an error is reported rather than swallowed.
//!
//! ```
//! use rxdds_stream::{DoEffect, DoEffectExt};
//! use rxdds_core::StreamItem;
//! use futures::{stream, StreamExt};
//! use std::sync::{Arc, Mutex};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let completed = Arc::new(Mutex::new(false));
//!
//! let effect = DoEffect::new()
//!     .on_next({
//!         let seen = seen.clone();
//!         move |value: &i32| {
//!             seen.lock().unwrap().push(*value);
//!             Ok::<_, std::io::Error>(())
//!         }
//!     })
//!     .on_completed({
//!         let completed = completed.clone();
//!         move || {
//!             *completed.lock().unwrap() = true;
//!             Ok::<_, std::io::Error>(())
//!         }
//!     });
//!
//! let values: Vec<i32> = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)])
//!     .do_effect(effect)
//!     .map(StreamItem::unwrap)
//!     .collect()
//!     .await;
//!
//! assert_eq!(values, vec![1, 2]);
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! assert!(*completed.lock().unwrap());
//! # }
//! ```

use crate::operator::StreamOperator;
use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;
use rxdds_core::{BoxError, RxDdsError, StreamItem};

type NextCallback<T> = Box<dyn FnMut(&T) -> Result<(), BoxError> + Send + Sync>;
type ErrorCallback = Box<dyn FnMut(&RxDdsError) -> Result<(), BoxError> + Send + Sync>;
type CompletedCallback = Box<dyn FnMut() -> Result<(), BoxError> + Send + Sync>;

/// The three callbacks of the side-effect operator.
pub struct DoEffect<T> {
    on_next: NextCallback<T>,
    on_error: ErrorCallback,
    on_completed: CompletedCallback,
}

impl<T: 'static> DoEffect<T> {
    /// An effect whose callbacks all do nothing.
    pub fn new() -> Self {
        Self {
            on_next: Box::new(|_: &T| -> Result<(), BoxError> { Ok(()) }),
            on_error: Box::new(|_: &RxDdsError| -> Result<(), BoxError> { Ok(()) }),
            on_completed: Box::new(|| -> Result<(), BoxError> { Ok(()) }),
        }
    }

    #[must_use]
    pub fn on_next<F, E>(mut self, mut callback: F) -> Self
    where
        F: FnMut(&T) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.on_next = Box::new(move |value: &T| -> Result<(), BoxError> {
            callback(value).map_err(Into::into)
        });
        self
    }

    #[must_use]
    pub fn on_error<F, E>(mut self, mut callback: F) -> Self
    where
        F: FnMut(&RxDdsError) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.on_error = Box::new(move |error: &RxDdsError| -> Result<(), BoxError> {
            callback(error).map_err(Into::into)
        });
        self
    }

    #[must_use]
    pub fn on_completed<F, E>(mut self, mut callback: F) -> Self
    where
        F: FnMut() -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.on_completed =
            Box::new(move || -> Result<(), BoxError> { callback().map_err(Into::into) });
        self
    }
}

impl<T: 'static> Default for DoEffect<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DoEffect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoEffect").finish_non_exhaustive()
    }
}

impl<S, T> StreamOperator<S> for DoEffect<T>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Output = DoEffectStream<S, T>;

    fn apply(self, upstream: S) -> Self::Output {
        DoEffectStream {
            upstream: Some(upstream),
            effect: self,
        }
    }
}

/// Stream returned by [`DoEffect`].
#[pin_project]
#[derive(Debug)]
pub struct DoEffectStream<S, T> {
    #[pin]
    upstream: Option<S>,
    effect: DoEffect<T>,
}

impl<S, T> Stream for DoEffectStream<S, T>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let Some(upstream) = this.upstream.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };

        let outcome = match ready!(upstream.poll_next(cx)) {
            Some(StreamItem::Value(value)) => {
                (this.effect.on_next)(&value).map(|()| Some(StreamItem::Value(value)))
            }
            Some(StreamItem::Error(error)) => {
                (this.effect.on_error)(&error).map(|()| Some(StreamItem::Error(error)))
            }
            None => {
                this.upstream.set(None);
                (this.effect.on_completed)().map(|()| None)
            }
        };

        match outcome {
            Ok(item) => Poll::Ready(item),
            Err(failure) => {
                error!("side-effect callback failed: {}", failure);
                this.upstream.set(None);
                Poll::Ready(Some(StreamItem::Error(RxDdsError::callback_failure(
                    failure,
                ))))
            }
        }
    }
}

/// Extension trait providing the side-effect operator.
pub trait DoEffectExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Run `effect`'s callbacks for every signal of this stream.
    fn do_effect(self, effect: DoEffect<T>) -> DoEffectStream<Self, T> {
        effect.apply(self)
    }

    /// Run `callback` for every value; errors and completion pass untouched.
    fn do_on_next<F, E>(self, callback: F) -> DoEffectStream<Self, T>
    where
        T: 'static,
        F: FnMut(&T) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        DoEffect::new().on_next(callback).apply(self)
    }
}

impl<S, T> DoEffectExt<T> for S where S: Stream<Item = StreamItem<T>> {}
