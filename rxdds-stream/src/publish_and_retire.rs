// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Publish-and-retire operator: writes every value and disposes the
//! published instance exactly once.
//!
//! The instance to retire is identified by a *sentinel* value: retiring means
//! `dispose_instance(register_instance(sentinel))`.
//!
//! ## Behavior
//!
//! - Each value is written before it is forwarded downstream.
//! - A failed write ends the stream: the instance is retired (a retirement
//!   failure at this point is only logged), then a
//!   [`RxDdsError::WriteFailure`] is emitted and the upstream is dropped, so
//!   no later value is written.
//! - On upstream completion the instance is retired, then the stream
//!   completes. If the retirement fails, a [`RxDdsError::RetireFailure`] is
//!   emitted instead and the stream ends.
//! - Upstream errors are forwarded unchanged and do not retire the instance.
//!   Dropping the stream before completion does not retire it either.
//!
//! ## Example
//!
//! ```
//! use rxdds_stream::PublishAndRetireExt;
//! use rxdds_core::{InstanceHandle, InstanceWriter, StreamItem};
//! use futures::{stream, StreamExt};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Log(Mutex<Vec<String>>);
//!
//! impl InstanceWriter<i32> for Log {
//!     type Error = std::io::Error;
//!
//!     fn write(&self, value: &i32) -> Result<(), Self::Error> {
//!         self.0.lock().unwrap().push(format!("write {value}"));
//!         Ok(())
//!     }
//!
//!     fn register_instance(&self, _: &i32) -> Result<InstanceHandle, Self::Error> {
//!         Ok(InstanceHandle::new(1))
//!     }
//!
//!     fn dispose_instance(&self, handle: InstanceHandle) -> Result<(), Self::Error> {
//!         self.0.lock().unwrap().push(format!("dispose {}", handle.value()));
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let log = Log::default();
//! let published: Vec<i32> = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)])
//!     .publish_and_retire(&log, 0)
//!     .map(StreamItem::unwrap)
//!     .collect()
//!     .await;
//!
//! assert_eq!(published, vec![1, 2]);
//! assert_eq!(*log.0.lock().unwrap(), ["write 1", "write 2", "dispose 1"]);
//! # }
//! ```

use crate::operator::StreamOperator;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;
use rxdds_core::{InstanceWriter, RxDdsError, StreamItem};

/// Operator that publishes values through `W` and retires the sentinel's instance.
#[derive(Debug, Clone)]
pub struct PublishAndRetire<W, T> {
    writer: W,
    sentinel: T,
}

impl<W, T> PublishAndRetire<W, T>
where
    W: InstanceWriter<T>,
{
    pub fn new(writer: W, sentinel: T) -> Self {
        Self { writer, sentinel }
    }
}

impl<S, W, T> StreamOperator<S> for PublishAndRetire<W, T>
where
    S: Stream<Item = StreamItem<T>>,
    W: InstanceWriter<T>,
{
    type Output = PublishStream<S, W, T>;

    fn apply(self, upstream: S) -> Self::Output {
        PublishStream {
            upstream: Some(upstream),
            writer: self.writer,
            sentinel: self.sentinel,
            retired: false,
        }
    }
}

/// Stream returned by [`PublishAndRetire`].
#[pin_project]
#[derive(Debug)]
pub struct PublishStream<S, W, T> {
    #[pin]
    upstream: Option<S>,
    writer: W,
    sentinel: T,
    retired: bool,
}

impl<S, W, T> PublishStream<S, W, T> {
    /// `true` once the retirement has been attempted.
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}

fn retire<W, T>(writer: &W, sentinel: &T) -> Result<(), W::Error>
where
    W: InstanceWriter<T>,
{
    let handle = writer.register_instance(sentinel)?;
    writer.dispose_instance(handle)?;
    debug!("instance {} retired", handle);
    Ok(())
}

impl<S, W, T> Stream for PublishStream<S, W, T>
where
    S: Stream<Item = StreamItem<T>>,
    W: InstanceWriter<T>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let Some(upstream) = this.upstream.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };

        match ready!(upstream.poll_next(cx)) {
            Some(StreamItem::Value(value)) => match this.writer.write(&value) {
                Ok(()) => Poll::Ready(Some(StreamItem::Value(value))),
                Err(write_error) => {
                    error!("write failed: {}", write_error);
                    this.upstream.set(None);
                    if !*this.retired {
                        *this.retired = true;
                        if let Err(retire_error) = retire(&*this.writer, &*this.sentinel) {
                            warn!("retirement after write failure failed: {}", retire_error);
                        }
                    }
                    Poll::Ready(Some(StreamItem::Error(RxDdsError::write_failure(
                        write_error,
                    ))))
                }
            },
            Some(StreamItem::Error(error)) => Poll::Ready(Some(StreamItem::Error(error))),
            None => {
                this.upstream.set(None);
                if *this.retired {
                    return Poll::Ready(None);
                }

                *this.retired = true;
                match retire(&*this.writer, &*this.sentinel) {
                    Ok(()) => Poll::Ready(None),
                    Err(retire_error) => {
                        error!("retirement on completion failed: {}", retire_error);
                        Poll::Ready(Some(StreamItem::Error(RxDdsError::retire_failure(
                            retire_error,
                        ))))
                    }
                }
            }
        }
    }
}

/// Extension trait providing publish-and-retire.
pub trait PublishAndRetireExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Write every value through `writer`, retiring `sentinel`'s instance
    /// on completion or on the first write failure.
    ///
    /// See the [module-level documentation](crate::publish_and_retire).
    fn publish_and_retire<W>(self, writer: W, sentinel: T) -> PublishStream<Self, W, T>
    where
        W: InstanceWriter<T>,
    {
        PublishAndRetire::new(writer, sentinel).apply(self)
    }
}

impl<S, T> PublishAndRetireExt<T> for S where S: Stream<Item = StreamItem<T>> {}
