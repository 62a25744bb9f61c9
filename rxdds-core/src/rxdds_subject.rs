// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject.
//!
//! A [`RxDdsSubject`] broadcasts each [`StreamItem<T>`] to all active subscribers.
//! The instance grouping operator keeps one subject per live instance and uses
//! it as that instance's sub-stream.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past items, only items sent after subscribing.
//! - **Unbounded**: Uses unbounded mpsc channels internally (no backpressure).
//! - **Shared**: Cheap to clone; all clones share the same internal state.
//! - **Close**: Closing completes every subscriber once its buffered items are drained.
//!
//! ## Example
//!
//! ```
//! use rxdds_core::{RxDdsSubject, StreamItem};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = RxDdsSubject::<i32>::new();
//!
//! let mut stream = subject.subscribe().unwrap();
//!
//! subject.next(1).unwrap();
//! subject.next(2).unwrap();
//! subject.close();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(stream.next().await, Some(StreamItem::Value(2)));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::{RxDdsError, StreamItem, SubjectError};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// The stream handed to each subscriber of a [`RxDdsSubject`].
pub type SubjectStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + Sync + 'static>>;

struct SubjectState<T> {
    closed: bool,
    senders: Vec<UnboundedSender<StreamItem<T>>>,
}

// A Sync-capable wrapper around the unbounded receiver of one subscription.
struct SubjectReceiver<T> {
    inner: Mutex<UnboundedReceiver<StreamItem<T>>>,
}

impl<T: Clone + Send + Sync + 'static> SubjectReceiver<T> {
    fn into_boxed_stream(rx: UnboundedReceiver<StreamItem<T>>) -> SubjectStream<T> {
        Box::pin(Self {
            inner: Mutex::new(rx),
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Stream for SubjectReceiver<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut guard = self.inner.lock();
        Pin::new(&mut *guard).poll_next(cx)
    }
}

/// A hot, unbounded subject that broadcasts items to all current subscribers.
///
/// See the [module documentation](self) for details.
pub struct RxDdsSubject<T: Clone + Send + Sync + 'static> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> RxDdsSubject<T> {
    /// Creates a new open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe to this subject and receive a stream of `StreamItem<T>`.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn subscribe(&self) -> Result<SubjectStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        Ok(SubjectReceiver::into_boxed_stream(rx))
    }

    /// Send an item to all active subscribers.
    ///
    /// Subscribers whose stream was dropped are unregistered here.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let before = state.senders.len();
        state
            .senders
            .retain(|tx| tx.unbounded_send(item.clone()).is_ok());

        if state.senders.len() < before {
            trace!(
                "subject dropped {} detached subscribers",
                before - state.senders.len()
            );
        }
        Ok(())
    }

    /// Send a value to all active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        self.send(StreamItem::Value(value))
    }

    /// Send an error to all subscribers and close the subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn error(&self, err: RxDdsError) -> Result<(), SubjectError> {
        let result = self.send(StreamItem::Error(err));
        self.close();
        result
    }

    /// Closes the subject, completing all subscriber streams.
    ///
    /// Subscribers still receive the items buffered before the close, then
    /// their stream ends. Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` if the subject has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of currently registered subscribers.
    ///
    /// Dropped subscribers are removed on the next `send()`, not when dropped.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for RxDdsSubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for RxDdsSubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> core::fmt::Debug for RxDdsSubject<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RxDdsSubject")
            .field("closed", &state.closed)
            .field("subscribers", &state.senders.len())
            .finish()
    }
}
