// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::{self, Debug};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use pin_project::pin_project;
use rxdds_core::{
    CancellationToken, CancelledOwned, InstanceHandle, RxDdsSubject, Sample, StreamItem,
    SubjectError, SubjectStream,
};
use std::sync::Weak;

/// Upstream items a group may pull before yielding to other tasks.
const DRIVE_BUDGET: usize = 64;

/// Access to the upstream shared by all groups of one grouping operator.
pub(crate) trait UpstreamDriver: Send + Sync {
    /// Route one upstream item to its group.
    ///
    /// `Ready(true)` after an item was handled, `Ready(false)` once the
    /// upstream is gone, `Pending` with `cx`'s waker registered otherwise.
    fn drive(&self, cx: &mut Context<'_>) -> Poll<bool>;
}

/// Subscription to the samples of one instance.
///
/// Ends when the instance is disposed, when the grouping operator that owns
/// the instance is cancelled, or when that operator is dropped.
///
/// When its buffer is empty, polling it pulls the shared upstream, so a
/// group makes progress even while the shared output is not being polled.
pub struct UnkeyedStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    handle: InstanceHandle,
    subject: RxDdsSubject<Sample<T>>,
    receiver: SubjectStream<Sample<T>>,
    cancelled: CancelledOwned,
    driver: Weak<dyn UpstreamDriver>,
    terminated: bool,
}

impl<T> UnkeyedStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn attach(
        handle: InstanceHandle,
        subject: &RxDdsSubject<Sample<T>>,
        token: CancellationToken,
        driver: Weak<dyn UpstreamDriver>,
    ) -> Result<Self, SubjectError> {
        let receiver = subject.subscribe()?;
        Ok(Self {
            handle,
            subject: subject.clone(),
            receiver,
            cancelled: token.cancelled_owned(),
            driver,
            terminated: false,
        })
    }

    pub fn instance_handle(&self) -> InstanceHandle {
        self.handle
    }

    /// `true` once the owning grouping operator has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.token().is_cancelled()
    }

    /// Attach another hot subscriber to the same instance.
    ///
    /// The new subscriber observes only samples delivered after this call.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::Closed`] if the instance has already been
    /// disposed or its grouping operator has terminated.
    pub fn subscribe(&self) -> Result<Self, SubjectError> {
        Self::attach(
            self.handle,
            &self.subject,
            self.cancelled.token().clone(),
            self.driver.clone(),
        )
    }
}

impl<T> Stream for UnkeyedStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = StreamItem<Sample<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.terminated {
            return Poll::Ready(None);
        }

        for _ in 0..DRIVE_BUDGET {
            if Pin::new(&mut this.cancelled).poll(cx).is_ready() {
                trace!("instance {} stream cancelled", this.handle);
                this.terminated = true;
                return Poll::Ready(None);
            }

            match this.receiver.as_mut().poll_next(cx) {
                Poll::Ready(None) => {
                    this.terminated = true;
                    return Poll::Ready(None);
                }
                Poll::Ready(item) => return Poll::Ready(item),
                Poll::Pending => {}
            }

            let Some(driver) = this.driver.upgrade() else {
                return Poll::Pending;
            };
            if !matches!(driver.drive(cx), Poll::Ready(true)) {
                return Poll::Pending;
            }
        }

        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

impl<T> Debug for UnkeyedStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnkeyedStream")
            .field("handle", &self.handle)
            .field("terminated", &self.terminated)
            .field("receiver", &"<stream>")
            .finish()
    }
}

/// One announced group: the key computed from the instance's first sample,
/// plus the subscription created at announcement time.
///
/// The primary subscription is guaranteed to observe the group's first
/// sample. Dropping it unsubscribes without affecting the group itself.
#[pin_project]
pub struct GroupedStream<K, T>
where
    T: Clone + Send + Sync + 'static,
{
    key: K,
    stream: UnkeyedStream<T>,
}

impl<K, T> GroupedStream<K, T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(key: K, stream: UnkeyedStream<T>) -> Self {
        Self { key, stream }
    }

    /// The key, fixed at group creation.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn instance_handle(&self) -> InstanceHandle {
        self.stream.instance_handle()
    }

    pub fn is_cancelled(&self) -> bool {
        self.stream.is_cancelled()
    }

    /// Attach another hot subscriber to this group.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::Closed`] once the group has ended.
    pub fn subscribe(&self) -> Result<Self, SubjectError>
    where
        K: Clone,
    {
        Ok(Self {
            key: self.key.clone(),
            stream: self.stream.subscribe()?,
        })
    }

    /// Split the group into its key and its sample stream.
    pub fn into_parts(self) -> (K, UnkeyedStream<T>) {
        (self.key, self.stream)
    }

    /// Drop the key, keeping only the sample stream.
    pub fn into_unkeyed(self) -> UnkeyedStream<T> {
        self.stream
    }
}

impl<K, T> Stream for GroupedStream<K, T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = StreamItem<Sample<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(self.project().stream).poll_next(cx)
    }
}

impl<K, T> Debug for GroupedStream<K, T>
where
    K: Debug,
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupedStream")
            .field("key", &self.key)
            .field("stream", &self.stream)
            .finish()
    }
}
