// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::grouped_stream::{GroupedStream, UnkeyedStream, UpstreamDriver};
use core::fmt::{self, Debug};
use core::future::Future;
use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use futures::task::{waker, ArcWake};
use futures::Stream;
use parking_lot::Mutex;
use rxdds_core::{
    CancellationToken, CancelledOwned, InstanceHandle, InstanceState, RxDdsError, RxDdsSubject,
    Sample, StreamItem,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};

/// Live groups indexed by instance handle.
///
/// The only authoritative record of which instances are open. Entries are
/// removed by disposal alone; unsubscribing consumers never touch it.
pub(crate) struct GroupArena<T>
where
    T: Clone + Send + Sync + 'static,
{
    groups: HashMap<InstanceHandle, RxDdsSubject<Sample<T>>>,
}

impl<T> GroupArena<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.groups.len()
    }

    fn get(&self, handle: &InstanceHandle) -> Option<&RxDdsSubject<Sample<T>>> {
        self.groups.get(handle)
    }

    fn open(&mut self, handle: InstanceHandle) -> &RxDdsSubject<Sample<T>> {
        self.groups.entry(handle).or_default()
    }

    /// Complete one group. Returns `false` if the handle was never opened.
    fn complete(&mut self, handle: &InstanceHandle) -> bool {
        match self.groups.remove(handle) {
            Some(subject) => {
                subject.close();
                true
            }
            None => false,
        }
    }

    fn close_all(&mut self) {
        for (_, subject) in self.groups.drain() {
            subject.close();
        }
    }
}

impl<T> Drop for GroupArena<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if !self.groups.is_empty() {
            trace!("closing {} groups left open", self.groups.len());
        }
        self.close_all();
    }
}

/// Every task currently waiting on the shared upstream.
///
/// The upstream is polled with a waker built from this set, so whichever
/// consumer drove it last, all of them are woken when it becomes ready.
#[derive(Default)]
struct WakerSet {
    wakers: Mutex<Vec<Waker>>,
}

impl WakerSet {
    fn register(&self, waker: &Waker) {
        let mut wakers = self.wakers.lock();
        if !wakers.iter().any(|registered| registered.will_wake(waker)) {
            wakers.push(waker.clone());
        }
    }

    fn wake_all(&self) {
        let wakers = core::mem::take(&mut *self.wakers.lock());
        for waker in wakers {
            waker.wake();
        }
    }
}

impl ArcWake for WakerSet {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.wake_all();
    }
}

/// State shared by the shared output and every group it announced.
struct Shared<S, K, T, F>
where
    T: Clone + Send + Sync + 'static,
{
    upstream: Option<Pin<Box<S>>>,
    key_selector: F,
    arena: GroupArena<T>,
    pending: VecDeque<StreamItem<GroupedStream<K, T>>>,
    token: CancellationToken,
    waiters: Arc<WakerSet>,
    upstream_waker: Waker,
    driver: Weak<dyn UpstreamDriver>,
}

impl<S, K, T, F> Shared<S, K, T, F>
where
    T: Clone + Send + Sync + 'static,
{
    /// Drop the upstream and end every group. Undelivered announcements are
    /// discarded, undelivered errors are kept.
    fn shut_down(&mut self) {
        if self.upstream.take().is_some() {
            debug!("grouping ended, closing {} groups", self.arena.len());
        }
        self.arena.close_all();
        self.pending.retain(StreamItem::is_error);
    }

    fn fail(&mut self, error: RxDdsError) {
        self.token.cancel();
        self.shut_down();
        self.pending.push_back(StreamItem::Error(error));
        self.waiters.wake_all();
    }
}

impl<S, K, T, F, R> Shared<S, K, T, F>
where
    S: Stream<Item = StreamItem<Sample<T>>>,
    T: Clone + Send + Sync + 'static,
    F: FnMut(&T) -> R,
    R: Into<K>,
{
    /// Pull and route at most one upstream item.
    ///
    /// `Ready` once an item was handled or the upstream is gone; `Pending`
    /// with `cx`'s waker registered otherwise.
    fn pull(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        if self.token.is_cancelled() {
            self.shut_down();
            return Poll::Ready(());
        }

        let Some(upstream) = self.upstream.as_mut() else {
            return Poll::Ready(());
        };

        self.waiters.register(cx.waker());
        let mut upstream_cx = Context::from_waker(&self.upstream_waker);

        match upstream.as_mut().poll_next(&mut upstream_cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(StreamItem::Value(sample))) => {
                self.route(sample);
                Poll::Ready(())
            }
            Poll::Ready(Some(StreamItem::Error(error))) => {
                warn!("upstream error, ending {} groups: {}", self.arena.len(), error);
                self.fail(error);
                Poll::Ready(())
            }
            Poll::Ready(None) => {
                debug!("upstream completed with {} groups open", self.arena.len());
                self.upstream = None;
                self.waiters.wake_all();
                Poll::Ready(())
            }
        }
    }

    fn route(&mut self, sample: Sample<T>) {
        let handle = sample.instance_handle();

        if sample.instance_state() == InstanceState::NotAliveDisposed {
            if self.arena.complete(&handle) {
                debug!("instance {} disposed, group completed", handle);
                return;
            }

            error!("disposal of unknown instance {}", handle);
            self.fail(RxDdsError::UnexpectedInstanceState {
                handle,
                state: InstanceState::NotAliveDisposed,
            });
            return;
        }

        if let Some(subject) = self.arena.get(&handle) {
            if let Err(error) = subject.next(sample) {
                trace!("instance {} sample not delivered: {}", handle, error);
            }
            return;
        }

        if !sample.is_valid() {
            trace!("dropping metadata sample for unknown instance {}", handle);
            return;
        }

        let key: K = (self.key_selector)(sample.data()).into();
        let subject = self.arena.open(handle);
        let stream = UnkeyedStream::attach(
            handle,
            subject,
            self.token.child_token(),
            self.driver.clone(),
        )
        .unwrap_or_else(|_| unreachable!("fresh subject should allow subscription"));
        if let Err(error) = subject.next(sample) {
            trace!("instance {} first sample not delivered: {}", handle, error);
        }
        debug!("instance {} announced as a new group", handle);

        self.pending
            .push_back(StreamItem::Value(GroupedStream::new(key, stream)));
        self.waiters.wake_all();
    }
}

impl<S, K, T, F, R> UpstreamDriver for Mutex<Shared<S, K, T, F>>
where
    S: Stream<Item = StreamItem<Sample<T>>> + Send,
    K: Send,
    T: Clone + Send + Sync + 'static,
    F: FnMut(&T) -> R + Send,
    R: Into<K>,
{
    fn drive(&self, cx: &mut Context<'_>) -> Poll<bool> {
        let mut shared = self.lock();
        if shared.upstream.is_none() {
            return Poll::Ready(false);
        }
        shared.pull(cx).map(|()| true)
    }
}

/// Shared output of the grouping operator.
///
/// Yields one [`GroupedStream`] per instance, in order of first appearance.
///
/// The upstream is pulled by whichever consumer needs data: polling this
/// stream, or polling a group whose buffer is empty. Samples for other
/// groups are buffered in those groups, and instances discovered while a
/// group is being polled are queued here. Groups can therefore be consumed
/// one after the other, or concurrently from separate tasks.
///
/// Dropping this value ends every group once its buffered samples are drained.
pub struct InstanceGroups<S, K, T, F>
where
    T: Clone + Send + Sync + 'static,
{
    shared: Arc<Mutex<Shared<S, K, T, F>>>,
    cancelled: CancelledOwned,
    ended: bool,
    _key: PhantomData<fn() -> K>,
}

impl<S, K, T, F> InstanceGroups<S, K, T, F>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new<R>(upstream: S, key_selector: F) -> Self
    where
        S: Stream<Item = StreamItem<Sample<T>>> + Send + 'static,
        K: Send + 'static,
        F: FnMut(&T) -> R + Send + 'static,
        R: Into<K>,
    {
        let token = CancellationToken::new();
        let waiters = Arc::new(WakerSet::default());
        let upstream_waker = waker(waiters.clone());

        let shared = Arc::new_cyclic(|this: &Weak<Mutex<Shared<S, K, T, F>>>| {
            let driver: Weak<dyn UpstreamDriver> = this.clone();
            Mutex::new(Shared {
                upstream: Some(Box::pin(upstream)),
                key_selector,
                arena: GroupArena::new(),
                pending: VecDeque::new(),
                token: token.clone(),
                waiters,
                upstream_waker,
                driver,
            })
        });

        Self {
            shared,
            cancelled: token.cancelled_owned(),
            ended: false,
            _key: PhantomData,
        }
    }

    /// Token whose cancellation ends every group and the shared output.
    ///
    /// Each group holds a child of this token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancelled.token().clone()
    }

    /// Number of groups announced and not yet disposed.
    pub fn live_groups(&self) -> usize {
        self.shared.lock().arena.len()
    }
}

impl<S, K, T, F> Debug for InstanceGroups<S, K, T, F>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("InstanceGroups")
            .field("live_groups", &shared.arena.len())
            .field("queued", &shared.pending.len())
            .field("cancelled", &shared.token.is_cancelled())
            .field("upstream_done", &shared.upstream.is_none())
            .finish()
    }
}

impl<S, K, T, F, R> Stream for InstanceGroups<S, K, T, F>
where
    S: Stream<Item = StreamItem<Sample<T>>>,
    T: Clone + Send + Sync + 'static,
    F: FnMut(&T) -> R,
    R: Into<K>,
{
    type Item = StreamItem<GroupedStream<K, T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.ended {
            return Poll::Ready(None);
        }

        let cancelled = Pin::new(&mut this.cancelled).poll(cx).is_ready();
        let mut shared = this.shared.lock();
        if cancelled {
            shared.shut_down();
        }

        loop {
            if let Some(item) = shared.pending.pop_front() {
                return Poll::Ready(Some(item));
            }

            if shared.upstream.is_none() {
                this.ended = true;
                return Poll::Ready(None);
            }

            if shared.pull(cx).is_pending() {
                return Poll::Pending;
            }
        }
    }
}
