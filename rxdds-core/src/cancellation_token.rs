// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hierarchical, runtime-agnostic cancellation token.
//!
//! A token owns any number of child tokens. Cancelling a token cancels every
//! descendant exactly once; cancelling a child never reaches its parent.
//! Cancellation is idempotent: only the first `cancel()` has an effect.
//!
//! A parent only tracks its children weakly: a child dropped by every holder
//! is forgotten, while a live child keeps its ancestors alive.

use event_listener::{Event, EventListener};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

/// Cloneable handle to a shared cancellation state.
///
/// # Example
///
/// ```
/// use rxdds_core::CancellationToken;
///
/// let parent = CancellationToken::new();
/// let child = parent.child_token();
///
/// parent.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
    children: Mutex<Vec<Weak<Inner>>>,
    _parent: Option<Arc<Inner>>,
}

impl CancellationToken {
    /// Create a new, uncancelled root token.
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    fn with_parent(parent: Option<Arc<Inner>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
                children: Mutex::new(Vec::new()),
                _parent: parent,
            }),
        }
    }

    /// Create a token that is cancelled whenever `self` is cancelled.
    ///
    /// A child created from an already cancelled token is born cancelled.
    pub fn child_token(&self) -> CancellationToken {
        let child = CancellationToken::with_parent(Some(self.inner.clone()));
        let mut children = self.inner.children.lock();

        // Checked under the lock: `cancel` takes the children only after the flag is set.
        if self.is_cancelled() {
            drop(children);
            child.cancel();
            return child;
        }

        prune(&mut children);
        children.push(Arc::downgrade(&child.inner));
        child
    }

    /// Number of children still held somewhere and not yet cancelled.
    pub fn child_count(&self) -> usize {
        let mut children = self.inner.children.lock();
        prune(&mut children);
        children.len()
    }

    /// Cancel this token and all of its descendants, waking every waiter.
    ///
    /// Returns `true` if this call performed the cancellation, `false` if the
    /// token had already been cancelled.
    pub fn cancel(&self) -> bool {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.inner.event.notify(usize::MAX);

        let children = core::mem::take(&mut *self.inner.children.lock());
        trace!("cancellation token cancelled, propagating to {} children", children.len());
        for inner in children.iter().filter_map(Weak::upgrade) {
            CancellationToken { inner }.cancel();
        }
        true
    }

    /// Check if the token has been cancelled (non-blocking).
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait asynchronously until the token is cancelled.
    ///
    /// If the token is already cancelled, this returns immediately.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }

    /// Like [`cancelled`](Self::cancelled), but the future owns a clone of
    /// the token so it can be stored next to it.
    pub fn cancelled_owned(self) -> CancelledOwned {
        CancelledOwned {
            token: self,
            listener: None,
        }
    }

    /// Returns a guard that cancels this token when dropped.
    pub fn drop_guard(self) -> DropGuard {
        DropGuard { token: Some(self) }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

fn prune(children: &mut Vec<Weak<Inner>>) {
    children.retain(|child| {
        child
            .upgrade()
            .is_some_and(|inner| !inner.cancelled.load(Ordering::Acquire))
    });
}

fn poll_cancelled(
    token: &CancellationToken,
    listener: &mut Option<EventListener>,
    cx: &mut Context<'_>,
) -> Poll<()> {
    loop {
        if token.is_cancelled() {
            return Poll::Ready(());
        }

        match listener.as_mut() {
            None => {
                // Re-checked on the next iteration, after the listener is registered.
                *listener = Some(token.inner.event.listen());
            }
            Some(registered) => {
                if Pin::new(registered).poll(cx).is_pending() {
                    return Poll::Pending;
                }
                *listener = None;
            }
        }
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        poll_cancelled(this.token, &mut this.listener, cx)
    }
}

/// Future returned by [`CancellationToken::cancelled_owned()`].
pub struct CancelledOwned {
    token: CancellationToken,
    listener: Option<EventListener>,
}

impl CancelledOwned {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Future for CancelledOwned {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        poll_cancelled(&this.token, &mut this.listener, cx)
    }
}

impl core::fmt::Debug for CancelledOwned {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CancelledOwned")
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

/// Cancels the wrapped token on drop unless [`disarm`](DropGuard::disarm)ed.
#[derive(Debug)]
pub struct DropGuard {
    token: Option<CancellationToken>,
}

impl DropGuard {
    /// Give the token back without cancelling it.
    pub fn disarm(mut self) -> CancellationToken {
        self.token.take().unwrap_or_default()
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}
