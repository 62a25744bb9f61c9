// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rxdds_core::{InstanceHandle, InstanceWriter};

/// One call received by a [`RecordingWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterCall<T> {
    Write(T),
    Register(T),
    Dispose(InstanceHandle),
}

/// Error injected by a [`RecordingWriter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("injected {operation} failure")]
pub struct InjectedFailure {
    pub operation: &'static str,
}

#[derive(Debug, Default)]
struct Failures {
    write_at: Option<usize>,
    register: bool,
    dispose: bool,
}

/// In-memory [`InstanceWriter`] that records every call, in order, and fails
/// on demand.
///
/// Failed calls are recorded too.
#[derive(Debug)]
pub struct RecordingWriter<T> {
    handle: InstanceHandle,
    calls: Mutex<Vec<WriterCall<T>>>,
    failures: Mutex<Failures>,
}

impl<T: Clone> RecordingWriter<T> {
    /// Writer that registers every instance as `handle`.
    pub fn new(handle: InstanceHandle) -> Self {
        Self {
            handle,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Failures::default()),
        }
    }

    /// Fail the `nth` write (1-based). Later writes succeed again.
    #[must_use]
    pub fn failing_write(self, nth: usize) -> Self {
        self.failures.lock().write_at = Some(nth);
        self
    }

    #[must_use]
    pub fn failing_register(self) -> Self {
        self.failures.lock().register = true;
        self
    }

    #[must_use]
    pub fn failing_dispose(self) -> Self {
        self.failures.lock().dispose = true;
        self
    }

    pub fn calls(&self) -> Vec<WriterCall<T>> {
        self.calls.lock().clone()
    }

    /// Values passed to `write`, including the one that failed.
    pub fn writes(&self) -> Vec<T> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                WriterCall::Write(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn dispose_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, WriterCall::Dispose(_)))
            .count()
    }

    pub fn register_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, WriterCall::Register(_)))
            .count()
    }

    fn record(&self, call: WriterCall<T>) {
        self.calls.lock().push(call);
    }
}

impl<T: Clone> InstanceWriter<T> for RecordingWriter<T> {
    type Error = InjectedFailure;

    fn write(&self, value: &T) -> Result<(), Self::Error> {
        self.record(WriterCall::Write(value.clone()));
        let nth = self.writes().len();
        if self.failures.lock().write_at == Some(nth) {
            return Err(InjectedFailure { operation: "write" });
        }
        Ok(())
    }

    fn register_instance(&self, template: &T) -> Result<InstanceHandle, Self::Error> {
        self.record(WriterCall::Register(template.clone()));
        if self.failures.lock().register {
            return Err(InjectedFailure {
                operation: "register",
            });
        }
        Ok(self.handle)
    }

    fn dispose_instance(&self, handle: InstanceHandle) -> Result<(), Self::Error> {
        self.record(WriterCall::Dispose(handle));
        if self.failures.lock().dispose {
            return Err(InjectedFailure {
                operation: "dispose",
            });
        }
        Ok(())
    }
}
