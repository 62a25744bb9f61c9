// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Unkey operator: hands a group's samples to code that wants a plain stream.

use crate::group_by_instance::{GroupedStream, UnkeyedStream};
use crate::operator::StreamOperator;

/// Operator that discards a group's key and keeps its sample stream.
///
/// Samples, errors and completion are forwarded untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unkey;

impl<K, T> StreamOperator<GroupedStream<K, T>> for Unkey
where
    T: Clone + Send + Sync + 'static,
{
    type Output = UnkeyedStream<T>;

    fn apply(self, upstream: GroupedStream<K, T>) -> Self::Output {
        upstream.into_unkeyed()
    }
}
