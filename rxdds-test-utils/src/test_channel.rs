// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use rxdds_core::StreamItem;

/// Channel whose receiving side is a stream of values.
///
/// Dropping the sender completes the stream.
pub fn test_channel<T>() -> (
    UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Unpin + Send,
)
where
    T: Send,
{
    let (tx, rx) = mpsc::unbounded();
    (tx, rx.map(StreamItem::Value))
}

/// Channel that can also inject errors into the stream.
pub fn test_channel_with_errors<T>() -> (
    UnboundedSender<StreamItem<T>>,
    UnboundedReceiver<StreamItem<T>>,
) {
    mpsc::unbounded()
}
