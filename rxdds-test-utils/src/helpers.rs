// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{Stream, StreamExt};
use rxdds_core::StreamItem;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Wait for the next item, panicking if the stream ends or stays silent
/// for `timeout_ms`.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected an item, but the stream ended"),
        Err(_) => panic!("Expected an item within {timeout_ms}ms, got nothing"),
    }
}

/// Extract the value of a stream item, panicking on errors and on completion.
pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(error)) => panic!("Expected a value, got error: {error}"),
        None => panic!("Expected a value, but the stream ended"),
    }
}

/// Wait for the next item and return its error, panicking otherwise.
pub async fn unwrap_error<S, T>(stream: &mut S, timeout_ms: u64) -> rxdds_core::RxDdsError
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match unwrap_stream(stream, timeout_ms).await {
        StreamItem::Error(error) => error,
        StreamItem::Value(_) => panic!("Expected an error, got a value"),
    }
}

/// Poll `stream` for `timeout_ms` and panic if it yields anything, including
/// completion.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            let outcome = if item.is_some() { "an element" } else { "completion" };
            panic!("Unexpected {outcome} emitted, expected no output.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Assert that the stream completes within `timeout_ms` without emitting.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected the stream to end, got another element"),
        Err(_) => panic!("Expected the stream to end within {timeout_ms}ms"),
    }
}
