// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use rxdds_core::{InstanceHandle, StreamItem};
use rxdds_stream::{ops, PipeExt, PublishAndRetireExt};
use rxdds_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, unwrap_stream, unwrap_value,
    RecordingWriter, WriterCall,
};
use std::sync::Arc;

const PUBLISHED: InstanceHandle = InstanceHandle::new(42);

#[tokio::test]
async fn test_publish_writes_then_retires_once() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED);
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);

    // Act
    for value in [1, 2, 3] {
        tx.unbounded_send(value)?;
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut published, 500).await)), value);
    }
    drop(tx);

    // Assert
    assert_stream_ended(&mut published, 500).await;
    assert_stream_ended(&mut published, 500).await;
    assert!(published.is_retired());
    assert_eq!(
        writer.calls(),
        vec![
            WriterCall::Write(1),
            WriterCall::Write(2),
            WriterCall::Write(3),
            WriterCall::Register(0),
            WriterCall::Dispose(PUBLISHED),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_write_happens_before_forwarding() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED);
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);

    // Act
    tx.unbounded_send(5)?;
    let forwarded = unwrap_value(Some(unwrap_stream(&mut published, 500).await));

    // Assert
    assert_eq!(forwarded, 5);
    assert_eq!(writer.writes(), vec![5]);
    assert_eq!(writer.dispose_count(), 0);
    assert_no_element_emitted(&mut published, 50).await;

    Ok(())
}

#[tokio::test]
async fn test_empty_stream_still_retires() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED);
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, -1);

    // Act
    drop(tx);

    // Assert
    assert_stream_ended(&mut published, 500).await;
    assert_eq!(
        writer.calls(),
        vec![WriterCall::Register(-1), WriterCall::Dispose(PUBLISHED)]
    );

    Ok(())
}

#[tokio::test]
async fn test_dropping_early_does_not_retire() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED);
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);
    tx.unbounded_send(1)?;
    let _ = unwrap_stream(&mut published, 500).await;

    // Act
    drop(published);

    // Assert
    assert_eq!(writer.writes(), vec![1]);
    assert_eq!(writer.register_count(), 0);
    assert_eq!(writer.dispose_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_publish_through_pipe_with_shared_writer() -> anyhow::Result<()> {
    // Arrange
    let writer = Arc::new(RecordingWriter::<i32>::new(PUBLISHED));
    let (tx, stream) = test_channel::<i32>();
    let published = stream.pipe(ops::publish_and_retire(writer.clone(), 0));

    // Act
    tx.unbounded_send(10)?;
    tx.unbounded_send(20)?;
    drop(tx);
    let values: Vec<i32> = published.map(StreamItem::unwrap).collect().await;

    // Assert
    assert_eq!(values, vec![10, 20]);
    assert_eq!(writer.writes(), vec![10, 20]);
    assert_eq!(writer.dispose_count(), 1);

    Ok(())
}
