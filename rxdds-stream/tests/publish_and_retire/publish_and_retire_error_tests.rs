// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rxdds_core::{InstanceHandle, RxDdsError, StreamItem};
use rxdds_stream::PublishAndRetireExt;
use rxdds_test_utils::{
    assert_stream_ended, test_channel, test_channel_with_errors, unwrap_error, unwrap_stream,
    unwrap_value, RecordingWriter, WriterCall,
};

const PUBLISHED: InstanceHandle = InstanceHandle::new(7);

#[tokio::test]
async fn test_write_failure_retires_and_ends() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED).failing_write(2);
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);

    // Act
    tx.unbounded_send(1)?;
    tx.unbounded_send(2)?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut published, 500).await)), 1);
    let error = unwrap_error(&mut published, 500).await;
    assert!(matches!(error, RxDdsError::WriteFailure(_)));
    assert!(error.to_string().contains("injected write failure"));
    assert_stream_ended(&mut published, 500).await;

    assert!(
        tx.unbounded_send(3).is_err(),
        "upstream should be dropped after a write failure"
    );
    assert_eq!(writer.writes(), vec![1, 2]);
    assert_eq!(writer.dispose_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_write_failure_survives_failed_retirement() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED)
        .failing_write(1)
        .failing_dispose();
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);

    // Act
    tx.unbounded_send(1)?;

    // Assert
    assert!(matches!(
        unwrap_error(&mut published, 500).await,
        RxDdsError::WriteFailure(_)
    ));
    assert_stream_ended(&mut published, 500).await;
    assert_eq!(
        writer.calls(),
        vec![
            WriterCall::Write(1),
            WriterCall::Register(0),
            WriterCall::Dispose(PUBLISHED),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_dispose_failure_on_completion() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED).failing_dispose();
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);

    // Act
    tx.unbounded_send(1)?;
    drop(tx);

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut published, 500).await)), 1);
    let error = unwrap_error(&mut published, 500).await;
    assert!(matches!(error, RxDdsError::RetireFailure(_)));
    assert!(error.to_string().contains("injected dispose failure"));
    assert_stream_ended(&mut published, 500).await;
    assert_eq!(writer.dispose_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_register_failure_on_completion() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED).failing_register();
    let (tx, stream) = test_channel::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);

    // Act
    drop(tx);

    // Assert
    assert!(matches!(
        unwrap_error(&mut published, 500).await,
        RxDdsError::RetireFailure(_)
    ));
    assert_stream_ended(&mut published, 500).await;
    assert_eq!(writer.register_count(), 1);
    assert_eq!(writer.dispose_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_upstream_error_forwarded_without_retiring() -> anyhow::Result<()> {
    // Arrange
    let writer = RecordingWriter::<i32>::new(PUBLISHED);
    let (tx, stream) = test_channel_with_errors::<i32>();
    let mut published = stream.publish_and_retire(&writer, 0);

    // Act
    tx.unbounded_send(StreamItem::Error(RxDdsError::stream_error("source failed")))?;
    tx.unbounded_send(StreamItem::Value(4))?;

    // Assert
    assert!(matches!(
        unwrap_error(&mut published, 500).await,
        RxDdsError::StreamProcessingError { .. }
    ));
    assert_eq!(writer.dispose_count(), 0);
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut published, 500).await)), 4);
    assert_eq!(writer.writes(), vec![4]);

    Ok(())
}
