// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rxdds_core::{RxDdsError, Sample, StreamItem};
use rxdds_stream::SkipInvalidSamplesExt;
use rxdds_test_utils::sample_data::{dispose_a, metadata, reading_a, reading_b, HANDLE_B};
use rxdds_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, test_channel_with_errors,
    unwrap_error, unwrap_stream, unwrap_value, SensorReading,
};

#[tokio::test]
async fn test_skip_invalid_samples_keeps_valid_ones() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut valid = stream.skip_invalid_samples();

    // Act
    tx.unbounded_send(reading_a(1))?;
    tx.unbounded_send(metadata(HANDLE_B, SensorReading::new("b", 0)))?;
    tx.unbounded_send(dispose_a())?;
    tx.unbounded_send(reading_b(2))?;
    drop(tx);

    // Assert
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut valid, 500).await)),
        reading_a(1)
    );
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut valid, 500).await)),
        reading_b(2)
    );
    assert_stream_ended(&mut valid, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_skip_invalid_samples_only_metadata() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut valid = stream.skip_invalid_samples();

    // Act
    tx.unbounded_send(metadata(HANDLE_B, SensorReading::new("b", 0)))?;

    // Assert
    assert_no_element_emitted(&mut valid, 50).await;

    Ok(())
}

#[tokio::test]
async fn test_skip_invalid_samples_forwards_errors() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<Sample<SensorReading>>();
    let mut valid = stream.skip_invalid_samples();

    // Act
    tx.unbounded_send(StreamItem::Error(RxDdsError::stream_error("take failed")))?;
    tx.unbounded_send(StreamItem::Value(reading_a(1)))?;

    // Assert
    assert!(matches!(
        unwrap_error(&mut valid, 500).await,
        RxDdsError::StreamProcessingError { .. }
    ));
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut valid, 500).await)),
        reading_a(1)
    );

    Ok(())
}
