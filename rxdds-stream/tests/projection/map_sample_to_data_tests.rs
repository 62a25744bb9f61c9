// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rxdds_core::{RxDdsError, Sample, StreamItem};
use rxdds_stream::{ops, MapSampleToDataExt, PipeExt};
use rxdds_test_utils::sample_data::{reading_a, reading_b};
use rxdds_test_utils::{
    assert_stream_ended, test_channel, test_channel_with_errors, unwrap_error, unwrap_stream,
    unwrap_value, SensorReading,
};

#[tokio::test]
async fn test_map_sample_to_data_projects_payload() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut data = stream.map_sample_to_data();

    // Act
    tx.unbounded_send(reading_a(1))?;
    tx.unbounded_send(reading_b(2))?;
    drop(tx);

    // Assert
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut data, 500).await)),
        SensorReading::new("a", 1)
    );
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut data, 500).await)),
        SensorReading::new("b", 2)
    );
    assert_stream_ended(&mut data, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_map_sample_to_data_forwards_errors() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<Sample<SensorReading>>();
    let mut data = stream.pipe(ops::map_sample_to_data());

    // Act
    tx.unbounded_send(StreamItem::Error(RxDdsError::configuration_error("qos")))?;
    tx.unbounded_send(StreamItem::Value(reading_a(3)))?;

    // Assert
    assert!(matches!(
        unwrap_error(&mut data, 500).await,
        RxDdsError::ConfigurationError { .. }
    ));
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut data, 500).await)).value,
        3
    );

    Ok(())
}
