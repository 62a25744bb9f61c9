// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rxdds_core::Sample;
use rxdds_stream::{ops, GroupByInstanceExt, PipeExt, UnkeyedStream};
use rxdds_test_utils::sample_data::{dispose_a, reading_a, HANDLE_A};
use rxdds_test_utils::{
    assert_stream_ended, test_channel, unwrap_stream, unwrap_value, SensorReading,
};

fn consume_plain(stream: UnkeyedStream<SensorReading>) -> UnkeyedStream<SensorReading> {
    stream
}

#[tokio::test]
async fn test_unkeyed_group_keeps_samples_and_completion() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut groups = stream.group_by_instance(SensorReading::key);

    tx.unbounded_send(reading_a(1))?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));

    // Act
    let mut plain = consume_plain(group.pipe(ops::to_unkeyed()));
    tx.unbounded_send(reading_a(2))?;
    tx.unbounded_send(dispose_a())?;
    drop(tx);
    assert_stream_ended(&mut groups, 500).await;

    // Assert
    assert_eq!(plain.instance_handle(), HANDLE_A);
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut plain, 500).await)),
        reading_a(1)
    );
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut plain, 500).await)),
        reading_a(2)
    );
    assert_stream_ended(&mut plain, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_into_parts_splits_key_and_stream() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut groups = stream.group_by_instance(SensorReading::key);
    tx.unbounded_send(reading_a(7))?;

    // Act
    let (key, mut plain) = unwrap_value(Some(unwrap_stream(&mut groups, 500).await)).into_parts();

    // Assert
    assert_eq!(key, "a");
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut plain, 500).await)),
        reading_a(7)
    );

    Ok(())
}
