// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rxdds_core::{InstanceState, Sample};
use rxdds_stream::{ops, InstanceStateExt, InstanceStateInterpreter, PipeExt};
use rxdds_test_utils::sample_data::{dispose_a, no_writers, reading_a, HANDLE_A};
use rxdds_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, unwrap_stream, unwrap_value,
    SensorReading,
};

#[tokio::test]
async fn test_complete_on_dispose_forwards_until_disposal() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut filtered = stream.complete_on_dispose();

    // Act
    tx.unbounded_send(reading_a(1))?;
    tx.unbounded_send(reading_a(2))?;
    tx.unbounded_send(dispose_a())?;

    // Assert
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        reading_a(1)
    );
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        reading_a(2)
    );
    assert_stream_ended(&mut filtered, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_complete_on_dispose_drops_upstream() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut filtered = stream.complete_on_dispose();

    // Act
    tx.unbounded_send(dispose_a())?;
    assert_stream_ended(&mut filtered, 500).await;

    // Assert
    assert!(tx.unbounded_send(reading_a(3)).is_err());
    assert_stream_ended(&mut filtered, 100).await;

    Ok(())
}

#[tokio::test]
async fn test_complete_on_dispose_ignores_no_writers() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut filtered = stream.complete_on_dispose();
    let lost = no_writers(HANDLE_A, SensorReading::new("a", 0));

    // Act
    tx.unbounded_send(lost.clone())?;

    // Assert
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        lost
    );
    assert_no_element_emitted(&mut filtered, 50).await;

    Ok(())
}

#[tokio::test]
async fn test_error_on_no_writers_ignores_disposal() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut filtered = stream.error_on_no_writers();

    // Act
    tx.unbounded_send(dispose_a())?;
    tx.unbounded_send(reading_a(1))?;

    // Assert
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        dispose_a()
    );
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        reading_a(1)
    );

    Ok(())
}

#[tokio::test]
async fn test_upstream_completion_is_forwarded() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut filtered = stream.pipe(ops::error_on_no_writers());

    // Act
    tx.unbounded_send(reading_a(1))?;
    drop(tx);

    // Assert
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        reading_a(1)
    );
    assert_stream_ended(&mut filtered, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_interpreter_built_from_state_behaves_like_factory() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let interpreter = InstanceStateInterpreter::new(InstanceState::NotAliveDisposed)?;
    let mut filtered = stream.pipe(interpreter);

    // Act
    tx.unbounded_send(reading_a(5))?;
    tx.unbounded_send(dispose_a())?;

    // Assert
    assert_eq!(interpreter, ops::complete_on_dispose());
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        reading_a(5)
    );
    assert_stream_ended(&mut filtered, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_stacked_filters_each_keep_their_state() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<Sample<SensorReading>>();
    let mut filtered = stream
        .pipe(ops::error_on_no_writers())
        .pipe(ops::complete_on_dispose());

    // Act
    tx.unbounded_send(reading_a(1))?;
    tx.unbounded_send(dispose_a())?;
    tx.unbounded_send(no_writers(HANDLE_A, SensorReading::new("a", 0)))?;

    // Assert
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut filtered, 500).await)),
        reading_a(1)
    );
    assert_stream_ended(&mut filtered, 500).await;

    Ok(())
}
