// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the rxdds workspace.
//!
//! Designed for use in tests and benchmarks only.
//!
//! - [`test_channel`] / [`test_channel_with_errors`]: push values (or errors)
//!   into a stream imperatively; dropping the sender completes it.
//! - [`helpers`]: timed assertions on streams.
//! - [`sample_data`]: sample constructors and [`SensorReading`] fixtures for
//!   three instances, `a`, `b` and `c`.
//! - [`RecordingWriter`]: an [`InstanceWriter`](rxdds_core::InstanceWriter)
//!   that records its calls and fails on demand.
//!
//! ```rust
//! use rxdds_test_utils::sample_data::{reading_a, HANDLE_A};
//!
//! let sample = reading_a(7);
//! assert_eq!(sample.instance_handle(), HANDLE_A);
//! assert_eq!(sample.data().sensor_id, "a");
//! ```

pub mod helpers;
pub mod recording_writer;
pub mod sample_data;
pub mod sensor_reading;
pub mod test_channel;

pub use self::helpers::{
    assert_no_element_emitted, assert_stream_ended, unwrap_error, unwrap_stream, unwrap_value,
};
pub use self::recording_writer::{InjectedFailure, RecordingWriter, WriterCall};
pub use self::sensor_reading::SensorReading;
pub use self::test_channel::{test_channel, test_channel_with_errors};
