// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

/// Keyed test payload: `sensor_id` is the key field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorReading {
    pub sensor_id: String,
    pub value: i32,
}

impl SensorReading {
    #[must_use]
    pub fn new(sensor_id: impl Into<String>, value: i32) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            value,
        }
    }

    /// Key selector for grouping.
    pub fn key(reading: &Self) -> String {
        reading.sensor_id.clone()
    }
}

impl Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensorReading[{}={}]", self.sensor_id, self.value)
    }
}
