// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::sensor_reading::SensorReading;
use rxdds_core::{InstanceHandle, InstanceState, Sample};

pub const HANDLE_A: InstanceHandle = InstanceHandle::new(0xA);
pub const HANDLE_B: InstanceHandle = InstanceHandle::new(0xB);
pub const HANDLE_C: InstanceHandle = InstanceHandle::new(0xC);

pub fn alive<T>(handle: InstanceHandle, data: T) -> Sample<T> {
    Sample::alive(handle, data)
}

pub fn disposed<T>(handle: InstanceHandle, data: T) -> Sample<T> {
    Sample::disposed(handle, data)
}

pub fn no_writers<T>(handle: InstanceHandle, data: T) -> Sample<T> {
    Sample::no_writers(handle, data)
}

/// Metadata-only sample in the alive state.
pub fn metadata<T>(handle: InstanceHandle, data: T) -> Sample<T> {
    Sample::metadata(handle, InstanceState::Alive, data)
}

pub fn reading_a(value: i32) -> Sample<SensorReading> {
    alive(HANDLE_A, SensorReading::new("a", value))
}

pub fn reading_b(value: i32) -> Sample<SensorReading> {
    alive(HANDLE_B, SensorReading::new("b", value))
}

pub fn reading_c(value: i32) -> Sample<SensorReading> {
    alive(HANDLE_C, SensorReading::new("c", value))
}

/// Disposal sample as delivered by the substrate: key fields only.
pub fn dispose_a() -> Sample<SensorReading> {
    disposed(HANDLE_A, SensorReading::new("a", 0))
}

pub fn dispose_b() -> Sample<SensorReading> {
    disposed(HANDLE_B, SensorReading::new("b", 0))
}

pub fn dispose_c() -> Sample<SensorReading> {
    disposed(HANDLE_C, SensorReading::new("c", 0))
}
