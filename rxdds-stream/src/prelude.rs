// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension traits and core types, for glob import.

pub use crate::do_effect::{DoEffect, DoEffectExt};
pub use crate::group_by_instance::{GroupByInstanceExt, GroupedStream, UnkeyedStream};
pub use crate::instance_state::InstanceStateExt;
pub use crate::map_sample_to_data::MapSampleToDataExt;
pub use crate::operator::{PipeExt, StreamOperator};
pub use crate::publish_and_retire::PublishAndRetireExt;
pub use crate::skip_invalid_samples::SkipInvalidSamplesExt;
pub use crate::ops;

pub use rxdds_core::{InstanceHandle, InstanceState, InstanceWriter, RxDdsError, Sample, StreamItem};
