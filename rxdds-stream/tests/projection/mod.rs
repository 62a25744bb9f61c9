// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod map_sample_to_data_tests;
pub mod skip_invalid_samples_tests;
pub mod unkey_tests;
