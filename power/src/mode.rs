// Copyright 2023, The LineageOS Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Power modes the framework can ask the power HAL to enter.

use num_derive::FromPrimitive;

/// Mirrors `android.hardware.power.Mode`. The HAL passes the raw value; values this enum doesn't
/// know about come from a newer framework and are never supported here.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(i32)]
pub enum Mode {
    DOUBLE_TAP_TO_WAKE = 0,
    LOW_POWER = 1,
    SUSTAINED_PERFORMANCE = 2,
    FIXED_PERFORMANCE = 3,
    VR = 4,
    LAUNCH = 5,
    EXPENSIVE_RENDERING = 6,
    INTERACTIVE = 7,
    DEVICE_IDLE = 8,
    DISPLAY_INACTIVE = 9,
    AUDIO_STREAMING_LOW_LATENCY = 10,
    CAMERA_STREAMING_SECURE = 11,
    CAMERA_STREAMING_LOW = 12,
    CAMERA_STREAMING_MID = 13,
    CAMERA_STREAMING_HIGH = 14,
    GAME = 15,
    GAME_LOADING = 16,
    DISPLAY_CHANGE = 17,
    AUTOMOTIVE_PROJECTION = 18,
}
