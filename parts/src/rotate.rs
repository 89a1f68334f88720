// Copyright 2020, The LineageOS Project
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

//! Screen rotation policy setting.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// System setting holding the policy.
pub const SETTING_ROTATE_POLICY: &str = "aragaki.rotate.policy";

/// How the screen orientation is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotatePolicy {
    #[default]
    Default,
    Lock,
    Restore,
}

/// The stored value isn't one of the known policies.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid rotate policy {0:?}")]
pub struct InvalidRotatePolicy(pub String);

impl RotatePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RotatePolicy::Default => "0",
            RotatePolicy::Lock => "1",
            RotatePolicy::Restore => "2",
        }
    }

    /// Reads the stored setting. Missing or unknown values mean [`RotatePolicy::Default`].
    pub fn from_setting(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for RotatePolicy {
    type Err = InvalidRotatePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(RotatePolicy::Default),
            "1" => Ok(RotatePolicy::Lock),
            "2" => Ok(RotatePolicy::Restore),
            _ => Err(InvalidRotatePolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for RotatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
