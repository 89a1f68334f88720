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

//! Access to the Xiaomi touch controller driver.

use anyhow::{Context, Result};
use libc::c_int;
use std::fs::OpenOptions;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// Character device exposed by the touch driver.
pub const TOUCH_DEV_PATH: &str = "/dev/xiaomi-touch";

const TOUCH_MAGIC: u32 = 0x5400;
const SET_CUR_VALUE: u32 = 0;
/// Sets the current value of a touch feature. Takes `[feature, value]` as two C ints.
pub const TOUCH_IOC_SETMODE: u32 = TOUCH_MAGIC + SET_CUR_VALUE;

// The driver doesn't encode direction or size in its request numbers, thus *_bad.
nix::ioctl_write_ptr_bad!(_touch_ioc_setmode, TOUCH_IOC_SETMODE, [c_int; 2]);

/// Touch controller features switched through [`TOUCH_IOC_SETMODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TouchFeature {
    DoubleTap = 14,
}

/// Something that can switch touch controller features.
pub trait TouchController {
    /// Sets `feature` to `value`. Setting the same value again is harmless.
    fn set_feature(&self, feature: TouchFeature, value: i32) -> Result<()>;
}

/// The touch driver behind a device node. The node is opened for every request and closed
/// again before returning.
#[derive(Debug, Clone)]
pub struct XiaomiTouch {
    path: PathBuf,
}

impl XiaomiTouch {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl Default for XiaomiTouch {
    fn default() -> Self {
        Self::new(TOUCH_DEV_PATH)
    }
}

/// Payload of [`TOUCH_IOC_SETMODE`]: the feature followed by its new value.
fn request(feature: TouchFeature, value: i32) -> [c_int; 2] {
    [feature as c_int, value]
}

impl TouchController for XiaomiTouch {
    fn set_feature(&self, feature: TouchFeature, value: i32) -> Result<()> {
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {:?}", self.path))?;
        let arg = request(feature, value);
        // SAFETY: the driver only reads the two ints behind `arg`, which outlives the call. It
        // changes the state of the touch controller, not of this process.
        unsafe { _touch_ioc_setmode(device.as_raw_fd(), &arg) }
            .with_context(|| format!("TOUCH_IOC_SETMODE {feature:?}={value} failed"))?;
        Ok(())
    }
}
