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

//! Device-specific power modes for elish.
//!
//! The power HAL asks this library about every mode before falling back to its generic handling.
//! Only double-tap-to-wake is handled here, by switching the feature in the touch controller.

pub mod mode;
pub mod touch;

use crate::mode::Mode;
use crate::touch::{TouchController, TouchFeature, XiaomiTouch};
use log::{error, info, warn};
use num_traits::FromPrimitive;

/// Result of [`set_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    /// The device applied the mode.
    Applied,
    /// The mode isn't handled by this device; nothing was touched.
    Unsupported,
    /// The mode is handled here but the device couldn't be updated.
    DeviceError,
}

impl ModeOutcome {
    /// Whether the request counts as handled by the device-specific code.
    pub fn handled(self) -> bool {
        self == ModeOutcome::Applied
    }
}

/// Returns whether `mode` is handled by the device-specific code.
pub fn is_mode_supported(mode: Mode) -> bool {
    matches!(mode, Mode::DOUBLE_TAP_TO_WAKE)
}

/// Enables or disables `mode` on the device.
pub fn set_mode(touch: &dyn TouchController, mode: Mode, enabled: bool) -> ModeOutcome {
    match mode {
        Mode::DOUBLE_TAP_TO_WAKE => {
            match touch.set_feature(TouchFeature::DoubleTap, enabled.into()) {
                Ok(()) => {
                    info!("Double tap to wake {}", if enabled { "enabled" } else { "disabled" });
                    ModeOutcome::Applied
                }
                Err(e) => {
                    error!("Failed to switch double tap to wake: {e:?}");
                    ModeOutcome::DeviceError
                }
            }
        }
        _ => ModeOutcome::Unsupported,
    }
}

/// Make sure our logging goes to logcat. It is harmless to call this more than once.
fn initialize_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_tag("power-mode")
            .with_max_level(log::LevelFilter::Info),
    );
}

// The power HAL declares both hooks as C++ functions in namespace
// `aidl::google::hardware::power::impl::pixel`, taking `aidl::android::hardware::power::Mode`
// (an `enum class : int32_t`). They are exported under those mangled names.

/// Reports whether the device handles `mode` itself.
///
/// Returns true and stores true in `supported` if it does. Otherwise returns false and leaves
/// `supported` alone so the HAL answers from its own configuration.
///
/// # Safety
///
/// `supported` must be null or valid for a write of a `bool`.
#[allow(non_snake_case)]
#[export_name = "_ZN4aidl6google8hardware5power4impl5pixel29isDeviceSpecificModeSupportedENS_7android8hardware5power4ModeEPb"]
pub unsafe extern "C" fn isDeviceSpecificModeSupported(mode: i32, supported: *mut bool) -> bool {
    initialize_logging();

    match Mode::from_i32(mode) {
        Some(mode) if is_mode_supported(mode) => {
            // SAFETY: the caller guarantees `supported` is null or valid for writes.
            if let Some(supported) = unsafe { supported.as_mut() } {
                *supported = true;
            }
            true
        }
        _ => false,
    }
}

/// Applies `mode` on the device. Returns whether it was handled here.
#[allow(non_snake_case)]
#[export_name = "_ZN4aidl6google8hardware5power4impl5pixel21setDeviceSpecificModeENS_7android8hardware5power4ModeEb"]
pub extern "C" fn setDeviceSpecificMode(mode: i32, enabled: bool) -> bool {
    initialize_logging();

    let Some(mode) = Mode::from_i32(mode) else {
        warn!("Unknown power mode {mode}");
        return false;
    };
    set_mode(&XiaomiTouch::default(), mode, enabled).handled()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// Records requests and keeps the resulting feature state, like the driver does.
    #[derive(Default)]
    struct FakeTouch {
        requests: RefCell<Vec<(TouchFeature, i32)>>,
        state: RefCell<HashMap<TouchFeature, i32>>,
        broken: bool,
    }

    impl TouchController for FakeTouch {
        fn set_feature(&self, feature: TouchFeature, value: i32) -> Result<()> {
            if self.broken {
                bail!("Failed to open touch device");
            }
            self.requests.borrow_mut().push((feature, value));
            self.state.borrow_mut().insert(feature, value);
            Ok(())
        }
    }

    fn all_modes() -> impl Iterator<Item = Mode> {
        (0..).map_while(Mode::from_i32)
    }

    #[test]
    fn only_double_tap_is_supported() {
        assert_eq!(all_modes().count(), 19);
        for mode in all_modes() {
            assert_eq!(is_mode_supported(mode), mode == Mode::DOUBLE_TAP_TO_WAKE, "{mode:?}");
        }
    }

    #[test]
    fn double_tap_sends_one_request() {
        let touch = FakeTouch::default();

        assert_eq!(set_mode(&touch, Mode::DOUBLE_TAP_TO_WAKE, true), ModeOutcome::Applied);
        assert_eq!(*touch.requests.borrow(), [(TouchFeature::DoubleTap, 1)]);

        assert_eq!(set_mode(&touch, Mode::DOUBLE_TAP_TO_WAKE, false), ModeOutcome::Applied);
        assert_eq!(
            *touch.requests.borrow(),
            [(TouchFeature::DoubleTap, 1), (TouchFeature::DoubleTap, 0)]
        );
    }

    #[test]
    fn other_modes_leave_the_device_alone() {
        let touch = FakeTouch::default();
        for mode in all_modes().filter(|m| *m != Mode::DOUBLE_TAP_TO_WAKE) {
            for enabled in [true, false] {
                let outcome = set_mode(&touch, mode, enabled);
                assert_eq!(outcome, ModeOutcome::Unsupported, "{mode:?}");
                assert!(!outcome.handled());
            }
        }
        assert!(touch.requests.borrow().is_empty());
    }

    #[test]
    fn enabling_twice_is_the_same_as_once() {
        let once = FakeTouch::default();
        set_mode(&once, Mode::DOUBLE_TAP_TO_WAKE, true);

        let twice = FakeTouch::default();
        set_mode(&twice, Mode::DOUBLE_TAP_TO_WAKE, true);
        set_mode(&twice, Mode::DOUBLE_TAP_TO_WAKE, true);

        assert_eq!(*once.state.borrow(), *twice.state.borrow());
    }

    #[test]
    fn device_failure_is_not_handled() {
        let touch = FakeTouch { broken: true, ..Default::default() };
        let outcome = set_mode(&touch, Mode::DOUBLE_TAP_TO_WAKE, true);
        assert_eq!(outcome, ModeOutcome::DeviceError);
        assert!(!outcome.handled());

        let dir = tempdir().unwrap();
        let missing = XiaomiTouch::new(dir.path().join("xiaomi-touch"));
        assert_eq!(set_mode(&missing, Mode::DOUBLE_TAP_TO_WAKE, false), ModeOutcome::DeviceError);
    }

    #[test]
    fn supported_query_through_c_entry_point() {
        let mut supported = false;
        // SAFETY: `supported` is a valid local.
        assert!(unsafe { isDeviceSpecificModeSupported(0, &mut supported) });
        assert!(supported);

        for raw in [1, 7, 18, 19, -1] {
            let mut supported = false;
            // SAFETY: `supported` is a valid local.
            assert!(!unsafe { isDeviceSpecificModeSupported(raw, &mut supported) }, "{raw}");
            assert!(!supported);
        }

        // SAFETY: null is explicitly allowed.
        assert!(unsafe { isDeviceSpecificModeSupported(0, std::ptr::null_mut()) });
    }

    extern "C" {
        #[link_name = "_ZN4aidl6google8hardware5power4impl5pixel29isDeviceSpecificModeSupportedENS_7android8hardware5power4ModeEPb"]
        fn hal_is_device_specific_mode_supported(mode: i32, supported: *mut bool) -> bool;
        #[link_name = "_ZN4aidl6google8hardware5power4impl5pixel21setDeviceSpecificModeENS_7android8hardware5power4ModeEb"]
        fn hal_set_device_specific_mode(mode: i32, enabled: bool) -> bool;
    }

    #[test]
    fn entry_points_link_under_power_hal_names() {
        let mut supported = false;
        // SAFETY: resolves to `isDeviceSpecificModeSupported`; `supported` is a valid local.
        assert!(unsafe { hal_is_device_specific_mode_supported(0, &mut supported) });
        assert!(supported);

        // SAFETY: resolves to `setDeviceSpecificMode`, which only takes plain values.
        assert!(!unsafe { hal_set_device_specific_mode(Mode::GAME as i32, true) });
    }

    #[test]
    fn unhandled_modes_through_c_entry_point() {
        assert!(!setDeviceSpecificMode(Mode::LOW_POWER as i32, true));
        assert!(!setDeviceSpecificMode(Mode::INTERACTIVE as i32, false));
        assert!(!setDeviceSpecificMode(42, true));
    }
}
