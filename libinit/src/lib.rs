// Copyright 2021, The LineageOS Project
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

//! Vendor init extension for elish.
//!
//! init calls [`vendor_load_properties`] once while loading the build properties. It picks the
//! hardware variant the device booted on, writes its identity over the build defaults and sizes
//! the Dalvik heap for the installed memory. Nothing here may stop the boot: every failure is
//! logged and the device carries on with the compiled-in defaults.

pub mod dalvik_heap;
pub mod elish;
pub mod property;
pub mod utils;
pub mod variant;

use crate::dalvik_heap::set_dalvik_heap;
use crate::property::PropertyStore;
use crate::variant::{search_variant, VariantInfo, VariantOutcome};
use log::{error, info};

/// Applies the matching entry of `variants` and the Dalvik heap configuration to `props`.
pub fn load_properties(props: &mut dyn PropertyStore, variants: &[VariantInfo]) {
    match search_variant(props, variants) {
        VariantOutcome::Applied(variant) => info!("Loaded properties for {}", variant.device),
        VariantOutcome::NoMatch => info!("Keeping default build properties"),
        VariantOutcome::Failed { variant, error } => {
            error!("Failed to apply properties for {}: {error}", variant.device)
        }
    }

    if let Err(e) = set_dalvik_heap(props) {
        error!("{e:?}");
    }
}

/// Entry point called by init.
///
/// `vendor_init.h` declares it with C++ linkage, so it is exported under the mangled name of
/// `void vendor_load_properties()`.
#[cfg(target_os = "android")]
#[export_name = "_Z22vendor_load_propertiesv"]
pub extern "C" fn vendor_load_properties() {
    // logd isn't running yet. Fails only if this process already has a logger.
    let _ = kernlog::init();

    load_properties(&mut property::SystemProperties, elish::ELISH_VARIANTS);
}
