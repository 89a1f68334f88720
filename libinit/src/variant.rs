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

//! Selection of the hardware variant the device booted on.

use crate::property::{PropertyError, PropertyStore};
use crate::utils::{fingerprint_to_description, set_ro_build_prop, set_ro_product_prop};
use log::{info, warn};

/// Hardware configuration reported by the bootloader.
pub const HWC_PROP: &str = "ro.boot.hwc";
/// Hardware SKU reported by the bootloader.
pub const SKU_PROP: &str = "ro.boot.product.hardware.sku";

const BUILD_DESCRIPTION_PROP: &str = "ro.build.description";

/// Identity of one hardware variant.
///
/// `hwc_value` and `sku_value` are matched against [`HWC_PROP`] and [`SKU_PROP`]; an empty value
/// matches anything. A table holds at most one entry with both keys empty, and it goes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantInfo {
    pub hwc_value: &'static str,
    pub sku_value: &'static str,

    pub brand: &'static str,
    pub device: &'static str,
    pub marketname: &'static str,
    pub model: &'static str,
    pub build_fingerprint: &'static str,
}

impl VariantInfo {
    /// Returns whether this variant describes hardware with the given configuration and SKU.
    pub fn matches(&self, hwc: &str, sku: &str) -> bool {
        (self.hwc_value.is_empty() || self.hwc_value == hwc)
            && (self.sku_value.is_empty() || self.sku_value == sku)
    }
}

/// Result of [`search_variant`].
#[derive(Debug)]
pub enum VariantOutcome<'a> {
    /// A variant matched and all of its properties were written.
    Applied(&'a VariantInfo),
    /// Nothing in the table matched; no property was touched.
    NoMatch,
    /// A variant matched but some of its properties could not be written.
    Failed {
        /// The matched variant.
        variant: &'a VariantInfo,
        /// The first write error.
        error: PropertyError,
    },
}

/// Finds the first variant in `variants` matching the running hardware and applies its
/// properties.
pub fn search_variant<'a>(
    props: &mut dyn PropertyStore,
    variants: &'a [VariantInfo],
) -> VariantOutcome<'a> {
    let hwc = read_signal(props, HWC_PROP);
    let sku = read_signal(props, SKU_PROP);

    let Some(variant) = variants.iter().find(|v| v.matches(&hwc, &sku)) else {
        info!("No variant for hwc {hwc:?} sku {sku:?}, keeping build defaults");
        return VariantOutcome::NoMatch;
    };

    info!("Applying variant {} ({}) for hwc {hwc:?} sku {sku:?}", variant.device, variant.model);
    match set_variant_props(props, variant) {
        Ok(()) => VariantOutcome::Applied(variant),
        Err(error) => VariantOutcome::Failed { variant, error },
    }
}

fn read_signal(props: &dyn PropertyStore, name: &str) -> String {
    props
        .get(name)
        .unwrap_or_else(|e| {
            warn!("Failed to read {name}: {e}");
            None
        })
        .unwrap_or_default()
}

/// Writes the identity of `variant` over the build defaults. Every property is attempted; the
/// first failure is returned.
pub fn set_variant_props(
    props: &mut dyn PropertyStore,
    variant: &VariantInfo,
) -> Result<(), PropertyError> {
    let results = [
        set_ro_product_prop(props, "brand", variant.brand),
        set_ro_product_prop(props, "device", variant.device),
        set_ro_product_prop(props, "marketname", variant.marketname),
        set_ro_product_prop(props, "model", variant.model),
        set_ro_build_prop(props, "fingerprint", variant.build_fingerprint),
        set_description(props, variant.build_fingerprint),
    ];
    results.into_iter().collect()
}

fn set_description(props: &mut dyn PropertyStore, fingerprint: &str) -> Result<(), PropertyError> {
    match fingerprint_to_description(fingerprint) {
        Some(description) => props.set(BUILD_DESCRIPTION_PROP, &description),
        None => {
            warn!("Can't derive a build description from {fingerprint:?}");
            Ok(())
        }
    }
}
