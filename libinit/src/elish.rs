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

//! Variants of the Xiaomi Pad 5 Pro.

use crate::variant::VariantInfo;

const ELISH_INFO: VariantInfo = VariantInfo {
    hwc_value: "",
    sku_value: "",

    brand: "Xiaomi",
    device: "elish",
    marketname: "Xiaomi pad 5Pro",
    model: "M2105K81AC",
    build_fingerprint: "Xiaomi/elish/elish:13/TKQ1.221013.002/V14.0.4.0.TKYCNXM:user/release-keys",
};

/// Every known elish variant, in matching order.
pub const ELISH_VARIANTS: &[VariantInfo] = &[ELISH_INFO];
