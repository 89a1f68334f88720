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

//! Helpers for overriding the build identity properties.

use crate::property::{PropertyError, PropertyStore};
use log::warn;

/// Partitions that may carry their own copy of a build property, in the order init loads them.
/// The empty source stands for the unprefixed property.
pub const RO_PROPS_DEFAULT_SOURCE_ORDER: [&str; 9] = [
    "",
    "bootimage.",
    "odm.",
    "product.",
    "system.",
    "system_ext.",
    "vendor.",
    "vendor_dlkm.",
    "odm_dlkm.",
];

/// Overrides `ro.product.<source><prop>` for every source partition.
pub fn set_ro_product_prop(
    props: &mut dyn PropertyStore,
    prop: &str,
    value: &str,
) -> Result<(), PropertyError> {
    let names =
        RO_PROPS_DEFAULT_SOURCE_ORDER.iter().map(|source| format!("ro.product.{source}{prop}"));
    override_each(props, names, value)
}

/// Overrides `ro.<source>build.<prop>` for every source partition.
pub fn set_ro_build_prop(
    props: &mut dyn PropertyStore,
    prop: &str,
    value: &str,
) -> Result<(), PropertyError> {
    let names =
        RO_PROPS_DEFAULT_SOURCE_ORDER.iter().map(|source| format!("ro.{source}build.{prop}"));
    override_each(props, names, value)
}

/// Sets every property in `names` to `value`. All of them are attempted; the first failure is
/// returned.
pub(crate) fn override_each<I>(
    props: &mut dyn PropertyStore,
    names: I,
    value: &str,
) -> Result<(), PropertyError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    override_all(props, names.into_iter().map(|name| (name, value)))
}

/// Sets each `(name, value)` pair. All of them are attempted; the first failure is returned.
pub(crate) fn override_all<I, N, V>(
    props: &mut dyn PropertyStore,
    pairs: I,
) -> Result<(), PropertyError>
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: AsRef<str>,
{
    let mut first_error = None;
    for (name, value) in pairs {
        let name = name.as_ref();
        if let Err(e) = props.set(name, value.as_ref()) {
            warn!("Failed to set {name}: {e}");
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Builds the `ro.build.description` string out of a build fingerprint.
///
/// `brand/product/device:release/id/incremental:type/tags` becomes
/// `product-type release id incremental tags`. Returns `None` if the fingerprint doesn't have that
/// shape.
pub fn fingerprint_to_description(fingerprint: &str) -> Option<String> {
    let tokens: Vec<&str> = fingerprint.split('/').collect();
    let [_brand, product, device_release, build_id, incremental_type, tags] = tokens.as_slice()
    else {
        return None;
    };
    let (_device, release) = split_pair(device_release)?;
    let (incremental, build_type) = split_pair(incremental_type)?;
    Some(format!("{product}-{build_type} {release} {build_id} {incremental} {tags}"))
}

// Splits "a:b" into exactly two parts.
fn split_pair(s: &str) -> Option<(&str, &str)> {
    match s.split_once(':') {
        Some((a, b)) if !b.contains(':') => Some((a, b)),
        _ => None,
    }
}
