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

//! Dalvik heap sizing based on the amount of installed memory.

use crate::property::{PropertyError, PropertyStore};
use crate::utils::override_all;
use anyhow::{Context, Result};
use log::info;
use nix::sys::sysinfo::sysinfo;

const GIB: u64 = 1024 * 1024 * 1024;

/// Values for the `dalvik.vm.heap*` properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DalvikHeapInfo {
    pub heapstartsize: &'static str,
    pub heapgrowthlimit: &'static str,
    pub heapsize: &'static str,
    pub heapminfree: &'static str,
    pub heapmaxfree: &'static str,
    pub heaptargetutilization: &'static str,
}

/// Devices with more than 5 GiB of memory.
pub const DALVIK_HEAP_INFO_6144: DalvikHeapInfo = DalvikHeapInfo {
    heapstartsize: "16m",
    heapgrowthlimit: "256m",
    heapsize: "512m",
    heapminfree: "8m",
    heapmaxfree: "32m",
    heaptargetutilization: "0.5",
};

/// Devices with more than 3 GiB of memory.
pub const DALVIK_HEAP_INFO_4096: DalvikHeapInfo = DalvikHeapInfo {
    heapstartsize: "8m",
    heapgrowthlimit: "192m",
    heapsize: "512m",
    heapminfree: "8m",
    heapmaxfree: "16m",
    heaptargetutilization: "0.6",
};

/// Everything else.
pub const DALVIK_HEAP_INFO_2048: DalvikHeapInfo = DalvikHeapInfo {
    heapstartsize: "8m",
    heapgrowthlimit: "192m",
    heapsize: "512m",
    heapminfree: "512k",
    heapmaxfree: "8m",
    heaptargetutilization: "0.75",
};

impl DalvikHeapInfo {
    /// Picks the heap configuration for a device with `total_ram` bytes of memory.
    pub fn for_total_ram(total_ram: u64) -> &'static DalvikHeapInfo {
        if total_ram > 5 * GIB {
            &DALVIK_HEAP_INFO_6144
        } else if total_ram > 3 * GIB {
            &DALVIK_HEAP_INFO_4096
        } else {
            &DALVIK_HEAP_INFO_2048
        }
    }

    fn properties(&self) -> [(&'static str, &'static str); 6] {
        [
            ("dalvik.vm.heapstartsize", self.heapstartsize),
            ("dalvik.vm.heapgrowthlimit", self.heapgrowthlimit),
            ("dalvik.vm.heapsize", self.heapsize),
            ("dalvik.vm.heaptargetutilization", self.heaptargetutilization),
            ("dalvik.vm.heapminfree", self.heapminfree),
            ("dalvik.vm.heapmaxfree", self.heapmaxfree),
        ]
    }
}

/// Writes every property of `info`, returning the first failure.
pub fn apply_dalvik_heap(
    props: &mut dyn PropertyStore,
    info: &DalvikHeapInfo,
) -> Result<(), PropertyError> {
    override_all(props, info.properties())
}

/// Sizes the Dalvik heap for the memory installed in this device.
pub fn set_dalvik_heap(props: &mut dyn PropertyStore) -> Result<()> {
    let total_ram = sysinfo().context("Failed to query sysinfo")?.ram_total();
    let heap = DalvikHeapInfo::for_total_ram(total_ram);
    info!("{} MiB of memory, using heap growth limit {}", total_ram >> 20, heap.heapgrowthlimit);
    apply_dalvik_heap(props, heap).context("Failed to set Dalvik heap properties")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::FakeProperties;

    #[test]
    fn profile_thresholds() {
        assert_eq!(DalvikHeapInfo::for_total_ram(12 * GIB), &DALVIK_HEAP_INFO_6144);
        assert_eq!(DalvikHeapInfo::for_total_ram(6 * GIB), &DALVIK_HEAP_INFO_6144);
        assert_eq!(DalvikHeapInfo::for_total_ram(5 * GIB + 1), &DALVIK_HEAP_INFO_6144);
        assert_eq!(DalvikHeapInfo::for_total_ram(5 * GIB), &DALVIK_HEAP_INFO_4096);
        assert_eq!(DalvikHeapInfo::for_total_ram(4 * GIB), &DALVIK_HEAP_INFO_4096);
        assert_eq!(DalvikHeapInfo::for_total_ram(3 * GIB), &DALVIK_HEAP_INFO_2048);
        assert_eq!(DalvikHeapInfo::for_total_ram(2 * GIB), &DALVIK_HEAP_INFO_2048);
        assert_eq!(DalvikHeapInfo::for_total_ram(0), &DALVIK_HEAP_INFO_2048);
    }

    #[test]
    fn apply_writes_all_heap_properties() {
        let mut props = FakeProperties::default();
        apply_dalvik_heap(&mut props, &DALVIK_HEAP_INFO_4096).unwrap();

        assert_eq!(props.writes.len(), 6);
        assert_eq!(props.value("dalvik.vm.heapstartsize"), Some("8m"));
        assert_eq!(props.value("dalvik.vm.heapgrowthlimit"), Some("192m"));
        assert_eq!(props.value("dalvik.vm.heapsize"), Some("512m"));
        assert_eq!(props.value("dalvik.vm.heaptargetutilization"), Some("0.6"));
        assert_eq!(props.value("dalvik.vm.heapminfree"), Some("8m"));
        assert_eq!(props.value("dalvik.vm.heapmaxfree"), Some("16m"));
    }

    #[test]
    fn apply_keeps_going_after_failure() {
        let mut props = FakeProperties {
            read_only: vec!["dalvik.vm.heapsize".to_owned()],
            ..Default::default()
        };

        assert!(apply_dalvik_heap(&mut props, &DALVIK_HEAP_INFO_2048).is_err());
        assert_eq!(props.writes.len(), 5);
        assert_eq!(props.value("dalvik.vm.heapmaxfree"), Some("8m"));
    }

    #[test]
    fn set_dalvik_heap_matches_this_machine() {
        let mut props = FakeProperties::default();
        set_dalvik_heap(&mut props).unwrap();

        let expected = DalvikHeapInfo::for_total_ram(sysinfo().unwrap().ram_total());
        assert_eq!(props.value("dalvik.vm.heapgrowthlimit"), Some(expected.heapgrowthlimit));
        assert_eq!(
            props.value("dalvik.vm.heaptargetutilization"),
            Some(expected.heaptargetutilization)
        );
    }
}
