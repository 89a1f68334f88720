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

//! Per-app thermal profiles.
//!
//! Every profile holds a list of packages. While one of them is in the foreground the thermal
//! engine runs the profile's scenario, selected by writing its code to sconfig. Packages in no
//! list get the default scenario.
//!
//! The lists are stored as one string, one segment per profile in [`ThermalState::PROFILES`]
//! order, each package followed by a comma:
//! `thermal.benchmark=a,b,:thermal.browser=:thermal.camera=c,:...`

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Scenario selector of the thermal engine.
pub const THERMAL_SCONFIG: &str = "/sys/class/thermal/thermal_message/sconfig";

/// Thermal scenario applied to a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThermalState {
    Default,
    Benchmark,
    Browser,
    Camera,
    Dialer,
    Gaming,
    Streaming,
}

impl ThermalState {
    /// States that carry a package list, in storage order.
    pub const PROFILES: [ThermalState; 6] = [
        ThermalState::Benchmark,
        ThermalState::Browser,
        ThermalState::Camera,
        ThermalState::Dialer,
        ThermalState::Gaming,
        ThermalState::Streaming,
    ];

    /// Scenario code understood by sconfig.
    pub fn sconfig_value(self) -> &'static str {
        match self {
            ThermalState::Default => "0",
            ThermalState::Benchmark => "10",
            ThermalState::Browser => "11",
            ThermalState::Camera => "12",
            ThermalState::Dialer => "8",
            ThermalState::Gaming => "9",
            ThermalState::Streaming => "14",
        }
    }

    fn key(self) -> &'static str {
        match self {
            ThermalState::Default => "thermal.default",
            ThermalState::Benchmark => "thermal.benchmark",
            ThermalState::Browser => "thermal.browser",
            ThermalState::Camera => "thermal.camera",
            ThermalState::Dialer => "thermal.dialer",
            ThermalState::Gaming => "thermal.gaming",
            ThermalState::Streaming => "thermal.streaming",
        }
    }

    fn profile_index(self) -> Option<usize> {
        Self::PROFILES.iter().position(|s| *s == self)
    }
}

/// Package lists of every profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThermalProfiles {
    packages: [Vec<String>; 6],
}

impl ThermalProfiles {
    /// Parses the stored form. Anything that doesn't have one segment per profile is discarded
    /// and all packages fall back to the default scenario.
    pub fn decode(value: &str) -> Self {
        let segments: Vec<&str> = value.split(':').collect();
        let mut profiles = Self::default();
        if segments.len() != ThermalState::PROFILES.len() {
            if !value.is_empty() {
                warn!("Ignoring malformed thermal profiles {value:?}");
            }
            return profiles;
        }
        for (list, segment) in profiles.packages.iter_mut().zip(segments) {
            let packages = segment.split_once('=').map_or(segment, |(_, packages)| packages);
            list.extend(packages.split(',').filter(|p| !p.is_empty()).map(str::to_owned));
        }
        profiles
    }

    /// Returns the stored form, which [`ThermalProfiles::decode`] reads back.
    pub fn encode(&self) -> String {
        ThermalState::PROFILES
            .iter()
            .zip(&self.packages)
            .map(|(state, list)| {
                let mut segment = format!("{}=", state.key());
                for package in list {
                    segment.push_str(package);
                    segment.push(',');
                }
                segment
            })
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Moves `package` to the list of `state`. [`ThermalState::Default`] just removes it.
    pub fn set_state(&mut self, package: &str, state: ThermalState) {
        for list in &mut self.packages {
            list.retain(|p| p != package);
        }
        if let Some(index) = state.profile_index() {
            self.packages[index].push(package.to_owned());
        }
    }

    /// Returns the scenario for `package`.
    pub fn state_for(&self, package: &str) -> ThermalState {
        ThermalState::PROFILES
            .iter()
            .zip(&self.packages)
            .find(|(_, list)| list.iter().any(|p| p == package))
            .map_or(ThermalState::Default, |(state, _)| *state)
    }
}

/// Whether the kernel exposes the thermal scenario selector at `sconfig`.
pub fn thermal_supported<P: AsRef<Path>>(sconfig: P) -> bool {
    sconfig.as_ref().exists()
}

/// Selects `state` in the thermal engine.
pub fn write_sconfig<P: AsRef<Path>>(sconfig: P, state: ThermalState) -> Result<()> {
    let sconfig = sconfig.as_ref();
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(sconfig)
        .and_then(|mut f| f.write_all(format!("{}\n", state.sconfig_value()).as_bytes()))
        .with_context(|| format!("Failed to write {:?}", sconfig))
}

/// Switches the thermal engine to the scenario of the foreground `package`.
pub fn set_thermal_profile<P: AsRef<Path>>(
    sconfig: P,
    profiles: &ThermalProfiles,
    package: &str,
) -> Result<ThermalState> {
    let state = profiles.state_for(package);
    info!("{package} in foreground, thermal state {state:?}");
    write_sconfig(sconfig, state)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::read_to_string;
    use tempfile::{tempdir, NamedTempFile};

    const EMPTY: &str = "thermal.benchmark=:thermal.browser=:thermal.camera=:thermal.dialer=:\
                         thermal.gaming=:thermal.streaming=";

    #[test]
    fn sconfig_codes() {
        let codes: Vec<&str> =
            ThermalState::PROFILES.iter().map(|s| s.sconfig_value()).collect();
        assert_eq!(codes, ["10", "11", "12", "8", "9", "14"]);
        assert_eq!(ThermalState::Default.sconfig_value(), "0");
    }

    #[test]
    fn empty_profiles_encoding() {
        assert_eq!(ThermalProfiles::default().encode(), EMPTY);
        assert_eq!(ThermalProfiles::decode(EMPTY), ThermalProfiles::default());
    }

    #[test]
    fn decode_stored_lists() {
        let profiles = ThermalProfiles::decode(
            "thermal.benchmark=com.antutu.ABenchMark,:thermal.browser=org.chromium.chrome,:\
             thermal.camera=:thermal.dialer=com.android.dialer,:\
             thermal.gaming=com.tencent.tmgp.sgame,com.miHoYo.GenshinImpact,:thermal.streaming=",
        );

        assert_eq!(profiles.state_for("com.antutu.ABenchMark"), ThermalState::Benchmark);
        assert_eq!(profiles.state_for("org.chromium.chrome"), ThermalState::Browser);
        assert_eq!(profiles.state_for("com.android.dialer"), ThermalState::Dialer);
        assert_eq!(profiles.state_for("com.miHoYo.GenshinImpact"), ThermalState::Gaming);
        assert_eq!(profiles.state_for("com.android.settings"), ThermalState::Default);
    }

    #[test]
    fn malformed_value_falls_back_to_default() {
        for value in ["", "garbage", "thermal.benchmark=a,:thermal.browser=b,", "a:b:c:d:e"] {
            let profiles = ThermalProfiles::decode(value);
            assert_eq!(profiles, ThermalProfiles::default(), "{value:?}");
        }
    }

    #[test]
    fn package_is_in_one_profile_at_most() {
        let mut profiles = ThermalProfiles::default();
        profiles.set_state("com.example.game", ThermalState::Benchmark);
        profiles.set_state("com.example.game", ThermalState::Gaming);

        assert_eq!(profiles.state_for("com.example.game"), ThermalState::Gaming);
        assert_eq!(
            profiles.encode(),
            "thermal.benchmark=:thermal.browser=:thermal.camera=:thermal.dialer=:\
             thermal.gaming=com.example.game,:thermal.streaming="
        );

        profiles.set_state("com.example.game", ThermalState::Default);
        assert_eq!(profiles, ThermalProfiles::default());
    }

    #[test]
    fn package_names_match_exactly() {
        let mut profiles = ThermalProfiles::default();
        profiles.set_state("com.example.game", ThermalState::Gaming);

        assert_eq!(profiles.state_for("example.game"), ThermalState::Default);
        assert_eq!(profiles.state_for("com.example.gam"), ThermalState::Default);

        profiles.set_state("example.game", ThermalState::Camera);
        assert_eq!(profiles.state_for("com.example.game"), ThermalState::Gaming);
    }

    #[test]
    fn encoding_survives_a_reload() {
        let mut profiles = ThermalProfiles::default();
        profiles.set_state("a.b", ThermalState::Streaming);
        profiles.set_state("c.d", ThermalState::Camera);
        profiles.set_state("e.f", ThermalState::Streaming);

        let reloaded = ThermalProfiles::decode(&profiles.encode());
        assert_eq!(reloaded.state_for("a.b"), ThermalState::Streaming);
        assert_eq!(reloaded.state_for("c.d"), ThermalState::Camera);
        assert_eq!(reloaded.state_for("e.f"), ThermalState::Streaming);
    }

    #[test]
    fn foreground_package_selects_scenario() {
        let sconfig = NamedTempFile::new().unwrap();
        let mut profiles = ThermalProfiles::default();
        profiles.set_state("com.android.camera", ThermalState::Camera);

        let state = set_thermal_profile(sconfig.path(), &profiles, "com.android.camera").unwrap();
        assert_eq!(state, ThermalState::Camera);
        assert_eq!(read_to_string(sconfig.path()).unwrap(), "12\n");

        set_thermal_profile(sconfig.path(), &profiles, "com.android.settings").unwrap();
        assert_eq!(read_to_string(sconfig.path()).unwrap(), "0\n");
    }

    #[test]
    fn missing_sconfig() {
        let dir = tempdir().unwrap();
        let sconfig = dir.path().join("sconfig");

        assert!(!thermal_supported(&sconfig));
        assert!(write_sconfig(&sconfig, ThermalState::Gaming).is_err());
    }
}
