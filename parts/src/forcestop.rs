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

//! Apps force-stopped when the screen turns off.
//!
//! Some apps keep network connections open while the screen is off. The ones the user selects
//! are stopped on screen off, except while they are playing media; those are stopped once
//! playback pauses, unless the screen has come back on by then.

use log::info;
use std::collections::BTreeSet;

/// Selected on first use when installed.
pub const DEFAULT_FORCE_STOP_PACKAGES: [&str; 3] =
    ["tv.danmaku.bili", "tv.danmaku.bilibilihd", "com.bilibili.app.in"];

/// Playback state of a media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    None,
    Stopped,
    Paused,
    Playing,
    Buffering,
}

impl PlaybackState {
    /// Whether the session still counts as playing.
    pub fn is_active(self) -> bool {
        !matches!(self, PlaybackState::Paused | PlaybackState::Stopped)
    }
}

/// An active media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaSession<'a> {
    pub package: &'a str,
    pub state: PlaybackState,
}

/// What to do with a selected package when the screen turns off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAction<'a> {
    /// Stop it right away.
    Stop(&'a str),
    /// It is playing media; watch its session and decide on the next playback change.
    Defer(&'a str),
}

/// Decision for a deferred package after its playback state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredStop {
    /// The screen is on again; stop watching and leave the app alone.
    Cancel,
    /// Playback ended; stop watching and stop the app.
    Stop,
    /// Still playing; keep watching.
    Wait,
}

/// Packages selected for force stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForceStopList {
    packages: BTreeSet<String>,
}

impl ForceStopList {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { packages: packages.into_iter().map(Into::into).collect() }
    }

    /// The initial selection: every default package that is installed.
    pub fn with_installed_defaults<F: Fn(&str) -> bool>(is_installed: F) -> Self {
        Self::new(DEFAULT_FORCE_STOP_PACKAGES.into_iter().filter(|p| is_installed(p)))
    }

    pub fn set(&mut self, package: &str, enabled: bool) {
        if enabled {
            self.packages.insert(package.to_owned());
        } else {
            self.packages.remove(package);
        }
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }

    /// Decides, for every selected package, whether to stop it now or once its playback ends.
    pub fn on_screen_off(&self, sessions: &[MediaSession]) -> Vec<StopAction<'_>> {
        self.packages()
            .map(|package| {
                let playing =
                    sessions.iter().any(|s| s.package == package && s.state.is_active());
                if playing {
                    info!("{package} is in an active media session");
                    StopAction::Defer(package)
                } else {
                    StopAction::Stop(package)
                }
            })
            .collect()
    }
}

/// Decides what happens to a deferred package when its playback changes to `state`.
pub fn on_playback_changed(screen_on: bool, state: PlaybackState) -> DeferredStop {
    if screen_on {
        DeferredStop::Cancel
    } else if state.is_active() {
        DeferredStop::Wait
    } else {
        DeferredStop::Stop
    }
}
