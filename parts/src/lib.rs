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

//! Device settings logic for elish: per-app thermal profiles, force stop on screen off and the
//! rotation policy. The settings screens and the framework services they talk to live on the
//! Java side; this library holds the decisions and the kernel interface.

pub mod forcestop;
pub mod rotate;
pub mod thermal;
