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

//! Access to the system property store.
//!
//! The init hook only ever needs two things from the store: read a property, and override one
//! regardless of whether it was already set. `ro.` properties can only be overridden from inside
//! init, which is where this library runs.

use thiserror::Error;

/// Maximum size of a property value, including the terminating NUL. Only `ro.` properties are
/// allowed to be longer.
pub const PROP_VALUE_MAX: usize = 92;

/// Errors from accessing the property store.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// The property name is empty or contains a NUL byte.
    #[error("Invalid property name {0:?}")]
    InvalidName(String),
    /// The value contains a NUL byte.
    #[error("Invalid value for property {0}")]
    InvalidValue(String),
    /// The value is too long for a property that isn't read-only.
    #[error("Value for {name} is {len} bytes, longer than allowed")]
    ValueTooLong {
        /// Property name.
        name: String,
        /// Length of the rejected value.
        len: usize,
    },
    /// The existing property could not be updated.
    #[error("Failed to update property {0}")]
    UpdateFailed(String),
    /// The property did not exist and could not be added.
    #[error("Failed to add property {0}")]
    AddFailed(String),
}

/// A key-value store of system properties.
pub trait PropertyStore {
    /// Returns the value of `name`, or `None` if it isn't set.
    fn get(&self, name: &str) -> Result<Option<String>, PropertyError>;

    /// Stores `value` under `name` without validation. Callers use [`PropertyStore::set`].
    fn write(&mut self, name: &str, value: &str) -> Result<(), PropertyError>;

    /// Overrides `name` with `value`, adding the property if it doesn't exist yet.
    fn set(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        validate(name, value)?;
        self.write(name, value)
    }
}

fn validate(name: &str, value: &str) -> Result<(), PropertyError> {
    if name.is_empty() || name.contains('\0') {
        return Err(PropertyError::InvalidName(name.to_owned()));
    }
    if value.contains('\0') {
        return Err(PropertyError::InvalidValue(name.to_owned()));
    }
    if !name.starts_with("ro.") && value.len() >= PROP_VALUE_MAX {
        return Err(PropertyError::ValueTooLong { name: name.to_owned(), len: value.len() });
    }
    Ok(())
}

#[cfg(target_os = "android")]
pub use android::SystemProperties;

#[cfg(target_os = "android")]
mod android {
    use super::{PropertyError, PropertyStore, PROP_VALUE_MAX};
    use libc::{c_char, c_int, c_uint};
    use std::ffi::{CStr, CString};

    #[allow(non_camel_case_types)]
    #[repr(C)]
    struct prop_info {
        _private: [u8; 0],
    }

    // Provided by bionic. `update` and `add` are only usable from init.
    extern "C" {
        fn __system_property_get(name: *const c_char, value: *mut c_char) -> c_int;
        fn __system_property_find(name: *const c_char) -> *const prop_info;
        fn __system_property_update(pi: *mut prop_info, value: *const c_char, len: c_uint)
            -> c_int;
        fn __system_property_add(
            name: *const c_char,
            namelen: c_uint,
            value: *const c_char,
            valuelen: c_uint,
        ) -> c_int;
    }

    /// The process-wide property area mapped by bionic.
    #[derive(Debug, Default)]
    pub struct SystemProperties;

    impl PropertyStore for SystemProperties {
        fn get(&self, name: &str) -> Result<Option<String>, PropertyError> {
            let name_c =
                CString::new(name).map_err(|_| PropertyError::InvalidName(name.to_owned()))?;
            let mut buf = [0 as c_char; PROP_VALUE_MAX];
            // SAFETY: `name_c` is NUL-terminated and `buf` has room for PROP_VALUE_MAX bytes,
            // which is the most __system_property_get ever writes.
            let len = unsafe { __system_property_get(name_c.as_ptr(), buf.as_mut_ptr()) };
            if len <= 0 {
                return Ok(None);
            }
            // SAFETY: bionic always NUL-terminates the value written into `buf`.
            let value = unsafe { CStr::from_ptr(buf.as_ptr()) };
            Ok(Some(value.to_string_lossy().into_owned()))
        }

        fn write(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
            let name_c =
                CString::new(name).map_err(|_| PropertyError::InvalidName(name.to_owned()))?;
            let value_c =
                CString::new(value).map_err(|_| PropertyError::InvalidValue(name.to_owned()))?;
            let value_len = value.len() as c_uint;

            // SAFETY: `name_c` is a valid NUL-terminated string for the duration of the call.
            let pi = unsafe { __system_property_find(name_c.as_ptr()) };
            let ret = if pi.is_null() {
                // SAFETY: both strings outlive the call and the lengths exclude the NUL.
                unsafe {
                    __system_property_add(
                        name_c.as_ptr(),
                        name.len() as c_uint,
                        value_c.as_ptr(),
                        value_len,
                    )
                }
            } else {
                // SAFETY: `pi` was just returned by bionic for an existing property and
                // `value_c` outlives the call.
                unsafe {
                    __system_property_update(pi as *mut prop_info, value_c.as_ptr(), value_len)
                }
            };
            if ret >= 0 {
                Ok(())
            } else if pi.is_null() {
                Err(PropertyError::AddFailed(name.to_owned()))
            } else {
                Err(PropertyError::UpdateFailed(name.to_owned()))
            }
        }
    }
}

#[cfg(test)]
pub(crate) use fake::FakeProperties;
