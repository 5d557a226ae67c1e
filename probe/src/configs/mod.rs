// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! This module provides various default configurations for Probe.

mod probe;
pub use self::probe::PROBE_CONF;

use crate::error::{ProbeError, Result};
use lazy_static::lazy_static;
use std::str::FromStr;

lazy_static! {
    /// Log filter of the function when `RUST_LOG` is unset.
    pub static ref PROBE_LOG_LEVEL: String = PROBE_CONF["lambda"]["log_level"].to_string();
}

/// Reads and parses a value from the embedded configuration.
///
/// # Arguments
/// * `section` - The INI section, e.g. `local`.
/// * `key` - The key inside the section.
pub fn conf_value<T>(section: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = PROBE_CONF
        .get_from(Some(section), key)
        .ok_or_else(|| ProbeError::Config(format!("[{}] {} is missing", section, key)))?;
    raw.trim().parse::<T>().map_err(|e| {
        ProbeError::Config(format!("[{}] {} = {:?}: {}", section, key, raw, e))
    })
}
