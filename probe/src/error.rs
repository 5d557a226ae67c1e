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

//! Probe error types

use std::error;
use std::fmt::{Display, Formatter};
use std::io;
use std::result;

/// Result type for operations that could result in an [ProbeError]
pub type Result<T> = result::Result<T, ProbeError>;

/// Probe error
#[derive(Debug)]
pub enum ProbeError {
    /// Error associated to I/O operations and associated traits.
    IoError(io::Error),
    /// Error returned when serde_json failed to serialize or deserialize data.
    SerdeJson(serde_json::Error),
    /// Error returned when a configuration value is missing or malformed.
    Config(String),
    /// Error returned as a consequence of an error in Probe.
    /// This error should not happen in normal usage of Probe.
    Internal(String),
}

impl From<io::Error> for ProbeError {
    fn from(e: io::Error) -> Self {
        ProbeError::IoError(e)
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(e: serde_json::Error) -> Self {
        ProbeError::SerdeJson(e)
    }
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            ProbeError::IoError(ref desc) => write!(f, "IO error: {}", desc),
            ProbeError::SerdeJson(ref desc) => write!(f, "serde_json error: {:?}", desc),
            ProbeError::Config(ref desc) => write!(f, "Configuration error: {}", desc),
            ProbeError::Internal(ref desc) => write!(
                f,
                "Internal error: {}. This was likely caused by a bug in Probe's \
                    code and we would welcome that you file an bug report in our issue tracker",
                desc
            ),
        }
    }
}

impl error::Error for ProbeError {}
