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

//! An ordered snapshot of environment variables.

use std::env;

/// The environment table of one invocation.
///
/// Entries keep the order in which the host handed them out; nothing here
/// sorts or deduplicates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvTable {
    vars: Vec<(String, String)>,
}

impl EnvTable {
    /// Captures the environment of the current process.
    ///
    /// Keys and values that are not valid Unicode are converted lossily.
    pub fn from_process() -> Self {
        Self {
            vars: env::vars_os()
                .map(|(k, v)| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
                .collect(),
        }
    }

    /// Builds a table from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a copy of the table with `overrides` applied.
    ///
    /// A key that already exists keeps its position and takes the new value;
    /// unknown keys are appended in the order given.
    pub fn with_overrides<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars = self.vars.clone();
        for (key, value) in overrides {
            let (key, value) = (key.into(), value.into());
            match vars.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => vars.push((key, value)),
            }
        }
        Self { vars }
    }

    /// Looks up the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over the entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over the `KEY=VALUE` lines of the table.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|(k, v)| format!("{}={}", k, v))
    }
}
