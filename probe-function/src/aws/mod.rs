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

//! The `aws` module contains the AWS Lambda specific parts of the
//! `probe-function` library.

use lambda_runtime::{Error, LambdaEvent};
use probe::prelude::*;
use serde_json::Value;

/// Handles one Lambda invocation.
///
/// The diagnostic lines go to stdout, which Lambda forwards to CloudWatch
/// Logs. The runtime serializes the returned string as the JSON response.
pub async fn handler(event: LambdaEvent<Value>) -> std::result::Result<String, Error> {
    let (payload, context) = event.into_parts();
    let env = EnvTable::from_process();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    Ok(invoke(&payload, &context, &env, &mut out)?)
}
