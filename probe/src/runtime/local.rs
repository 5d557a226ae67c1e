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

//! Emulates a single AWS Lambda invocation on the local machine.

use crate::configs::conf_value;
use crate::error::Result;
use crate::runtime::environment::EnvTable;
use crate::runtime::handler::invoke;
use chrono::Utc;
use lambda_runtime::Context;
use log::info;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;
use uuid::Uuid;

/// LocalInvoker runs the probe handler in-process with a context and an
/// environment that look like the ones Lambda hands out.
#[derive(Debug, Clone)]
pub struct LocalInvoker {
    /// The emulated function name.
    pub function_name:    String,
    /// The emulated function version.
    pub function_version: String,
    /// The emulated memory size in MB.
    pub memory_size:      i64,
    /// The invocation timeout. The context deadline is set this far ahead.
    pub timeout:          Duration,
    /// The emulated AWS region.
    pub region:           String,
    /// The account id used in the function ARN.
    pub account_id:       String,
}

impl LocalInvoker {
    /// Creates a local invoker from the `[local]` configuration section.
    pub fn try_new() -> Result<LocalInvoker> {
        Ok(LocalInvoker {
            function_name:    conf_value("local", "function_name")?,
            function_version: conf_value("local", "function_version")?,
            memory_size:      conf_value("local", "memory_size")?,
            timeout:          Duration::from_secs(conf_value("local", "timeout")?),
            region:           conf_value("local", "region")?,
            account_id:       conf_value("local", "account_id")?,
        })
    }

    /// Sets the emulated function name.
    pub fn set_function_name(&mut self, function_name: &str) -> &mut Self {
        self.function_name = function_name.to_owned();
        self
    }

    /// Sets the emulated memory size in MB.
    pub fn set_memory_size(&mut self, memory_size: i64) -> &mut Self {
        self.memory_size = memory_size;
        self
    }

    /// Sets the invocation timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Sets the emulated AWS region.
    pub fn set_region(&mut self, region: &str) -> &mut Self {
        self.region = region.to_owned();
        self
    }

    /// The ARN of the emulated function.
    pub fn function_arn(&self) -> String {
        format!(
            "arn:aws:lambda:{}:{}:function:{}",
            self.region, self.account_id, self.function_name
        )
    }

    /// Builds the context of a fresh invocation whose deadline lies
    /// `timeout` from now.
    pub fn context(&self) -> Context {
        let mut ctx = Context::default();
        ctx.request_id = Uuid::new_v4().to_string();
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        ctx.deadline = (Utc::now().timestamp_millis().max(0) as u64).saturating_add(timeout_ms);
        ctx.invoked_function_arn = self.function_arn();
        ctx
    }

    /// Overlays the variables Lambda reserves for its runtime on `host`.
    pub fn environment(&self, host: &EnvTable) -> EnvTable {
        host.with_overrides(vec![
            ("AWS_LAMBDA_FUNCTION_NAME", self.function_name.clone()),
            ("AWS_LAMBDA_FUNCTION_VERSION", self.function_version.clone()),
            (
                "AWS_LAMBDA_FUNCTION_MEMORY_SIZE",
                self.memory_size.to_string(),
            ),
            (
                "AWS_LAMBDA_FUNCTION_TIMEOUT",
                self.timeout.as_secs().to_string(),
            ),
            ("AWS_REGION", self.region.clone()),
            ("AWS_DEFAULT_REGION", self.region.clone()),
        ])
    }

    /// Invokes the handler once with the current process environment.
    ///
    /// # Arguments
    /// * `event` - The event payload.
    /// * `out` - The sink for the diagnostic lines.
    ///
    /// # Returns
    /// The handler's answer.
    pub fn invoke<W: Write + ?Sized>(&self, event: &Value, out: &mut W) -> Result<String> {
        self.invoke_with(event, &EnvTable::from_process(), out)
    }

    /// Invokes the handler once on top of the given host environment.
    pub fn invoke_with<W: Write + ?Sized>(
        &self,
        event: &Value,
        host: &EnvTable,
        out: &mut W,
    ) -> Result<String> {
        let ctx = self.context();
        info!(
            "Invoking {} locally, request id: {}",
            ctx.invoked_function_arn, ctx.request_id
        );
        invoke(event, &ctx, &self.environment(host), out)
    }
}

/// Parses an event given on the command line or in a file.
///
/// Blank input stands for the empty object.
pub fn parse_event(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::runtime::context::RemainingTime;
    use crate::runtime::handler::GREETING;

    fn invoker() -> Result<LocalInvoker> {
        let mut invoker = LocalInvoker::try_new()?;
        invoker
            .set_function_name("probe-test")
            .set_memory_size(256)
            .set_timeout(Duration::from_secs(30))
            .set_region("eu-west-1");
        Ok(invoker)
    }

    #[test]
    fn context_has_deadline_and_arn() -> Result<()> {
        let invoker = invoker()?;
        let ctx = invoker.context();
        assert_eq!(
            "arn:aws:lambda:eu-west-1:000000000000:function:probe-test",
            ctx.invoked_function_arn
        );
        assert!(Uuid::parse_str(&ctx.request_id).is_ok());
        let left = ctx.remaining_time();
        assert!(left <= Duration::from_secs(30));
        assert!(left > Duration::from_secs(20));
        assert_ne!(ctx.request_id, invoker.context().request_id);
        Ok(())
    }

    #[test]
    fn environment_carries_lambda_variables() -> Result<()> {
        let host = EnvTable::from_pairs(vec![("AWS_REGION", "us-west-2"), ("HOME", "/root")]);
        let env = invoker()?.environment(&host);
        assert_eq!(Some("eu-west-1"), env.get("AWS_REGION"));
        assert_eq!(Some("/root"), env.get("HOME"));
        assert_eq!(Some("probe-test"), env.get("AWS_LAMBDA_FUNCTION_NAME"));
        assert_eq!(Some("256"), env.get("AWS_LAMBDA_FUNCTION_MEMORY_SIZE"));
        assert_eq!(Some("30"), env.get("AWS_LAMBDA_FUNCTION_TIMEOUT"));
        assert_eq!(Some("$LATEST"), env.get("AWS_LAMBDA_FUNCTION_VERSION"));
        assert_eq!(Some("eu-west-1"), env.get("AWS_DEFAULT_REGION"));
        // AWS_REGION keeps its host position.
        assert_eq!(Some(("AWS_REGION", "eu-west-1")), env.iter().next());
        assert_eq!(7, env.len());
        Ok(())
    }

    #[test]
    fn local_invocation() -> Result<()> {
        let host = EnvTable::from_pairs(vec![("FOO", "bar")]);
        let mut out = Vec::new();
        let answer = invoker()?.invoke_with(&json!({"some": "event"}), &host, &mut out)?;
        assert_eq!("Hello World!", answer);

        let text = String::from_utf8(out).map_err(|e| ProbeError::Internal(e.to_string()))?;
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(r#"inputEvent: {"some":"event"}"#, lines[0]);
        assert!(lines[1].starts_with("RemainingTime: 00:00:"));
        assert_eq!("FOO=bar", lines[2]);
        assert_eq!(2 + 7, lines.len());
        Ok(())
    }

    #[test]
    fn huge_timeout_saturates_deadline() -> Result<()> {
        let mut invoker = invoker()?;
        invoker.set_timeout(Duration::MAX);
        let ctx = invoker.context();
        assert_eq!(u64::MAX, ctx.deadline);
        assert!(ctx.remaining_time() > Duration::from_secs(86_400 * 365));
        Ok(())
    }

    #[test]
    fn invocation_reads_process_environment() -> Result<()> {
        let invoker = invoker()?;
        let mut out = Vec::new();
        let answer = invoker.invoke(&json!({"some": "event"}), &mut out)?;
        assert_eq!(GREETING, answer);

        let text = String::from_utf8(out).map_err(|e| ProbeError::Internal(e.to_string()))?;
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(r#"inputEvent: {"some":"event"}"#, lines[0]);
        assert!(lines[1].starts_with("RemainingTime: "));
        assert!(lines[2..].contains(&"AWS_LAMBDA_FUNCTION_NAME=probe-test"));
        assert!(lines[2..].contains(&"AWS_REGION=eu-west-1"));
        Ok(())
    }

    #[test]
    fn parse_events() -> Result<()> {
        assert_eq!(json!({}), parse_event("")?);
        assert_eq!(json!({}), parse_event("  \n")?);
        assert_eq!(json!({"some": "event"}), parse_event(r#"{"some": "event"}"#)?);
        assert_eq!(json!("plain"), parse_event(r#""plain""#)?);
        assert!(matches!(parse_event("{oops"), Err(ProbeError::SerdeJson(_))));
        Ok(())
    }
}
