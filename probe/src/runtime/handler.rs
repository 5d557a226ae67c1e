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

//! The invocation handler of the probe function.

use crate::error::Result;
use crate::runtime::context::{format_remaining, RemainingTime};
use crate::runtime::environment::EnvTable;
use log::debug;
use serde_json::Value;
use std::io::Write;

/// The answer of every invocation.
pub const GREETING: &str = "Hello World!";

/// Reports one invocation on `out` and returns [`GREETING`].
///
/// Lines written, in order:
/// * `inputEvent: <event>` with the event as compact JSON.
/// * `RemainingTime: <remaining>`, see [`format_remaining`].
/// * `KEY=VALUE` for every entry of `env`, in table order.
///
/// # Arguments
/// * `event` - The event payload, already deserialized by the host.
/// * `context` - The invocation context.
/// * `env` - The environment table to report.
/// * `out` - The sink for the diagnostic lines, usually stdout.
pub fn invoke<C, W>(event: &Value, context: &C, env: &EnvTable, out: &mut W) -> Result<String>
where
    C: RemainingTime + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "inputEvent: {}", event)?;
    writeln!(
        out,
        "RemainingTime: {}",
        format_remaining(context.remaining_time())
    )?;
    for line in env.lines() {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;

    debug!("Reported {} environment variables.", env.len());
    Ok(GREETING.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use serde_json::json;
    use std::io;
    use std::time::Duration;

    fn run(event: &Value, env: &EnvTable) -> Result<(String, Vec<String>)> {
        let mut out = Vec::new();
        let answer = invoke(event, &Duration::from_millis(2987), env, &mut out)?;
        let text = String::from_utf8(out).map_err(|e| ProbeError::Internal(e.to_string()))?;
        Ok((answer, text.lines().map(str::to_owned).collect()))
    }

    #[test]
    fn reports_event_time_and_environment() -> Result<()> {
        let env = EnvTable::from_pairs(vec![("FOO", "bar")]);
        let (answer, lines) = run(&json!({"some": "event"}), &env)?;

        assert_eq!("Hello World!", answer);
        assert_eq!(
            vec![
                r#"inputEvent: {"some":"event"}"#,
                "RemainingTime: 00:00:02.9870000",
                "FOO=bar",
            ],
            lines
        );
        assert!(lines.iter().any(|l| l.ends_with("FOO=bar")));
        Ok(())
    }

    #[test]
    fn any_event_shape_gets_the_greeting() -> Result<()> {
        let env = EnvTable::from_pairs(vec![("A", "1")]);
        for event in [
            Value::Null,
            json!(42),
            json!("text"),
            json!([1, 2, 3]),
            json!({"nested": {"deep": [true, null]}}),
        ] {
            let (answer, lines) = run(&event, &env)?;
            assert_eq!(GREETING, answer);
            assert_eq!(format!("inputEvent: {}", event), lines[0]);
        }
        Ok(())
    }

    #[test]
    fn one_line_per_environment_entry() -> Result<()> {
        let env = EnvTable::from_pairs((0..17).map(|i| (format!("K{}", i), format!("v{}", i))));
        let (_, lines) = run(&json!({}), &env)?;
        assert_eq!(2 + env.len(), lines.len());
        assert_eq!(env.lines().collect::<Vec<_>>(), lines[2..].to_vec());
        Ok(())
    }

    #[test]
    fn empty_environment_gives_two_lines() -> Result<()> {
        let (_, lines) = run(&json!({"some": "event"}), &EnvTable::default())?;
        assert_eq!(2, lines.len());
        assert!(lines[0].starts_with("inputEvent: "));
        assert!(lines[1].starts_with("RemainingTime: "));
        Ok(())
    }

    #[test]
    fn repeated_invocations_agree() -> Result<()> {
        let env = EnvTable::from_pairs(vec![("FOO", "bar"), ("BAZ", "qux")]);
        let event = json!({"some": "event"});
        let first = run(&event, &env)?;
        let second = run(&event, &env)?;
        assert_eq!(first, second);
        Ok(())
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_propagate() {
        let res = invoke(
            &json!({}),
            &Duration::ZERO,
            &EnvTable::default(),
            &mut ClosedPipe,
        );
        assert!(matches!(res, Err(ProbeError::IoError(_))));
    }
}
