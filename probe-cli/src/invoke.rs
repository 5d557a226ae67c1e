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

//! Invokes the probe function on the local machine, the way a Lambda
//! emulator would, and prints its answer.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::info;
use probe::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::time::Duration;

pub fn command(matches: &ArgMatches) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(matches, &mut out)
}

/// Invokes the function once and writes the diagnostic lines followed by the
/// JSON-encoded answer to `out`.
fn run<W: Write + ?Sized>(matches: &ArgMatches, out: &mut W) -> Result<()> {
    let invoker = invoker(matches)?;
    let event = event(matches)?;

    let answer = invoker.invoke(&event, out)?;
    writeln!(out, "{}", serde_json::to_string(&answer)?)?;

    info!("[OK] {} answered", invoker.function_name);
    Ok(())
}

pub fn command_args() -> Command<'static> {
    Command::new("invoke")
        .about("Invokes the probe function locally with an event")
        .arg(
            Arg::new("event")
                .value_name("EVENT")
                .help("The event payload as JSON [default: {}]")
                .index(1),
        )
        .arg(
            Arg::new("event file")
                .short('f')
                .long("event-file")
                .value_name("FILE")
                .help("Reads the event payload from a file")
                .conflicts_with("event")
                .takes_value(true),
        )
        .arg(
            Arg::new("function name")
                .short('n')
                .long("function-name")
                .value_name("NAME")
                .help("Sets the emulated function name")
                .takes_value(true),
        )
        .arg(
            Arg::new("memory size")
                .short('m')
                .long("memory-size")
                .value_name("MB")
                .help("Sets the emulated memory size")
                .takes_value(true),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECS")
                .help("Sets the invocation timeout")
                .takes_value(true),
        )
        .arg(
            Arg::new("region")
                .short('r')
                .long("region")
                .value_name("REGION")
                .help("Sets the emulated AWS region")
                .takes_value(true),
        )
}

/// Builds the local invoker from the configuration and the command line.
fn invoker(matches: &ArgMatches) -> Result<LocalInvoker> {
    let mut invoker = LocalInvoker::try_new()?;
    if let Some(name) = matches.value_of("function name") {
        invoker.set_function_name(name);
    }
    if let Some(mb) = matches.value_of("memory size") {
        invoker.set_memory_size(
            mb.parse::<i64>()
                .with_context(|| format!("invalid memory size: {}", mb))?,
        );
    }
    if let Some(secs) = matches.value_of("timeout") {
        invoker.set_timeout(Duration::from_secs(
            secs.parse::<u64>()
                .with_context(|| format!("invalid timeout: {}", secs))?,
        ));
    }
    if let Some(region) = matches.value_of("region") {
        invoker.set_region(region);
    }
    Ok(invoker)
}

/// Reads the event from the positional argument or the event file.
fn event(matches: &ArgMatches) -> Result<Value> {
    let text = match matches.value_of("event file") {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path))?,
        None => matches.value_of("event").unwrap_or_default().to_owned(),
    };
    Ok(parse_event(&text)?)
}
