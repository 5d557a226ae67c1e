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

use anyhow::Result;
use clap::{Arg, ArgMatches};
use std::io::Write;

pub fn get_logging_args() -> Vec<Arg<'static>> {
    [
        Arg::new("log-level")
            .short('L')
            .long("log-level")
            .possible_values(["error", "warn", "info", "debug", "trace", "off"])
            .help("Log level [default: info]")
            .global(true)
            .takes_value(true),
        Arg::new("trace")
            .long("trace")
            .help("Log ultra-verbose (trace level) information")
            .global(true)
            .takes_value(false),
        Arg::new("silent")
            .long("silent")
            .help("Suppress all log output")
            .global(true)
            .takes_value(false),
    ]
    .to_vec()
}

pub fn log_level(matches: &ArgMatches) -> log::LevelFilter {
    if matches.is_present("trace") {
        log::LevelFilter::Trace
    } else if matches.is_present("silent") {
        log::LevelFilter::Off
    } else {
        match matches.value_of("log-level") {
            Some("error") => log::LevelFilter::Error,
            Some("warn") => log::LevelFilter::Warn,
            Some("debug") => log::LevelFilter::Debug,
            Some("trace") => log::LevelFilter::Trace,
            Some("off") => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        }
    }
}

pub fn get_logging(matches: &ArgMatches) -> Result<env_logger::Builder> {
    let mut builder = env_logger::Builder::new();

    let level = log_level(matches);
    builder.filter(None, level);

    if level == log::LevelFilter::Trace {
        builder.format_timestamp_secs();
    } else {
        builder.format(|f, record| {
            writeln!(
                f,
                "[{}] {}",
                record.level().to_string().to_lowercase(),
                record.args()
            )
        });
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn matches(argv: &[&str]) -> ArgMatches {
        Command::new("test")
            .args(get_logging_args())
            .get_matches_from(argv.iter().copied())
    }

    #[test]
    fn levels() {
        assert_eq!(log::LevelFilter::Info, log_level(&matches(&["test"])));
        assert_eq!(
            log::LevelFilter::Warn,
            log_level(&matches(&["test", "-L", "warn"]))
        );
        assert_eq!(
            log::LevelFilter::Trace,
            log_level(&matches(&["test", "--trace", "-L", "error"]))
        );
        assert_eq!(
            log::LevelFilter::Off,
            log_level(&matches(&["test", "--silent"]))
        );
    }
}
