// Copyright (C) 2021  Anthony DeDominic <adedomin@gmail.com>

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

mod config;
mod gateway;
mod icb;
mod irc;
mod scan;

use std::io;
use std::path::Path;

use flexi_logger::{FileSpec, FlexiLoggerError, Logger, LoggerHandle};

use config::cmdline::{ParsedArgs, ParsedArgsError};
use config::config_file::{Config, ConfigError};

#[derive(thiserror::Error, Debug)]
enum MainError {
    #[error("{0}")]
    Cmdline(#[from] ParsedArgsError),
    #[error("{0}")]
    InitConfig(#[from] ConfigError),
    #[error("Could not start logging: {0}")]
    Logger(#[from] FlexiLoggerError),
    #[error("Event loop IO error: {0}")]
    EvIo(#[from] io::Error),
}

fn init_logger(args: &ParsedArgs) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str("info")?;
    if args.log_file.is_empty() {
        logger.log_to_stderr().start()
    } else {
        logger
            .log_to_file(FileSpec::try_from(args.log_file.as_str())?)
            .start()
    }
}

fn main() -> Result<(), MainError> {
    let args = ParsedArgs::new()?;
    let _logger = init_logger(&args)?;

    let mut config = if args.config.is_empty() {
        Config::default()
    } else {
        Config::from_path(Path::new(&args.config))?
    };
    config.apply_args(&args)?;
    config.validate()?;

    gateway::net::run(&config)?;
    Ok(())
}
