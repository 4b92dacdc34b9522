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

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;

use super::cmdline::ParsedArgs;

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: Listen,
    #[serde(default)]
    pub server: Server,
}

#[derive(Deserialize, Debug)]
pub struct Listen {
    #[serde(default = "default_listen_addr")]
    pub address: String,
    #[serde(default = "default_listen_port")]
    pub port: u16,
}

#[derive(Deserialize, Debug)]
pub struct Server {
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    6667
}

fn default_server_port() -> u16 {
    7326
}

impl Default for Listen {
    fn default() -> Self {
        Listen {
            address: default_listen_addr(),
            port: default_listen_port(),
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Server {
            address: String::new(),
            port: default_server_port(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not open/read config file: {0}")]
    IO(#[from] io::Error),
    #[error("Could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid port number '{0}'")]
    Port(String),
    #[error("No ICB server address given; pass -s or set [server] address")]
    NoServer,
}

impl Config {
    pub fn from_str(c: &str) -> Result<Config, ConfigError> {
        toml::from_str::<Config>(c).map_err(|e| e.into())
    }

    pub fn from_path(p: &Path) -> Result<Config, ConfigError> {
        let mut f = File::open(&p)?;
        let mut c = String::new();
        f.read_to_string(&mut c)?;
        Config::from_str(c.as_ref())
    }

    /// Command-line flags win over the config file.
    pub fn apply_args(&mut self, args: &ParsedArgs) -> Result<(), ConfigError> {
        if !args.listen.is_empty() {
            self.listen.address = args.listen.clone();
        }
        if !args.port.is_empty() {
            self.listen.port = parse_port(&args.port)?;
        }
        if !args.server.is_empty() {
            self.server.address = args.server.clone();
        }
        if !args.server_port.is_empty() {
            self.server.port = parse_port(&args.server_port)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.address.is_empty() {
            return Err(ConfigError::NoServer);
        }
        Ok(())
    }

    pub fn listen_string(&self) -> String {
        format!("{}:{}", self.listen.address, self.listen.port)
    }

    pub fn server_string(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

fn parse_port(s: &str) -> Result<u16, ConfigError> {
    s.parse().map_err(|_| ConfigError::Port(s.to_string()))
}
