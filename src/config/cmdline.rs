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

use core::fmt;
use std::env;

use ParseState::{Boolarg, ConfFile, Listen, LogFile, Port, Server, ServerPort};

const HELP_MESSAGE: &str = r#"icbgate [-c|--config=] [-l|--listen=] [-p|--port=] [-s|--server=] [-P|--server-port=] [-o|--log-output=] [-h|--help]

-c --config=str       The config file to use.
-l --listen=str       Address to accept the IRC client on (default 0.0.0.0).
-p --port=num         Port to accept the IRC client on (default 6667).
-s --server=str       The ICB server to connect to.
-P --server-port=num  The ICB server port (default 7326).
-o --log-output=str   Log output to file instead of stderr.
-h --help             This message.
"#;

#[derive(PartialEq)]
enum ParseState {
    Boolarg,
    ConfFile,
    Listen,
    Port,
    Server,
    ServerPort,
    LogFile,
}

#[derive(thiserror::Error, Debug)]
pub struct ParsedArgsError(String);

impl fmt::Display for ParsedArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flag values as given; ports stay strings here and are parsed when
/// merged into the config.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub config: String,
    pub listen: String,
    pub port: String,
    pub server: String,
    pub server_port: String,
    pub log_file: String,
}

impl ParsedArgs {
    pub fn new() -> Result<ParsedArgs, ParsedArgsError> {
        let mut itr = env::args();
        itr.next(); // throw away first arg
        ParsedArgs::from_iter(itr)
    }

    fn from_iter<I: Iterator<Item = String>>(itr: I) -> Result<ParsedArgs, ParsedArgsError> {
        let mut ret = ParsedArgs::default();
        let mut arg_state = Boolarg;
        for arg in itr {
            let (flag, val) = if arg_state != Boolarg {
                (arg.as_str(), "")
            } else if let Some(idx) = arg.as_str().find('=') {
                arg.split_at(idx + 1usize)
            } else {
                (arg.as_str(), "")
            };

            arg_state = match flag {
                "-c" | "--config" => ConfFile,
                "--config=" => {
                    ret.config = val.to_string();
                    Boolarg
                }
                "-l" | "--listen" => Listen,
                "--listen=" => {
                    ret.listen = val.to_string();
                    Boolarg
                }
                "-p" | "--port" => Port,
                "--port=" => {
                    ret.port = val.to_string();
                    Boolarg
                }
                "-s" | "--server" => Server,
                "--server=" => {
                    ret.server = val.to_string();
                    Boolarg
                }
                "-P" | "--server-port" => ServerPort,
                "--server-port=" => {
                    ret.server_port = val.to_string();
                    Boolarg
                }
                "-o" | "--log-output" => LogFile,
                "--log-output=" => {
                    ret.log_file = val.to_string();
                    Boolarg
                }
                "-h" | "--help" => return Err(ParsedArgsError(HELP_MESSAGE.to_string())),
                _ => match arg_state {
                    Boolarg => {
                        return Err(ParsedArgsError(format!(
                            "Unknown option passed ({}), see --help",
                            flag,
                        )))
                    }
                    ConfFile => {
                        ret.config = flag.to_string();
                        Boolarg
                    }
                    Listen => {
                        ret.listen = flag.to_string();
                        Boolarg
                    }
                    Port => {
                        ret.port = flag.to_string();
                        Boolarg
                    }
                    Server => {
                        ret.server = flag.to_string();
                        Boolarg
                    }
                    ServerPort => {
                        ret.server_port = flag.to_string();
                        Boolarg
                    }
                    LogFile => {
                        ret.log_file = flag.to_string();
                        Boolarg
                    }
                },
            }
        }
        Ok(ret)
    }
}
