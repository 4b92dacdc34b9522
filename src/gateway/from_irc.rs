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

//! Client-to-server half: dispatches parsed IRC commands into ICB packets.

use log::{debug, info, warn};

use crate::icb::send;

use super::session::Enquiry;
use super::Gateway;

impl Gateway {
    pub(super) fn irc_command(&mut self, argv: Vec<String>) {
        let arg = |i: usize| argv.get(i).map(String::as_str).unwrap_or("");
        let cmd = argv[0].to_ascii_uppercase();
        match cmd.as_str() {
            "PASS" => self.session.pass = arg(1).to_string(),
            "USER" => {
                self.session.ident = arg(1).to_string();
                self.try_login();
            }
            "NICK" => {
                self.session.nick = arg(1).to_string();
                if self.session.logged_in {
                    send::rename(&mut self.server_out, arg(1));
                } else {
                    self.try_login();
                }
            }
            "JOIN" => {
                let chan = arg(1);
                send::group(&mut self.server_out, chan.strip_prefix('#').unwrap_or(chan));
            }
            "PART" => self.session.in_channel = false,
            "PRIVMSG" | "NOTICE" => {
                if argv.len() < 3 {
                    warn!("{} without target or text", cmd);
                    return;
                }
                // strip \001 found in CTCP messages
                let msg: String = arg(2).chars().filter(|&c| c != '\u{1}').collect();
                if arg(1) == self.session.channel {
                    send::open_msg(&mut self.server_out, &msg);
                } else {
                    send::personal_msg(&mut self.server_out, arg(1), &msg);
                }
            }
            "MODE" => {
                if arg(1) != self.session.channel {
                    debug!("MODE for foreign channel '{}'", arg(1));
                } else if argv.len() == 2 {
                    let chan = self.session.channel.clone();
                    self.begin_enquiry(Enquiry::Names(chan));
                } else if arg(2) != "+o" || argv.len() < 4 {
                    warn!("invalid MODE args '{}'", arg(2));
                } else {
                    send::pass_moderation(&mut self.server_out, arg(3));
                }
            }
            "TOPIC" => {
                if arg(1) != self.session.channel {
                    warn!("invalid TOPIC channel '{}'", arg(1));
                } else if argv.len() < 3 {
                    warn!("TOPIC without a topic");
                } else {
                    send::topic(&mut self.server_out, arg(2));
                }
            }
            "LIST" => self.begin_enquiry(Enquiry::List),
            "NAMES" => self.begin_enquiry(Enquiry::Names(arg(1).to_string())),
            "WHOIS" => self.begin_enquiry(Enquiry::Whois(arg(1).to_string())),
            "WHO" => self.begin_enquiry(Enquiry::Who(arg(1).to_string())),
            "KICK" => {
                if arg(1) != self.session.channel {
                    warn!("invalid KICK channel '{}'", arg(1));
                } else if arg(2).is_empty() {
                    warn!("KICK without a nick");
                } else {
                    send::boot(&mut self.server_out, arg(2));
                }
            }
            "PING" => {
                send::noop(&mut self.server_out);
                crate::irc::send::pong(&mut self.client_out, arg(1));
            }
            "QUIT" => {
                info!("client QUIT");
                self.terminate = true;
            }
            // nothing to negotiate, and answering would only confuse the
            // client; https://ircv3.net/specs/extensions/capability-negotiation.html
            "CAP" => (),
            _ => warn!("unknown command '{}'", argv[0]),
        }
    }

    /// The login packet goes out once nick and ident are both known.
    fn try_login(&mut self) {
        if !self.session.logged_in
            && !self.session.nick.is_empty()
            && !self.session.ident.is_empty()
        {
            send::login(
                &mut self.server_out,
                &self.session.nick,
                &self.session.ident,
                &self.session.pass,
            );
        }
    }

    /// Starts a who-listing enquiry unless one is already outstanding; the
    /// server answers with command output and the `Total:` line closes the
    /// enquiry again.
    pub(super) fn begin_enquiry(&mut self, mode: Enquiry) {
        if self.session.enquiry != Enquiry::None {
            debug!("enquiry already outstanding, dropping request");
            return;
        }
        self.session.cur_group.clear();
        let arg = if mode == Enquiry::List { "-g" } else { "" };
        send::who_listing(&mut self.server_out, arg);
        self.session.enquiry = mode;
    }
}
