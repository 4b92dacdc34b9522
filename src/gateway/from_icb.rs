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

//! Server-to-client half: dispatches parsed ICB packets into IRC lines and
//! drives the enquiry state machine behind LIST/NAMES/WHOIS/WHO.

use log::info;

use crate::icb::parse::{IcbPacket, Output, WhoRow};
use crate::irc::send;
use crate::scan::scan;

use super::session::Enquiry;
use super::Gateway;

/// Copy bound for tokens pulled out of status messages.
const BOUND: usize = 255;

impl Gateway {
    pub(super) fn icb_packet(&mut self, packet: IcbPacket) {
        match packet {
            IcbPacket::LoginOk => self.login_ok(),
            IcbPacket::Open { from, text } => {
                if !self.session.in_channel {
                    self.join_own_channel();
                }
                send::msg(&mut self.client_out, &from, &self.session.channel, &text);
            }
            IcbPacket::Personal { from, text } => {
                send::msg(&mut self.client_out, &from, &self.session.nick, &text);
            }
            IcbPacket::Status { category, text } => self.status_message(&category, &text),
            IcbPacket::Error { text } => {
                send::notice(&mut self.client_out, &format!("ICB Error Message: {}", text));
            }
            IcbPacket::Important { category, text } => {
                send::notice(
                    &mut self.client_out,
                    &format!("ICB Important Message: {}: {}", category, text),
                );
            }
            IcbPacket::Exit => {
                send::notice(&mut self.client_out, "ICB Exit");
                info!("server Exit");
                self.terminate = true;
            }
            IcbPacket::CommandOutput(output) => self.command_output(output),
            IcbPacket::Protocol {
                level,
                host_id,
                server_id,
            } => {
                self.session.protolevel = level;
                self.session.host_id = host_id;
                self.session.server_id = server_id;
            }
            IcbPacket::Beep { from } => {
                send::notice(&mut self.client_out, &format!("ICB Beep from {}", from));
            }
            IcbPacket::Ping { payload } => {
                send::notice(&mut self.client_out, &format!("ICB Ping '{}'", payload));
            }
            IcbPacket::Pong { payload } => {
                send::notice(&mut self.client_out, &format!("ICB Pong '{}'", payload));
            }
            IcbPacket::Noop => send::notice(&mut self.client_out, "ICB No-op"),
            IcbPacket::Unknown { kind, argc } => {
                send::notice(
                    &mut self.client_out,
                    &format!("ICB unknown command {}: {} args", kind, argc),
                );
            }
        }
    }

    fn login_ok(&mut self) {
        let s = &self.session;
        let out = &mut self.client_out;
        send::code(out, &s.host_id, &s.nick, "001", &format!("Welcome to icbgate {}", s.nick));
        send::code(
            out,
            &s.host_id,
            &s.nick,
            "002",
            &format!(
                "Your host is {} running {} protocol {}",
                s.host_id, s.server_id, s.protolevel
            ),
        );
        send::code(out, &s.host_id, &s.nick, "003", "This server was created recently");
        send::code(
            out,
            &s.host_id,
            &s.nick,
            "004",
            &format!("{} {}", s.server_id, s.protolevel),
        );
        // some clients really want to see a MOTD
        send::code(out, &s.host_id, &s.nick, "375", &format!("ICB server: {}", s.server_id));
        send::code(out, &s.host_id, &s.nick, "376", "End of MOTD");
        self.session.logged_in = true;
    }

    /// JOIN for our own nick plus the implicit names enquiry that fills the
    /// client's member list.
    fn join_own_channel(&mut self) {
        send::join(&mut self.client_out, &self.session.nick, &self.session.channel);
        self.session.in_channel = true;
        let chan = self.session.channel.clone();
        self.begin_enquiry(Enquiry::Names(chan));
    }

    fn status_message(&mut self, category: &str, text: &str) {
        let mut rest = text.as_bytes();
        match category {
            "Status" if text.starts_with("You are now in group ") => {
                if !self.session.channel.is_empty() {
                    send::part(&mut self.client_out, &self.session.nick, &self.session.channel);
                }
                rest = &rest[21..];
                let group = scan(&mut rest, b" ", b" ", BOUND);
                self.session.channel = format!("#{}", group);
                self.join_own_channel();
            }
            "Arrive" | "Sign-on" => {
                let nick = scan(&mut rest, b" ", b" ", BOUND);
                let host = scan(&mut rest, b" (", b")", BOUND);
                send::join(
                    &mut self.client_out,
                    &format!("{}!{}", nick, host),
                    &self.session.channel,
                );
                self.session.in_channel = true;
            }
            "Depart" => {
                let nick = scan(&mut rest, b" ", b" ", BOUND);
                let host = scan(&mut rest, b" (", b")", BOUND);
                send::part(
                    &mut self.client_out,
                    &format!("{}!{}", nick, host),
                    &self.session.channel,
                );
            }
            "Sign-off" => {
                let nick = scan(&mut rest, b" ", b" ", BOUND);
                let host = scan(&mut rest, b" (", b")", BOUND);
                let mut reason = scan(&mut rest, b" )", b"", BOUND);
                if reason.ends_with('.') {
                    reason.pop();
                }
                send::line(
                    &mut self.client_out,
                    &format!(":{}!{} QUIT :{}", nick, host, reason),
                );
            }
            "Name" => {
                let old = scan(&mut rest, b" ", b" ", BOUND);
                if !rest.starts_with(b" changed nickname to ") {
                    return;
                }
                rest = &rest[21..];
                let new = scan(&mut rest, b" ", b" ", BOUND);
                send::line(&mut self.client_out, &format!(":{} NICK :{}", old, new));
                if old == self.session.nick {
                    self.session.nick = new;
                }
            }
            "Topic" => {
                let nick = scan(&mut rest, b" ", b" ", BOUND);
                if !rest.starts_with(b" changed the topic to \"") {
                    return;
                }
                rest = &rest[23..];
                let topic = scan(&mut rest, b"", b"\"", BOUND);
                send::line(
                    &mut self.client_out,
                    &format!(":{} TOPIC {} :{}", nick, self.session.channel, topic),
                );
            }
            "Pass" => {
                let old = scan(&mut rest, b" ", b" ", BOUND);
                if rest.starts_with(b" has passed moderation to ") {
                    rest = &rest[26..];
                    let new = scan(&mut rest, b" ", b" ", BOUND);
                    send::line(
                        &mut self.client_out,
                        &format!(
                            ":{} MODE {} -o+o {} {}",
                            old, self.session.channel, old, new
                        ),
                    );
                    self.session.moderator = new;
                } else if rest == b" is now mod." {
                    send::line(
                        &mut self.client_out,
                        &format!(
                            ":{} MODE {} +o {}",
                            self.session.host_id, self.session.channel, old
                        ),
                    );
                    self.session.moderator = old;
                }
            }
            "Boot" => {
                let nick = scan(&mut rest, b" ", b" ", BOUND);
                if rest != b" was booted." {
                    return;
                }
                send::line(
                    &mut self.client_out,
                    &format!(
                        ":{} KICK {} {} :booted",
                        self.session.moderator, self.session.channel, nick
                    ),
                );
            }
            _ => {
                send::notice(
                    &mut self.client_out,
                    &format!("ICB Status Message: {}: {}", category, text),
                );
            }
        }
    }

    fn command_output(&mut self, output: Output) {
        match output {
            Output::Generic(lines) => {
                for line in lines {
                    self.command_output_line(&line);
                }
            }
            Output::WhoRow(row) => self.who_row(row),
            // whois header, deprecated
            Output::WhoHeader => (),
            Output::Other { kind, argc } => {
                send::notice(
                    &mut self.client_out,
                    &format!("ICB Command Output: {}: {} args", kind, argc),
                );
            }
        }
    }

    /// One human line of `co` output. `Group:` rows name the group whose
    /// members follow and feed LIST/NAMES replies; the `Total:` row closes
    /// whatever enquiry is outstanding.
    fn command_output_line(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix("Group: ") {
            let name_end = rest.find(' ').unwrap_or_else(|| rest.len());
            let group = format!("#{}", &rest[..name_end]);
            self.session.cur_group = group.clone();
            let after = &rest[name_end..];
            let topic = match after.find("Topic: ") {
                Some(i) => &after[i + 7..],
                None => "(None)",
            };
            let s = &self.session;
            match &s.enquiry {
                Enquiry::List => send::line(
                    &mut self.client_out,
                    &format!(":{} 322 {} {} 1 :{}", s.host_id, s.nick, group, topic),
                ),
                Enquiry::Names(query) if s.cur_group == *query => send::line(
                    &mut self.client_out,
                    &format!(":{} 332 {} {} :{}", s.host_id, s.nick, s.cur_group, topic),
                ),
                _ => (),
            }
        } else if line.starts_with("Total: ") {
            let s = &self.session;
            match &s.enquiry {
                Enquiry::List => send::line(
                    &mut self.client_out,
                    &format!(":{} 323 {} :End of /LIST", s.host_id, s.nick),
                ),
                Enquiry::Names(query) => send::line(
                    &mut self.client_out,
                    &format!(":{} 366 {} {} :End of /NAMES list.", s.host_id, s.nick, query),
                ),
                Enquiry::Who(mask) => send::line(
                    &mut self.client_out,
                    &format!(":{} 315 {} {} :End of /WHO list.", s.host_id, s.nick, mask),
                ),
                _ => (),
            }
            self.session.enquiry = Enquiry::None;
        } else if line != " " {
            send::notice(&mut self.client_out, &format!("*** Unknown ico: {}", line));
        }
    }

    fn who_row(&mut self, row: WhoRow) {
        let chanop = row.is_moderator();
        let s = &self.session;
        let out = &mut self.client_out;
        match &s.enquiry {
            Enquiry::Whois(query) if *query == row.nick => {
                send::line(
                    out,
                    &format!(
                        ":{} 311 {} {} {} {} * :",
                        s.host_id, s.nick, row.nick, row.ident, row.host
                    ),
                );
                if !s.cur_group.is_empty() {
                    send::line(
                        out,
                        &format!(
                            ":{} 319 {} {} :{}{}",
                            s.host_id,
                            s.nick,
                            row.nick,
                            if chanop { "@" } else { "" },
                            s.cur_group
                        ),
                    );
                }
                send::line(
                    out,
                    &format!(":{} 312 {} {} {} :", s.host_id, s.nick, row.nick, s.host_id),
                );
                send::line(
                    out,
                    &format!(
                        ":{} 317 {} {} {} {} :seconds idle, signon time",
                        s.host_id, s.nick, row.nick, row.idle, row.signon
                    ),
                );
                send::line(
                    out,
                    &format!(
                        ":{} 318 {} {} :End of /WHOIS list.",
                        s.host_id, s.nick, row.nick
                    ),
                );
            }
            Enquiry::Names(query) if s.cur_group == *query => {
                send::line(
                    out,
                    &format!(
                        ":{} 353 {} @ {} :{}{} ",
                        s.host_id,
                        s.nick,
                        s.cur_group,
                        if chanop { "@" } else { "" },
                        row.nick
                    ),
                );
                send::line(
                    out,
                    &format!(
                        ":{} 352 {} {} {} {} {} {} H :5 {}",
                        s.host_id, s.nick, s.cur_group, row.nick, row.host, s.host_id,
                        row.nick, row.ident
                    ),
                );
            }
            Enquiry::Who(mask) => {
                let matched = if mask.starts_with('#') {
                    s.cur_group == *mask
                } else {
                    format!("{}!{}@{}", row.nick, row.ident, row.host).contains(mask.as_str())
                };
                if matched {
                    send::line(
                        out,
                        &format!(
                            ":{} 352 {} {} {} {} {} {} H :5 {}",
                            s.host_id, s.nick, s.cur_group, row.nick, row.host, s.host_id,
                            row.nick, row.ident
                        ),
                    );
                }
            }
            _ => (),
        }
        if chanop && self.session.cur_group == self.session.channel {
            self.session.moderator = row.nick;
        }
    }
}

#[cfg(test)]
mod test {
    use crate::gateway::session::Enquiry;
    use crate::gateway::Gateway;

    fn pkt(kind: u8, fields: &[&str]) -> Vec<u8> {
        let payload = fields.join("\x01");
        let mut v = vec![(payload.len() + 1) as u8, kind];
        v.extend(payload.as_bytes());
        v
    }

    fn client_text(g: &mut Gateway) -> String {
        String::from_utf8(g.client_out().drain(..).collect()).unwrap()
    }

    fn server_bytes(g: &mut Gateway) -> Vec<u8> {
        g.server_out().drain(..).collect()
    }

    fn logged_in() -> Gateway {
        let mut g = Gateway::new();
        g.server_recv(&pkt(b'j', &["1", "host.example", "icbd"]));
        g.client_recv(b"NICK alice\r\nUSER alice 0 * :Alice\r\n");
        g.server_recv(&pkt(b'a', &[]));
        g.client_out().clear();
        g.server_out().clear();
        g
    }

    #[test]
    fn login_ok_sends_greeting_numerics() {
        let mut g = Gateway::new();
        g.server_recv(&pkt(b'j', &["1", "host.example", "icbd"]));
        g.client_recv(b"NICK alice\r\nUSER alice 0 * :Alice\r\n");
        g.client_out().clear();
        g.server_out().clear();
        g.server_recv(&pkt(b'a', &[]));
        let text = client_text(&mut g);
        assert_eq!(
            text,
            ":host.example 001 alice :Welcome to icbgate alice\r\n\
             :host.example 002 alice :Your host is host.example running icbd protocol 1\r\n\
             :host.example 003 alice :This server was created recently\r\n\
             :host.example 004 alice :icbd 1\r\n\
             :host.example 375 alice :ICB server: icbd\r\n\
             :host.example 376 alice :End of MOTD\r\n"
        );
    }

    #[test]
    fn join_via_status_message() {
        let mut g = logged_in();
        g.server_recv(&pkt(b'd', &["Status", "You are now in group devs by invitation"]));
        assert_eq!(g.session.channel, "#devs");
        assert!(g.session.in_channel);
        assert_eq!(client_text(&mut g), ":alice JOIN :#devs\r\n");
        // the implicit names enquiry goes to the server
        assert_eq!(server_bytes(&mut g), b"\x04hw\x01\x00");
        assert_eq!(g.session.enquiry, Enquiry::Names("#devs".to_string()));
    }

    #[test]
    fn group_change_parts_old_channel() {
        let mut g = logged_in();
        g.server_recv(&pkt(b'd', &["Status", "You are now in group devs"]));
        g.client_out().clear();
        g.server_out().clear();
        g.session.enquiry = Enquiry::None;
        g.server_recv(&pkt(b'd', &["Status", "You are now in group ops"]));
        assert_eq!(
            client_text(&mut g),
            ":alice PART :#devs\r\n:alice JOIN :#ops\r\n"
        );
        assert_eq!(g.session.channel, "#ops");
    }

    #[test]
    fn open_message_joins_first() {
        let mut g = logged_in();
        g.session.channel = "#devs".to_string();
        g.server_recv(&pkt(b'b', &["bob", "hello world"]));
        assert_eq!(
            client_text(&mut g),
            ":alice JOIN :#devs\r\n:bob PRIVMSG #devs :hello world\r\n"
        );
        assert_eq!(server_bytes(&mut g), b"\x04hw\x01\x00");
        // a second message goes straight through
        g.server_recv(&pkt(b'b', &["bob", "again"]));
        assert_eq!(client_text(&mut g), ":bob PRIVMSG #devs :again\r\n");
        assert!(server_bytes(&mut g).is_empty());
    }

    #[test]
    fn personal_message_targets_own_nick() {
        let mut g = logged_in();
        g.server_recv(&pkt(b'c', &["bob", "psst"]));
        assert_eq!(client_text(&mut g), ":bob PRIVMSG alice :psst\r\n");
    }

    #[test]
    fn arrive_depart_signoff() {
        let mut g = logged_in();
        g.session.channel = "#devs".to_string();
        g.session.in_channel = true;
        g.server_recv(&pkt(b'd', &["Arrive", "bob (bob@example.org) entered group"]));
        assert_eq!(client_text(&mut g), ":bob!bob@example.org JOIN :#devs\r\n");
        g.server_recv(&pkt(b'd', &["Depart", "bob (bob@example.org) just left"]));
        assert_eq!(client_text(&mut g), ":bob!bob@example.org PART :#devs\r\n");
        g.server_recv(&pkt(b'd', &["Sign-off", "bob (bob@example.org) has signed off."]));
        assert_eq!(
            client_text(&mut g),
            ":bob!bob@example.org QUIT :has signed off\r\n"
        );
    }

    #[test]
    fn nick_change_updates_own_nick() {
        let mut g = logged_in();
        g.server_recv(&pkt(b'd', &["Name", "bob changed nickname to rob"]));
        assert_eq!(client_text(&mut g), ":bob NICK :rob\r\n");
        assert_eq!(g.session.nick, "alice");
        g.server_recv(&pkt(b'd', &["Name", "alice changed nickname to alicia"]));
        assert_eq!(client_text(&mut g), ":alice NICK :alicia\r\n");
        assert_eq!(g.session.nick, "alicia");
    }

    #[test]
    fn topic_change() {
        let mut g = logged_in();
        g.session.channel = "#devs".to_string();
        g.server_recv(&pkt(b'd', &["Topic", "bob changed the topic to \"the daily\""]));
        assert_eq!(client_text(&mut g), ":bob TOPIC #devs :the daily\r\n");
    }

    #[test]
    fn moderation_hand_over() {
        let mut g = logged_in();
        g.session.channel = "#devs".to_string();
        g.server_recv(&pkt(b'd', &["Pass", "bob has passed moderation to carol"]));
        assert_eq!(client_text(&mut g), ":bob MODE #devs -o+o bob carol\r\n");
        assert_eq!(g.session.moderator, "carol");
        g.server_recv(&pkt(b'd', &["Pass", "dave is now mod."]));
        assert_eq!(client_text(&mut g), ":host.example MODE #devs +o dave\r\n");
        assert_eq!(g.session.moderator, "dave");
    }

    #[test]
    fn boot_becomes_kick() {
        let mut g = logged_in();
        g.session.channel = "#devs".to_string();
        g.session.moderator = "carol".to_string();
        g.server_recv(&pkt(b'd', &["Boot", "bob was booted."]));
        assert_eq!(client_text(&mut g), ":carol KICK #devs bob :booted\r\n");
        // a malformed boot falls through silently
        g.server_recv(&pkt(b'd', &["Boot", "bob wandered off."]));
        assert_eq!(client_text(&mut g), "");
    }

    #[test]
    fn unmatched_status_is_surfaced() {
        let mut g = logged_in();
        g.server_recv(&pkt(b'd', &["Notify", "bob is on now"]));
        assert_eq!(
            client_text(&mut g),
            "NOTICE ICB Status Message: Notify: bob is on now\r\n"
        );
    }

    #[test]
    fn list_flow() {
        let mut g = logged_in();
        g.client_recv(b"LIST\r\n");
        assert_eq!(server_bytes(&mut g), b"\x06hw\x01-g\x00");
        g.server_recv(&pkt(
            b'i',
            &["co", "Group: devs Topic: the daily", "Total: 1 groups 3 users"],
        ));
        assert_eq!(
            client_text(&mut g),
            ":host.example 322 alice #devs 1 :the daily\r\n\
             :host.example 323 alice :End of /LIST\r\n"
        );
        assert_eq!(g.session.enquiry, Enquiry::None);
    }

    #[test]
    fn list_defaults_topic() {
        let mut g = logged_in();
        g.client_recv(b"LIST\r\n");
        server_bytes(&mut g);
        g.server_recv(&pkt(b'i', &["co", "Group: devs 3 users"]));
        assert_eq!(
            client_text(&mut g),
            ":host.example 322 alice #devs 1 :(None)\r\n"
        );
    }

    #[test]
    fn names_flow() {
        let mut g = logged_in();
        g.session.channel = "#devs".to_string();
        g.client_recv(b"NAMES #devs\r\n");
        assert_eq!(server_bytes(&mut g), b"\x04hw\x01\x00");
        g.server_recv(&pkt(b'i', &["co", "Group: devs Topic: the daily"]));
        assert_eq!(
            client_text(&mut g),
            ":host.example 332 alice #devs :the daily\r\n"
        );
        g.server_recv(&pkt(
            b'i',
            &["wl", "m", "bob", "120", "0", "1000000", "bob", "example.org"],
        ));
        assert_eq!(
            client_text(&mut g),
            ":host.example 353 alice @ #devs :@bob \r\n\
             :host.example 352 alice #devs bob example.org host.example bob H :5 bob\r\n"
        );
        // the listing names the moderator of our channel
        assert_eq!(g.session.moderator, "bob");
        g.server_recv(&pkt(b'i', &["co", "Total: 2 users"]));
        assert_eq!(
            client_text(&mut g),
            ":host.example 366 alice #devs :End of /NAMES list.\r\n"
        );
        assert_eq!(g.session.enquiry, Enquiry::None);
    }

    #[test]
    fn names_for_other_group_stays_quiet() {
        let mut g = logged_in();
        g.client_recv(b"NAMES #devs\r\n");
        server_bytes(&mut g);
        g.server_recv(&pkt(b'i', &["co", "Group: ops Topic: other"]));
        g.server_recv(&pkt(
            b'i',
            &["wl", "", "bob", "120", "0", "1000000", "bob", "example.org"],
        ));
        assert_eq!(client_text(&mut g), "");
    }

    #[test]
    fn whois_flow() {
        let mut g = logged_in();
        g.client_recv(b"WHOIS bob\r\n");
        server_bytes(&mut g);
        g.server_recv(&pkt(b'i', &["co", "Group: devs Topic: t"]));
        g.server_recv(&pkt(
            b'i',
            &["wl", "m", "bob", "120", "0", "1000000", "bob", "example.org"],
        ));
        assert_eq!(
            client_text(&mut g),
            ":host.example 311 alice bob bob example.org * :\r\n\
             :host.example 319 alice bob :@#devs\r\n\
             :host.example 312 alice bob host.example :\r\n\
             :host.example 317 alice bob 120 1000000 :seconds idle, signon time\r\n\
             :host.example 318 alice bob :End of /WHOIS list.\r\n"
        );
        // rows for other nicks say nothing
        g.server_recv(&pkt(
            b'i',
            &["wl", "", "carol", "5", "0", "1000001", "carol", "example.org"],
        ));
        assert_eq!(client_text(&mut g), "");
        g.server_recv(&pkt(b'i', &["co", "Total: 2 users"]));
        assert_eq!(client_text(&mut g), "");
        assert_eq!(g.session.enquiry, Enquiry::None);
    }

    #[test]
    fn who_matches_hostmask_or_group() {
        let mut g = logged_in();
        g.client_recv(b"WHO bob@example\r\n");
        server_bytes(&mut g);
        g.server_recv(&pkt(b'i', &["co", "Group: devs Topic: t"]));
        g.server_recv(&pkt(
            b'i',
            &["wl", "", "bob", "120", "0", "1000000", "bob", "example.org"],
        ));
        g.server_recv(&pkt(
            b'i',
            &["wl", "", "carol", "5", "0", "1000001", "carol", "other.net"],
        ));
        g.server_recv(&pkt(b'i', &["co", "Total: 2 users"]));
        assert_eq!(
            client_text(&mut g),
            ":host.example 352 alice #devs bob example.org host.example bob H :5 bob\r\n\
             :host.example 315 alice bob@example :End of /WHO list.\r\n"
        );

        g.client_recv(b"WHO #devs\r\n");
        server_bytes(&mut g);
        g.server_recv(&pkt(b'i', &["co", "Group: devs Topic: t"]));
        g.server_recv(&pkt(
            b'i',
            &["wl", "", "carol", "5", "0", "1000001", "carol", "other.net"],
        ));
        assert_eq!(
            client_text(&mut g),
            ":host.example 352 alice #devs carol other.net host.example carol H :5 carol\r\n"
        );
    }

    #[test]
    fn blank_and_unknown_output_lines() {
        let mut g = logged_in();
        g.server_recv(&pkt(b'i', &["co", " ", "members:"]));
        assert_eq!(client_text(&mut g), "NOTICE *** Unknown ico: members:\r\n");
        g.server_recv(&pkt(b'i', &["xx", "a", "b"]));
        assert_eq!(
            client_text(&mut g),
            "NOTICE ICB Command Output: xx: 2 args\r\n"
        );
    }

    #[test]
    fn diagnostics_and_exit() {
        let mut g = logged_in();
        g.server_recv(&pkt(b'e', &["no such group"]));
        g.server_recv(&pkt(b'f', &["Notice", "server going down"]));
        g.server_recv(&pkt(b'k', &["bob"]));
        g.server_recv(&pkt(b'l', &["tag"]));
        g.server_recv(&pkt(b'm', &["tag"]));
        g.server_recv(&pkt(b'n', &[]));
        g.server_recv(&pkt(b'z', &["?"]));
        assert_eq!(
            client_text(&mut g),
            "NOTICE ICB Error Message: no such group\r\n\
             NOTICE ICB Important Message: Notice: server going down\r\n\
             NOTICE ICB Beep from bob\r\n\
             NOTICE ICB Ping 'tag'\r\n\
             NOTICE ICB Pong 'tag'\r\n\
             NOTICE ICB No-op\r\n\
             NOTICE ICB unknown command 122: 1 args\r\n"
        );
        assert!(!g.terminated());
        g.server_recv(&pkt(b'g', &[]));
        assert_eq!(client_text(&mut g), "NOTICE ICB Exit\r\n");
        assert!(g.terminated());
    }

    #[test]
    fn fields_cannot_break_out_of_irc_lines() {
        let mut g = logged_in();
        let mut v = vec![0u8, b'c'];
        let payload = b"bob\x01hi\r\nJOIN :#evil";
        v[0] = (payload.len() + 1) as u8;
        v.extend(payload);
        g.server_recv(&v);
        assert_eq!(client_text(&mut g), ":bob PRIVMSG alice :hi??JOIN :#evil\r\n");
    }
}
