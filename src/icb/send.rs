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

//! ICB packet construction. A packet is a length byte, a type byte and
//! `\x01`-separated fields; only the last field gets a terminating NUL
//! (some servers misbehave when every field is terminated, others when
//! none is). Payload bytes stop at `MAX_MSG_SIZE`; open and personal
//! messages are split across as many packets as the text needs, everything
//! else truncates.

use std::collections::VecDeque;

pub const MAX_MSG_SIZE: usize = 246;

struct PacketBuf {
    buf: [u8; 256],
    off: usize,
}

impl PacketBuf {
    fn new(kind: u8) -> Self {
        let mut p = PacketBuf {
            buf: [0u8; 256],
            off: 1,
        };
        p.push(kind);
        p
    }

    /// For packets whose type byte comes from the caller's data.
    fn raw() -> Self {
        PacketBuf {
            buf: [0u8; 256],
            off: 1,
        }
    }

    fn push(&mut self, b: u8) {
        if self.off < self.buf.len() {
            self.buf[self.off] = b;
            self.off += 1;
        }
    }

    fn sep(&mut self) {
        self.push(1);
    }

    /// Copies until the packet reaches the payload cap; the tail is dropped.
    fn push_bounded(&mut self, s: &[u8]) {
        for &b in s {
            if self.off >= MAX_MSG_SIZE {
                break;
            }
            self.push(b);
        }
    }

    /// Bounded copy reporting how many bytes fit, for message splitting.
    fn fill(&mut self, s: &[u8]) -> usize {
        let n = s.len().min(MAX_MSG_SIZE.saturating_sub(self.off));
        for &b in &s[..n] {
            self.push(b);
        }
        n
    }

    fn finish(mut self, out: &mut VecDeque<u8>) {
        self.push(0);
        self.buf[0] = (self.off - 1) as u8;
        out.extend(&self.buf[..self.off]);
    }
}

/// `h`-command with a single argument field.
fn command(out: &mut VecDeque<u8>, word: &[u8], arg: &str) {
    let mut p = PacketBuf::new(b'h');
    p.push_bounded(word);
    p.sep();
    p.push_bounded(arg.as_bytes());
    p.finish(out);
}

/// Login packet: loginid, nick, initial group, the fixed "login" command
/// word and three empty tail fields.
pub fn login(out: &mut VecDeque<u8>, nick: &str, ident: &str, group: &str) {
    let mut p = PacketBuf::new(b'a');
    p.push_bounded(ident.as_bytes());
    p.sep();
    p.push_bounded(nick.as_bytes());
    p.sep();
    p.push_bounded(group.as_bytes());
    p.sep();
    p.push_bounded(b"login");
    p.sep();
    p.sep();
    p.sep();
    p.finish(out);
}

/// Message to the current group, split across packets as needed.
pub fn open_msg(out: &mut VecDeque<u8>, msg: &str) {
    let mut rest = msg.as_bytes();
    while !rest.is_empty() {
        let mut p = PacketBuf::new(b'b');
        let n = p.fill(rest);
        rest = &rest[n..];
        p.finish(out);
    }
}

/// Private message; every packet repeats the `nick ` prefix in its
/// message field, split across packets as needed.
pub fn personal_msg(out: &mut VecDeque<u8>, nick: &str, msg: &str) {
    let mut rest = msg.as_bytes();
    while !rest.is_empty() {
        let mut p = PacketBuf::new(b'h');
        p.push_bounded(b"m");
        p.sep();
        p.push_bounded(nick.as_bytes());
        p.push(b' ');
        let n = p.fill(rest);
        if n == 0 {
            // nick leaves no room for payload; drop instead of spinning
            break;
        }
        rest = &rest[n..];
        p.finish(out);
    }
}

pub fn group(out: &mut VecDeque<u8>, group: &str) {
    command(out, b"g", group);
}

/// The `hw` who-listing enquiry behind LIST/NAMES/WHO/WHOIS.
pub fn who_listing(out: &mut VecDeque<u8>, arg: &str) {
    command(out, b"w", arg);
}

pub fn pass_moderation(out: &mut VecDeque<u8>, nick: &str) {
    command(out, b"pass", nick);
}

pub fn topic(out: &mut VecDeque<u8>, topic: &str) {
    command(out, b"topic", topic);
}

pub fn boot(out: &mut VecDeque<u8>, nick: &str) {
    command(out, b"boot", nick);
}

pub fn rename(out: &mut VecDeque<u8>, nick: &str) {
    command(out, b"name", nick);
}

/// Operator escape hatch: `,` becomes the field separator and `\` a NUL,
/// the rest is copied verbatim; the first byte of the data is the type.
pub fn raw(out: &mut VecDeque<u8>, data: &str) {
    let mut p = PacketBuf::raw();
    for &b in data.as_bytes() {
        if p.off >= MAX_MSG_SIZE {
            break;
        }
        match b {
            b',' => p.push(1),
            b'\\' => p.push(0),
            _ => p.push(b),
        }
    }
    p.finish(out);
}

pub fn noop(out: &mut VecDeque<u8>) {
    PacketBuf::new(b'n').finish(out);
}
