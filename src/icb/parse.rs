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

/// One parsed server packet, discriminated on the protocol type byte.
#[derive(Debug, PartialEq)]
pub enum IcbPacket {
    LoginOk,
    Open { from: String, text: String },
    Personal { from: String, text: String },
    Status { category: String, text: String },
    Error { text: String },
    Important { category: String, text: String },
    Exit,
    CommandOutput(Output),
    Protocol { level: String, host_id: String, server_id: String },
    Beep { from: String },
    Ping { payload: String },
    Pong { payload: String },
    Noop,
    Unknown { kind: u8, argc: usize },
}

/// The `i` (command output) payload, discriminated on its first field.
#[derive(Debug, PartialEq)]
pub enum Output {
    /// `co`: human text lines, one per remaining field.
    Generic(Vec<String>),
    /// `wl`: one row of a who listing.
    WhoRow(WhoRow),
    /// `wh`: deprecated header row.
    WhoHeader,
    Other { kind: String, argc: usize },
}

#[derive(Debug, PartialEq)]
pub struct WhoRow {
    pub flags: String,
    pub nick: String,
    pub idle: i64,
    pub signon: i64,
    pub ident: String,
    pub host: String,
}

impl WhoRow {
    pub fn is_moderator(&self) -> bool {
        self.flags.contains('m')
    }
}

/// Splits a packet payload on `\x01` separators. Fields may be empty; a
/// separator after the last field does not open another one. `\r` and `\n`
/// are replaced by `?` so a field can never break out of an IRC line.
fn split_fields(payload: &[u8]) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = Vec::new();
    for &b in payload {
        match b {
            1 => {
                fields.push(String::from_utf8_lossy(&cur).into_owned());
                cur.clear();
            }
            b'\r' | b'\n' => cur.push(b'?'),
            _ => cur.push(b),
        }
    }
    if !cur.is_empty() {
        fields.push(String::from_utf8_lossy(&cur).into_owned());
    }
    fields
}

/// Leading-integer parse in the manner of atol(3): optional sign, digits,
/// anything after the number ignored, 0 when there is no number.
fn atol(s: &str) -> i64 {
    let s = s.trim_start();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut n: i64 = 0;
    for c in digits.chars() {
        match c.to_digit(10) {
            Some(d) => n = n.saturating_mul(10).saturating_add(d as i64),
            None => break,
        }
    }
    if neg {
        -n
    } else {
        n
    }
}

fn take(fields: &mut Vec<String>, i: usize) -> String {
    if i < fields.len() {
        std::mem::take(&mut fields[i])
    } else {
        String::new()
    }
}

impl IcbPacket {
    /// Decodes a packet body (type byte plus payload). `None` for the
    /// empty body of a zero-length packet.
    pub fn parse(body: &[u8]) -> Option<IcbPacket> {
        let (&kind, payload) = body.split_first()?;
        let mut args = split_fields(payload);
        let argc = args.len();
        if kind == b'i' {
            return Some(IcbPacket::CommandOutput(Output::parse(args)));
        }
        let a = &mut args;
        Some(match kind {
            b'a' => IcbPacket::LoginOk,
            b'b' => IcbPacket::Open { from: take(a, 0), text: take(a, 1) },
            b'c' => IcbPacket::Personal { from: take(a, 0), text: take(a, 1) },
            b'd' => IcbPacket::Status { category: take(a, 0), text: take(a, 1) },
            b'e' => IcbPacket::Error { text: take(a, 0) },
            b'f' => IcbPacket::Important { category: take(a, 0), text: take(a, 1) },
            b'g' => IcbPacket::Exit,
            b'j' => IcbPacket::Protocol {
                level: take(a, 0),
                host_id: take(a, 1),
                server_id: take(a, 2),
            },
            b'k' => IcbPacket::Beep { from: take(a, 0) },
            b'l' => IcbPacket::Ping { payload: take(a, 0) },
            b'm' => IcbPacket::Pong { payload: take(a, 0) },
            b'n' => IcbPacket::Noop,
            _ => IcbPacket::Unknown { kind, argc },
        })
    }
}

impl Output {
    fn parse(mut args: Vec<String>) -> Output {
        let argc = args.len();
        let kind = take(&mut args, 0);
        match kind.as_str() {
            "co" => Output::Generic(args.drain(1..).collect()),
            "wl" => Output::WhoRow(WhoRow {
                flags: take(&mut args, 1),
                nick: take(&mut args, 2),
                idle: atol(&take(&mut args, 3)),
                signon: atol(&take(&mut args, 5)),
                ident: take(&mut args, 6),
                host: take(&mut args, 7),
            }),
            "wh" => Output::WhoHeader,
            _ => Output::Other {
                kind,
                argc: argc.saturating_sub(1),
            },
        }
    }
}
