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

//! IRC line construction. Every builder appends one `\r\n`-terminated line
//! to the client out-queue.

use std::collections::VecDeque;

pub fn line(out: &mut VecDeque<u8>, s: &str) {
    out.extend(s.as_bytes());
    out.extend(b"\r\n");
}

/// Unprefixed diagnostic to the client.
pub fn notice(out: &mut VecDeque<u8>, text: &str) {
    line(out, &format!("NOTICE {}", text));
}

/// Numeric reply: `:<from> <code> <nick> :<text>`.
pub fn code(out: &mut VecDeque<u8>, from: &str, nick: &str, code: &str, text: &str) {
    line(out, &format!(":{} {} {} :{}", from, code, nick, text));
}

pub fn msg(out: &mut VecDeque<u8>, src: &str, dst: &str, text: &str) {
    line(out, &format!(":{} PRIVMSG {} :{}", src, dst, text));
}

pub fn join(out: &mut VecDeque<u8>, src: &str, chan: &str) {
    line(out, &format!(":{} JOIN :{}", src, chan));
}

pub fn part(out: &mut VecDeque<u8>, src: &str, chan: &str) {
    line(out, &format!(":{} PART :{}", src, chan));
}

pub fn pong(out: &mut VecDeque<u8>, daemon: &str) {
    line(out, &format!("PONG {}", daemon));
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    fn drain(out: &mut VecDeque<u8>) -> String {
        String::from_utf8(out.drain(..).collect()).unwrap()
    }

    #[test]
    fn wire_forms() {
        let mut out = VecDeque::new();
        super::notice(&mut out, "*** Connected");
        assert_eq!(drain(&mut out), "NOTICE *** Connected\r\n");

        super::code(&mut out, "host.example", "alice", "001", "Welcome to icbgate alice");
        assert_eq!(
            drain(&mut out),
            ":host.example 001 alice :Welcome to icbgate alice\r\n"
        );

        super::msg(&mut out, "bob", "#devs", "hello world");
        assert_eq!(drain(&mut out), ":bob PRIVMSG #devs :hello world\r\n");

        super::join(&mut out, "alice", "#devs");
        super::part(&mut out, "alice", "#devs");
        assert_eq!(
            drain(&mut out),
            ":alice JOIN :#devs\r\n:alice PART :#devs\r\n"
        );

        super::pong(&mut out, ":irc.example");
        assert_eq!(drain(&mut out), "PONG :irc.example\r\n");
    }
}
