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

const MAX_ARGS: usize = 10;

/// One framed line from the client, split for dispatch.
#[derive(Debug, PartialEq)]
pub enum IrcLine {
    /// Blank line, nothing to dispatch.
    Empty,
    /// `RAWICB <rest>`: the rest of the line untokenised, spaces and all.
    Raw(String),
    /// Everything else: argv slots, `argv[0]` is the command.
    Command(Vec<String>),
}

fn lossy(b: &[u8]) -> String {
    String::from_utf8_lossy(b).into_owned()
}

/// Tokenises a command line into at most `MAX_ARGS` argv slots.
///
/// Tokens are separated by runs of spaces. A token starting with `:` ends
/// tokenisation and contributes the remainder of the line (colon stripped)
/// as the final slot. The last slot likewise absorbs whatever is left
/// unsplit once no slots remain.
pub fn tokenize(raw: &[u8]) -> Vec<String> {
    let mut argv = Vec::with_capacity(MAX_ARGS);
    let mut rest = raw;
    loop {
        if argv.len() + 1 == MAX_ARGS {
            argv.push(lossy(rest));
            return argv;
        }
        match rest.iter().position(|&b| b == b' ') {
            None => {
                argv.push(lossy(rest));
                return argv;
            }
            Some(sp) => {
                argv.push(lossy(&rest[..sp]));
                let mut p = &rest[sp + 1..];
                while p.first() == Some(&b' ') {
                    p = &p[1..];
                }
                if p.first() == Some(&b':') {
                    argv.push(lossy(&p[1..]));
                    return argv;
                }
                rest = p;
            }
        }
    }
}

pub fn parse(line: &[u8]) -> IrcLine {
    if line.is_empty() {
        return IrcLine::Empty;
    }
    if line.len() >= 7 && line[..7].eq_ignore_ascii_case(b"RAWICB ") {
        return IrcLine::Raw(lossy(&line[7..]));
    }
    IrcLine::Command(tokenize(line))
}

#[cfg(test)]
mod test {
    use super::{parse, tokenize, IrcLine};

    #[test]
    fn plain_args() {
        assert_eq!(tokenize(b"KICK #chan victim"), ["KICK", "#chan", "victim"]);
    }

    #[test]
    fn trailing_takes_rest() {
        assert_eq!(
            tokenize(b"PRIVMSG #chan :hello  world :x"),
            ["PRIVMSG", "#chan", "hello  world :x"]
        );
    }

    #[test]
    fn empty_trailing() {
        assert_eq!(tokenize(b"TOPIC #chan :"), ["TOPIC", "#chan", ""]);
    }

    #[test]
    fn space_runs_collapse() {
        assert_eq!(
            tokenize(b"MODE   #chan    +o   bob"),
            ["MODE", "#chan", "+o", "bob"]
        );
    }

    #[test]
    fn trailing_spaces_leave_empty_token() {
        assert_eq!(tokenize(b"LIST "), ["LIST", ""]);
    }

    #[test]
    fn command_only() {
        assert_eq!(tokenize(b"LIST"), ["LIST"]);
    }

    #[test]
    fn last_slot_keeps_remainder() {
        let argv = tokenize(b"a b c d e f g h i j k l");
        assert_eq!(argv.len(), 10);
        assert_eq!(argv[8], "i");
        assert_eq!(argv[9], "j k l");
    }

    #[test]
    fn rawicb_is_not_tokenised() {
        assert_eq!(
            parse(b"RAWICB hm,bob hi there"),
            IrcLine::Raw("hm,bob hi there".to_string())
        );
        // case-insensitive like every other command
        assert_eq!(parse(b"rawicb g,devs"), IrcLine::Raw("g,devs".to_string()));
        // no trailing space, no raw split
        match parse(b"RAWICB") {
            IrcLine::Command(argv) => assert_eq!(argv, ["RAWICB"]),
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn empty_line() {
        assert_eq!(parse(b""), IrcLine::Empty);
    }
}
