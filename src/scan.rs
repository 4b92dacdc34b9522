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

/// Skip/terminate tokeniser shared by the status-message parsers.
///
/// Advances `src` past any bytes found in `skip`, then collects bytes into
/// the returned token until a byte found in `term` (or the end of input).
/// The terminator is not consumed. The cursor always advances over the whole
/// token; the copy is silently bounded to `cap` bytes.
pub fn scan(src: &mut &[u8], skip: &[u8], term: &[u8], cap: usize) -> String {
    while let Some(&b) = src.first() {
        if !skip.contains(&b) {
            break;
        }
        *src = &src[1..];
    }
    let mut tok = Vec::new();
    while let Some(&b) = src.first() {
        if term.contains(&b) {
            break;
        }
        if tok.len() < cap {
            tok.push(b);
        }
        *src = &src[1..];
    }
    String::from_utf8_lossy(&tok).into_owned()
}

#[cfg(test)]
mod test {
    use super::scan;

    #[test]
    fn skip_then_terminate() {
        let mut src: &[u8] = b"  boja (bojan@host) entered";
        assert_eq!(scan(&mut src, b" ", b" ", 255), "boja");
        // cursor rests on the terminator
        assert_eq!(src, b" (bojan@host) entered");
        assert_eq!(scan(&mut src, b" (", b")", 255), "bojan@host");
        assert_eq!(src, b") entered");
    }

    #[test]
    fn empty_term_takes_rest() {
        let mut src: &[u8] = b") just leaving.";
        assert_eq!(scan(&mut src, b" )", b"", 255), "just leaving.");
        assert!(src.is_empty());
    }

    #[test]
    fn truncates_but_consumes() {
        let mut src: &[u8] = b"abcdefgh rest";
        assert_eq!(scan(&mut src, b"", b" ", 4), "abcd");
        // truncation never desynchronises the cursor
        assert_eq!(src, b" rest");
    }

    #[test]
    fn stable_on_same_input() {
        let one = scan(&mut &b"  tok end"[..], b" ", b" ", 255);
        let two = scan(&mut &b"  tok end"[..], b" ", b" ", 255);
        assert_eq!(one, two);
    }

    #[test]
    fn exhausted_source() {
        let mut src: &[u8] = b"   ";
        assert_eq!(scan(&mut src, b" ", b" ", 255), "");
        assert!(src.is_empty());
    }
}
