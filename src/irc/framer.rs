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

/// Longest accepted command line, excluding the `\n` delimiter.
pub const LINE_MAX: usize = 65534;

/// Outcome of pushing bytes through the framer.
#[derive(Debug, PartialEq)]
pub enum LineStep {
    /// A full line is ready via `line()`.
    Complete,
    /// Input exhausted mid-line.
    NeedMore,
    /// The line hit the cap; its tail is being dropped up to the delimiter.
    /// Reported once per line, the truncated head still completes later.
    Overlong,
}

/// Accumulates read(2) chunks into `\n`-delimited IRC lines.
/// A `\r` immediately before the delimiter is stripped.
pub struct LineFramer {
    buf: Box<[u8]>,
    len: usize,
    line_len: usize,
    overflowed: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        LineFramer {
            buf: vec![0u8; LINE_MAX].into_boxed_slice(),
            len: 0,
            line_len: 0,
            overflowed: false,
        }
    }

    /// Consumes bytes from the front of `input` until a line completes or
    /// the input runs out. On `Complete` the line is available via `line()`
    /// until the next call.
    pub fn feed(&mut self, input: &mut &[u8]) -> LineStep {
        while let Some(&b) = input.first() {
            *input = &input[1..];
            if b == b'\n' {
                let mut n = self.len;
                if n > 0 && self.buf[n - 1] == b'\r' {
                    n -= 1;
                }
                self.line_len = n;
                self.len = 0;
                self.overflowed = false;
                return LineStep::Complete;
            }
            if self.len < LINE_MAX {
                self.buf[self.len] = b;
                self.len += 1;
            } else if !self.overflowed {
                self.overflowed = true;
                return LineStep::Overlong;
            }
        }
        LineStep::NeedMore
    }

    pub fn line(&self) -> &[u8] {
        &self.buf[..self.line_len]
    }
}
