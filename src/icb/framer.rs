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

/// Outcome of pushing bytes through the framer.
#[derive(Debug, PartialEq)]
pub enum PacketStep {
    /// A whole packet body is ready via `packet()`.
    Complete,
    /// Input exhausted mid-packet.
    NeedMore,
}

/// Accumulates read(2) chunks into length-prefixed ICB packets.
///
/// A packet is a length byte L (0..=255), a type byte and L-1 payload
/// bytes; the accumulator is sized for the worst case, so it cannot
/// overflow. `packet()` exposes the body without the length byte.
pub struct PacketFramer {
    buf: [u8; 256],
    off: usize,
    ready: bool,
}

impl PacketFramer {
    pub fn new() -> Self {
        PacketFramer {
            buf: [0u8; 256],
            off: 0,
            ready: false,
        }
    }

    pub fn feed(&mut self, input: &mut &[u8]) -> PacketStep {
        if self.ready {
            self.off = 0;
            self.ready = false;
        }
        while !input.is_empty() {
            if self.off == 0 {
                self.buf[0] = input[0];
                self.off = 1;
                *input = &input[1..];
            }
            let need = self.buf[0] as usize + 1;
            let take = (need - self.off).min(input.len());
            self.buf[self.off..self.off + take].copy_from_slice(&input[..take]);
            self.off += take;
            *input = &input[take..];
            if self.off == need {
                self.ready = true;
                return PacketStep::Complete;
            }
        }
        PacketStep::NeedMore
    }

    /// Type byte plus payload of the completed packet. Empty for a
    /// zero-length packet, which carries nothing to dispatch.
    pub fn packet(&self) -> &[u8] {
        &self.buf[1..self.off]
    }
}

#[cfg(test)]
mod test {
    use super::{PacketFramer, PacketStep};

    fn pkt(kind: u8, payload: &[u8]) -> Vec<u8> {
        let mut v = vec![(payload.len() + 1) as u8, kind];
        v.extend(payload);
        v
    }

    #[test]
    fn chunked_packets_arrive_in_order() {
        let mut stream = pkt(b'j', b"1\x01host.example\x01icbd");
        stream.extend(pkt(b'a', b""));
        stream.extend(pkt(b'b', b"bob\x01hello world"));

        for chunk_size in 1..=stream.len() {
            let mut framer = PacketFramer::new();
            let mut got = Vec::new();
            for chunk in stream.chunks(chunk_size) {
                let mut cursor = chunk;
                loop {
                    match framer.feed(&mut cursor) {
                        PacketStep::Complete => got.push(framer.packet().to_vec()),
                        PacketStep::NeedMore => break,
                    }
                }
            }
            assert_eq!(got.len(), 3, "chunk size {}", chunk_size);
            assert_eq!(got[0], b"j1\x01host.example\x01icbd");
            assert_eq!(got[1], b"a");
            assert_eq!(got[2], b"bob\x01hello world");
        }
    }

    #[test]
    fn maximum_length_packet() {
        let payload = vec![b'x'; 254];
        let bytes = pkt(b'b', &payload);
        assert_eq!(bytes.len(), 256);
        let mut framer = PacketFramer::new();
        let mut cursor = &bytes[..];
        assert_eq!(framer.feed(&mut cursor), PacketStep::Complete);
        assert_eq!(framer.packet().len(), 255);
    }

    #[test]
    fn zero_length_packet_yields_empty_body() {
        let mut framer = PacketFramer::new();
        let mut cursor: &[u8] = &[0u8, 2, b'n', 0];
        assert_eq!(framer.feed(&mut cursor), PacketStep::Complete);
        assert!(framer.packet().is_empty());
        // and the stream stays in sync
        assert_eq!(framer.feed(&mut cursor), PacketStep::Complete);
        assert_eq!(framer.packet(), b"n\x00");
    }
}
