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

mod from_icb;
mod from_irc;
pub mod net;
pub mod session;

use std::collections::VecDeque;

use log::debug;

use crate::icb::framer::{PacketFramer, PacketStep};
use crate::icb::parse::IcbPacket;
use crate::irc::framer::{LineFramer, LineStep};
use crate::irc::parse::{self, IrcLine};

use self::session::Session;

/// The bidirectional translator for one client connection. Owns the
/// session, both framers and the out-queues for both directions; the I/O
/// loop feeds it chunks and drains the queues.
pub struct Gateway {
    session: Session,
    irc_framer: LineFramer,
    icb_framer: PacketFramer,
    client_out: VecDeque<u8>,
    server_out: VecDeque<u8>,
    terminate: bool,
}

impl Gateway {
    pub fn new() -> Self {
        Gateway {
            session: Session::new(),
            irc_framer: LineFramer::new(),
            icb_framer: PacketFramer::new(),
            client_out: VecDeque::new(),
            server_out: VecDeque::new(),
            terminate: false,
        }
    }

    /// Bytes read from the IRC client.
    pub fn client_recv(&mut self, chunk: &[u8]) {
        let mut cursor = chunk;
        loop {
            match self.irc_framer.feed(&mut cursor) {
                LineStep::NeedMore => break,
                LineStep::Overlong => {
                    debug!("overlong command line from client, dropping its tail");
                }
                LineStep::Complete => match parse::parse(self.irc_framer.line()) {
                    IrcLine::Empty => (),
                    IrcLine::Raw(data) => crate::icb::send::raw(&mut self.server_out, &data),
                    IrcLine::Command(argv) => self.irc_command(argv),
                },
            }
        }
    }

    /// Bytes read from the ICB server.
    pub fn server_recv(&mut self, chunk: &[u8]) {
        let mut cursor = chunk;
        loop {
            match self.icb_framer.feed(&mut cursor) {
                PacketStep::NeedMore => break,
                PacketStep::Complete => {
                    if let Some(packet) = IcbPacket::parse(self.icb_framer.packet()) {
                        self.icb_packet(packet);
                    }
                }
            }
        }
    }

    pub fn terminated(&self) -> bool {
        self.terminate
    }

    pub fn client_out(&mut self) -> &mut VecDeque<u8> {
        &mut self.client_out
    }

    pub fn server_out(&mut self) -> &mut VecDeque<u8> {
        &mut self.server_out
    }
}
