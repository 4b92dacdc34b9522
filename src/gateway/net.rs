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

//! Accepts one IRC client at a time, pairs it with a fresh connection to
//! the ICB server and shuttles bytes through the translator until either
//! side goes away.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::ToSocketAddrs;
use std::time::{Duration, Instant};

use log::{info, warn};
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};
use mio_signals::{Signal, SignalSet, Signals};

use crate::config::config_file::Config;
use crate::irc;

use super::Gateway;

const LISTENER: Token = Token(0);
const CLIENT_CONN: Token = Token(0);
const SERVER_CONN: Token = Token(1);
const SIGNAL_TOKEN: Token = Token(2);

fn open_conn(conn_str: String) -> Result<TcpStream, io::Error> {
    let mut conn_details = conn_str.to_socket_addrs()?;
    let mut try_e = io::Error::new(io::ErrorKind::Other, "no address to connect to");
    Ok(loop {
        if let Some(addr) = conn_details.next() {
            match TcpStream::connect(addr) {
                Ok(conn) => break conn,
                Err(e) => try_e = e,
            }
        } else {
            return Err(try_e);
        }
    })
}

pub(crate) enum ServeEnd {
    ClientDone,
    Shutdown,
}

enum ReadEnd {
    Open(u64),
    Eof,
}

fn read_into<T: Read, F: FnMut(&[u8])>(readable: &mut T, mut sink: F) -> io::Result<ReadEnd> {
    let mut buf = [0u8; 4096];
    let mut total = 0u64;
    loop {
        match readable.read(&mut buf) {
            Ok(0) => return Ok(ReadEnd::Eof),
            Ok(n) => {
                total += n as u64;
                sink(&buf[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(ReadEnd::Open(total)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Writes as much of the queue as the socket accepts. `Ok(true)` means the
/// socket blocked with bytes still queued; the next writable event retries.
fn flush_queue<T: Write>(queue: &mut VecDeque<u8>, writable: &mut T) -> io::Result<bool> {
    while !queue.is_empty() {
        let (head, _) = queue.as_slices();
        match writable.write(head) {
            Ok(0) => return Ok(true),
            Ok(n) => {
                queue.drain(..n);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(true),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(false)
}

/// Best-effort flush at teardown, bounded so a dead peer cannot hold the
/// session open.
fn drain_queue(queue: &mut VecDeque<u8>, stream: &mut TcpStream) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !queue.is_empty() && Instant::now() < deadline {
        match flush_queue(queue, stream) {
            Ok(true) => std::thread::sleep(Duration::from_millis(50)),
            Ok(false) => break,
            Err(_) => break,
        }
    }
}

/// Runs one client session to completion: connect to the ICB server, then
/// poll both sockets, feeding reads through the translator and flushing
/// its out-queues.
pub(crate) fn serve_client(
    mut client: TcpStream,
    config: &Config,
    mut signals: Option<&mut Signals>,
) -> io::Result<ServeEnd> {
    let start = Instant::now();
    let (mut bytes_in, mut bytes_out) = (0u64, 0u64);
    let mut gw = Gateway::new();

    let server_str = config.server_string();
    info!("connecting to server {}", server_str);
    irc::send::notice(
        gw.client_out(),
        &format!("*** Connecting to server {}", server_str),
    );
    let mut server = match open_conn(server_str) {
        Ok(conn) => conn,
        Err(e) => {
            irc::send::notice(gw.client_out(), &format!("*** Error: connect: {}", e));
            drain_queue(gw.client_out(), &mut client);
            return Err(e);
        }
    };
    irc::send::notice(gw.client_out(), "*** Connected");

    let mut poll = Poll::new()?;
    let mut events = Events::with_capacity(128);
    poll.registry()
        .register(&mut client, CLIENT_CONN, Interest::READABLE | Interest::WRITABLE)?;
    poll.registry()
        .register(&mut server, SERVER_CONN, Interest::READABLE | Interest::WRITABLE)?;
    if let Some(sig) = signals.as_deref_mut() {
        poll.registry().register(sig, SIGNAL_TOKEN, Interest::READABLE)?;
    }

    let mut end = ServeEnd::ClientDone;
    // the outbound connect completes on the first writable event
    let mut server_up = false;
    'outer: while !gw.terminated() {
        poll.poll(&mut events, Some(Duration::from_secs(10)))?;
        for event in &events {
            match event.token() {
                CLIENT_CONN => {
                    if event.is_readable() {
                        match read_into(&mut client, |chunk| gw.client_recv(chunk)) {
                            Ok(ReadEnd::Open(n)) => bytes_out += n,
                            Ok(ReadEnd::Eof) => {
                                info!("connection closed by client");
                                break 'outer;
                            }
                            Err(e) => {
                                warn!("client read: {}", e);
                                break 'outer;
                            }
                        }
                    }
                }
                SERVER_CONN => {
                    if event.is_writable() {
                        server_up = true;
                    }
                    if event.is_readable() {
                        match read_into(&mut server, |chunk| gw.server_recv(chunk)) {
                            Ok(ReadEnd::Open(n)) => bytes_in += n,
                            Ok(ReadEnd::Eof) => {
                                info!("connection closed by server");
                                irc::send::notice(
                                    gw.client_out(),
                                    "*** Connection closed by server",
                                );
                                break 'outer;
                            }
                            Err(e) => {
                                warn!("server read: {}", e);
                                irc::send::notice(
                                    gw.client_out(),
                                    &format!("*** Error: server connection: {}", e),
                                );
                                break 'outer;
                            }
                        }
                    }
                }
                SIGNAL_TOKEN => {
                    if let Some(sig) = signals.as_deref_mut() {
                        loop {
                            match sig.receive()? {
                                Some(Signal::Interrupt)
                                | Some(Signal::Terminate)
                                | Some(Signal::Quit) => {
                                    end = ServeEnd::Shutdown;
                                    break 'outer;
                                }
                                Some(_) => (),
                                None => break,
                            }
                        }
                    }
                }
                _ => unreachable!(),
            }
        }
        if let Err(e) = flush_queue(gw.client_out(), &mut client) {
            warn!("client write: {}", e);
            break;
        }
        if server_up {
            if let Err(e) = flush_queue(gw.server_out(), &mut server) {
                warn!("server write: {}", e);
                irc::send::notice(gw.client_out(), &format!("*** Error: server connection: {}", e));
                break;
            }
        }
    }

    let elapsed = start.elapsed().as_secs();
    if gw.terminated() {
        irc::send::notice(
            gw.client_out(),
            &format!(
                "*** Closing connection ({} seconds, {}:{} bytes)",
                elapsed, bytes_out, bytes_in
            ),
        );
    }
    drain_queue(gw.client_out(), &mut client);
    if server_up {
        drain_queue(gw.server_out(), &mut server);
    }
    if let Some(sig) = signals.as_deref_mut() {
        poll.registry().deregister(sig)?;
    }
    info!("({} seconds, {}:{} bytes)", elapsed, bytes_out, bytes_in);
    Ok(end)
}

/// Accept loop: one client at a time, serial sessions, until a
/// termination signal arrives.
pub fn run(config: &Config) -> io::Result<()> {
    let addr = config
        .listen_string()
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut listener = TcpListener::bind(addr)?;
    let mut signals = Signals::new(SignalSet::all())?;
    let mut poll = Poll::new()?;
    let mut events = Events::with_capacity(128);

    poll.registry()
        .register(&mut listener, LISTENER, Interest::READABLE)?;
    poll.registry()
        .register(&mut signals, SIGNAL_TOKEN, Interest::READABLE)?;
    info!("listening on {}", addr);

    loop {
        poll.poll(&mut events, Some(Duration::from_secs(10)))?;
        for event in &events {
            match event.token() {
                LISTENER => loop {
                    match listener.accept() {
                        Ok((client, peer)) => {
                            info!("client connection from {}", peer);
                            poll.registry().deregister(&mut signals)?;
                            let served = serve_client(client, config, Some(&mut signals));
                            poll.registry().register(
                                &mut signals,
                                SIGNAL_TOKEN,
                                Interest::READABLE,
                            )?;
                            match served {
                                Ok(ServeEnd::Shutdown) => return Ok(()),
                                Ok(ServeEnd::ClientDone) => (),
                                Err(e) => warn!("client session: {}", e),
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                        Err(e) => return Err(e),
                    }
                },
                SIGNAL_TOKEN => loop {
                    match signals.receive()? {
                        Some(Signal::Interrupt) | Some(Signal::Terminate)
                        | Some(Signal::Quit) => return Ok(()),
                        Some(_) => (),
                        None => break,
                    }
                },
                _ => unreachable!(),
            }
        }
    }
}
