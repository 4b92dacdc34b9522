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

/// The one outstanding LIST/NAMES/WHOIS/WHO enquiry, with its target.
/// Holding the target inside the variant keeps a second enquiry from
/// existing at all.
#[derive(Debug, PartialEq)]
pub enum Enquiry {
    None,
    List,
    Names(String),
    Whois(String),
    Who(String),
}

impl Default for Enquiry {
    fn default() -> Self {
        Enquiry::None
    }
}

/// Per-connection translation state. Created zeroed when a client is
/// accepted, mutated only by the two translators, dropped at teardown.
#[derive(Debug, Default)]
pub struct Session {
    pub pass: String,
    pub ident: String,
    pub nick: String,
    /// Joined channel with its `#` prefix; empty when not joined yet.
    pub channel: String,
    pub in_channel: bool,
    pub logged_in: bool,
    pub protolevel: String,
    pub host_id: String,
    pub server_id: String,
    /// Nick of the current channel moderator, tracked from who listings
    /// and moderation hand-overs.
    pub moderator: String,
    pub enquiry: Enquiry,
    /// Group whose command-output lines are being processed.
    pub cur_group: String,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }
}
