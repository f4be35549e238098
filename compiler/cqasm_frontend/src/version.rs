// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The version gate: a single-purpose scanner that consumes only the header of
//! a source file to find `version <int>(.<int>)*`. It is invoked before the
//! full parse so dialect selection precedes grammar choice, and it deliberately
//! shares nothing with the main parser.


use crate::error::Error;
use cqasm_data_structures::{span::Span, version::Version};

/// Scans the header of a source file for its version statement.
pub fn version_of(source: &str) -> Result<(Version, Span), Error> {
    let mut scanner = HeaderScanner {
        source,
        pos: 0,
    };
    scanner.skip_trivia();

    let keyword_start = scanner.pos;
    let keyword = scanner.take_while(|c| c.is_ascii_alphabetic());
    if keyword != "version" {
        return Err(Error::VersionHeader(Some(span(
            keyword_start,
            scanner.pos.max(keyword_start + 1).min(source.len()),
        ))));
    }

    scanner.skip_trivia();
    let number_start = scanner.pos;
    let number = scanner.take_while(|c| c.is_ascii_digit() || c == '.');
    let number_span = span(number_start, scanner.pos);
    number
        .parse::<Version>()
        .map(|version| (version, number_span))
        .map_err(|_| Error::VersionHeader(Some(number_span)))
}

fn span(lo: usize, hi: usize) -> Span {
    Span {
        lo: lo.try_into().expect("offset should fit into u32"),
        hi: hi.try_into().expect("offset should fit into u32"),
    }
}

struct HeaderScanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> HeaderScanner<'a> {
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Skips whitespace and comments of every style either dialect accepts.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            if let Some(c) = rest.chars().next().filter(|c| c.is_whitespace()) {
                self.pos += c.len_utf8();
            } else if rest.starts_with('#') || rest.starts_with("//") {
                self.skip_until("\n");
            } else if rest.starts_with("/*") {
                self.pos += 2;
                self.skip_until("*/");
                self.pos = (self.pos + 2).min(self.source.len());
            } else {
                return;
            }
        }
    }

    fn skip_until(&mut self, needle: &str) {
        match self.rest().find(needle) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.source.len(),
        }
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        for c in self.rest().chars() {
            if f(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }
}
