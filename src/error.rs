//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The error model shared by all parsers, renderers, and codecs.
//!
//! Errors are values, not signals: every variant carries the byte position in
//! the originating input (or output, for rendering failures) at which the
//! problem was detected. Once a parser has raised any error the run is over
//! and the parser must be discarded.

use quick_error::quick_error;

quick_error! {
    /// Errors produced while encoding or decoding.
    #[derive(Debug)]
    pub enum Error {
        /// More bytes were required to complete the data item currently being
        /// parsed, but the input had none left.
        UnexpectedEndOfInput(pos: u64, expected: u64) {
            display("unexpected end of input at {}: at least {} more byte(s) \
                     required", pos, expected)
        }
        /// The input bytes do not form a well-formed document, or a decoder
        /// met a data item it cannot accept.
        InvalidInputData(pos: u64, msg: String) {
            display("{} (input position {})", msg, pos)
        }
        /// A size or length exceeded what the implementation (or its
        /// configuration) can represent.
        Overflow(pos: u64, msg: &'static str) {
            display("overflow: {} (position {})", msg, pos)
        }
        /// The input encodes a construct this implementation does not
        /// support, or a data item has no representation in the target
        /// format.
        Unsupported(pos: u64, msg: String) {
            display("unsupported: {} (position {})", msg, pos)
        }
        /// An unexpected failure, e.g. from a user-supplied decoder, wrapped
        /// so that it carries a position like every other error.
        General(pos: u64, cause: Box<dyn std::error::Error + Send + Sync>) {
            display("{} (position {})", cause, pos)
            source(&**cause)
        }
    }
}

impl Error {
    /// The byte position at which this error was raised.
    pub fn position(&self) -> u64 {
        match *self {
            Error::UnexpectedEndOfInput(pos, _) => pos,
            Error::InvalidInputData(pos, _) => pos,
            Error::Overflow(pos, _) => pos,
            Error::Unsupported(pos, _) => pos,
            Error::General(pos, _) => pos,
        }
    }
}

/// The general result type returned by osier functions.
pub type Result<T> = std::result::Result<T, Error>;
