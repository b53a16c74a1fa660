//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The pull-based input abstraction parsers read from.
//!
//! An `Input` is an unbounded byte source with a cursor, a bounded rewind
//! window, and two families of read operations: unchecked fast paths for
//! callers that have already ensured availability, and padded variants that
//! yield control to a [`PaddingProvider`] when the source falls short.
//!
//! Parsers drive all their reads through the padded variants with the
//! [`NoPadding`] sentinel, which turns every shortfall into an
//! `UnexpectedEndOfInput` carrying the cursor position.

use crate::error::{Error, Result};

/// A strategy supplying substitute content when an input cannot satisfy a
/// read.
///
/// For the fixed-width reads the provider receives the partial prefix the
/// input could still deliver, left-aligned in the result type (the most
/// significant `have` bytes), together with `have` itself, and must return
/// the completed full-width value. Returning `None` declines the request and
/// fails the read with `UnexpectedEndOfInput`.
pub trait PaddingProvider {
    /// A single-byte read found the input empty.
    fn pad_byte(&mut self) -> Option<u8>;
    /// A two-byte read obtained only `have` bytes (0 or 1).
    fn pad_double_byte(&mut self, prefix: u16, have: u32) -> Option<u16>;
    /// A four-byte read obtained only `have` bytes (0..4).
    fn pad_quad_byte(&mut self, prefix: u32, have: u32) -> Option<u32>;
    /// An eight-byte read obtained only `have` bytes (0..8).
    fn pad_octa_byte(&mut self, prefix: u64, have: u32) -> Option<u64>;
    /// A byte-slice read fell `missing` bytes short; `partial` holds the
    /// prefix that could be read.
    fn pad_bytes(&mut self, partial: Vec<u8>, missing: u64) -> Option<Vec<u8>>;
}

/// The sentinel provider: declines every request, so any shortfall surfaces
/// as `UnexpectedEndOfInput`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPadding;

impl PaddingProvider for NoPadding {
    fn pad_byte(&mut self) -> Option<u8> { None }
    fn pad_double_byte(&mut self, _: u16, _: u32) -> Option<u16> { None }
    fn pad_quad_byte(&mut self, _: u32, _: u32) -> Option<u32> { None }
    fn pad_octa_byte(&mut self, _: u64, _: u32) -> Option<u64> { None }
    fn pad_bytes(&mut self, _: Vec<u8>, _: u64) -> Option<Vec<u8>> { None }
}

/// Turns an end of input at an item boundary into a flag instead of an
/// error: `pad_byte` records the condition and substitutes a dummy byte.
///
/// Parsers use this to distinguish a clean `EndOfInput` from a truncation
/// inside an item.
#[derive(Debug, Default)]
pub(crate) struct EoiFlag {
    pub hit: bool,
}

impl PaddingProvider for EoiFlag {
    fn pad_byte(&mut self) -> Option<u8> {
        self.hit = true;
        Some(0)
    }
    fn pad_double_byte(&mut self, _: u16, _: u32) -> Option<u16> { None }
    fn pad_quad_byte(&mut self, _: u32, _: u32) -> Option<u32> { None }
    fn pad_octa_byte(&mut self, _: u64, _: u32) -> Option<u64> { None }
    fn pad_bytes(&mut self, _: Vec<u8>, _: u64) -> Option<Vec<u8>> { None }
}

/// Completes every short read with zero bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroPadding;

impl PaddingProvider for ZeroPadding {
    fn pad_byte(&mut self) -> Option<u8> { Some(0) }
    fn pad_double_byte(&mut self, prefix: u16, _: u32) -> Option<u16> {
        Some(prefix)
    }
    fn pad_quad_byte(&mut self, prefix: u32, _: u32) -> Option<u32> {
        Some(prefix)
    }
    fn pad_octa_byte(&mut self, prefix: u64, _: u32) -> Option<u64> {
        Some(prefix)
    }
    fn pad_bytes(&mut self, mut partial: Vec<u8>, missing: u64)
                 -> Option<Vec<u8>> {
        partial.resize(partial.len() + missing as usize, 0);
        Some(partial)
    }
}

/// Shifts a big-endian byte prefix to the high end of a `width`-byte value.
pub(crate) fn align_prefix(prefix: u64, width: u32, have: u32) -> u64 {
    if have == 0 { 0 } else { prefix << (8 * (width - have)) }
}

/// A pull interface over an unbounded byte source.
///
/// The unchecked reads assume the caller has already ensured availability;
/// reading past the end of the source through them is out of contract (and
/// will panic on the provided implementations). The padded variants are
/// always safe and consult a [`PaddingProvider`] on shortfall.
///
/// Implementations must retain at least the last 256 consumed bytes so that
/// `move_cursor` can rewind within that window.
pub trait Input {
    /// Index of the next byte to be read.
    fn cursor(&self) -> u64;

    /// Moves the cursor relative to its current position.
    ///
    /// `offset` must lie in `[-255, 1]`; at least the last 256 bytes are
    /// rewindable. Larger rewinds are out of contract: implementations guard
    /// them with a debug assertion only.
    fn move_cursor(&mut self, offset: i64);

    /// Number of bytes known to be immediately available without padding.
    ///
    /// For a composed input this refers to the current constituent only.
    fn available(&self) -> u64;

    /// Unchecked single-byte read.
    fn read_byte(&mut self) -> u8;

    /// Unchecked big-endian two-byte read.
    fn read_double_byte_be(&mut self) -> u16;

    /// Unchecked big-endian four-byte read.
    fn read_quad_byte_be(&mut self) -> u32;

    /// Unchecked big-endian eight-byte read.
    fn read_octa_byte_be(&mut self) -> u64;

    /// Reads one byte, consulting `pp` if none is available.
    fn read_byte_padded(&mut self, pp: &mut dyn PaddingProvider)
                        -> Result<u8> {
        if self.available() >= 1 {
            Ok(self.read_byte())
        } else {
            pp.pad_byte().ok_or_else(
                || Error::UnexpectedEndOfInput(self.cursor(), 1))
        }
    }

    /// Reads a big-endian `u16`, consulting `pp` on shortfall.
    fn read_double_byte_padded(&mut self, pp: &mut dyn PaddingProvider)
                               -> Result<u16> {
        if self.available() >= 2 {
            Ok(self.read_double_byte_be())
        } else {
            let (prefix, have) = self.short_read_prefix(2);
            pp.pad_double_byte(prefix as u16, have).ok_or_else(
                || Error::UnexpectedEndOfInput(self.cursor(),
                                               u64::from(2 - have)))
        }
    }

    /// Reads a big-endian `u32`, consulting `pp` on shortfall.
    fn read_quad_byte_padded(&mut self, pp: &mut dyn PaddingProvider)
                             -> Result<u32> {
        if self.available() >= 4 {
            Ok(self.read_quad_byte_be())
        } else {
            let (prefix, have) = self.short_read_prefix(4);
            pp.pad_quad_byte(prefix as u32, have).ok_or_else(
                || Error::UnexpectedEndOfInput(self.cursor(),
                                               u64::from(4 - have)))
        }
    }

    /// Reads a big-endian `u64`, consulting `pp` on shortfall.
    fn read_octa_byte_padded(&mut self, pp: &mut dyn PaddingProvider)
                             -> Result<u64> {
        if self.available() >= 8 {
            Ok(self.read_octa_byte_be())
        } else {
            let (prefix, have) = self.short_read_prefix(8);
            pp.pad_octa_byte(prefix, have).ok_or_else(
                || Error::UnexpectedEndOfInput(self.cursor(),
                                               u64::from(8 - have)))
        }
    }

    /// Consumes whatever remains (at most `width - 1` bytes) and returns it
    /// left-aligned, paired with the byte count.
    ///
    /// Helper for the padded defaults; not usually called directly.
    fn short_read_prefix(&mut self, width: u32) -> (u64, u32) {
        let have = self.available() as u32;
        let mut prefix = 0u64;
        for _ in 0..have {
            prefix = (prefix << 8) | u64::from(self.read_byte());
        }
        (align_prefix(prefix, width, have), have)
    }

    /// Reads `length` bytes into an owned buffer (possibly empty),
    /// consulting `pp` for any shortfall.
    fn read_bytes(&mut self, length: u64, pp: &mut dyn PaddingProvider)
                  -> Result<Vec<u8>> {
        let take = length.min(self.available());
        let mut out = Vec::with_capacity(take as usize);
        for _ in 0..take {
            out.push(self.read_byte());
        }
        if take == length {
            Ok(out)
        } else {
            let missing = length - take;
            let pos = self.cursor();
            pp.pad_bytes(out, missing)
                .ok_or(Error::UnexpectedEndOfInput(pos, missing))
        }
    }

    /// Up to `length` (≤ 255) bytes immediately preceding the cursor,
    /// rendered as ASCII for diagnostic messages. Non-printable bytes appear
    /// as `.`; the cursor does not move.
    fn preceding_bytes_as_ascii(&self, length: usize) -> String;

    /// Invited after each successfully parsed item: the input may reclaim
    /// bytes before the cursor while retaining the 256-byte rewind window.
    fn release_before_cursor(&mut self) {}
}

/// Renders raw bytes as a printable-ASCII diagnostic string.
pub(crate) fn ascii_dump(bytes: &[u8]) -> String {
    bytes.iter()
         .map(|&b| if (0x20..=0x7E).contains(&b) { b as char } else { '.' })
         .collect()
}

/// An `Input` over a borrowed byte slice.
///
/// The whole buffer stays accessible, so rewinds are not limited to the
/// 256-byte contract window.
#[derive(Debug, Clone)]
pub struct SliceInput<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> SliceInput<'a> {
    /// Creates an input reading `bytes` from the start.
    pub fn new(bytes: &'a [u8]) -> Self {
        SliceInput { bytes, cursor: 0 }
    }

    /// The unconsumed remainder of the underlying slice.
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.bytes[self.cursor..]
    }
}

impl<'a> Input for SliceInput<'a> {
    fn cursor(&self) -> u64 {
        self.cursor as u64
    }

    fn move_cursor(&mut self, offset: i64) {
        debug_assert!(offset <= 1, "cursor may only advance by one byte");
        let new = self.cursor as i64 + offset;
        debug_assert!(new >= 0 && new as usize <= self.bytes.len(),
                      "cursor moved outside the input");
        self.cursor = new as usize;
    }

    fn available(&self) -> u64 {
        (self.bytes.len() - self.cursor) as u64
    }

    fn read_byte(&mut self) -> u8 {
        let b = self.bytes[self.cursor];
        self.cursor += 1;
        b
    }

    fn read_double_byte_be(&mut self) -> u16 {
        let mut raw = [0u8; 2];
        raw.copy_from_slice(&self.bytes[self.cursor..self.cursor + 2]);
        self.cursor += 2;
        u16::from_be_bytes(raw)
    }

    fn read_quad_byte_be(&mut self) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[self.cursor..self.cursor + 4]);
        self.cursor += 4;
        u32::from_be_bytes(raw)
    }

    fn read_octa_byte_be(&mut self) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[self.cursor..self.cursor + 8]);
        self.cursor += 8;
        u64::from_be_bytes(raw)
    }

    fn read_bytes(&mut self, length: u64, pp: &mut dyn PaddingProvider)
                  -> Result<Vec<u8>> {
        let take = length.min(self.available()) as usize;
        let out = self.bytes[self.cursor..self.cursor + take].to_vec();
        self.cursor += take;
        if take as u64 == length {
            Ok(out)
        } else {
            let missing = length - take as u64;
            let pos = self.cursor();
            pp.pad_bytes(out, missing)
                .ok_or(Error::UnexpectedEndOfInput(pos, missing))
        }
    }

    fn preceding_bytes_as_ascii(&self, length: usize) -> String {
        let n = length.min(255).min(self.cursor);
        ascii_dump(&self.bytes[self.cursor - n..self.cursor])
    }
}
