//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The sink interface renderers write to, and its chunked byte-array
//! implementation.

use crate::error::{Error, Result};

/// A byte sink.
///
/// Writes are infallible; the only size-related failure (an array-backed
/// sink growing past 2^31 bytes) is reported when the result is extracted.
pub trait Output {
    /// Appends one byte.
    fn write_byte(&mut self, a: u8);

    /// Appends two bytes.
    fn write_2(&mut self, a: u8, b: u8) {
        self.write_byte(a);
        self.write_byte(b);
    }

    /// Appends three bytes.
    fn write_3(&mut self, a: u8, b: u8, c: u8) {
        self.write_byte(a);
        self.write_byte(b);
        self.write_byte(c);
    }

    /// Appends four bytes.
    fn write_4(&mut self, a: u8, b: u8, c: u8, d: u8) {
        self.write_byte(a);
        self.write_byte(b);
        self.write_byte(c);
        self.write_byte(d);
    }

    /// Appends a byte slice.
    fn write_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    /// Total number of bytes written so far.
    fn size(&self) -> u64;
}

impl Output for Vec<u8> {
    fn write_byte(&mut self, a: u8) {
        self.push(a);
    }

    fn write_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

/// Bytes per chunk of a [`ChunkedOutput`].
const CHUNK_SIZE: usize = 4096;

/// An `Output` that grows by linking fixed-size chunks, avoiding the
/// doubling copies of a flat buffer.
///
/// One- to four-byte writes go inline while the current chunk has room and
/// fall back byte-by-byte (appending a fresh chunk on overflow) otherwise.
/// [`ChunkedOutput::into_vec`] concatenates the chunks into one contiguous
/// array.
#[derive(Debug, Default)]
pub struct ChunkedOutput {
    /// Full chunks, every one exactly `CHUNK_SIZE` bytes.
    full: Vec<Box<[u8; CHUNK_SIZE]>>,
    current: Vec<u8>,
}

impl ChunkedOutput {
    /// Creates an empty output.
    pub fn new() -> Self {
        ChunkedOutput {
            full: Vec::new(),
            current: Vec::with_capacity(CHUNK_SIZE),
        }
    }

    fn roll_chunk(&mut self) {
        debug_assert_eq!(CHUNK_SIZE, self.current.len());
        let mut chunk = Box::new([0u8; CHUNK_SIZE]);
        chunk.copy_from_slice(&self.current);
        self.full.push(chunk);
        self.current.clear();
    }

    fn room(&self) -> usize {
        CHUNK_SIZE - self.current.len()
    }

    /// Concatenates all chunks into a single contiguous array.
    ///
    /// Fails with `Overflow` if the total size exceeds 2^31 bytes.
    pub fn into_vec(self) -> Result<Vec<u8>> {
        let size = self.size();
        if size > i32::MAX as u64 {
            return Err(Error::Overflow(
                size, "output larger than 2^31 bytes"));
        }
        let mut out = Vec::with_capacity(size as usize);
        for chunk in &self.full {
            out.extend_from_slice(&chunk[..]);
        }
        out.extend_from_slice(&self.current);
        Ok(out)
    }
}

impl Output for ChunkedOutput {
    fn write_byte(&mut self, a: u8) {
        if self.room() == 0 {
            self.roll_chunk();
        }
        self.current.push(a);
    }

    fn write_2(&mut self, a: u8, b: u8) {
        if self.room() >= 2 {
            self.current.push(a);
            self.current.push(b);
        } else {
            self.write_byte(a);
            self.write_byte(b);
        }
    }

    fn write_3(&mut self, a: u8, b: u8, c: u8) {
        if self.room() >= 3 {
            self.current.push(a);
            self.current.push(b);
            self.current.push(c);
        } else {
            self.write_byte(a);
            self.write_byte(b);
            self.write_byte(c);
        }
    }

    fn write_4(&mut self, a: u8, b: u8, c: u8, d: u8) {
        if self.room() >= 4 {
            self.current.push(a);
            self.current.push(b);
            self.current.push(c);
            self.current.push(d);
        } else {
            self.write_byte(a);
            self.write_byte(b);
            self.write_byte(c);
            self.write_byte(d);
        }
    }

    fn write_slice(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while !rest.is_empty() {
            if self.room() == 0 {
                self.roll_chunk();
            }
            let take = rest.len().min(self.room());
            self.current.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
        }
    }

    fn size(&self) -> u64 {
        (self.full.len() * CHUNK_SIZE + self.current.len()) as u64
    }
}
