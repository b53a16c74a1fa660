//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The typed writer façade: the encode-side mirror of the reader.
//!
//! A [`Writer`] turns typed `write_*` calls into `Receiver` callbacks,
//! normally on a renderer. Encoders only ever see a `Writer`, so the same
//! codec drives both wire formats.

use crate::error::Result;
use crate::item::Tag;
use crate::receiver::Receiver;

/// Typed write helpers over any receiver.
#[derive(Debug)]
pub struct Writer<R> {
    receiver: R,
}

impl<R: Receiver> Writer<R> {
    /// Creates a writer emitting into `receiver`.
    pub fn new(receiver: R) -> Self {
        Writer { receiver }
    }

    /// The underlying receiver.
    pub fn receiver(&mut self) -> &mut R {
        &mut self.receiver
    }

    /// Consumes the writer and returns the receiver.
    pub fn into_receiver(self) -> R {
        self.receiver
    }

    /// Writes the null value.
    pub fn write_null(&mut self) -> Result<()> {
        self.receiver.on_null()
    }

    /// Writes the undefined value.
    pub fn write_undefined(&mut self) -> Result<()> {
        self.receiver.on_undefined()
    }

    /// Writes a boolean.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.receiver.on_boolean(value)
    }

    /// Writes a 32-bit signed integer.
    pub fn write_int(&mut self, value: i32) -> Result<()> {
        self.receiver.on_int(value)
    }

    /// Writes a 64-bit signed integer, as an `Int` when it fits.
    pub fn write_long(&mut self, value: i64) -> Result<()> {
        if let Ok(v) = i32::try_from(value) {
            self.receiver.on_int(v)
        } else {
            self.receiver.on_long(value)
        }
    }

    /// Writes a 64-bit unsigned integer, spilling into `OverLong` above
    /// `i64::MAX`.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        match i64::try_from(value) {
            Ok(v) => self.write_long(v),
            Err(_) => self.receiver.on_over_long(false, value),
        }
    }

    /// Writes an over-long integer.
    pub fn write_over_long(&mut self, negative: bool, magnitude: u64)
                           -> Result<()> {
        self.receiver.on_over_long(negative, magnitude)
    }

    /// Writes a half-precision float.
    pub fn write_float16(&mut self, value: f32) -> Result<()> {
        self.receiver.on_float16(value)
    }

    /// Writes a single-precision float.
    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.receiver.on_float(value)
    }

    /// Writes a double-precision float.
    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.receiver.on_double(value)
    }

    /// Writes a CBOR simple value.
    pub fn write_simple_value(&mut self, value: u8) -> Result<()> {
        self.receiver.on_simple_value(value)
    }

    /// Writes a raw numeric token.
    pub fn write_number_string(&mut self, value: &str) -> Result<()> {
        self.receiver.on_number_string(value)
    }

    /// Writes a text string.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.receiver.on_text(value)
    }

    /// Writes a byte string.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.receiver.on_bytes(value)
    }

    /// Opens an indefinite byte stream; terminate with
    /// [`Writer::write_break`].
    pub fn write_bytes_start(&mut self) -> Result<()> {
        self.receiver.on_bytes_start()
    }

    /// Opens an indefinite text stream; terminate with
    /// [`Writer::write_break`].
    pub fn write_text_start(&mut self) -> Result<()> {
        self.receiver.on_text_start()
    }

    /// Writes a definite array header; exactly `length` items must follow.
    pub fn write_array_header(&mut self, length: u64) -> Result<()> {
        self.receiver.on_array_header(length)
    }

    /// Opens an indefinite array.
    pub fn write_array_start(&mut self) -> Result<()> {
        self.receiver.on_array_start()
    }

    /// Writes a definite map header; exactly `length` key/value pairs must
    /// follow.
    pub fn write_map_header(&mut self, length: u64) -> Result<()> {
        self.receiver.on_map_header(length)
    }

    /// Opens an indefinite map.
    pub fn write_map_start(&mut self) -> Result<()> {
        self.receiver.on_map_start()
    }

    /// Writes a semantic tag; it modifies the next item written.
    pub fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.receiver.on_tag(tag)
    }

    /// Terminates the innermost indefinite item.
    pub fn write_break(&mut self) -> Result<()> {
        self.receiver.on_break()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cbor::CborRenderer;
    use crate::test_helpers::parse;

    fn written<F: FnOnce(&mut Writer<CborRenderer<Vec<u8>>>)>(f: F)
                                                              -> Vec<u8> {
        let mut w = Writer::new(CborRenderer::new(Vec::new()));
        f(&mut w);
        w.into_receiver().into_output()
    }

    #[test]
    fn long_narrows_to_the_smallest_item() {
        assert_eq!(parse("0c"), written(|w| w.write_long(12).unwrap()));
        assert_eq!(parse("1a 80000000"),
                   written(|w| w.write_long(0x80000000).unwrap()));
        assert_eq!(parse("3863"), written(|w| w.write_long(-100).unwrap()));
    }

    #[test]
    fn u64_spills_into_over_long() {
        assert_eq!(parse("1b 7fffffffffffffff"),
                   written(|w| w.write_u64(i64::MAX as u64).unwrap()));
        assert_eq!(parse("1b 8000000000000000"),
                   written(|w| w.write_u64(1 << 63).unwrap()));
    }

    #[test]
    fn structured_writes() {
        assert_eq!(parse("82 01 \"abc\""), written(|w| {
            w.write_array_header(2).unwrap();
            w.write_int(1).unwrap();
            w.write_string("abc").unwrap();
        }));
        assert_eq!(parse("7f \"abc\" ff"), written(|w| {
            w.write_text_start().unwrap();
            w.write_string("abc").unwrap();
            w.write_break().unwrap();
        }));
    }
}
