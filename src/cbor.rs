//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The CBOR (RFC 7049) parser and renderer.
//!
//! The parser pulls bytes from an [`Input`] and drives exactly one
//! [`Receiver`] callback per call; the renderer is its inverse, a `Receiver`
//! writing RFC 7049 bytes to an [`Output`]. Neither buffers an
//! indefinite-length container as a whole: each segment is surfaced
//! individually.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::input::{EoiFlag, Input, NoPadding};
use crate::item::{ItemKind, Tag};
use crate::output::Output;
use crate::reader::{Config, Parser};
use crate::receiver::Receiver;

/// Largest length argument accepted for strings and containers (2^63 - 1).
const MAX_LENGTH: u64 = i64::MAX as u64;

/// Streaming CBOR parser.
///
/// Any error is terminal: the parser must be discarded afterwards.
#[derive(Debug)]
pub struct CborParser<In> {
    input: In,
    value_index: u64,
    max_byte_string_length: u64,
    max_text_string_length: u64,
}

impl<In: Input> CborParser<In> {
    /// Creates a parser reading from `input` under the given limits.
    pub fn new(input: In, config: &Config) -> Self {
        CborParser {
            input,
            value_index: 0,
            max_byte_string_length: config.max_byte_string_length,
            max_text_string_length: config.max_text_string_length,
        }
    }

    /// Consumes the parser and returns the underlying input.
    pub fn into_input(self) -> In {
        self.input
    }

    /// Reads the initial byte of the next item, or `None` on a clean end of
    /// input.
    fn try_read_initial_byte(&mut self) -> Result<Option<u8>> {
        let mut eoi = EoiFlag::default();
        let b = self.input.read_byte_padded(&mut eoi)?;
        Ok(if eoi.hit { None } else { Some(b) })
    }

    /// Decodes the argument for `info`, reading 0/1/2/4/8 following
    /// big-endian bytes. `info` 28..30 is invalid input; 31 must be handled
    /// by the caller.
    fn read_ulong(&mut self, info: u8) -> Result<u64> {
        let pp = &mut NoPadding;
        match info {
            n @ 0..=23 => Ok(u64::from(n)),
            24 => Ok(u64::from(self.input.read_byte_padded(pp)?)),
            25 => Ok(u64::from(self.input.read_double_byte_padded(pp)?)),
            26 => Ok(u64::from(self.input.read_quad_byte_padded(pp)?)),
            27 => self.input.read_octa_byte_padded(pp),
            _ => Err(Error::InvalidInputData(
                self.value_index,
                format!("reserved additional-info value {}", info))),
        }
    }

    /// Decodes a string/container length, applying the 63-bit bound and the
    /// configured cap.
    fn read_length(&mut self, info: u8, cap: u64, what: &'static str)
                   -> Result<u64> {
        let len = self.read_ulong(info)?;
        if len > MAX_LENGTH {
            return Err(Error::Overflow(
                self.value_index, "length does not fit 63 bits"));
        }
        if len > cap {
            return Err(Error::Overflow(self.value_index, what));
        }
        Ok(len)
    }

    /// Compares the `len` raw bytes of one (segment of a) text string
    /// against `target[*consumed..]` in 8-byte chunks, both sides
    /// zero-padded at the tails.
    ///
    /// Returns the sign of `target.cmp(item)` restricted to this run, or 0
    /// if the run matched.
    fn compare_chunk_run(&mut self, len: u64, target: &[u8],
                         consumed: &mut u64) -> Result<i32> {
        let mut done = 0u64;
        while done < len {
            let n = (len - done).min(8) as u32;
            let ichunk = if n == 8 {
                self.input.read_octa_byte_padded(&mut NoPadding)?
            } else {
                let mut v = 0u64;
                for _ in 0..n {
                    v = (v << 8)
                        | u64::from(self.input
                                        .read_byte_padded(&mut NoPadding)?);
                }
                v << (8 * (8 - n))
            };

            let toff = *consumed + done;
            let mut tchunk = 0u64;
            for k in 0..8u64 {
                let byte = match usize::try_from(toff + k) {
                    Ok(idx) if idx < target.len() => target[idx],
                    _ => 0,
                };
                tchunk = (tchunk << 8) | u64::from(byte);
            }
            if n < 8 {
                // Only the item's bytes within this chunk take part.
                tchunk &= !0u64 << (8 * (8 - n));
            }

            if ichunk != tchunk {
                return Ok(if tchunk < ichunk { -1 } else { 1 });
            }
            done += u64::from(n);
        }
        *consumed += len;
        Ok(0)
    }
}

impl<In: Input> Parser for CborParser<In> {
    fn read_next_data_item(&mut self, receiver: &mut dyn Receiver)
                           -> Result<ItemKind> {
        self.value_index = self.input.cursor();
        let initial = match self.try_read_initial_byte()? {
            Some(b) => b,
            None => {
                receiver.on_end_of_input()?;
                return Ok(ItemKind::EndOfInput);
            }
        };
        let major = initial >> 5;
        let info = initial & 0x1F;

        let kind = match (major, info) {
            (0, info) => {
                let n = self.read_ulong(info)?;
                if n <= i32::MAX as u64 {
                    receiver.on_int(n as i32)?;
                    ItemKind::Int
                } else if n <= i64::MAX as u64 {
                    receiver.on_long(n as i64)?;
                    ItemKind::Long
                } else {
                    receiver.on_over_long(false, n)?;
                    ItemKind::OverLong
                }
            }
            (1, info) => {
                let n = self.read_ulong(info)?;
                if n <= i32::MAX as u64 {
                    receiver.on_int((-1i64 - n as i64) as i32)?;
                    ItemKind::Int
                } else if n <= i64::MAX as u64 {
                    receiver.on_long(-1i64 - n as i64)?;
                    ItemKind::Long
                } else {
                    receiver.on_over_long(true, n)?;
                    ItemKind::OverLong
                }
            }
            (2, 31) => {
                receiver.on_bytes_start()?;
                ItemKind::BytesStart
            }
            (2, info) => {
                let len = self.read_length(
                    info, self.max_byte_string_length,
                    "byte string longer than the configured maximum")?;
                let data = self.input.read_bytes(len, &mut NoPadding)?;
                receiver.on_bytes(&data)?;
                ItemKind::Bytes
            }
            (3, 31) => {
                receiver.on_text_start()?;
                ItemKind::TextStart
            }
            (3, info) => {
                let len = self.read_length(
                    info, self.max_text_string_length,
                    "text string longer than the configured maximum")?;
                let data = self.input.read_bytes(len, &mut NoPadding)?;
                let text = std::str::from_utf8(&data).map_err(|e| {
                    Error::InvalidInputData(
                        self.value_index,
                        format!("text string is not valid UTF-8: {}", e))
                })?;
                receiver.on_text(text)?;
                ItemKind::Text
            }
            (4, 31) => {
                receiver.on_array_start()?;
                ItemKind::ArrayStart
            }
            (4, info) => {
                let len = self.read_length(
                    info, MAX_LENGTH, "array length out of range")?;
                receiver.on_array_header(len)?;
                ItemKind::ArrayHeader
            }
            (5, 31) => {
                receiver.on_map_start()?;
                ItemKind::MapStart
            }
            (5, info) => {
                let len = self.read_length(
                    info, MAX_LENGTH, "map length out of range")?;
                receiver.on_map_header(len)?;
                ItemKind::MapHeader
            }
            (6, 31) => {
                return Err(Error::InvalidInputData(
                    self.value_index,
                    "indefinite-length marker on a tag".to_owned()));
            }
            (6, info) => {
                let v = self.read_ulong(info)?;
                receiver.on_tag(Tag::from_value(v))?;
                ItemKind::Tag
            }
            (7, minor @ 0..=19) => {
                receiver.on_simple_value(minor)?;
                ItemKind::SimpleValue
            }
            (7, 20) => {
                receiver.on_boolean(false)?;
                ItemKind::Boolean
            }
            (7, 21) => {
                receiver.on_boolean(true)?;
                ItemKind::Boolean
            }
            (7, 22) => {
                receiver.on_null()?;
                ItemKind::Null
            }
            (7, 23) => {
                receiver.on_undefined()?;
                ItemKind::Undefined
            }
            (7, 24) => {
                let v = self.input.read_byte_padded(&mut NoPadding)?;
                if v < 32 {
                    return Err(Error::InvalidInputData(
                        self.value_index,
                        format!("simple value {} must be encoded in the \
                                 initial byte", v)));
                }
                receiver.on_simple_value(v)?;
                ItemKind::SimpleValue
            }
            (7, 25) => {
                let bits = self.input
                               .read_double_byte_padded(&mut NoPadding)?;
                receiver.on_float16(half::f16::from_bits(bits).to_f32())?;
                ItemKind::Float16
            }
            (7, 26) => {
                let bits = self.input.read_quad_byte_padded(&mut NoPadding)?;
                receiver.on_float(f32::from_bits(bits))?;
                ItemKind::Float
            }
            (7, 31) => {
                receiver.on_break()?;
                ItemKind::Break
            }
            (7, 27) => {
                let bits = self.input.read_octa_byte_padded(&mut NoPadding)?;
                receiver.on_double(f64::from_bits(bits))?;
                ItemKind::Double
            }
            (7, minor) => {
                // 28..30 remain unassigned in the major-7 space.
                return Err(Error::Unsupported(
                    self.value_index,
                    format!("unrecognised simple/float code {}", minor)));
            }
            _ => unreachable!(),
        };

        self.input.release_before_cursor();
        Ok(kind)
    }

    fn try_read_string_compare(&mut self, target: &[u8]) -> Result<i32> {
        let mark = self.input.cursor();
        let initial = match self.try_read_initial_byte()? {
            Some(b) => b,
            None => return Ok(i32::MIN),
        };
        if initial >> 5 != 3 {
            self.input.move_cursor(-1);
            return Ok(i32::MIN);
        }
        self.value_index = mark;

        let info = initial & 0x1F;
        let mut consumed = 0u64;
        let mut verdict = 0i32;
        if info == 31 {
            loop {
                let seg = self.input.read_byte_padded(&mut NoPadding)?;
                if seg == 0xFF {
                    break;
                }
                if seg >> 5 != 3 || (seg & 0x1F) == 31 {
                    return Err(Error::InvalidInputData(
                        self.value_index,
                        "invalid segment in indefinite-length text string"
                            .to_owned()));
                }
                let len = self.read_length(
                    seg & 0x1F, self.max_text_string_length,
                    "text string longer than the configured maximum")?;
                verdict = self.compare_chunk_run(len, target, &mut consumed)?;
                if verdict != 0 {
                    break;
                }
            }
        } else {
            let len = self.read_length(
                info, self.max_text_string_length,
                "text string longer than the configured maximum")?;
            verdict = self.compare_chunk_run(len, target, &mut consumed)?;
        }

        if verdict == 0 {
            verdict = match (target.len() as u64).cmp(&consumed) {
                Ordering::Equal => 0,
                Ordering::Greater => 1,
                Ordering::Less => -1,
            };
        }
        if verdict == 0 {
            self.input.release_before_cursor();
        } else {
            let delta = self.input.cursor() - mark;
            self.input.move_cursor(-(delta as i64));
        }
        Ok(verdict)
    }

    fn value_index(&self) -> u64 {
        self.value_index
    }

    fn cursor(&self) -> u64 {
        self.input.cursor()
    }
}

/// The inverse of the parser: accepts `Receiver` calls and writes RFC 7049
/// bytes to an `Output`.
///
/// Integer heads use the shortest argument encoding. Float items are written
/// with exactly the width of their kind; canonical shrinking is a
/// non-goal.
#[derive(Debug)]
pub struct CborRenderer<Out> {
    out: Out,
}

impl<Out: Output> CborRenderer<Out> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: Out) -> Self {
        CborRenderer { out }
    }

    /// Consumes the renderer and returns the sink.
    pub fn into_output(self) -> Out {
        self.out
    }

    fn write_head(&mut self, major: u8, value: u64) {
        let m = major << 5;
        if value < 24 {
            self.out.write_byte(m | value as u8);
        } else if value <= u64::from(u8::MAX) {
            self.out.write_2(m | 24, value as u8);
        } else if value <= u64::from(u16::MAX) {
            let [a, b] = (value as u16).to_be_bytes();
            self.out.write_3(m | 25, a, b);
        } else if value <= u64::from(u32::MAX) {
            let [a, b, c, d] = (value as u32).to_be_bytes();
            self.out.write_byte(m | 26);
            self.out.write_4(a, b, c, d);
        } else {
            self.out.write_byte(m | 27);
            self.out.write_slice(&value.to_be_bytes());
        }
    }
}

impl<Out: Output> Receiver for CborRenderer<Out> {
    fn on_null(&mut self) -> Result<()> {
        self.out.write_byte(0xF6);
        Ok(())
    }

    fn on_undefined(&mut self) -> Result<()> {
        self.out.write_byte(0xF7);
        Ok(())
    }

    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.out.write_byte(if value { 0xF5 } else { 0xF4 });
        Ok(())
    }

    fn on_int(&mut self, value: i32) -> Result<()> {
        self.on_long(i64::from(value))
    }

    fn on_long(&mut self, value: i64) -> Result<()> {
        if value >= 0 {
            self.write_head(0, value as u64);
        } else {
            self.write_head(1, (-1i64 - value) as u64);
        }
        Ok(())
    }

    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        self.write_head(if negative { 1 } else { 0 }, magnitude);
        Ok(())
    }

    fn on_float16(&mut self, value: f32) -> Result<()> {
        let [a, b] = half::f16::from_f32(value).to_be_bytes();
        self.out.write_3(0xF9, a, b);
        Ok(())
    }

    fn on_float(&mut self, value: f32) -> Result<()> {
        let [a, b, c, d] = value.to_be_bytes();
        self.out.write_byte(0xFA);
        self.out.write_4(a, b, c, d);
        Ok(())
    }

    fn on_double(&mut self, value: f64) -> Result<()> {
        self.out.write_byte(0xFB);
        self.out.write_slice(&value.to_be_bytes());
        Ok(())
    }

    fn on_simple_value(&mut self, value: u8) -> Result<()> {
        match value {
            0..=19 => self.out.write_byte(0xE0 | value),
            32..=255 => self.out.write_2(0xF8, value),
            _ => {
                return Err(Error::Unsupported(
                    self.out.size(),
                    format!("simple value {} has a dedicated encoding",
                            value)));
            }
        }
        Ok(())
    }

    fn on_number_string(&mut self, _: &str) -> Result<()> {
        Err(Error::Unsupported(
            self.out.size(),
            "number strings have no CBOR representation".to_owned()))
    }

    fn on_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_head(2, value.len() as u64);
        self.out.write_slice(value);
        Ok(())
    }

    fn on_bytes_start(&mut self) -> Result<()> {
        self.out.write_byte(0x5F);
        Ok(())
    }

    fn on_text(&mut self, value: &str) -> Result<()> {
        self.write_head(3, value.len() as u64);
        self.out.write_slice(value.as_bytes());
        Ok(())
    }

    fn on_text_start(&mut self) -> Result<()> {
        self.out.write_byte(0x7F);
        Ok(())
    }

    fn on_array_header(&mut self, length: u64) -> Result<()> {
        self.write_head(4, length);
        Ok(())
    }

    fn on_array_start(&mut self) -> Result<()> {
        self.out.write_byte(0x9F);
        Ok(())
    }

    fn on_map_header(&mut self, length: u64) -> Result<()> {
        self.write_head(5, length);
        Ok(())
    }

    fn on_map_start(&mut self) -> Result<()> {
        self.out.write_byte(0xBF);
        Ok(())
    }

    fn on_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_head(6, tag.value());
        Ok(())
    }

    fn on_break(&mut self) -> Result<()> {
        self.out.write_byte(0xFF);
        Ok(())
    }

    fn on_end_of_input(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;
    use crate::input::SliceInput;
    use crate::test_helpers::{parse, Rec};

    fn events(data: &[u8]) -> Vec<String> {
        let mut parser = CborParser::new(SliceInput::new(data),
                                         &Config::default());
        let mut rec = Rec::default();
        loop {
            match parser.read_next_data_item(&mut rec).unwrap() {
                ItemKind::EndOfInput => break,
                _ => (),
            }
        }
        rec.events
    }

    fn single_event(text: &str) -> String {
        let data = parse(text);
        let ev = events(&data);
        assert_eq!(2, ev.len(), "expected one item plus eoi in {:?}", ev);
        ev[0].clone()
    }

    fn decode_error(text: &str) -> Error {
        let data = parse(text);
        let mut parser = CborParser::new(SliceInput::new(&data),
                                         &Config::default());
        let mut rec = Rec::default();
        loop {
            match parser.read_next_data_item(&mut rec) {
                Ok(ItemKind::EndOfInput) => panic!("decoded: {:?}",
                                                   rec.events),
                Ok(_) => (),
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn rfc_integer_vectors() {
        assert_eq!("int 0", single_event("00"));
        assert_eq!("int 1", single_event("01"));
        assert_eq!("int 10", single_event("0a"));
        assert_eq!("int 23", single_event("17"));
        assert_eq!("int 24", single_event("18 18"));
        assert_eq!("int 100", single_event("18 64"));
        assert_eq!("int 1000", single_event("19 03e8"));
        assert_eq!("int 1000000", single_event("1a 000f4240"));
        assert_eq!("long 1000000000000",
                   single_event("1b 000000e8d4a51000"));
        assert_eq!("int -1", single_event("20"));
        assert_eq!("int -10", single_event("29"));
        assert_eq!("int -100", single_event("38 63"));
        assert_eq!("int -1000", single_event("39 03e7"));
        assert_eq!("int 2147483647", single_event("1a 7fffffff"));
        assert_eq!("long 2147483648", single_event("1a 80000000"));
        assert_eq!("int -2147483648", single_event("3a 7fffffff"));
        assert_eq!("long -2147483649", single_event("3a 80000000"));
    }

    #[test]
    fn overlong_boundaries() {
        // 2^63 - 1 is the largest Long.
        assert_eq!("long 9223372036854775807",
                   single_event("1b 7fffffffffffffff"));
        // 2^63 no longer fits a signed 64-bit value.
        assert_eq!("overlong false 9223372036854775808",
                   single_event("1b 8000000000000000"));
        assert_eq!("overlong false 18446744073709551615",
                   single_event("1b ffffffffffffffff"));
        // -(2^63) is the smallest Long; -(2^63) - 1 is over-long.
        assert_eq!("long -9223372036854775808",
                   single_event("3b 7fffffffffffffff"));
        assert_eq!("overlong true 9223372036854775808",
                   single_event("3b 8000000000000000"));
    }

    #[test]
    fn rfc_float_vectors() {
        assert_eq!("f16 0", single_event("f9 0000"));
        assert_eq!("f16 -0", single_event("f9 8000"));
        assert_eq!("f16 1", single_event("f9 3c00"));
        assert_eq!("f16 1.5", single_event("f9 3e00"));
        assert_eq!("f16 65504", single_event("f9 7bff"));
        assert_eq!("f16 inf", single_event("f9 7c00"));
        assert_eq!("f16 -inf", single_event("f9 fc00"));
        assert_eq!("f32 100000", single_event("fa 47c35000"));
        assert_eq!("f64 1.1", single_event("fb 3ff199999999999a"));
        assert_eq!("f64 -4.1", single_event("fb c010666666666666"));
    }

    #[test]
    fn simple_values_and_atoms() {
        assert_eq!("bool false", single_event("f4"));
        assert_eq!("bool true", single_event("f5"));
        assert_eq!("null", single_event("f6"));
        assert_eq!("undefined", single_event("f7"));
        assert_eq!("simple 0", single_event("e0"));
        assert_eq!("simple 16", single_event("f0"));
        assert_eq!("simple 19", single_event("f3"));
        assert_eq!("simple 32", single_event("f8 20"));
        assert_eq!("simple 255", single_event("f8 ff"));
    }

    #[test]
    fn strings_and_bytes() {
        assert_eq!("text \"\"", single_event("60"));
        assert_eq!("text \"a\"", single_event("\"a\""));
        assert_eq!("text \"IETF\"", single_event("64 'IETF'"));
        assert_eq!("text \"\u{fc}\"", single_event("62 c3bc"));
        assert_eq!("bytes []", single_event("40"));
        assert_eq!("bytes [01, 02, 03, 04]", single_event("44 01020304"));
    }

    #[test]
    fn containers_and_tags() {
        assert_eq!(vec!["array 0", "eoi"], events(&parse("80")));
        assert_eq!(
            vec!["array 3", "int 1", "int 2", "int 3", "eoi"],
            events(&parse("83 010203")));
        assert_eq!(
            vec!["array*", "int 1", "int 2", "break", "eoi"],
            events(&parse("9f 0102 ff")));
        assert_eq!(vec!["map 0", "eoi"], events(&parse("a0")));
        assert_eq!(
            vec!["map 2", "int 1", "int 2", "int 3", "int 4", "eoi"],
            events(&parse("a2 01020304")));
        assert_eq!(
            vec!["map*", "text \"a\"", "int 1", "break", "eoi"],
            events(&parse("bf \"a\" 01 ff")));
        // Tag 0 modifies the text string that follows it.
        assert_eq!(
            vec!["tag 0", "text \"2013-03-21T20:04:00Z\"", "eoi"],
            events(&parse("c0 \"2013-03-21T20:04:00Z\"")));
        assert_eq!(vec!["tag 55799", "int 0", "eoi"],
                   events(&parse("d9 d9f7 00")));
    }

    #[test]
    fn indefinite_strings_surface_per_segment() {
        assert_eq!(
            vec!["text*", "text \"abc\"", "text \"de\"", "break", "eoi"],
            events(&parse("7f \"abc\" \"de\" ff")));
        assert_eq!(
            vec!["bytes*", "bytes [01]", "bytes [02, 03]", "break", "eoi"],
            events(&parse("5f 41 01 42 0203 ff")));
    }

    #[test]
    fn malformed_input_is_rejected() {
        // Reserved additional-info values 28..30.
        assert!(matches!(decode_error("1c"),
                         Error::InvalidInputData(0, _)));
        assert!(matches!(decode_error("1d"), Error::InvalidInputData(..)));
        assert!(matches!(decode_error("3e"), Error::InvalidInputData(..)));
        // Indefinite-length marker on an integer or tag.
        assert!(matches!(decode_error("1f"), Error::InvalidInputData(..)));
        assert!(matches!(decode_error("df"), Error::InvalidInputData(..)));
        // Two-byte simple values below 32 are not minimal.
        assert!(matches!(decode_error("f8 17"),
                         Error::InvalidInputData(..)));
        // Unassigned major-7 codes.
        assert!(matches!(decode_error("fc"), Error::Unsupported(..)));
        assert!(matches!(decode_error("fe"), Error::Unsupported(..)));
        // Text that is not UTF-8.
        assert!(matches!(decode_error("62 ffff"),
                         Error::InvalidInputData(..)));
    }

    #[test]
    fn truncated_items_report_their_position() {
        assert!(matches!(decode_error("19 05"),
                         Error::UnexpectedEndOfInput(..)));
        assert!(matches!(decode_error("62 'a'"),
                         Error::UnexpectedEndOfInput(..)));
        assert!(matches!(decode_error("1b 00000000000000"),
                         Error::UnexpectedEndOfInput(..)));
    }

    #[test]
    fn oversized_lengths_overflow() {
        // 2^63 as a byte string length.
        assert!(matches!(decode_error("5b 8000000000000000"),
                         Error::Overflow(..)));
        assert!(matches!(decode_error("9b 8000000000000000"),
                         Error::Overflow(..)));

        let mut config = Config::default();
        config.max_byte_string_length = 2;
        let data = parse("44 01020304");
        let mut parser = CborParser::new(SliceInput::new(&data), &config);
        assert!(matches!(
            parser.read_next_data_item(&mut Rec::default()),
            Err(Error::Overflow(..))));
    }

    fn compare(text: &str, target: &[u8]) -> i32 {
        let data = parse(text);
        let mut parser = CborParser::new(SliceInput::new(&data),
                                         &Config::default());
        parser.try_read_string_compare(target).unwrap()
    }

    #[test]
    fn string_compare_matches_and_consumes() {
        let data = parse("\"abc\" 01");
        let mut parser = CborParser::new(SliceInput::new(&data),
                                         &Config::default());
        assert_eq!(0, parser.try_read_string_compare(b"abc").unwrap());
        // The following item is still readable.
        let mut rec = Rec::default();
        assert_eq!(ItemKind::Int,
                   parser.read_next_data_item(&mut rec).unwrap());
        assert_eq!(vec!["int 1"], rec.events);
    }

    #[test]
    fn string_compare_orders_like_byte_comparison() {
        let pairs: &[(&str, &str)] = &[
            ("abc", "abc"),
            ("abc", "abd"),
            ("abc", "ab"),
            ("ab", "abc"),
            ("", "a"),
            ("a", ""),
            ("zz", "aa"),
            ("na\u{ef}ve", "naive"),
            ("\u{fc}", "u"),
            ("\u{1f600}", "\u{1f600}"),
            ("longer than eight bytes", "longer than eight bytez"),
        ];
        for (a, b) in pairs {
            let encoded = crate::to_vec(&b.to_string()).unwrap();
            let mut parser = CborParser::new(SliceInput::new(&encoded),
                                             &Config::default());
            let got = parser.try_read_string_compare(a.as_bytes()).unwrap();
            assert_eq!(a.cmp(b) as i32, got.signum(),
                       "compare({:?}, {:?})", a, b);
        }
    }

    #[test]
    fn string_compare_rewinds_on_mismatch() {
        let data = parse("\"abc\"");
        let mut parser = CborParser::new(SliceInput::new(&data),
                                         &Config::default());
        assert_eq!(-1, parser.try_read_string_compare(b"aaa").unwrap());
        // The item is untouched and can still be decoded normally.
        let mut rec = Rec::default();
        assert_eq!(ItemKind::Text,
                   parser.read_next_data_item(&mut rec).unwrap());
        assert_eq!(vec!["text \"abc\""], rec.events);
    }

    #[test]
    fn string_compare_spans_indefinite_segments() {
        assert_eq!(0, compare("7f \"abc\" \"de\" ff", b"abcde"));
        assert_eq!(1, compare("7f \"abc\" \"de\" ff", b"abcdef"));
        assert_eq!(-1, compare("7f \"abc\" \"de\" ff", b"abcdd"));

        // Mismatch mid-stream leaves everything rewound.
        let data = parse("7f \"abc\" \"de\" ff");
        let mut parser = CborParser::new(SliceInput::new(&data),
                                         &Config::default());
        assert_eq!(1, parser.try_read_string_compare(b"abd").unwrap());
        let mut rec = Rec::default();
        assert_eq!(ItemKind::TextStart,
                   parser.read_next_data_item(&mut rec).unwrap());
    }

    #[test]
    fn string_compare_declines_non_text() {
        assert_eq!(i32::MIN, compare("01", b"a"));
        assert_eq!(i32::MIN, compare("44 01020304", b"a"));
        assert_eq!(i32::MIN, compare("c0 \"abc\"", b"abc"));
        assert_eq!(i32::MIN, compare("", b"abc"));

        // The declined item must remain readable.
        let data = parse("01");
        let mut parser = CborParser::new(SliceInput::new(&data),
                                         &Config::default());
        assert_eq!(i32::MIN, parser.try_read_string_compare(b"x").unwrap());
        let mut rec = Rec::default();
        assert_eq!(ItemKind::Int,
                   parser.read_next_data_item(&mut rec).unwrap());
    }

    fn render<F: FnOnce(&mut CborRenderer<Vec<u8>>)>(f: F) -> Vec<u8> {
        let mut renderer = CborRenderer::new(Vec::new());
        f(&mut renderer);
        renderer.into_output()
    }

    #[test]
    fn rfc_encode_vectors() {
        assert_eq!(hex!("00"), *render(|r| r.on_int(0).unwrap()));
        assert_eq!(hex!("17"), *render(|r| r.on_int(23).unwrap()));
        assert_eq!(hex!("1818"), *render(|r| r.on_int(24).unwrap()));
        assert_eq!(hex!("1903e8"), *render(|r| r.on_int(1000).unwrap()));
        assert_eq!(hex!("1a000f4240"),
                   *render(|r| r.on_int(1000000).unwrap()));
        assert_eq!(hex!("1b000000e8d4a51000"),
                   *render(|r| r.on_long(1000000000000).unwrap()));
        assert_eq!(hex!("1bffffffffffffffff"),
                   *render(|r| r.on_over_long(false, u64::MAX).unwrap()));
        assert_eq!(hex!("20"), *render(|r| r.on_int(-1).unwrap()));
        assert_eq!(hex!("3863"), *render(|r| r.on_int(-100).unwrap()));
        assert_eq!(hex!("3b8000000000000000"),
                   *render(|r| r.on_over_long(
                       true, 0x8000000000000000).unwrap()));
        assert_eq!(hex!("f93c00"), *render(|r| r.on_float16(1.0).unwrap()));
        assert_eq!(hex!("fa47c35000"),
                   *render(|r| r.on_float(100000.0).unwrap()));
        assert_eq!(hex!("fb3ff199999999999a"),
                   *render(|r| r.on_double(1.1).unwrap()));
        assert_eq!(hex!("f4"), *render(|r| r.on_boolean(false).unwrap()));
        assert_eq!(hex!("f6"), *render(|r| r.on_null().unwrap()));
        assert_eq!(hex!("f7"), *render(|r| r.on_undefined().unwrap()));
        assert_eq!(hex!("6449455446"),
                   *render(|r| r.on_text("IETF").unwrap()));
        assert_eq!(hex!("4401020304"),
                   *render(|r| r.on_bytes(&[1, 2, 3, 4]).unwrap()));
        assert_eq!(hex!("83010203"), *render(|r| {
            r.on_array_header(3).unwrap();
            r.on_int(1).unwrap();
            r.on_int(2).unwrap();
            r.on_int(3).unwrap();
        }));
        assert_eq!(hex!("c074323031332d30332d32315432303a30343a30305a"),
                   *render(|r| {
                       r.on_tag(Tag::DateTimeString).unwrap();
                       r.on_text("2013-03-21T20:04:00Z").unwrap();
                   }));
        assert_eq!(hex!("9f0102ff"), *render(|r| {
            r.on_array_start().unwrap();
            r.on_int(1).unwrap();
            r.on_int(2).unwrap();
            r.on_break().unwrap();
        }));
    }

    #[test]
    fn renderer_rejects_unrepresentable_items() {
        let mut renderer = CborRenderer::new(Vec::new());
        assert!(matches!(renderer.on_number_string("1.5"),
                         Err(Error::Unsupported(..))));
        assert!(matches!(renderer.on_simple_value(22),
                         Err(Error::Unsupported(..))));
    }

    #[test]
    fn parse_then_render_reproduces_canonical_bytes() {
        for text in ["00", "17", "1818", "1903e8", "3863",
                     "f93c00", "fa47c35000", "fb3ff199999999999a",
                     "64 'IETF'", "44 01020304",
                     "83 010203", "a2 01020304", "9f 0102 ff",
                     "bf \"a\" 01 ff", "7f \"abc\" \"de\" ff",
                     "c0 \"2013-03-21T20:04:00Z\"", "f6", "f5", "e0",
                     "f8 20"] {
            let data = parse(text);
            let mut parser = CborParser::new(SliceInput::new(&data),
                                             &Config::default());
            let mut renderer = CborRenderer::new(Vec::new());
            loop {
                match parser.read_next_data_item(&mut renderer).unwrap() {
                    ItemKind::EndOfInput => break,
                    _ => (),
                }
            }
            assert_eq!(data, renderer.into_output(), "case {}", text);
        }
    }
}
