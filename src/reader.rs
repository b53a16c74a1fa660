//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The typed reader façade over any format parser.
//!
//! A [`Reader`] wraps a parser, a scratch [`Receptacle`] and a [`Config`].
//! `read_next()` drives one data-item cycle into the receptacle and returns
//! its kind; the typed `read_*` helpers compose these primitives, keep the
//! per-container element accounting, and turn mismatches into positioned
//! errors. One item of lookahead (`peek`) makes `try_read_break` and
//! null-probing possible without consuming.

use crate::error::{Error, Result};
use crate::item::{ItemKind, Tag};
use crate::receiver::{Receiver, TeeReceiver};

/// Run-time configuration for decoding.
#[derive(Debug, Clone)]
pub struct Config {
    /// Permit leftover bytes after the top-level value. The default is
    /// false: decoding must consume the input exactly.
    pub prefix_only: bool,
    /// Upper bound for a single (or assembled indefinite) byte string.
    ///
    /// The default is 1 MiB.
    pub max_byte_string_length: u64,
    /// Upper bound for a single (or assembled indefinite) text string.
    ///
    /// The default is 1 MiB.
    pub max_text_string_length: u64,
    /// Most mantissa digits a JSON number may carry. The default is 34.
    pub max_number_mantissa_digits: u32,
    /// Largest absolute exponent a JSON number may carry. The default
    /// is 999.
    pub max_number_abs_exponent: u32,
    /// Initial capacity of the JSON parser's string buffer. The default
    /// is 2048.
    pub initial_charbuffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefix_only: false,
            max_byte_string_length: 1024 * 1024,
            max_text_string_length: 1024 * 1024,
            max_number_mantissa_digits: 34,
            max_number_abs_exponent: 999,
            initial_charbuffer_size: 2048,
        }
    }
}

/// The contract every format parser implements.
///
/// A parser pulls bytes from its input and fires exactly one [`Receiver`]
/// callback per `read_next_data_item` call, returning the kind of the
/// callback that fired so callers can route without a second dispatch. Any
/// error is terminal; the parser must be discarded.
pub trait Parser {
    /// Parses one data item into `receiver`.
    fn read_next_data_item(&mut self, receiver: &mut dyn Receiver)
                           -> Result<ItemKind>;

    /// Compares the next data item, expected to be a text string, byte-wise
    /// against `target` without allocating.
    ///
    /// Returns the sign of `target.cmp(item)`; 0 means the item matched and
    /// was consumed, any other result leaves the input rewound to the item
    /// start. `i32::MIN` means the next item is not a text string (or the
    /// format has no fast path) and the caller must fall back to a generic
    /// read.
    fn try_read_string_compare(&mut self, target: &[u8]) -> Result<i32> {
        let _ = target;
        Ok(i32::MIN)
    }

    /// Position of the first byte of the most recently parsed item.
    fn value_index(&self) -> u64;

    /// Current byte position.
    fn cursor(&self) -> u64;
}

/// The payload slot of the receptacle.
#[derive(Debug, Default)]
enum Obj {
    #[default]
    None,
    Bytes(Vec<u8>),
    Text(String),
}

/// A single-slot buffer mirroring the most recent data item.
///
/// Lifetime equals one read-next cycle: the reader resets it before every
/// parser call. Which fields are meaningful depends on the item kind.
#[derive(Debug)]
pub struct Receptacle {
    kind: ItemKind,
    bool_value: bool,
    int_value: i32,
    long_value: i64,
    ulong_value: u64,
    float_value: f32,
    double_value: f64,
    tag_value: Tag,
    obj: Obj,
}

impl Default for Receptacle {
    fn default() -> Self {
        Receptacle {
            kind: ItemKind::EndOfInput,
            bool_value: false,
            int_value: 0,
            long_value: 0,
            ulong_value: 0,
            float_value: 0.0,
            double_value: 0.0,
            tag_value: Tag::Other(0),
            obj: Obj::None,
        }
    }
}

impl Receptacle {
    fn clear(&mut self) {
        *self = Receptacle::default();
    }

    /// Kind of the buffered item.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The boolean payload; for `OverLong`, the sign flag.
    pub fn bool_value(&self) -> bool {
        self.bool_value
    }

    /// The `Int` or `SimpleValue` payload.
    pub fn int_value(&self) -> i32 {
        self.int_value
    }

    /// The `Long` payload.
    pub fn long_value(&self) -> i64 {
        self.long_value
    }

    /// The `OverLong` magnitude or a container header length.
    pub fn ulong_value(&self) -> u64 {
        self.ulong_value
    }

    /// The `Float16`/`Float` payload.
    pub fn float_value(&self) -> f32 {
        self.float_value
    }

    /// The `Double` payload.
    pub fn double_value(&self) -> f64 {
        self.double_value
    }

    /// The `Tag` payload.
    pub fn tag_value(&self) -> Tag {
        self.tag_value
    }

    /// The `Text` or `NumberString` payload, if any.
    pub fn text(&self) -> Option<&str> {
        match self.obj {
            Obj::Text(ref s) => Some(s),
            _ => None,
        }
    }

    /// The `Bytes` payload, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self.obj {
            Obj::Bytes(ref b) => Some(b),
            _ => None,
        }
    }

    fn take_text(&mut self) -> Option<String> {
        match std::mem::take(&mut self.obj) {
            Obj::Text(s) => Some(s),
            other => {
                self.obj = other;
                None
            }
        }
    }

    fn take_bytes(&mut self) -> Option<Vec<u8>> {
        match std::mem::take(&mut self.obj) {
            Obj::Bytes(b) => Some(b),
            other => {
                self.obj = other;
                None
            }
        }
    }
}

impl Receiver for Receptacle {
    fn on_null(&mut self) -> Result<()> {
        self.kind = ItemKind::Null;
        Ok(())
    }

    fn on_undefined(&mut self) -> Result<()> {
        self.kind = ItemKind::Undefined;
        Ok(())
    }

    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.kind = ItemKind::Boolean;
        self.bool_value = value;
        Ok(())
    }

    fn on_int(&mut self, value: i32) -> Result<()> {
        self.kind = ItemKind::Int;
        self.int_value = value;
        Ok(())
    }

    fn on_long(&mut self, value: i64) -> Result<()> {
        self.kind = ItemKind::Long;
        self.long_value = value;
        Ok(())
    }

    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        self.kind = ItemKind::OverLong;
        self.bool_value = negative;
        self.ulong_value = magnitude;
        Ok(())
    }

    fn on_float16(&mut self, value: f32) -> Result<()> {
        self.kind = ItemKind::Float16;
        self.float_value = value;
        Ok(())
    }

    fn on_float(&mut self, value: f32) -> Result<()> {
        self.kind = ItemKind::Float;
        self.float_value = value;
        Ok(())
    }

    fn on_double(&mut self, value: f64) -> Result<()> {
        self.kind = ItemKind::Double;
        self.double_value = value;
        Ok(())
    }

    fn on_simple_value(&mut self, value: u8) -> Result<()> {
        self.kind = ItemKind::SimpleValue;
        self.int_value = i32::from(value);
        Ok(())
    }

    fn on_number_string(&mut self, value: &str) -> Result<()> {
        self.kind = ItemKind::NumberString;
        self.obj = Obj::Text(value.to_owned());
        Ok(())
    }

    fn on_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.kind = ItemKind::Bytes;
        self.obj = Obj::Bytes(value.to_vec());
        Ok(())
    }

    fn on_bytes_start(&mut self) -> Result<()> {
        self.kind = ItemKind::BytesStart;
        Ok(())
    }

    fn on_text(&mut self, value: &str) -> Result<()> {
        self.kind = ItemKind::Text;
        self.obj = Obj::Text(value.to_owned());
        Ok(())
    }

    fn on_text_start(&mut self) -> Result<()> {
        self.kind = ItemKind::TextStart;
        Ok(())
    }

    fn on_array_header(&mut self, length: u64) -> Result<()> {
        self.kind = ItemKind::ArrayHeader;
        self.ulong_value = length;
        Ok(())
    }

    fn on_array_start(&mut self) -> Result<()> {
        self.kind = ItemKind::ArrayStart;
        Ok(())
    }

    fn on_map_header(&mut self, length: u64) -> Result<()> {
        self.kind = ItemKind::MapHeader;
        self.ulong_value = length;
        Ok(())
    }

    fn on_map_start(&mut self) -> Result<()> {
        self.kind = ItemKind::MapStart;
        Ok(())
    }

    fn on_tag(&mut self, tag: Tag) -> Result<()> {
        self.kind = ItemKind::Tag;
        self.tag_value = tag;
        Ok(())
    }

    fn on_break(&mut self) -> Result<()> {
        self.kind = ItemKind::Break;
        Ok(())
    }

    fn on_end_of_input(&mut self) -> Result<()> {
        self.kind = ItemKind::EndOfInput;
        Ok(())
    }
}

/// One open container. Maps count keys and values individually, so a
/// definite map of `n` entries starts at `2n`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    map: bool,
    remaining: Option<u64>,
}

/// Typed helpers over a parser plus a scratch receptacle.
pub struct Reader<P> {
    parser: P,
    receptacle: Receptacle,
    config: Config,
    has_item: bool,
    frames: Vec<Frame>,
    tap: Option<Box<dyn Receiver>>,
}

impl<P: Parser> Reader<P> {
    /// Creates a reader over `parser`.
    pub fn new(parser: P, config: Config) -> Self {
        Reader {
            parser,
            receptacle: Receptacle::default(),
            config,
            has_item: false,
            frames: Vec::new(),
            tap: None,
        }
    }

    /// Installs a receiver that observes every data item flowing through
    /// this reader, e.g. a [`crate::LogReceiver`].
    pub fn with_tap(mut self, tap: Box<dyn Receiver>) -> Self {
        self.tap = Some(tap);
        self
    }

    /// The configuration this reader runs under.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The buffered most recent data item.
    pub fn receptacle(&self) -> &Receptacle {
        &self.receptacle
    }

    /// Position of the first byte of the current (or most recent) item.
    pub fn position(&self) -> u64 {
        self.parser.value_index()
    }

    /// Bytes consumed from the input, not counting an unconsumed lookahead
    /// item.
    pub fn bytes_consumed(&self) -> u64 {
        if self.has_item {
            self.parser.value_index()
        } else {
            self.parser.cursor()
        }
    }

    /// Consumes the reader and returns the parser.
    pub fn into_parser(self) -> P {
        self.parser
    }

    fn pull(&mut self) -> Result<ItemKind> {
        if !self.has_item {
            self.receptacle.clear();
            match self.tap.as_mut() {
                Some(tap) => {
                    let mut tee = TeeReceiver {
                        observer: &mut **tap,
                        target: &mut self.receptacle,
                    };
                    self.parser.read_next_data_item(&mut tee)?;
                }
                None => {
                    self.parser.read_next_data_item(&mut self.receptacle)?;
                }
            }
            self.has_item = true;
        }
        Ok(self.receptacle.kind())
    }

    fn consume(&mut self) {
        self.has_item = false;
    }

    /// Parses the next item into the receptacle without consuming it; the
    /// following `read_*` call sees the same item.
    pub fn peek(&mut self) -> Result<ItemKind> {
        self.pull()
    }

    /// Drives one raw data-item cycle and returns its kind.
    ///
    /// This is the low-level primitive: it performs no container
    /// accounting. Mixing it with the typed helpers inside a container will
    /// confuse the arity checks.
    pub fn read_next(&mut self) -> Result<ItemKind> {
        let kind = self.pull()?;
        self.consume();
        Ok(kind)
    }

    fn mismatch<T>(&self, expected: &str) -> Result<T> {
        Err(Error::InvalidInputData(
            self.parser.value_index(),
            format!("expected {}, got {}", expected,
                    self.receptacle.kind().name())))
    }

    /// Books one value item against the innermost container.
    fn count_value(&mut self) -> Result<()> {
        if let Some(f) = self.frames.last_mut() {
            match f.remaining {
                Some(0) => {
                    return Err(Error::InvalidInputData(
                        self.parser.value_index(),
                        "more items than the container declared".to_owned()));
                }
                Some(ref mut n) => *n -= 1,
                None => (),
            }
        }
        Ok(())
    }

    fn number_token(&self) -> &str {
        self.receptacle.text().unwrap_or("")
    }

    fn bad_number<T>(&self, what: &str) -> Result<T> {
        Err(Error::InvalidInputData(
            self.parser.value_index(),
            format!("number {} is not {}", self.number_token(), what)))
    }

    /// Reads a boolean.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.pull()? {
            ItemKind::Boolean => {
                let v = self.receptacle.bool_value();
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("Boolean"),
        }
    }

    /// Reads the null value.
    pub fn read_null(&mut self) -> Result<()> {
        match self.pull()? {
            ItemKind::Null => {
                self.count_value()?;
                self.consume();
                Ok(())
            }
            _ => self.mismatch("Null"),
        }
    }

    /// Consumes a null item if one is next.
    pub fn try_read_null(&mut self) -> Result<bool> {
        if self.pull()? == ItemKind::Null {
            self.count_value()?;
            self.consume();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Reads a 32-bit signed integer (`Int`, or a JSON number token).
    pub fn read_int(&mut self) -> Result<i32> {
        match self.pull()? {
            ItemKind::Int => {
                let v = self.receptacle.int_value();
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::NumberString => {
                let v = match self.number_token().parse::<i32>() {
                    Ok(v) => v,
                    Err(_) => return self.bad_number("a 32-bit integer"),
                };
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("Int"),
        }
    }

    /// Reads a 64-bit signed integer.
    pub fn read_long(&mut self) -> Result<i64> {
        match self.pull()? {
            ItemKind::Int => {
                let v = i64::from(self.receptacle.int_value());
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::Long => {
                let v = self.receptacle.long_value();
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::NumberString => {
                let v = match self.number_token().parse::<i64>() {
                    Ok(v) => v,
                    Err(_) => return self.bad_number("a 64-bit integer"),
                };
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("Int or Long"),
        }
    }

    /// Reads a 64-bit unsigned integer, accepting a non-negative
    /// `Int`/`Long` or a positive `OverLong`.
    pub fn read_u64(&mut self) -> Result<u64> {
        match self.pull()? {
            ItemKind::Int if self.receptacle.int_value() >= 0 => {
                let v = self.receptacle.int_value() as u64;
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::Long if self.receptacle.long_value() >= 0 => {
                let v = self.receptacle.long_value() as u64;
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::OverLong if !self.receptacle.bool_value() => {
                let v = self.receptacle.ulong_value();
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::NumberString => {
                let v = match self.number_token().parse::<u64>() {
                    Ok(v) => v,
                    Err(_) => {
                        return self.bad_number("a 64-bit unsigned integer");
                    }
                };
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("an unsigned integer"),
        }
    }

    /// Reads an over-long integer as its (negative, magnitude) pair.
    pub fn read_over_long(&mut self) -> Result<(bool, u64)> {
        match self.pull()? {
            ItemKind::OverLong => {
                let v = (self.receptacle.bool_value(),
                         self.receptacle.ulong_value());
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("OverLong"),
        }
    }

    /// Reads a single-precision float (`Float16`, `Float`, or a JSON
    /// number token).
    pub fn read_f32(&mut self) -> Result<f32> {
        match self.pull()? {
            ItemKind::Float16 | ItemKind::Float => {
                let v = self.receptacle.float_value();
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::NumberString => {
                let v = match self.number_token().parse::<f32>() {
                    Ok(v) => v,
                    Err(_) => return self.bad_number("a float"),
                };
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("Float16 or Float"),
        }
    }

    /// Reads a double-precision float; any numeric item widens losslessly
    /// except `Long`, which is converted with possible precision loss.
    pub fn read_f64(&mut self) -> Result<f64> {
        match self.pull()? {
            ItemKind::Float16 | ItemKind::Float => {
                let v = f64::from(self.receptacle.float_value());
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::Double => {
                let v = self.receptacle.double_value();
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::Int => {
                let v = f64::from(self.receptacle.int_value());
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::Long => {
                let v = self.receptacle.long_value() as f64;
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            ItemKind::NumberString => {
                let v = match self.number_token().parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => return self.bad_number("a double"),
                };
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("a numeric item"),
        }
    }

    /// Reads a CBOR simple value.
    pub fn read_simple_value(&mut self) -> Result<u8> {
        match self.pull()? {
            ItemKind::SimpleValue => {
                let v = self.receptacle.int_value() as u8;
                self.count_value()?;
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("SimpleValue"),
        }
    }

    /// Reads a tag. Tags do not count as container elements; they modify
    /// the item that follows.
    pub fn read_tag(&mut self) -> Result<Tag> {
        match self.pull()? {
            ItemKind::Tag => {
                let v = self.receptacle.tag_value();
                self.consume();
                Ok(v)
            }
            _ => self.mismatch("Tag"),
        }
    }

    /// Reads a text string. An indefinite-length stream is concatenated
    /// segment by segment, bounded by `max_text_string_length`.
    pub fn read_string(&mut self) -> Result<String> {
        match self.pull()? {
            ItemKind::Text => {
                let s = self.receptacle.take_text().unwrap_or_default();
                self.count_value()?;
                self.consume();
                Ok(s)
            }
            ItemKind::TextStart => {
                self.count_value()?;
                self.consume();
                let mut assembled = String::new();
                loop {
                    match self.pull()? {
                        ItemKind::Text => {
                            let seg = self.receptacle
                                          .take_text()
                                          .unwrap_or_default();
                            let total = assembled.len() as u64
                                + seg.len() as u64;
                            if total > self.config.max_text_string_length {
                                return Err(Error::Overflow(
                                    self.parser.value_index(),
                                    "text string longer than the configured \
                                     maximum"));
                            }
                            assembled.push_str(&seg);
                            self.consume();
                        }
                        ItemKind::Break => {
                            self.consume();
                            return Ok(assembled);
                        }
                        _ => return self.mismatch("Text segment or Break"),
                    }
                }
            }
            _ => self.mismatch("Text"),
        }
    }

    /// Reads a byte string; indefinite streams are concatenated under
    /// `max_byte_string_length`.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        match self.pull()? {
            ItemKind::Bytes => {
                let b = self.receptacle.take_bytes().unwrap_or_default();
                self.count_value()?;
                self.consume();
                Ok(b)
            }
            ItemKind::BytesStart => {
                self.count_value()?;
                self.consume();
                let mut assembled = Vec::new();
                loop {
                    match self.pull()? {
                        ItemKind::Bytes => {
                            let seg = self.receptacle
                                          .take_bytes()
                                          .unwrap_or_default();
                            let total = assembled.len() as u64
                                + seg.len() as u64;
                            if total > self.config.max_byte_string_length {
                                return Err(Error::Overflow(
                                    self.parser.value_index(),
                                    "byte string longer than the configured \
                                     maximum"));
                            }
                            assembled.extend_from_slice(&seg);
                            self.consume();
                        }
                        ItemKind::Break => {
                            self.consume();
                            return Ok(assembled);
                        }
                        _ => return self.mismatch("Bytes segment or Break"),
                    }
                }
            }
            _ => self.mismatch("Bytes"),
        }
    }

    /// Opens an array: `Some(n)` for a definite header, `None` for an
    /// indefinite start (close the latter with [`Reader::try_read_break`]).
    pub fn read_array(&mut self) -> Result<Option<u64>> {
        match self.pull()? {
            ItemKind::ArrayHeader => {
                let n = self.receptacle.ulong_value();
                self.count_value()?;
                self.consume();
                self.frames.push(Frame { map: false, remaining: Some(n) });
                Ok(Some(n))
            }
            ItemKind::ArrayStart => {
                self.count_value()?;
                self.consume();
                self.frames.push(Frame { map: false, remaining: None });
                Ok(None)
            }
            _ => self.mismatch("ArrayHeader or ArrayStart"),
        }
    }

    /// Opens an array that must hold exactly `expected` elements.
    ///
    /// An indefinite array is accepted; its arity is enforced when it is
    /// closed.
    pub fn read_array_open(&mut self, expected: u64) -> Result<()> {
        match self.read_array()? {
            Some(n) if n != expected => Err(Error::InvalidInputData(
                self.parser.value_index(),
                format!("expected an array of {} element(s), got {}",
                        expected, n))),
            _ => Ok(()),
        }
    }

    /// Closes the innermost array: the declared count must be exhausted, or
    /// for an indefinite array the next item must be the Break.
    pub fn read_array_close(&mut self) -> Result<()> {
        self.close_container(false)
    }

    /// Opens a map: `Some(n)` entries for a definite header, `None` for an
    /// indefinite start.
    pub fn read_map(&mut self) -> Result<Option<u64>> {
        match self.pull()? {
            ItemKind::MapHeader => {
                let n = self.receptacle.ulong_value();
                let items = n.checked_mul(2).ok_or(Error::Overflow(
                    self.parser.value_index(), "map length out of range"))?;
                self.count_value()?;
                self.consume();
                self.frames.push(Frame { map: true,
                                         remaining: Some(items) });
                Ok(Some(n))
            }
            ItemKind::MapStart => {
                self.count_value()?;
                self.consume();
                self.frames.push(Frame { map: true, remaining: None });
                Ok(None)
            }
            _ => self.mismatch("MapHeader or MapStart"),
        }
    }

    /// Opens a map that must hold exactly `expected` entries.
    pub fn read_map_open(&mut self, expected: u64) -> Result<()> {
        match self.read_map()? {
            Some(n) if n != expected => Err(Error::InvalidInputData(
                self.parser.value_index(),
                format!("expected a map of {} entr(y/ies), got {}",
                        expected, n))),
            _ => Ok(()),
        }
    }

    /// Closes the innermost map.
    pub fn read_map_close(&mut self) -> Result<()> {
        self.close_container(true)
    }

    fn close_container(&mut self, map: bool) -> Result<()> {
        let info = match self.frames.last() {
            Some(f) if f.map == map => f.remaining,
            _ => {
                return Err(Error::InvalidInputData(
                    self.parser.cursor(),
                    format!("no open {} to close",
                            if map { "map" } else { "array" })));
            }
        };
        match info {
            Some(0) => {
                self.frames.pop();
                Ok(())
            }
            Some(n) => Err(Error::InvalidInputData(
                self.parser.cursor(),
                format!("container closed with {} item(s) remaining", n))),
            None => match self.pull()? {
                ItemKind::Break => {
                    self.consume();
                    self.frames.pop();
                    Ok(())
                }
                _ => self.mismatch("Break"),
            },
        }
    }

    /// Consumes the Break terminating the innermost indefinite container,
    /// if it is next. Returns false (consuming nothing) otherwise.
    pub fn try_read_break(&mut self) -> Result<bool> {
        if self.pull()? != ItemKind::Break {
            return Ok(false);
        }
        match self.frames.last() {
            Some(f) if f.remaining.is_none() => {
                self.consume();
                self.frames.pop();
                Ok(true)
            }
            _ => self.mismatch("a container item"),
        }
    }

    /// True once the innermost container has delivered all its items; pops
    /// the container (consuming the Break where there is one).
    pub fn container_ended(&mut self) -> Result<bool> {
        let info = match self.frames.last() {
            Some(f) => f.remaining,
            None => {
                return Err(Error::InvalidInputData(
                    self.parser.cursor(), "no open container".to_owned()));
            }
        };
        match info {
            Some(0) => {
                self.frames.pop();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => self.try_read_break(),
        }
    }

    /// Reads the end of the input.
    pub fn read_end_of_input(&mut self) -> Result<()> {
        match self.pull()? {
            ItemKind::EndOfInput => {
                self.consume();
                Ok(())
            }
            _ => self.mismatch("EndOfInput"),
        }
    }

    /// Forwards to the parser's allocation-free string comparison. Falls
    /// back (returns `i32::MIN`) when a lookahead item is already buffered.
    pub fn try_read_string_compare(&mut self, target: &[u8]) -> Result<i32> {
        if self.has_item {
            return Ok(i32::MIN);
        }
        let r = self.parser.try_read_string_compare(target)?;
        if r == 0 {
            self.count_value()?;
        }
        Ok(r)
    }

    /// Consumes the next item if it is a text string equal to `key`,
    /// preferring the parser's comparison fast path.
    pub fn try_read_key_str(&mut self, key: &str) -> Result<bool> {
        match self.try_read_string_compare(key.as_bytes())? {
            0 => Ok(true),
            i32::MIN => match self.pull()? {
                ItemKind::Text if self.receptacle.text() == Some(key) => {
                    self.count_value()?;
                    self.consume();
                    Ok(true)
                }
                _ => Ok(false),
            },
            _ => Ok(false),
        }
    }

    /// Consumes the next item if it is an integer equal to `key`.
    pub fn try_read_key_long(&mut self, key: i64) -> Result<bool> {
        let matched = match self.pull()? {
            ItemKind::Int => i64::from(self.receptacle.int_value()) == key,
            ItemKind::Long => self.receptacle.long_value() == key,
            ItemKind::NumberString => {
                self.number_token().parse::<i64>() == Ok(key)
            }
            _ => false,
        };
        if matched {
            self.count_value()?;
            self.consume();
        }
        Ok(matched)
    }

    /// A positioned "no codec matched" error for derived sum types.
    pub fn unknown_type_id<T>(&mut self) -> Result<T> {
        Err(Error::InvalidInputData(
            self.parser.value_index(),
            "unknown type id for sum-type decoding".to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cbor::CborParser;
    use crate::input::SliceInput;
    use crate::json::JsonParser;
    use crate::receiver::LogReceiver;
    use crate::test_helpers::parse;

    fn cbor_reader(data: &[u8]) -> Reader<CborParser<SliceInput<'_>>> {
        let config = Config::default();
        Reader::new(CborParser::new(SliceInput::new(data), &config), config)
    }

    fn json_reader(text: &str) -> Reader<JsonParser<SliceInput<'_>>> {
        let config = Config::default();
        Reader::new(JsonParser::new(SliceInput::new(text.as_bytes()),
                                    &config),
                    config)
    }

    #[test]
    fn typed_scalar_reads() {
        let data = parse("0c 38 62 f5 f6 fb 3ff0000000000000 \"abc\"");
        let mut r = cbor_reader(&data);
        assert_eq!(12, r.read_int().unwrap());
        assert_eq!(-99, r.read_long().unwrap());
        assert!(r.read_bool().unwrap());
        r.read_null().unwrap();
        assert_eq!(1.0, r.read_f64().unwrap());
        assert_eq!("abc", r.read_string().unwrap());
        r.read_end_of_input().unwrap();
    }

    #[test]
    fn mismatches_carry_positions() {
        let data = parse("00 \"abc\"");
        let mut r = cbor_reader(&data);
        r.read_int().unwrap();
        match r.read_int() {
            Err(Error::InvalidInputData(pos, msg)) => {
                assert_eq!(1, pos);
                assert!(msg.contains("Text"), "{}", msg);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn definite_array_accounting() {
        let data = parse("83 010203");
        let mut r = cbor_reader(&data);
        assert_eq!(Some(3), r.read_array().unwrap());
        assert_eq!(1, r.read_int().unwrap());
        assert_eq!(2, r.read_int().unwrap());
        assert_eq!(3, r.read_int().unwrap());
        r.read_array_close().unwrap();
        r.read_end_of_input().unwrap();
    }

    #[test]
    fn early_close_is_rejected() {
        let data = parse("83 010203");
        let mut r = cbor_reader(&data);
        r.read_array_open(3).unwrap();
        r.read_int().unwrap();
        assert!(matches!(r.read_array_close(),
                         Err(Error::InvalidInputData(..))));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let data = parse("82 0102");
        let mut r = cbor_reader(&data);
        assert!(matches!(r.read_array_open(3),
                         Err(Error::InvalidInputData(..))));
    }

    #[test]
    fn indefinite_array_with_break() {
        let data = parse("9f 0102 ff");
        let mut r = cbor_reader(&data);
        assert_eq!(None, r.read_array().unwrap());
        let mut items = Vec::new();
        while !r.try_read_break().unwrap() {
            items.push(r.read_int().unwrap());
        }
        assert_eq!(vec![1, 2], items);
        r.read_end_of_input().unwrap();
    }

    #[test]
    fn map_accounting_counts_keys_and_values() {
        let data = parse("a2 \"a\" 01 \"b\" 02");
        let mut r = cbor_reader(&data);
        assert_eq!(Some(2), r.read_map().unwrap());
        assert_eq!("a", r.read_string().unwrap());
        assert_eq!(1, r.read_int().unwrap());
        assert_eq!("b", r.read_string().unwrap());
        assert_eq!(2, r.read_int().unwrap());
        r.read_map_close().unwrap();
        r.read_end_of_input().unwrap();
    }

    #[test]
    fn indefinite_text_assembles_to_one_string() {
        // 0x7F "abc" "de" 0xFF yields the logical text "abcde".
        let data = parse("7f \"abc\" \"de\" ff");
        let mut r = cbor_reader(&data);
        assert_eq!("abcde", r.read_string().unwrap());
        r.read_end_of_input().unwrap();
    }

    #[test]
    fn indefinite_bytes_assemble() {
        let data = parse("5f 41 01 42 0203 ff");
        let mut r = cbor_reader(&data);
        assert_eq!(vec![1, 2, 3], r.read_bytes().unwrap());
    }

    #[test]
    fn assembled_text_respects_the_length_bound() {
        let mut config = Config::default();
        config.max_text_string_length = 4;
        let data = parse("7f \"abc\" \"de\" ff");
        let mut r = Reader::new(
            CborParser::new(SliceInput::new(&data), &config), config.clone());
        assert!(matches!(r.read_string(), Err(Error::Overflow(..))));
    }

    #[test]
    fn tag_then_value() {
        let data = parse("c0 \"2013-03-21T20:04:00Z\"");
        let mut r = cbor_reader(&data);
        assert_eq!(Tag::DateTimeString, r.read_tag().unwrap());
        assert_eq!("2013-03-21T20:04:00Z", r.read_string().unwrap());
    }

    #[test]
    fn peek_does_not_consume() {
        let data = parse("0c");
        let mut r = cbor_reader(&data);
        assert_eq!(ItemKind::Int, r.peek().unwrap());
        assert_eq!(ItemKind::Int, r.peek().unwrap());
        assert_eq!(12, r.read_int().unwrap());
    }

    #[test]
    fn json_number_tokens_narrow_on_demand() {
        let mut r = json_reader("[12, 3.5, 9223372036854775807]");
        r.read_array_open(3).unwrap();
        assert_eq!(12, r.read_int().unwrap());
        assert_eq!(3.5, r.read_f64().unwrap());
        assert_eq!(i64::MAX, r.read_long().unwrap());
        r.read_array_close().unwrap();
        r.read_end_of_input().unwrap();

        let mut r = json_reader("1.5");
        assert!(matches!(r.read_int(), Err(Error::InvalidInputData(..))));
    }

    #[test]
    fn overlong_reads() {
        let data = parse("1b ffffffffffffffff 3b 8000000000000000");
        let mut r = cbor_reader(&data);
        assert_eq!(u64::MAX, r.read_u64().unwrap());
        assert_eq!((true, 0x8000000000000000), r.read_over_long().unwrap());
    }

    #[test]
    fn key_matching_uses_the_fast_path() {
        let data = parse("a2 \"a\" 01 \"b\" 02");
        let mut r = cbor_reader(&data);
        r.read_map().unwrap();
        assert!(!r.try_read_key_str("b").unwrap());
        assert!(r.try_read_key_str("a").unwrap());
        assert_eq!(1, r.read_int().unwrap());
        assert!(r.try_read_key_str("b").unwrap());
        assert_eq!(2, r.read_int().unwrap());
        assert!(r.container_ended().unwrap());
    }

    #[test]
    fn key_matching_falls_back_for_json() {
        let mut r = json_reader("{\"a\": 1}");
        r.read_map().unwrap();
        assert!(!r.try_read_key_str("b").unwrap());
        assert!(r.try_read_key_str("a").unwrap());
        assert_eq!(1, r.read_int().unwrap());
        assert!(r.container_ended().unwrap());
        r.read_end_of_input().unwrap();
    }

    #[test]
    fn integer_keys_match() {
        let data = parse("a1 07 \"x\"");
        let mut r = cbor_reader(&data);
        r.read_map().unwrap();
        assert!(!r.try_read_key_long(8).unwrap());
        assert!(r.try_read_key_long(7).unwrap());
        assert_eq!("x", r.read_string().unwrap());
    }

    #[test]
    fn tap_observes_the_stream() {
        let data = parse("82 01 \"abc\"");
        let config = Config::default();
        let mut r = Reader::new(
            CborParser::new(SliceInput::new(&data), &config), config)
            .with_tap(Box::new(LogReceiver::new()));
        r.read_array_open(2).unwrap();
        assert_eq!(1, r.read_int().unwrap());
        assert_eq!("abc", r.read_string().unwrap());
        r.read_array_close().unwrap();
    }
}
