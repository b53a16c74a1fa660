//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Result;
use crate::item::Tag;
use crate::receiver::Receiver;

/// Builds a binary fixture from a compact textual form.
///
/// Whitespace is skipped; anything else is consumed as pairs of hex digits,
/// one byte each. Two quoting forms splice ASCII text into the output: a
/// single-quoted segment appends its characters as raw bytes, and a
/// double-quoted segment additionally prefixes them with the definite-length
/// CBOR text-string head, so fixtures full of keys and short strings do not
/// hand-count length bytes.
pub fn parse(text: &str) -> Vec<u8> {
    fn hexit(c: char) -> u8 {
        match c.to_digit(16) {
            Some(d) => d as u8,
            None => panic!("invalid hexit {:?}", c),
        }
    }

    fn quoted(chars: &mut impl Iterator<Item = char>, end: char) -> Vec<u8> {
        let mut bytes = Vec::new();
        loop {
            let c = chars.next().expect("unterminated quote in fixture");
            if c == end {
                return bytes;
            }
            assert!(c.is_ascii(), "non-ASCII fixture character {:?}", c);
            bytes.push(c as u8);
        }
    }

    let mut data = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => (),
            '\'' => data.extend(quoted(&mut chars, '\'')),
            '"' => {
                let bytes = quoted(&mut chars, '"');
                match bytes.len() {
                    n @ 0..=23 => data.push(0x60 | n as u8),
                    n @ 24..=255 => {
                        data.push(0x78);
                        data.push(n as u8);
                    }
                    n => panic!("fixture string of {} bytes", n),
                }
                data.extend(bytes);
            }
            c => {
                let hi = hexit(c);
                let lo = hexit(chars.next().expect("odd hexit count"));
                data.push((hi << 4) | lo);
            }
        }
    }

    data
}

/// Records every `Receiver` callback as one line of text, for asserting on
/// parser event sequences.
#[derive(Default)]
pub struct Rec {
    pub events: Vec<String>,
}

impl Rec {
    fn push(&mut self, s: String) {
        self.events.push(s);
    }
}

impl Receiver for Rec {
    fn on_null(&mut self) -> Result<()> {
        self.push("null".to_owned());
        Ok(())
    }
    fn on_undefined(&mut self) -> Result<()> {
        self.push("undefined".to_owned());
        Ok(())
    }
    fn on_boolean(&mut self, v: bool) -> Result<()> {
        self.push(format!("bool {}", v));
        Ok(())
    }
    fn on_int(&mut self, v: i32) -> Result<()> {
        self.push(format!("int {}", v));
        Ok(())
    }
    fn on_long(&mut self, v: i64) -> Result<()> {
        self.push(format!("long {}", v));
        Ok(())
    }
    fn on_over_long(&mut self, neg: bool, m: u64) -> Result<()> {
        self.push(format!("overlong {} {}", neg, m));
        Ok(())
    }
    fn on_float16(&mut self, v: f32) -> Result<()> {
        self.push(format!("f16 {}", v));
        Ok(())
    }
    fn on_float(&mut self, v: f32) -> Result<()> {
        self.push(format!("f32 {}", v));
        Ok(())
    }
    fn on_double(&mut self, v: f64) -> Result<()> {
        self.push(format!("f64 {}", v));
        Ok(())
    }
    fn on_simple_value(&mut self, v: u8) -> Result<()> {
        self.push(format!("simple {}", v));
        Ok(())
    }
    fn on_number_string(&mut self, v: &str) -> Result<()> {
        self.push(format!("number {}", v));
        Ok(())
    }
    fn on_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.push(format!("bytes {:02x?}", v));
        Ok(())
    }
    fn on_bytes_start(&mut self) -> Result<()> {
        self.push("bytes*".to_owned());
        Ok(())
    }
    fn on_text(&mut self, v: &str) -> Result<()> {
        self.push(format!("text {:?}", v));
        Ok(())
    }
    fn on_text_start(&mut self) -> Result<()> {
        self.push("text*".to_owned());
        Ok(())
    }
    fn on_array_header(&mut self, n: u64) -> Result<()> {
        self.push(format!("array {}", n));
        Ok(())
    }
    fn on_array_start(&mut self) -> Result<()> {
        self.push("array*".to_owned());
        Ok(())
    }
    fn on_map_header(&mut self, n: u64) -> Result<()> {
        self.push(format!("map {}", n));
        Ok(())
    }
    fn on_map_start(&mut self) -> Result<()> {
        self.push("map*".to_owned());
        Ok(())
    }
    fn on_tag(&mut self, t: Tag) -> Result<()> {
        self.push(format!("tag {}", t.value()));
        Ok(())
    }
    fn on_break(&mut self) -> Result<()> {
        self.push("break".to_owned());
        Ok(())
    }
    fn on_end_of_input(&mut self) -> Result<()> {
        self.push("eoi".to_owned());
        Ok(())
    }
}
