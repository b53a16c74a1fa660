//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The universal event protocol between parsers and consumers.
//!
//! A parser delivers exactly one `Receiver` callback per
//! `read_next_data_item` call, strictly in input order and never
//! re-entrantly. Borrowed payloads (`&[u8]`, `&str`) are only valid for the
//! duration of the callback; a receiver copies what it needs to retain.

use crate::error::Result;
use crate::item::Tag;

/// The closed set of typed callbacks, one per data-item kind.
///
/// Renderers implement this to write a wire format; the reader's receptacle
/// implements it to buffer one item for typed access.
pub trait Receiver {
    /// The null value.
    fn on_null(&mut self) -> Result<()>;
    /// The undefined value.
    fn on_undefined(&mut self) -> Result<()>;
    /// A boolean.
    fn on_boolean(&mut self, value: bool) -> Result<()>;
    /// A signed integer fitting 32 bits.
    fn on_int(&mut self, value: i32) -> Result<()>;
    /// A signed integer fitting 64 bits but not 32.
    fn on_long(&mut self, value: i64) -> Result<()>;
    /// An integer with magnitude in `[2^63, 2^64)`. A negative over-long
    /// with magnitude `m` denotes the value `-1 - m`.
    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()>;
    /// A half-precision float, widened to `f32`.
    fn on_float16(&mut self, value: f32) -> Result<()>;
    /// A single-precision float.
    fn on_float(&mut self, value: f32) -> Result<()>;
    /// A double-precision float.
    fn on_double(&mut self, value: f64) -> Result<()>;
    /// A CBOR simple value in `{0..19, 32..255}`.
    fn on_simple_value(&mut self, value: u8) -> Result<()>;
    /// A lexical numeric token (JSON).
    fn on_number_string(&mut self, value: &str) -> Result<()>;
    /// A definite-length byte string, or one segment of an indefinite one.
    fn on_bytes(&mut self, value: &[u8]) -> Result<()>;
    /// An indefinite-length byte stream opens.
    fn on_bytes_start(&mut self) -> Result<()>;
    /// A definite-length text string, or one segment of an indefinite one.
    fn on_text(&mut self, value: &str) -> Result<()>;
    /// An indefinite-length text stream opens.
    fn on_text_start(&mut self) -> Result<()>;
    /// A definite-length array of `length` following items.
    fn on_array_header(&mut self, length: u64) -> Result<()>;
    /// An indefinite-length array opens.
    fn on_array_start(&mut self) -> Result<()>;
    /// A definite-length map of `length` following key/value pairs.
    fn on_map_header(&mut self, length: u64) -> Result<()>;
    /// An indefinite-length map opens.
    fn on_map_start(&mut self) -> Result<()>;
    /// A semantic tag modifying the next item.
    fn on_tag(&mut self, tag: Tag) -> Result<()>;
    /// Terminates the innermost indefinite-length item.
    fn on_break(&mut self) -> Result<()>;
    /// The input is exhausted at an item boundary.
    fn on_end_of_input(&mut self) -> Result<()>;
}

/// Forwards every callback to two receivers, observer first.
///
/// This is how the `receiver_wrapper` decoding option is realised: the
/// reader tees the parser's callbacks into the observer and then into its
/// own receptacle.
pub struct TeeReceiver<'a> {
    /// Sees each item first; usually a diagnostic sink like `LogReceiver`.
    pub observer: &'a mut dyn Receiver,
    /// The receiver actually consuming the items.
    pub target: &'a mut dyn Receiver,
}

macro_rules! tee {
    ($(fn $meth:ident($($arg:ident : $t:ty),*);)*) => {
        impl<'a> Receiver for TeeReceiver<'a> {
            $(
                fn $meth(&mut self, $($arg: $t),*) -> Result<()> {
                    self.observer.$meth($($arg),*)?;
                    self.target.$meth($($arg),*)
                }
            )*
        }
    }
}

tee! {
    fn on_null();
    fn on_undefined();
    fn on_boolean(value: bool);
    fn on_int(value: i32);
    fn on_long(value: i64);
    fn on_over_long(negative: bool, magnitude: u64);
    fn on_float16(value: f32);
    fn on_float(value: f32);
    fn on_double(value: f64);
    fn on_simple_value(value: u8);
    fn on_number_string(value: &str);
    fn on_bytes(value: &[u8]);
    fn on_bytes_start();
    fn on_text(value: &str);
    fn on_text_start();
    fn on_array_header(length: u64);
    fn on_array_start();
    fn on_map_header(length: u64);
    fn on_map_start();
    fn on_tag(tag: Tag);
    fn on_break();
    fn on_end_of_input();
}

/// Emits one `log::trace!` line per data item and otherwise accepts
/// everything. Wire it up through `Reader::with_tap` to watch a decode run.
#[derive(Debug, Default)]
pub struct LogReceiver {
    depth: usize,
}

impl LogReceiver {
    /// Creates a receiver logging at depth zero.
    pub fn new() -> Self {
        LogReceiver::default()
    }

    fn line(&self, what: std::fmt::Arguments) {
        log::trace!("{:indent$}{}", "", what, indent = self.depth * 2);
    }

    fn open(&mut self, what: std::fmt::Arguments) {
        self.line(what);
        self.depth += 1;
    }
}

impl Receiver for LogReceiver {
    fn on_null(&mut self) -> Result<()> {
        self.line(format_args!("null"));
        Ok(())
    }
    fn on_undefined(&mut self) -> Result<()> {
        self.line(format_args!("undefined"));
        Ok(())
    }
    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.line(format_args!("{}", value));
        Ok(())
    }
    fn on_int(&mut self, value: i32) -> Result<()> {
        self.line(format_args!("{}", value));
        Ok(())
    }
    fn on_long(&mut self, value: i64) -> Result<()> {
        self.line(format_args!("{}L", value));
        Ok(())
    }
    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        self.line(format_args!(
            "overlong({}{})", if negative { "-" } else { "" }, magnitude));
        Ok(())
    }
    fn on_float16(&mut self, value: f32) -> Result<()> {
        self.line(format_args!("{}f16", value));
        Ok(())
    }
    fn on_float(&mut self, value: f32) -> Result<()> {
        self.line(format_args!("{}f", value));
        Ok(())
    }
    fn on_double(&mut self, value: f64) -> Result<()> {
        self.line(format_args!("{}", value));
        Ok(())
    }
    fn on_simple_value(&mut self, value: u8) -> Result<()> {
        self.line(format_args!("simple({})", value));
        Ok(())
    }
    fn on_number_string(&mut self, value: &str) -> Result<()> {
        self.line(format_args!("number {}", value));
        Ok(())
    }
    fn on_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.line(format_args!("{} byte(s)", value.len()));
        Ok(())
    }
    fn on_bytes_start(&mut self) -> Result<()> {
        self.open(format_args!("bytes*"));
        Ok(())
    }
    fn on_text(&mut self, value: &str) -> Result<()> {
        self.line(format_args!("{:?}", value));
        Ok(())
    }
    fn on_text_start(&mut self) -> Result<()> {
        self.open(format_args!("text*"));
        Ok(())
    }
    fn on_array_header(&mut self, length: u64) -> Result<()> {
        self.line(format_args!("array({})", length));
        Ok(())
    }
    fn on_array_start(&mut self) -> Result<()> {
        self.open(format_args!("array*"));
        Ok(())
    }
    fn on_map_header(&mut self, length: u64) -> Result<()> {
        self.line(format_args!("map({})", length));
        Ok(())
    }
    fn on_map_start(&mut self) -> Result<()> {
        self.open(format_args!("map*"));
        Ok(())
    }
    fn on_tag(&mut self, tag: Tag) -> Result<()> {
        self.line(format_args!("tag({})", tag.value()));
        Ok(())
    }
    fn on_break(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("break"));
        Ok(())
    }
    fn on_end_of_input(&mut self) -> Result<()> {
        self.line(format_args!("end of input"));
        Ok(())
    }
}
