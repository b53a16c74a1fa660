//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! osier is a streaming (de)serialisation engine for two wire formats,
//! CBOR (RFC 7049) and JSON (RFC 8259), built around one shared abstract
//! data-item model.
//!
//! # Introduction
//!
//! Every encoded document decomposes into a finite stream of *data items*:
//! null, booleans, three widths of integer (plus the over-long range
//! `[2^63, 2^64)`), three widths of float, definite- and indefinite-length
//! byte and text strings, array and map headers or starts, semantic tags,
//! the `Break` terminator, and end-of-input. A format parser pulls bytes
//! from an [`Input`] and fires exactly one [`Receiver`] callback per item;
//! a renderer is a `Receiver` writing the wire bytes of its format to an
//! [`Output`]. Everything above that layer — the typed [`Reader`] and
//! [`Writer`] façades and the per-type [`Encode`]/[`Decode`] codecs — is
//! format agnostic, so the same types travel over CBOR and JSON unchanged.
//!
//! # Getting started
//!
//! Codecs for structs and enums are derived with the [`osier_codec!`]
//! macro; `std`'s ordinary types come with codecs out of the box:
//!
//! ```
//! #[macro_use] extern crate osier;
//! use osier::Config;
//!
//! #[derive(Debug, PartialEq)]
//! struct Widget {
//!     name: String,
//!     count: u64,
//! }
//! osier_codec!(struct Widget { name: String, count: u64 });
//!
//! # fn main() -> osier::Result<()> {
//! let widget = Widget { name: "sprocket".to_owned(), count: 3 };
//!
//! // CBOR is the default wire format ...
//! let bytes = osier::to_vec(&widget)?;
//! let back: Widget = osier::from_slice(&bytes, &Config::default())?;
//! assert_eq!(widget, back);
//!
//! // ... and the same codec drives JSON.
//! let text = osier::json::to_string(&widget)?;
//! assert_eq!("[\"sprocket\",3]", text);
//! # Ok(())
//! # }
//! ```
//!
//! A struct is an array of its fields by default; the `map` form of the
//! macro keys each field instead, and enums travel as `[type_id, payload]`
//! pairs. See [`osier_codec!`] for the full grammar.
//!
//! # Streaming
//!
//! The typed façades can also be driven by hand, one data item at a time:
//!
//! ```
//! use osier::{CborParser, Config, Reader, SliceInput};
//!
//! # fn main() -> osier::Result<()> {
//! let bytes = [0x82, 0x01, 0x63, b'a', b'b', b'c'];
//! let config = Config::default();
//! let mut reader = Reader::new(
//!     CborParser::new(SliceInput::new(&bytes), &config), config);
//! reader.read_array_open(2)?;
//! assert_eq!(1, reader.read_int()?);
//! assert_eq!("abc", reader.read_string()?);
//! reader.read_array_close()?;
//! reader.read_end_of_input()?;
//! # Ok(())
//! # }
//! ```
//!
//! Inputs are pluggable: [`SliceInput`] reads a borrowed buffer, and
//! [`ChainedInput`] presents any iterator of inputs as one logical stream,
//! reassembling multi-byte primitives across the seams and keeping a
//! 256-byte rewind window. Output goes to any [`Output`]; the
//! [`ChunkedOutput`] grows by linking fixed-size chunks.
//!
//! # Decoding configuration
//!
//! [`Config`] bounds what a decode run will accept: maximum byte/text
//! string lengths, JSON number size limits, and whether bytes may remain
//! after the top-level value (`prefix_only`, see
//! [`from_slice_prefix`]). Every error carries the byte position at which
//! it was detected, and a failed parser is dead: decoding never resumes
//! after an error.
//!
//! # Scope
//!
//! osier does not validate schemas, does not produce canonical CBOR, and
//! performs no I/O of its own — inputs are pull-based and synchronous, so
//! blocking (if any) lives in the `Input` implementation.

#![deny(missing_docs)]

pub mod cbor;
pub mod chain;
pub mod codec;
pub mod error;
pub mod input;
pub mod item;
pub mod json;
pub mod output;
pub mod reader;
pub mod receiver;
/// The codec derivation macro.
#[macro_use]
pub mod sugar;
pub mod writer;

#[cfg(test)]
mod test_helpers;

pub use self::cbor::{CborParser, CborRenderer};
pub use self::chain::ChainedInput;
pub use self::codec::{from_input, from_slice, from_slice_prefix, to_output,
                      to_vec, Decode, Encode, MapKey, Nullable};
pub use self::error::{Error, Result};
pub use self::input::{Input, NoPadding, PaddingProvider, SliceInput,
                      ZeroPadding};
pub use self::item::{ItemKind, Tag};
pub use self::json::{JsonParser, JsonRenderer};
pub use self::output::{ChunkedOutput, Output};
pub use self::reader::{Config, Parser, Reader, Receptacle};
pub use self::receiver::{LogReceiver, Receiver, TeeReceiver};
pub use self::writer::Writer;
