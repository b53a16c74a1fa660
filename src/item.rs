//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The data-item model.
//!
//! Every parsed byte sequence decomposes into a finite stream of data items
//! drawn from the closed set below. `ItemKind` identifies which `Receiver`
//! callback a parser fired; the payload, if any, travelled through the
//! callback itself.

/// Identifies one kind of data item.
///
/// Returned by `Parser::read_next_data_item` so that callers routing on the
/// item do not have to re-dispatch through a second receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    /// The null value.
    Null,
    /// The undefined value (CBOR only).
    Undefined,
    /// A boolean.
    Boolean,
    /// A signed integer fitting 32 bits.
    Int,
    /// A signed integer fitting 64 bits but not 32.
    Long,
    /// An integer whose magnitude lies in `[2^63, 2^64)`, not representable
    /// as a signed 64-bit value.
    OverLong,
    /// An IEEE-754 binary16 float (surfaced as `f32`).
    Float16,
    /// An IEEE-754 binary32 float.
    Float,
    /// An IEEE-754 binary64 float.
    Double,
    /// A CBOR simple value in `{0..19, 32..255}`.
    SimpleValue,
    /// A lexical numeric token (JSON only, never pre-parsed).
    NumberString,
    /// A definite-length byte string.
    Bytes,
    /// An indefinite-length byte stream opens; terminated by `Break`.
    BytesStart,
    /// A definite-length UTF-8 text string.
    Text,
    /// An indefinite-length text stream opens; terminated by `Break`.
    TextStart,
    /// A definite-length array of `n` following items.
    ArrayHeader,
    /// An indefinite-length array; terminated by `Break`.
    ArrayStart,
    /// A definite-length map of `n` following key/value pairs.
    MapHeader,
    /// An indefinite-length map; terminated by `Break`.
    MapStart,
    /// A semantic tag modifying the immediately following item.
    Tag,
    /// Terminates the innermost indefinite-length item.
    Break,
    /// The input is exhausted at an item boundary.
    EndOfInput,
}

impl ItemKind {
    /// A short human-readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Null => "Null",
            ItemKind::Undefined => "Undefined",
            ItemKind::Boolean => "Boolean",
            ItemKind::Int => "Int",
            ItemKind::Long => "Long",
            ItemKind::OverLong => "OverLong",
            ItemKind::Float16 => "Float16",
            ItemKind::Float => "Float",
            ItemKind::Double => "Double",
            ItemKind::SimpleValue => "SimpleValue",
            ItemKind::NumberString => "NumberString",
            ItemKind::Bytes => "Bytes",
            ItemKind::BytesStart => "BytesStart",
            ItemKind::Text => "Text",
            ItemKind::TextStart => "TextStart",
            ItemKind::ArrayHeader => "ArrayHeader",
            ItemKind::ArrayStart => "ArrayStart",
            ItemKind::MapHeader => "MapHeader",
            ItemKind::MapStart => "MapStart",
            ItemKind::Tag => "Tag",
            ItemKind::Break => "Break",
            ItemKind::EndOfInput => "EndOfInput",
        }
    }
}

/// A CBOR semantic tag.
///
/// The well-known tags of RFC 7049 §2.4 get named variants; everything else
/// is carried verbatim in `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Tag 0: standard date/time string.
    DateTimeString,
    /// Tag 1: epoch-based date/time.
    EpochDateTime,
    /// Tag 2: positive bignum.
    PositiveBigNum,
    /// Tag 3: negative bignum.
    NegativeBigNum,
    /// Tag 4: decimal fraction.
    DecimalFraction,
    /// Tag 5: bigfloat.
    BigFloat,
    /// Tag 21: expected conversion to base64url.
    ExpectedBase64Url,
    /// Tag 22: expected conversion to base64.
    ExpectedBase64,
    /// Tag 23: expected conversion to base16.
    ExpectedBase16,
    /// Tag 24: embedded CBOR data item.
    EmbeddedCbor,
    /// Tag 32: URI text string.
    Uri,
    /// Tag 33: base64url text string.
    Base64Url,
    /// Tag 34: base64 text string.
    Base64,
    /// Tag 35: regular expression.
    Regex,
    /// Tag 36: MIME message.
    MimeMessage,
    /// Tag 55799: the self-describe magic.
    SelfDescribeCbor,
    /// Any other tag value.
    Other(u64),
}

impl Tag {
    /// The numeric tag value.
    pub fn value(self) -> u64 {
        match self {
            Tag::DateTimeString => 0,
            Tag::EpochDateTime => 1,
            Tag::PositiveBigNum => 2,
            Tag::NegativeBigNum => 3,
            Tag::DecimalFraction => 4,
            Tag::BigFloat => 5,
            Tag::ExpectedBase64Url => 21,
            Tag::ExpectedBase64 => 22,
            Tag::ExpectedBase16 => 23,
            Tag::EmbeddedCbor => 24,
            Tag::Uri => 32,
            Tag::Base64Url => 33,
            Tag::Base64 => 34,
            Tag::Regex => 35,
            Tag::MimeMessage => 36,
            Tag::SelfDescribeCbor => 55799,
            Tag::Other(v) => v,
        }
    }

    /// Maps a numeric tag value to its named variant, or `Other`.
    pub fn from_value(v: u64) -> Self {
        match v {
            0 => Tag::DateTimeString,
            1 => Tag::EpochDateTime,
            2 => Tag::PositiveBigNum,
            3 => Tag::NegativeBigNum,
            4 => Tag::DecimalFraction,
            5 => Tag::BigFloat,
            21 => Tag::ExpectedBase64Url,
            22 => Tag::ExpectedBase64,
            23 => Tag::ExpectedBase16,
            24 => Tag::EmbeddedCbor,
            32 => Tag::Uri,
            33 => Tag::Base64Url,
            34 => Tag::Base64,
            35 => Tag::Regex,
            36 => Tag::MimeMessage,
            55799 => Tag::SelfDescribeCbor,
            v => Tag::Other(v),
        }
    }
}
