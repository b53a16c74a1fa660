//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The per-type codec capability pair and the encode/decode entry points.
//!
//! For every type it wants on the wire, an application needs an [`Encode`]
//! and a [`Decode`] implementation. This module provides them for the
//! ordinary `std` types; `osier_codec!` derives them for user structs and
//! enums.
//!
//! `u8` deliberately implements neither trait, so that `Vec<u8>` and
//! `&[u8]` are byte strings rather than arrays of integers.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use crate::cbor::{CborParser, CborRenderer};
use crate::error::{Error, Result};
use crate::input::{Input, SliceInput};
use crate::output::{ChunkedOutput, Output};
use crate::reader::{Config, Parser, Reader};
use crate::receiver::Receiver;
use crate::writer::Writer;

/// Capability to encode a value as a data-item sequence.
pub trait Encode {
    /// Writes `self` to the writer.
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()>;
}

/// Capability to decode a value from a data-item sequence.
pub trait Decode: Sized {
    /// Reads a value from the reader.
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self>;
}

/// Encodes `value` as CBOR in a new byte vector.
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut writer = Writer::new(CborRenderer::new(ChunkedOutput::new()));
    value.encode(&mut writer)?;
    writer.into_receiver().into_output().into_vec()
}

/// Encodes `value` as CBOR into the given output.
pub fn to_output<T: Encode + ?Sized, O: Output>(value: &T, out: O)
                                                -> Result<O> {
    let mut writer = Writer::new(CborRenderer::new(out));
    value.encode(&mut writer)?;
    Ok(writer.into_receiver().into_output())
}

/// Decodes a `T` from a CBOR byte slice.
///
/// Unless `config.prefix_only` is set, the value must consume the input
/// exactly.
pub fn from_slice<T: Decode>(bytes: &[u8], config: &Config) -> Result<T> {
    from_input(SliceInput::new(bytes), config)
}

/// Decodes a `T` from any CBOR input.
pub fn from_input<T: Decode, In: Input>(input: In, config: &Config)
                                        -> Result<T> {
    decode_from(CborParser::new(input, config), config)
}

/// Decodes a `T` from the front of a CBOR byte slice and returns the
/// unconsumed rest alongside it.
pub fn from_slice_prefix<'a, T: Decode>(bytes: &'a [u8], config: &Config)
                                        -> Result<(T, &'a [u8])> {
    let mut reader = Reader::new(
        CborParser::new(SliceInput::new(bytes), config), config.clone());
    let value = T::decode(&mut reader)?;
    let consumed = reader.bytes_consumed() as usize;
    Ok((value, &bytes[consumed..]))
}

/// Shared decode driver: runs `T::decode` and enforces the `prefix_only`
/// policy.
pub(crate) fn decode_from<T: Decode, P: Parser>(parser: P, config: &Config)
                                                -> Result<T> {
    let mut reader = Reader::new(parser, config.clone());
    let value = T::decode(&mut reader)?;
    if !config.prefix_only {
        reader.read_end_of_input()?;
    }
    Ok(value)
}

/// Decodes null to `T::default()` instead of failing.
///
/// `Nullable<Option<T>>` accepts null for the `None` case while still
/// passing non-null values through `Option`'s codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
         Default)]
pub struct Nullable<T>(#[allow(missing_docs)] pub T);

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Nullable(value)
    }
}

impl<T: Encode> Encode for Nullable<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        self.0.encode(writer)
    }
}

impl<T: Decode + Default> Decode for Nullable<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        if reader.try_read_null()? {
            Ok(Nullable(T::default()))
        } else {
            T::decode(reader).map(Nullable)
        }
    }
}

/// A map or sum-type key: a string or an integer.
///
/// Derived codecs go through this trait so that key dispatch can use the
/// parser's allocation-free comparison where the key is a string.
pub trait MapKey: Copy {
    /// Writes the key as a data item.
    fn write_key<R: Receiver>(self, writer: &mut Writer<R>) -> Result<()>;
    /// Consumes the next item if it equals the key.
    fn matches_key<P: Parser>(self, reader: &mut Reader<P>) -> Result<bool>;
}

impl MapKey for &str {
    fn write_key<R: Receiver>(self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_string(self)
    }

    fn matches_key<P: Parser>(self, reader: &mut Reader<P>) -> Result<bool> {
        reader.try_read_key_str(self)
    }
}

impl MapKey for i64 {
    fn write_key<R: Receiver>(self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_long(self)
    }

    fn matches_key<P: Parser>(self, reader: &mut Reader<P>) -> Result<bool> {
        reader.try_read_key_long(self)
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Compile-time rejection of colliding codec keys.
///
/// `osier_codec!` evaluates this in a `const` context over the textual form
/// of every key of a map representation or sum type; a duplicate aborts
/// compilation.
pub const fn assert_distinct_keys(keys: &[&str]) {
    let mut i = 0;
    while i < keys.len() {
        let mut j = i + 1;
        while j < keys.len() {
            if const_str_eq(keys[i], keys[j]) {
                panic!("duplicate codec key");
            }
            j += 1;
        }
        i += 1;
    }
}

impl Encode for bool {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_bool(*self)
    }
}

impl Decode for bool {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_bool()
    }
}

impl Encode for i32 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_int(*self)
    }
}

impl Decode for i32 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_int()
    }
}

impl Encode for i64 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_long(*self)
    }
}

impl Decode for i64 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_long()
    }
}

impl Encode for u64 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_u64(*self)
    }
}

impl Decode for u64 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_u64()
    }
}

/// Narrower integers go through the `Int`/`Long` codecs with a range check
/// on the way out.
macro_rules! codec_narrow_int {
    ($($t:ty : $via:ty, $write:ident, $read:ident;)*) => { $(
        impl Encode for $t {
            fn encode<R: Receiver>(&self, writer: &mut Writer<R>)
                                   -> Result<()> {
                writer.$write(<$via>::from(*self))
            }
        }

        impl Decode for $t {
            fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
                let v = reader.$read()?;
                <$t>::try_from(v).map_err(|_| Error::InvalidInputData(
                    reader.position(),
                    format!("integer {} out of range for {}", v,
                            stringify!($t))))
            }
        }
    )* }
}

codec_narrow_int! {
    i8: i32, write_int, read_int;
    i16: i32, write_int, read_int;
    u16: i32, write_int, read_int;
    u32: i64, write_long, read_long;
}

impl Encode for usize {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_u64(*self as u64)
    }
}

impl Decode for usize {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        let v = reader.read_u64()?;
        usize::try_from(v).map_err(|_| Error::InvalidInputData(
            reader.position(),
            format!("integer {} out of range for usize", v)))
    }
}

impl Encode for isize {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_long(*self as i64)
    }
}

impl Decode for isize {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        let v = reader.read_long()?;
        isize::try_from(v).map_err(|_| Error::InvalidInputData(
            reader.position(),
            format!("integer {} out of range for isize", v)))
    }
}

impl Encode for f32 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_float(*self)
    }
}

impl Decode for f32 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_f32()
    }
}

impl Encode for f64 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_double(*self)
    }
}

impl Decode for f64 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_f64()
    }
}

impl Encode for char {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_int(*self as i32)
    }
}

impl Decode for char {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        let v = reader.read_int()?;
        u32::try_from(v).ok().and_then(char::from_u32).ok_or_else(|| {
            Error::InvalidInputData(
                reader.position(),
                format!("integer {} is not a character", v))
        })
    }
}

impl Encode for str {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_string(self)
    }
}

impl Encode for String {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_string(self)
    }
}

impl Decode for String {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_string()
    }
}

impl Encode for [u8] {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_bytes(self)
    }
}

impl Encode for Vec<u8> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_bytes(self)
    }
}

impl Decode for Vec<u8> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        reader.read_bytes()
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_array_header(self.len() as u64)?;
        for item in self {
            item.encode(writer)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        self[..].encode(writer)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        match reader.read_array()? {
            Some(n) => {
                let mut items = Vec::with_capacity(n.min(65_536) as usize);
                for _ in 0..n {
                    items.push(T::decode(reader)?);
                }
                reader.read_array_close()?;
                Ok(items)
            }
            None => {
                let mut items = Vec::new();
                while !reader.try_read_break()? {
                    items.push(T::decode(reader)?);
                }
                Ok(items)
            }
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        match self {
            Some(value) => value.encode(writer),
            None => writer.write_null(),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        if reader.try_read_null()? {
            Ok(None)
        } else {
            T::decode(reader).map(Some)
        }
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_map_header(self.len() as u64)?;
        for (k, v) in self {
            k.encode(writer)?;
            v.encode(writer)?;
        }
        Ok(())
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        let mut map = BTreeMap::new();
        match reader.read_map()? {
            Some(n) => {
                for _ in 0..n {
                    let k = K::decode(reader)?;
                    let v = V::decode(reader)?;
                    map.insert(k, v);
                }
                reader.read_map_close()?;
            }
            None => {
                while !reader.try_read_break()? {
                    let k = K::decode(reader)?;
                    let v = V::decode(reader)?;
                    map.insert(k, v);
                }
            }
        }
        Ok(map)
    }
}

impl<K: Encode, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_map_header(self.len() as u64)?;
        for (k, v) in self {
            k.encode(writer)?;
            v.encode(writer)?;
        }
        Ok(())
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Hash + Eq,
    V: Decode,
    S: BuildHasher + Default,
{
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        let mut map = HashMap::with_hasher(S::default());
        match reader.read_map()? {
            Some(n) => {
                for _ in 0..n {
                    let k = K::decode(reader)?;
                    let v = V::decode(reader)?;
                    map.insert(k, v);
                }
                reader.read_map_close()?;
            }
            None => {
                while !reader.try_read_break()? {
                    let k = K::decode(reader)?;
                    let v = V::decode(reader)?;
                    map.insert(k, v);
                }
            }
        }
        Ok(map)
    }
}

impl<'a, T: Encode + ?Sized> Encode for &'a T {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        T::decode(reader).map(Box::new)
    }
}

impl<T: Encode + ?Sized> Encode for Rc<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Decode> Decode for Rc<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        T::decode(reader).map(Rc::new)
    }
}

impl<T: Encode + ?Sized> Encode for Arc<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Decode> Decode for Arc<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
        T::decode(reader).map(Arc::new)
    }
}

macro_rules! codec_tuple {
    ($n:expr; $($t:ident : $idx:tt),*) => {
        impl<$($t: Encode),*> Encode for ($($t,)*) {
            fn encode<R: Receiver>(&self, writer: &mut Writer<R>)
                                   -> Result<()> {
                writer.write_array_header($n)?;
                $(self.$idx.encode(writer)?;)*
                Ok(())
            }
        }

        impl<$($t: Decode),*> Decode for ($($t,)*) {
            fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self> {
                reader.read_array_open($n)?;
                let value = ($($t::decode(reader)?,)*);
                reader.read_array_close()?;
                Ok(value)
            }
        }
    }
}

codec_tuple!(1; T0: 0);
codec_tuple!(2; T0: 0, T1: 1);
codec_tuple!(3; T0: 0, T1: 1, T2: 2);
codec_tuple!(4; T0: 0, T1: 1, T2: 2, T3: 3);
codec_tuple!(5; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4);
codec_tuple!(6; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5);
codec_tuple!(7; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6);
codec_tuple!(8; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7);
