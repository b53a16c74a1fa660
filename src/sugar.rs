//-
// Copyright 2026 the osier developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Derives `Encode` and `Decode` for a struct or enum.
///
/// # Structs
///
/// The default representation of a struct with n fields is an n-element
/// array of the field values in declaration order:
///
/// ```no_run
/// #[macro_use] extern crate osier;
/// #[derive(Debug, PartialEq)]
/// struct Widget {
///     name: String,
///     count: u64,
/// }
/// osier_codec!(struct Widget { name: String, count: u64 });
/// # fn main() { }
/// ```
///
/// The `map` form uses a map keyed per field instead. The key defaults to
/// the field name and can be overridden with a string or integer after
/// `=>`; keys must be distinct, which is checked at compile time:
///
/// ```no_run
/// #[macro_use] extern crate osier;
/// # struct Widget { name: String, count: u64 }
/// osier_codec!(map struct Widget { name: String => "n", count: u64 });
/// # fn main() { }
/// ```
///
/// A unit struct (`osier_codec!(struct Marker);`) is a zero-element array.
/// A newtype struct (`osier_codec!(struct Meters(f64));`) is transparent:
/// it encodes exactly as its inner value.
///
/// # Enums
///
/// A sum type maps each value to a two-element array `[type_id, payload]`.
/// The type id defaults to the variant's name and can be overridden with a
/// string or integer after `=>`; collisions are a compile-time error.
/// Variants may be unit (payload is a zero-element array), single-payload,
/// or struct-like (payload is the array of the named fields):
///
/// ```no_run
/// #[macro_use] extern crate osier;
/// #[derive(Debug, PartialEq)]
/// enum Shape {
///     Point,
///     Circle(f64),
///     Rect { w: f64, h: f64 },
/// }
/// osier_codec!(enum Shape {
///     Point,
///     Circle(f64) => "circle",
///     Rect { w: f64, h: f64 } => "rect",
/// });
/// # fn main() { }
/// ```
///
/// Self- and mutually-recursive types work through ordinary trait
/// resolution; recursive values go through `Box<T>`, whose codec passes
/// through.
#[macro_export]
macro_rules! osier_codec {
    (@count) => { 0u64 };
    (@count $head:ident $($rest:ident)*) => {
        1u64 + osier_codec!(@count $($rest)*)
    };

    (@key $field:ident) => { stringify!($field) };
    (@key $field:ident, $key:literal) => { $key };

    (@key_text $field:ident) => { stringify!($field) };
    (@key_text $field:ident, $key:literal) => { concat!($key) };

    // Unit struct: a zero-element array.
    (struct $name:ident) => {
        impl $crate::Encode for $name {
            fn encode<R: $crate::Receiver>(
                &self, writer: &mut $crate::Writer<R>) -> $crate::Result<()>
            {
                writer.write_array_header(0)
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::Parser>(
                reader: &mut $crate::Reader<P>) -> $crate::Result<Self>
            {
                reader.read_array_open(0)?;
                reader.read_array_close()?;
                Ok($name)
            }
        }
    };

    // Newtype struct: transparent, encodes exactly as the inner value.
    (struct $name:ident ( $inner:ty )) => {
        impl $crate::Encode for $name {
            fn encode<R: $crate::Receiver>(
                &self, writer: &mut $crate::Writer<R>) -> $crate::Result<()>
            {
                $crate::Encode::encode(&self.0, writer)
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::Parser>(
                reader: &mut $crate::Reader<P>) -> $crate::Result<Self>
            {
                <$inner as $crate::Decode>::decode(reader).map($name)
            }
        }
    };

    // Product type, array representation.
    (struct $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        impl $crate::Encode for $name {
            fn encode<R: $crate::Receiver>(
                &self, writer: &mut $crate::Writer<R>) -> $crate::Result<()>
            {
                writer.write_array_header(osier_codec!(@count $($field)*))?;
                $( $crate::Encode::encode(&self.$field, writer)?; )*
                Ok(())
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::Parser>(
                reader: &mut $crate::Reader<P>) -> $crate::Result<Self>
            {
                reader.read_array_open(osier_codec!(@count $($field)*))?;
                $( let $field = <$ty as $crate::Decode>::decode(reader)?; )*
                reader.read_array_close()?;
                Ok($name { $($field,)* })
            }
        }
    };

    // Product type, map representation with per-field keys.
    (map struct $name:ident {
        $($field:ident : $ty:ty $(=> $key:literal)?),* $(,)?
    }) => {
        const _: () = {
            const KEYS: &[&str] =
                &[$( osier_codec!(@key_text $field $(, $key)?) ),*];
            $crate::codec::assert_distinct_keys(KEYS)
        };

        impl $crate::Encode for $name {
            fn encode<R: $crate::Receiver>(
                &self, writer: &mut $crate::Writer<R>) -> $crate::Result<()>
            {
                writer.write_map_header(osier_codec!(@count $($field)*))?;
                $(
                    $crate::MapKey::write_key(
                        osier_codec!(@key $field $(, $key)?), writer)?;
                    $crate::Encode::encode(&self.$field, writer)?;
                )*
                Ok(())
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::Parser>(
                reader: &mut $crate::Reader<P>) -> $crate::Result<Self>
            {
                reader.read_map_open(osier_codec!(@count $($field)*))?;
                $( let mut $field: Option<$ty> = None; )*
                loop {
                    if reader.container_ended()? {
                        break;
                    }
                    $(
                        if $crate::MapKey::matches_key(
                            osier_codec!(@key $field $(, $key)?), reader)?
                        {
                            if $field.is_some() {
                                return Err($crate::Error::InvalidInputData(
                                    reader.position(),
                                    concat!("duplicate map key for field `",
                                            stringify!($field), "`")
                                        .to_owned()));
                            }
                            $field = Some(
                                <$ty as $crate::Decode>::decode(reader)?);
                            continue;
                        }
                    )*
                    return Err($crate::Error::InvalidInputData(
                        reader.position(), "unknown map key".to_owned()));
                }
                Ok($name {
                    $(
                        $field: match $field {
                            Some(value) => value,
                            None => {
                                return Err($crate::Error::InvalidInputData(
                                    reader.position(),
                                    concat!("missing map key for field `",
                                            stringify!($field), "`")
                                        .to_owned()));
                            }
                        },
                    )*
                })
            }
        }
    };

    // Sum type: every value is a two-element array [type_id, payload].
    (enum $name:ident {
        $( $variant:ident
           $( ( $payload:ty ) )?
           $( { $($vfield:ident : $vty:ty),* $(,)? } )?
           $( => $key:literal )?
        ),* $(,)?
    }) => {
        const _: () = {
            const KEYS: &[&str] =
                &[$( osier_codec!(@key_text $variant $(, $key)?) ),*];
            $crate::codec::assert_distinct_keys(KEYS)
        };

        impl $crate::Encode for $name {
            fn encode<R: $crate::Receiver>(
                &self, writer: &mut $crate::Writer<R>) -> $crate::Result<()>
            {
                $(
                    osier_codec!(@enc_variant (self, writer, $name, $variant)
                                 $( payload ($payload) )?
                                 $( fields { $($vfield : $vty),* } )?
                                 $( key $key )?);
                )*
                unreachable!()
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::Parser>(
                reader: &mut $crate::Reader<P>) -> $crate::Result<Self>
            {
                reader.read_array_open(2)?;
                $(
                    osier_codec!(@dec_variant (reader, $name, $variant)
                                 $( payload ($payload) )?
                                 $( fields { $($vfield : $vty),* } )?
                                 $( key $key )?);
                )*
                reader.unknown_type_id()
            }
        }
    };

    (@enc_variant ($self_:expr, $writer:expr, $name:ident, $variant:ident)
     $( key $key:literal )?) => {
        if let $name::$variant = *$self_ {
            $writer.write_array_header(2)?;
            $crate::MapKey::write_key(
                osier_codec!(@key $variant $(, $key)?), $writer)?;
            $writer.write_array_header(0)?;
            return Ok(());
        }
    };

    (@enc_variant ($self_:expr, $writer:expr, $name:ident, $variant:ident)
     payload ($payload:ty) $( key $key:literal )?) => {
        if let $name::$variant(ref __value) = *$self_ {
            $writer.write_array_header(2)?;
            $crate::MapKey::write_key(
                osier_codec!(@key $variant $(, $key)?), $writer)?;
            $crate::Encode::encode(__value, $writer)?;
            return Ok(());
        }
    };

    (@enc_variant ($self_:expr, $writer:expr, $name:ident, $variant:ident)
     fields { $($vfield:ident : $vty:ty),* } $( key $key:literal )?) => {
        if let $name::$variant { $(ref $vfield),* } = *$self_ {
            $writer.write_array_header(2)?;
            $crate::MapKey::write_key(
                osier_codec!(@key $variant $(, $key)?), $writer)?;
            $writer.write_array_header(osier_codec!(@count $($vfield)*))?;
            $( $crate::Encode::encode($vfield, $writer)?; )*
            return Ok(());
        }
    };

    (@dec_variant ($reader:expr, $name:ident, $variant:ident)
     $( key $key:literal )?) => {
        if $crate::MapKey::matches_key(
            osier_codec!(@key $variant $(, $key)?), $reader)?
        {
            $reader.read_array_open(0)?;
            $reader.read_array_close()?;
            $reader.read_array_close()?;
            return Ok($name::$variant);
        }
    };

    (@dec_variant ($reader:expr, $name:ident, $variant:ident)
     payload ($payload:ty) $( key $key:literal )?) => {
        if $crate::MapKey::matches_key(
            osier_codec!(@key $variant $(, $key)?), $reader)?
        {
            let __value = <$payload as $crate::Decode>::decode($reader)?;
            $reader.read_array_close()?;
            return Ok($name::$variant(__value));
        }
    };

    (@dec_variant ($reader:expr, $name:ident, $variant:ident)
     fields { $($vfield:ident : $vty:ty),* } $( key $key:literal )?) => {
        if $crate::MapKey::matches_key(
            osier_codec!(@key $variant $(, $key)?), $reader)?
        {
            $reader.read_array_open(osier_codec!(@count $($vfield)*))?;
            $( let $vfield = <$vty as $crate::Decode>::decode($reader)?; )*
            $reader.read_array_close()?;
            $reader.read_array_close()?;
            return Ok($name::$variant { $($vfield),* });
        }
    };
}
