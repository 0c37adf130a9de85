//! Binary encodings for field types.
//!
//! Fixed-width numerics are written as little-endian raw bytes. Strings and
//! collections carry a `u32` element count followed by their elements.
//! `Option<T>` is a `0`/`1` tag byte followed by the value when present.
//! Object references are written as their `(type path, name)` tag.
//!
//! A field whose type has no `FieldCodec` impl does not compile, so every
//! derived field walk is fully encodable by construction.

use std::collections::BTreeMap;

use keepsake_core::Transform;
use keepsake_core::math::{Quat, Vec3, quat_from_array, quat_to_array};
use keepsake_core::transform::POSE_SIZE;

use crate::context::{DeserializeContext, SerializeContext};
use crate::error::{PersistError, PersistResult};
use crate::object::ObjectHandle;

/// Encoding of a single field value.
pub trait FieldCodec: Sized {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()>;

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self>;
}

fn corrupt(what: &str, reason: impl Into<String>) -> PersistError {
    PersistError::Corrupt {
        what: what.to_owned(),
        reason: reason.into(),
    }
}

macro_rules! impl_numeric_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldCodec for $ty {
                fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
                    ctx.write_bytes(&self.to_le_bytes());
                    Ok(())
                }

                fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
                    ctx.read_array::<{ ::std::mem::size_of::<$ty>() }>()
                        .map(<$ty>::from_le_bytes)
                        .map_err(|e| e.in_field(stringify!($ty)))
                }
            }
        )*
    };
}

impl_numeric_codec!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl FieldCodec for usize {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        (*self as u64).encode(ctx)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        let value = u64::decode(ctx)?;
        usize::try_from(value).map_err(|_| corrupt("usize", format!("{value} overflows usize")))
    }
}

impl FieldCodec for isize {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        (*self as i64).encode(ctx)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        let value = i64::decode(ctx)?;
        isize::try_from(value).map_err(|_| corrupt("isize", format!("{value} overflows isize")))
    }
}

impl FieldCodec for bool {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        ctx.write_bytes(&[u8::from(*self)]);
        Ok(())
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        match u8::decode(ctx)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(corrupt("bool", format!("byte {other:#04x}"))),
        }
    }
}

impl FieldCodec for char {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        u32::from(*self).encode(ctx)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        let code = u32::decode(ctx)?;
        char::from_u32(code).ok_or_else(|| corrupt("char", format!("{code:#x} is not a scalar value")))
    }
}

impl FieldCodec for String {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        ctx.write_str(self)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        ctx.read_string()
    }
}

impl<T: FieldCodec> FieldCodec for Vec<T> {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        ctx.write_len(self.len())?;
        for item in self {
            item.encode(ctx)?;
        }
        Ok(())
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        let len = ctx.read_len()?;
        // A corrupt count must not turn into a huge allocation.
        let mut items = Vec::with_capacity(len.min(ctx.remaining()));
        for index in 0..len {
            items.push(T::decode(ctx).map_err(|e| e.in_field(&format!("[{index}]")))?);
        }
        Ok(items)
    }
}

impl<T: FieldCodec> FieldCodec for Option<T> {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        match self {
            Some(value) => {
                ctx.write_bytes(&[1]);
                value.encode(ctx)
            }
            None => {
                ctx.write_bytes(&[0]);
                Ok(())
            }
        }
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        match u8::decode(ctx)? {
            0 => Ok(None),
            1 => T::decode(ctx).map(Some),
            other => Err(corrupt("option tag", format!("byte {other:#04x}"))),
        }
    }
}

impl<T: FieldCodec> FieldCodec for Box<T> {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        self.as_ref().encode(ctx)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        T::decode(ctx).map(Box::new)
    }
}

/// Fixed-size arrays carry no length prefix.
impl<T: FieldCodec, const N: usize> FieldCodec for [T; N] {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        for item in self {
            item.encode(ctx)?;
        }
        Ok(())
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode(ctx)?);
        }
        items
            .try_into()
            .map_err(|_: Vec<T>| corrupt("array", format!("expected {N} elements")))
    }
}

impl<K: FieldCodec + Ord, V: FieldCodec> FieldCodec for BTreeMap<K, V> {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        ctx.write_len(self.len())?;
        for (key, value) in self {
            key.encode(ctx)?;
            value.encode(ctx)?;
        }
        Ok(())
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        let len = ctx.read_len()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = K::decode(ctx)?;
            let value = V::decode(ctx)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

macro_rules! impl_tuple_codec {
    ($($name:ident),+) => {
        impl<$($name: FieldCodec),+> FieldCodec for ($($name,)+) {
            #[allow(non_snake_case)]
            fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
                let ($($name,)+) = self;
                $($name.encode(ctx)?;)+
                Ok(())
            }

            fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
                Ok(($($name::decode(ctx)?,)+))
            }
        }
    };
}

impl_tuple_codec!(A, B);
impl_tuple_codec!(A, B, C);
impl_tuple_codec!(A, B, C, D);

// ---------------------------------------------------------------------------
// Math and placement
// ---------------------------------------------------------------------------

impl FieldCodec for Vec3 {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        [self.x, self.y, self.z].encode(ctx)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        let [x, y, z] = <[f32; 3]>::decode(ctx)?;
        Ok(Vec3::new(x, y, z))
    }
}

/// Written as `[x, y, z, w]`.
impl FieldCodec for Quat {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        quat_to_array(*self).encode(ctx)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        <[f32; 4]>::decode(ctx).map(quat_from_array)
    }
}

impl FieldCodec for Transform {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        ctx.write_bytes(&self.to_pose_bytes());
        Ok(())
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        ctx.read_array::<POSE_SIZE>()
            .map(|bytes| Transform::from_pose_bytes(&bytes))
            .map_err(|e| e.in_field("transform"))
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

impl FieldCodec for ObjectHandle {
    fn encode(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()> {
        ctx.write_reference(*self)
    }

    fn decode(ctx: &mut DeserializeContext<'_>) -> PersistResult<Self> {
        ctx.read_reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ByteBuffer;
    use crate::error::ErrorKind;
    use crate::object::ObjectTable;

    fn encode<T: FieldCodec>(value: &T) -> Vec<u8> {
        let table = ObjectTable::new();
        let mut ctx = SerializeContext::new(&table);
        value.encode(&mut ctx).unwrap();
        ctx.into_buffer().into_vec()
    }

    fn decode<T: FieldCodec>(bytes: Vec<u8>) -> PersistResult<T> {
        let table = ObjectTable::new();
        let mut buffer = ByteBuffer::from_vec(bytes);
        let mut ctx = DeserializeContext::new(&mut buffer, &table);
        T::decode(&mut ctx)
    }

    #[test]
    fn numerics_are_little_endian() {
        assert_eq!(encode(&0x0102_0304u32), vec![4, 3, 2, 1]);
        assert_eq!(encode(&-2i16), vec![0xfe, 0xff]);
        assert_eq!(encode(&1.0f32), 1.0f32.to_le_bytes().to_vec());
    }

    #[test]
    fn vec_has_count_prefix() {
        assert_eq!(encode(&vec![7u8, 8]), vec![2, 0, 0, 0, 7, 8]);
    }

    #[test]
    fn nested_collections_decode() {
        let value = vec![vec!["a".to_owned()], vec![], vec!["b".to_owned(), "c".to_owned()]];
        assert_eq!(decode::<Vec<Vec<String>>>(encode(&value)).unwrap(), value);
    }

    #[test]
    fn option_tag() {
        assert_eq!(encode(&Some(5u8)), vec![1, 5]);
        assert_eq!(encode(&None::<u8>), vec![0]);
        let err = decode::<Option<u8>>(vec![2, 5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupt);
    }

    #[test]
    fn bad_bool_is_corrupt() {
        assert_eq!(decode::<bool>(vec![3]).unwrap_err().kind(), ErrorKind::Corrupt);
    }

    #[test]
    fn arrays_have_no_prefix() {
        assert_eq!(encode(&[1u8, 2, 3]), vec![1, 2, 3]);
        assert_eq!(decode::<[u8; 3]>(vec![1, 2, 3]).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn map_and_tuple() {
        let mut map = BTreeMap::new();
        map.insert(2u8, ("two".to_owned(), true));
        map.insert(1u8, ("one".to_owned(), false));
        assert_eq!(decode::<BTreeMap<u8, (String, bool)>>(encode(&map)).unwrap(), map);
    }

    #[test]
    fn transform_uses_pose_layout() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0);
        let bytes = encode(&t);
        assert_eq!(bytes.len(), POSE_SIZE);
        assert_eq!(bytes, t.to_pose_bytes().to_vec());
    }

    #[test]
    fn huge_count_underruns_without_allocating() {
        let err = decode::<Vec<u64>>(vec![0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Underrun);
    }

    #[test]
    fn truncated_numeric_names_type() {
        let err = decode::<u64>(vec![1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("u64"));
    }
}
