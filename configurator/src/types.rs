//! Type registry for bindable fields.
//!
//! A config struct describes itself through [`Configure`] (generated by
//! `#[derive(Configure)]`), and every field type describes itself through
//! [`Bindable`]. The walker only ever sees these traits, so it needs no
//! knowledge of the concrete shapes it traverses.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{Error, ParseError};

/// Declared type of a bindable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    Duration,
    Timestamp,
    /// `Option<T>`: a nullable indirection to `T`
    Pointer(Box<DeclaredType>),
    /// `Vec<T>`
    Sequence(Box<DeclaredType>),
    Map,
    /// A `#[derive(Configure)]` struct
    Struct(&'static str),
    /// Anything else that opted in without a coercion rule
    Other(&'static str),
}

impl DeclaredType {
    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// `true` for timestamps and optional timestamps, which are always leaves.
    pub fn is_timestamp(&self) -> bool {
        match self {
            Self::Timestamp => true,
            Self::Pointer(inner) => matches!(**inner, Self::Timestamp),
            _ => false,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::Isize => f.write_str("isize"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::Usize => f.write_str("usize"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::String => f.write_str("string"),
            Self::Duration => f.write_str("duration"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Pointer(inner) => write!(f, "option<{inner}>"),
            Self::Sequence(inner) => write!(f, "sequence<{inner}>"),
            Self::Map => f.write_str("map"),
            Self::Struct(name) => write!(f, "struct {name}"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// A literal produced by the coercer, ready to be stored into a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    Duration(Duration),
    Timestamp(DateTime<FixedOffset>),
}

/// How the walker should treat a value.
pub enum Shape<'a> {
    /// A bindable leaf
    Leaf(&'a mut dyn Bindable),
    /// A nullable indirection that may need to be followed or allocated
    Pointer(&'a mut dyn Indirect),
    /// A struct whose fields are walked in turn
    Struct(&'a mut dyn Configure),
}

/// A value that can appear as a field of a [`Configure`] struct.
pub trait Bindable {
    /// Declared type, available without an instance.
    fn declared() -> DeclaredType
    where
        Self: Sized;

    /// Declared type of this value.
    fn declared_type(&self) -> DeclaredType;

    fn shape(&mut self) -> Shape<'_>;

    /// Fully qualified type name, used to recognize a struct type that is
    /// already being walked. Unlike [`DeclaredType::Struct`] it tells apart
    /// same-named structs from different modules and generic instances.
    fn identity() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Instance form of [`Bindable::identity`].
    fn type_identity(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Overwrite this value with an already-parsed literal.
    ///
    /// Types without a coercion rule keep the default, which rejects every
    /// value with [`Error::UnsupportedType`].
    fn store(&mut self, value: Value) -> Result<(), Error> {
        let _ = value;
        Err(Error::unsupported("store", &self.declared_type()))
    }
}

/// A nullable indirection (`Option<T>`).
pub trait Indirect {
    /// Declared type of the pointed-to value.
    fn target_type(&self) -> DeclaredType;

    /// [`Bindable::identity`] of the pointed-to type.
    fn target_identity(&self) -> &'static str;

    fn is_nil(&self) -> bool;

    /// The indirection itself, as a leaf.
    fn as_bindable(&mut self) -> &mut dyn Bindable;

    /// The pointed-to value, allocating a default one when nil.
    fn target_mut(&mut self) -> &mut dyn Bindable;
}

/// One declared field of a [`Configure`] struct.
pub struct FieldSlot<'a> {
    /// Declared field name
    pub name: &'static str,
    /// Raw annotation string (`env,flag=port,default=8080`)
    pub tag: &'static str,
    /// Whether the field's members are flattened into the enclosing struct
    pub embedded: bool,
    pub value: &'a mut dyn Bindable,
}

/// A struct whose public fields can be cataloged.
///
/// Usually implemented with `#[derive(Configure)]`.
pub trait Configure {
    /// Settable fields, in declaration order.
    fn fields(&mut self) -> Vec<FieldSlot<'_>>;
}

fn mismatch(declared: DeclaredType) -> Error {
    Error::unsupported("store", &declared)
}

macro_rules! impl_signed {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Bindable for $ty {
            fn declared() -> DeclaredType {
                DeclaredType::$variant
            }

            fn declared_type(&self) -> DeclaredType {
                DeclaredType::$variant
            }

            fn shape(&mut self) -> Shape<'_> {
                Shape::Leaf(self)
            }

            fn store(&mut self, value: Value) -> Result<(), Error> {
                let Value::Int(i) = value else {
                    return Err(mismatch(DeclaredType::$variant));
                };
                *self = <$ty>::try_from(i)
                    .map_err(|_| ParseError::out_of_range(i, &DeclaredType::$variant))?;
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Bindable for $ty {
            fn declared() -> DeclaredType {
                DeclaredType::$variant
            }

            fn declared_type(&self) -> DeclaredType {
                DeclaredType::$variant
            }

            fn shape(&mut self) -> Shape<'_> {
                Shape::Leaf(self)
            }

            fn store(&mut self, value: Value) -> Result<(), Error> {
                let Value::Uint(u) = value else {
                    return Err(mismatch(DeclaredType::$variant));
                };
                *self = <$ty>::try_from(u)
                    .map_err(|_| ParseError::out_of_range(u, &DeclaredType::$variant))?;
                Ok(())
            }
        }
    )*};
}

impl_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
impl_unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

/// Leaves whose stored value is taken from exactly one [`Value`] variant.
macro_rules! impl_leaf {
    ($ty:ty => $variant:ident, |$v:ident: $from:ident| $convert:expr) => {
        impl Bindable for $ty {
            fn declared() -> DeclaredType {
                DeclaredType::$variant
            }

            fn declared_type(&self) -> DeclaredType {
                DeclaredType::$variant
            }

            fn shape(&mut self) -> Shape<'_> {
                Shape::Leaf(self)
            }

            fn store(&mut self, value: Value) -> Result<(), Error> {
                match value {
                    Value::$from($v) => {
                        *self = $convert;
                        Ok(())
                    }
                    _ => Err(mismatch(DeclaredType::$variant)),
                }
            }
        }
    };
}

impl_leaf!(bool => Bool, |b: Bool| b);
impl_leaf!(f32 => F32, |f: Float| f as f32);
impl_leaf!(f64 => F64, |f: Float| f);
impl_leaf!(String => String, |s: Str| s);
impl_leaf!(Duration => Duration, |d: Duration| d);
impl_leaf!(DateTime<FixedOffset> => Timestamp, |t: Timestamp| t);
impl_leaf!(DateTime<Utc> => Timestamp, |t: Timestamp| t.with_timezone(&Utc));

/// Leaves with no coercion rule.
macro_rules! impl_opaque {
    ($($ty:ty => $declared:expr),* $(,)?) => {$(
        impl Bindable for $ty {
            fn declared() -> DeclaredType {
                $declared
            }

            fn declared_type(&self) -> DeclaredType {
                $declared
            }

            fn shape(&mut self) -> Shape<'_> {
                Shape::Leaf(self)
            }
        }
    )*};
}

impl_opaque!(
    char => DeclaredType::Other("char"),
    i128 => DeclaredType::Other("i128"),
    u128 => DeclaredType::Other("u128"),
);

impl<T: Bindable> Bindable for Vec<T> {
    fn declared() -> DeclaredType {
        DeclaredType::Sequence(Box::new(T::declared()))
    }

    fn declared_type(&self) -> DeclaredType {
        Self::declared()
    }

    fn shape(&mut self) -> Shape<'_> {
        Shape::Leaf(self)
    }
}

impl<K, V, S> Bindable for HashMap<K, V, S> {
    fn declared() -> DeclaredType {
        DeclaredType::Map
    }

    fn declared_type(&self) -> DeclaredType {
        DeclaredType::Map
    }

    fn shape(&mut self) -> Shape<'_> {
        Shape::Leaf(self)
    }
}

impl<K, V> Bindable for BTreeMap<K, V> {
    fn declared() -> DeclaredType {
        DeclaredType::Map
    }

    fn declared_type(&self) -> DeclaredType {
        DeclaredType::Map
    }

    fn shape(&mut self) -> Shape<'_> {
        Shape::Leaf(self)
    }
}

impl<T: Bindable + Default> Bindable for Option<T> {
    fn declared() -> DeclaredType {
        DeclaredType::Pointer(Box::new(T::declared()))
    }

    fn declared_type(&self) -> DeclaredType {
        Self::declared()
    }

    fn shape(&mut self) -> Shape<'_> {
        Shape::Pointer(self)
    }

    /// Allocates a fresh target, stores into it, then points at it.
    fn store(&mut self, value: Value) -> Result<(), Error> {
        let mut target = T::default();
        target.store(value)?;
        *self = Some(target);
        Ok(())
    }
}

impl<T: Bindable + Default> Indirect for Option<T> {
    fn target_type(&self) -> DeclaredType {
        T::declared()
    }

    fn target_identity(&self) -> &'static str {
        T::identity()
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }

    fn as_bindable(&mut self) -> &mut dyn Bindable {
        self
    }

    fn target_mut(&mut self) -> &mut dyn Bindable {
        self.get_or_insert_with(T::default)
    }
}

// Boxing only changes where the value lives.
impl<T: Bindable> Bindable for Box<T> {
    fn declared() -> DeclaredType {
        T::declared()
    }

    fn declared_type(&self) -> DeclaredType {
        (**self).declared_type()
    }

    fn identity() -> &'static str {
        T::identity()
    }

    fn type_identity(&self) -> &'static str {
        (**self).type_identity()
    }

    fn shape(&mut self) -> Shape<'_> {
        (**self).shape()
    }

    fn store(&mut self, value: Value) -> Result<(), Error> {
        (**self).store(value)
    }
}
