/*!
coerce.rs - turn a raw string token into a typed `Value`.

Closed set of semantic types:
  boolean | integer(8/16/32/64) | character | floating(32/64) | enumerated | text

Conversion rules:
  - boolean     : "true" in any case -> true, anything else -> false (never fails)
  - integer     : optional sign + digits; overflow or stray characters fail
  - character   : first character of the token, the rest is ignored
  - floating    : decimal / exponential notation (`inf` and `NaN` included)
  - enumerated  : exact, case-sensitive member name
  - text        : passed through unchanged

`Param` maps Rust types onto this set so typed handlers can declare their
parameters by signature alone.
*/

use std::fmt;

use thiserror::Error;

/// Bit width of an integer parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

/// Bit width of a floating-point parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

/// A named, closed set of enumeration members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumSpec {
    name: &'static str,
    members: &'static [&'static str],
}

impl EnumSpec {
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        Self { name, members }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Exact (case-sensitive) member lookup.
    pub fn lookup(&self, token: &str) -> Option<(usize, &'static str)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, member)| **member == token)
            .map(|(index, member)| (index, *member))
    }
}

/// Semantic type of one positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Boolean,
    Integer(IntWidth),
    Character,
    Floating(FloatWidth),
    Enumerated(EnumSpec),
    Text,
}

impl SemanticType {
    /// Label shown in `help <command>` output.
    pub fn label(&self) -> &'static str {
        match self {
            SemanticType::Boolean => "bool",
            SemanticType::Integer(IntWidth::W8) => "i8",
            SemanticType::Integer(IntWidth::W16) => "i16",
            SemanticType::Integer(IntWidth::W32) => "i32",
            SemanticType::Integer(IntWidth::W64) => "i64",
            SemanticType::Character => "char",
            SemanticType::Floating(FloatWidth::W32) => "f32",
            SemanticType::Floating(FloatWidth::W64) => "f64",
            SemanticType::Enumerated(spec) => spec.name(),
            SemanticType::Text => "String",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A coerced argument, ready to be handed to a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Char(char),
    F32(f32),
    F64(f64),
    Enum { index: usize, member: &'static str },
    Text(String),
}

/// Why a token could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionFailure {
    /// Not an integer, or outside the target width.
    Integer(String),
    /// Not a floating-point literal.
    Floating(String),
    /// A character was expected but the token is empty.
    EmptyCharacter,
    /// Not a member of the target enumeration.
    NotAMember,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionFailure::Integer(reason) | ConversionFailure::Floating(reason) => {
                f.write_str(reason)
            }
            ConversionFailure::EmptyCharacter => f.write_str("empty token"),
            ConversionFailure::NotAMember => f.write_str("no such member"),
        }
    }
}

/// A token that does not fit the declared parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{token}' to {expected}: {failure}")]
pub struct ArgumentConversionError {
    pub token: String,
    pub expected: &'static str,
    pub failure: ConversionFailure,
}

impl ArgumentConversionError {
    fn new(token: &str, target: &SemanticType, failure: ConversionFailure) -> Self {
        Self {
            token: token.to_string(),
            expected: target.label(),
            failure,
        }
    }
}

/// Convert `token` into a value of `target`.
pub fn coerce(token: &str, target: &SemanticType) -> Result<Value, ArgumentConversionError> {
    let int_err = |e: std::num::ParseIntError| {
        ArgumentConversionError::new(token, target, ConversionFailure::Integer(e.to_string()))
    };
    let float_err = |e: std::num::ParseFloatError| {
        ArgumentConversionError::new(token, target, ConversionFailure::Floating(e.to_string()))
    };

    match target {
        SemanticType::Boolean => Ok(Value::Bool(token.eq_ignore_ascii_case("true"))),
        SemanticType::Integer(IntWidth::W8) => token.parse().map(Value::I8).map_err(int_err),
        SemanticType::Integer(IntWidth::W16) => token.parse().map(Value::I16).map_err(int_err),
        SemanticType::Integer(IntWidth::W32) => token.parse().map(Value::I32).map_err(int_err),
        SemanticType::Integer(IntWidth::W64) => token.parse().map(Value::I64).map_err(int_err),
        SemanticType::Character => token.chars().next().map(Value::Char).ok_or_else(|| {
            ArgumentConversionError::new(token, target, ConversionFailure::EmptyCharacter)
        }),
        SemanticType::Floating(FloatWidth::W32) => {
            token.parse().map(Value::F32).map_err(float_err)
        }
        SemanticType::Floating(FloatWidth::W64) => {
            token.parse().map(Value::F64).map_err(float_err)
        }
        SemanticType::Enumerated(spec) => spec
            .lookup(token)
            .map(|(index, member)| Value::Enum { index, member })
            .ok_or_else(|| {
                ArgumentConversionError::new(token, target, ConversionFailure::NotAMember)
            }),
        SemanticType::Text => Ok(Value::Text(token.to_string())),
    }
}

/* ---- Rust type mapping ---- */

/// A Rust type usable as a typed handler parameter.
pub trait Param: Sized {
    /// Semantic type the raw token is coerced into.
    fn semantic_type() -> SemanticType;

    /// Extract `Self` from a value coerced with `semantic_type()`.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_param {
    ($ty:ty, $semantic:expr, $variant:ident) => {
        impl Param for $ty {
            fn semantic_type() -> SemanticType {
                $semantic
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_param!(bool, SemanticType::Boolean, Bool);
impl_param!(i8, SemanticType::Integer(IntWidth::W8), I8);
impl_param!(i16, SemanticType::Integer(IntWidth::W16), I16);
impl_param!(i32, SemanticType::Integer(IntWidth::W32), I32);
impl_param!(i64, SemanticType::Integer(IntWidth::W64), I64);
impl_param!(char, SemanticType::Character, Char);
impl_param!(f32, SemanticType::Floating(FloatWidth::W32), F32);
impl_param!(f64, SemanticType::Floating(FloatWidth::W64), F64);
impl_param!(String, SemanticType::Text, Text);

/// Declare an enum usable as a handler parameter.
///
/// Each variant is paired with the exact member name typed on the command line:
///
/// ```
/// cmdloop::command_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Color {
///         Red => "RED",
///         Green => "GREEN",
///     }
/// }
///
/// assert_eq!(Color::MEMBERS, &["RED", "GREEN"]);
/// assert_eq!(Color::Green.member(), "GREEN");
/// ```
#[macro_export]
macro_rules! command_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $member:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            /// Member names in declaration order.
            pub const MEMBERS: &'static [&'static str] = &[$($member),+];

            /// Member name of this variant.
            pub const fn member(&self) -> &'static str {
                match self {
                    $($name::$variant => $member),+
                }
            }
        }

        impl $crate::dispatch::Param for $name {
            fn semantic_type() -> $crate::dispatch::SemanticType {
                $crate::dispatch::SemanticType::Enumerated($crate::dispatch::EnumSpec::new(
                    stringify!($name),
                    Self::MEMBERS,
                ))
            }

            fn from_value(value: $crate::dispatch::Value) -> Option<Self> {
                match value {
                    $crate::dispatch::Value::Enum { member, .. } => match member {
                        $($member => Some($name::$variant),)+
                        _ => None,
                    },
                    _ => None,
                }
            }
        }
    };
}
