//! The closed set of value kinds an option can hold, and the table that converts strings into
//! them.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::ConversionError;

///////////////////////////////////////////// ValueKind ////////////////////////////////////////////

/// ValueKind names the scalar type stored by an option.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    Bool,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl ValueKind {
    /// Every kind, in table order.
    pub const ALL: [ValueKind; 9] = [
        ValueKind::Bool,
        ValueKind::Byte,
        ValueKind::Char,
        ValueKind::Short,
        ValueKind::Int,
        ValueKind::Long,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::String,
    ];

    /// The human-readable name of this kind.
    pub fn name(self) -> &'static str {
        self.converter().name
    }

    /// True if a value of this kind may begin with '-'.  Numeric kinds say yes so that negative
    /// numbers can be supplied.  Everything else says no so that `-s -i` is not swallowed.
    pub fn accepts_hyphen_value(self) -> bool {
        self.converter().accepts_hyphen_value
    }

    /// Convert `value` into a Value of this kind.
    pub fn convert(self, value: &str) -> Result<Value, ConversionError> {
        (self.converter().convert)(value)
            .map_err(|reason| ConversionError::new(self, value, reason))
    }

    fn converter(self) -> &'static Converter {
        &CONVERTERS[self as usize]
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

//////////////////////////////////////////// converters ////////////////////////////////////////////

struct Converter {
    name: &'static str,
    accepts_hyphen_value: bool,
    convert: fn(&str) -> Result<Value, String>,
}

// Indexed by `ValueKind as usize`.
static CONVERTERS: [Converter; 9] = [
    Converter {
        name: "bool",
        accepts_hyphen_value: false,
        convert: convert_bool,
    },
    Converter {
        name: "byte",
        accepts_hyphen_value: true,
        convert: |s| parse_with(s, Value::Byte),
    },
    Converter {
        name: "char",
        accepts_hyphen_value: false,
        convert: convert_char,
    },
    Converter {
        name: "short",
        accepts_hyphen_value: true,
        convert: |s| parse_with(s, Value::Short),
    },
    Converter {
        name: "int",
        accepts_hyphen_value: true,
        convert: |s| parse_with(s, Value::Int),
    },
    Converter {
        name: "long",
        accepts_hyphen_value: true,
        convert: |s| parse_with(s, Value::Long),
    },
    Converter {
        name: "float",
        accepts_hyphen_value: true,
        convert: |s| parse_with(s, Value::Float),
    },
    Converter {
        name: "double",
        accepts_hyphen_value: true,
        convert: |s| parse_with(s, Value::Double),
    },
    Converter {
        name: "string",
        accepts_hyphen_value: false,
        convert: |s| Ok(Value::String(s.to_string())),
    },
];

fn parse_with<T>(s: &str, wrap: fn(T) -> Value) -> Result<Value, String>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    s.parse::<T>().map(wrap).map_err(|err| err.to_string())
}

fn convert_bool(s: &str) -> Result<Value, String> {
    if s.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if s.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err("expected true or false".to_string())
    }
}

fn convert_char(s: &str) -> Result<Value, String> {
    s.chars()
        .next()
        .map(Value::Char)
        .ok_or_else(|| "empty string".to_string())
}

/////////////////////////////////////////////// Value //////////////////////////////////////////////

/// A converted option value.  Display renders the canonical string form, which converts back to
/// an equal Value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Char(_) => ValueKind::Char,
            Value::Short(_) => ValueKind::Short,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(x) => write!(f, "{}", x),
            Value::Byte(x) => write!(f, "{}", x),
            Value::Char(x) => write!(f, "{}", x),
            Value::Short(x) => write!(f, "{}", x),
            Value::Int(x) => write!(f, "{}", x),
            Value::Long(x) => write!(f, "{}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{}", x),
            Value::String(x) => write!(f, "{}", x),
        }
    }
}

//////////////////////////////////////////// OptionValue ///////////////////////////////////////////

/// OptionValue is implemented by every type a field bound to an option may have.  `Option<T>`
/// stays `None` until the option is supplied.
///
/// Any other field type is rejected when the target is compiled:
///
/// ```compile_fail,E0277
/// #[derive(Default, bindarg_derive::Bind)]
/// struct Counter {
///     #[bindarg(option, name = "count")]
///     count: u64,
/// }
/// ```
///
/// ```compile_fail,E0277
/// use std::collections::HashMap;
///
/// #[derive(Default, bindarg_derive::Bind)]
/// struct Env {
///     #[bindarg(option, name = "env")]
///     env: HashMap<String, String>,
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "unsupported option type : {Self}",
    note = "options must be bool, i8, char, i16, i32, i64, f32, f64, String, or an Option of one"
)]
pub trait OptionValue: Sized {
    /// The kind this type converts from.
    const KIND: ValueKind;

    /// Extract `Self` from a value of kind `Self::KIND`.  Returns `None` for any other kind.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! option_value {
    ($ty:ty, $kind:ident) => {
        impl OptionValue for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$kind(x) => Some(x),
                    _ => None,
                }
            }
        }
    };
}

option_value!(bool, Bool);
option_value!(i8, Byte);
option_value!(char, Char);
option_value!(i16, Short);
option_value!(i32, Int);
option_value!(i64, Long);
option_value!(f32, Float);
option_value!(f64, Double);
option_value!(String, String);

impl<T: OptionValue> OptionValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }
}

/////////////////////////////////////////////// Slot ///////////////////////////////////////////////

/// A field that can be assigned from the string form of its value.
pub(crate) trait Slot {
    fn assign(&mut self, value: &str) -> Result<(), ConversionError>;
}

impl<T: OptionValue> Slot for T {
    fn assign(&mut self, value: &str) -> Result<(), ConversionError> {
        match T::from_value(T::KIND.convert(value)?) {
            Some(converted) => {
                *self = converted;
                Ok(())
            }
            None => Err(ConversionError::new(
                T::KIND,
                value,
                "converter produced a value of the wrong kind",
            )),
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
