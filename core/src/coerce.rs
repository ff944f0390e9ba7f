//! String-token to typed-value coercion.
//!
//! [`ArgValue`] is the single conversion contract shared by everything an
//! option can produce. Layered strategies compose over it:
//!
//! - closed enumerations match case names with [`named_variant`], or go
//!   through a coercible backing value with [`backed_variant`];
//! - primitives parse through their canonical [`FromStr`] round-trip form
//!   via [`lossless`] (`bool` accepts exactly `"true"`/`"false"`,
//!   case-sensitive; numeric parsing rejects whitespace and partial
//!   prefixes);
//! - `Option<T>` delegates to `T` and wraps the success.
//!
//! Each layer is independently usable: an implementor picks one strategy
//! per type and the registry never needs to know which.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ParseError;

/// A failed coercion: the offending token plus a short label of the type
/// that was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue {
    /// The token that failed to coerce.
    pub token: String,
    /// Short label of the expected type, e.g. `u32` or `Option<String>`.
    pub expected: String,
}

impl From<InvalidValue> for ParseError {
    fn from(invalid: InvalidValue) -> Self {
        ParseError::InvalidOptionValue {
            token: invalid.token,
            expected: invalid.expected,
        }
    }
}

/// Conversion contract between a single command-line token and a typed
/// value.
///
/// # Examples
///
/// An enumeration coerced by case name:
///
/// ```
/// use declarg_core::{named_variant, ArgValue, InvalidValue};
///
/// #[derive(Debug, PartialEq)]
/// enum Mode {
///     Fast,
///     Safe,
/// }
///
/// impl ArgValue for Mode {
///     fn from_token(token: &str) -> Result<Self, InvalidValue> {
///         named_variant(token, [("fast", Mode::Fast), ("safe", Mode::Safe)])
///     }
///
///     fn to_token(&self) -> String {
///         match self {
///             Mode::Fast => "fast".to_string(),
///             Mode::Safe => "safe".to_string(),
///         }
///     }
/// }
///
/// assert_eq!(Mode::from_token("fast"), Ok(Mode::Fast));
/// assert!(Mode::from_token("Fast").is_err());
/// ```
pub trait ArgValue: Sized {
    /// Coerces a token into a value, failing with the token and the
    /// expected type label on mismatch.
    fn from_token(token: &str) -> Result<Self, InvalidValue>;

    /// Canonical textual form of the value: coercing it back through
    /// [`from_token`](Self::from_token) must reproduce the value. Used to
    /// capture default-value display text at registration time.
    fn to_token(&self) -> String;
}

/// Short type label for failure messages: [`std::any::type_name`] with
/// module paths stripped, so `Option<alloc::string::String>` reads
/// `Option<String>`.
pub(crate) fn type_label<T>() -> String {
    let full = std::any::type_name::<T>();
    let mut label = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            segment.push(ch);
        } else if ch == ':' {
            segment.clear();
        } else {
            label.push_str(&segment);
            segment.clear();
            label.push(ch);
        }
    }
    label.push_str(&segment);
    label
}

/// Primitive lossless-conversion strategy: parses the token through the
/// type's [`FromStr`] implementation, labelling failures with the target
/// type.
pub fn lossless<T>(token: &str) -> Result<T, InvalidValue>
where
    T: FromStr + Display,
{
    token.parse::<T>().map_err(|_| InvalidValue {
        token: token.to_string(),
        expected: type_label::<T>(),
    })
}

/// Enumeration-by-name strategy: matches the token against a closed case
/// list, exactly and case-sensitively.
pub fn named_variant<T>(
    token: &str,
    variants: impl IntoIterator<Item = (&'static str, T)>,
) -> Result<T, InvalidValue> {
    variants
        .into_iter()
        .find_map(|(name, value)| (name == token).then_some(value))
        .ok_or_else(|| InvalidValue {
            token: token.to_string(),
            expected: type_label::<T>(),
        })
}

/// Enumeration-by-coerced-backing strategy: coerces the token to the
/// backing type first (that failure propagates unchanged), then looks the
/// case up by the backing value. A lookup miss fails with the enumeration's
/// own type label.
///
/// # Examples
///
/// ```
/// use declarg_core::{backed_variant, ArgValue, InvalidValue};
///
/// #[derive(Debug, PartialEq)]
/// enum Level {
///     Quiet,
///     Loud,
/// }
///
/// impl ArgValue for Level {
///     fn from_token(token: &str) -> Result<Self, InvalidValue> {
///         backed_variant(token, |raw: u8| match raw {
///             0 => Some(Level::Quiet),
///             1 => Some(Level::Loud),
///             _ => None,
///         })
///     }
///
///     fn to_token(&self) -> String {
///         match self {
///             Level::Quiet => "0".to_string(),
///             Level::Loud => "1".to_string(),
///         }
///     }
/// }
///
/// assert_eq!(Level::from_token("1"), Ok(Level::Loud));
/// // Not a u8 at all: the backing type's failure comes through.
/// assert_eq!(Level::from_token("x").unwrap_err().expected, "u8");
/// // A valid u8 with no matching case: the enumeration's failure.
/// assert_eq!(Level::from_token("7").unwrap_err().expected, "Level");
/// ```
pub fn backed_variant<B, T>(
    token: &str,
    decode: impl FnOnce(B) -> Option<T>,
) -> Result<T, InvalidValue>
where
    B: ArgValue,
{
    let backing = B::from_token(token)?;
    decode(backing).ok_or_else(|| InvalidValue {
        token: token.to_string(),
        expected: type_label::<T>(),
    })
}

impl ArgValue for String {
    fn from_token(token: &str) -> Result<Self, InvalidValue> {
        Ok(token.to_string())
    }

    fn to_token(&self) -> String {
        self.clone()
    }
}

macro_rules! lossless_arg_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArgValue for $ty {
                fn from_token(token: &str) -> Result<Self, InvalidValue> {
                    lossless(token)
                }

                fn to_token(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

lossless_arg_value!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: ArgValue> ArgValue for Option<T> {
    /// Delegates to `T` and wraps the success; a coercion failure
    /// propagates unchanged. Absence never reaches this layer: a missing
    /// value token is a registry-level [`NoRequiredValue`] failure.
    ///
    /// [`NoRequiredValue`]: crate::ParseError::NoRequiredValue
    fn from_token(token: &str) -> Result<Self, InvalidValue> {
        T::from_token(token).map(Some)
    }

    fn to_token(&self) -> String {
        match self {
            Some(value) => value.to_token(),
            None => "none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_accepts_only_canonical_literals() {
        assert_eq!(bool::from_token("true"), Ok(true));
        assert_eq!(bool::from_token("false"), Ok(false));

        for token in ["True", "FALSE", "1", "0", "yes", " true", "true "] {
            let error = bool::from_token(token).unwrap_err();
            assert_eq!(error.token, token);
            assert_eq!(error.expected, "bool");
        }
    }

    #[test]
    fn test_numeric_parsing_rejects_non_canonical_tokens() {
        assert_eq!(u32::from_token("100"), Ok(100));
        assert_eq!(i64::from_token("-7"), Ok(-7));
        assert_eq!(f64::from_token("2.5"), Ok(2.5));

        assert!(u32::from_token("100x").is_err());
        assert!(u32::from_token(" 100").is_err());
        assert!(u32::from_token("-1").is_err());
        assert!(i8::from_token("128").is_err());
    }

    #[test]
    fn test_primitive_round_trip() {
        for value in [0u32, 1, 100, u32::MAX] {
            assert_eq!(u32::from_token(&value.to_token()), Ok(value));
        }
        for value in [true, false] {
            assert_eq!(bool::from_token(&value.to_token()), Ok(value));
        }
        assert_eq!(f64::from_token(&1.25f64.to_token()), Ok(1.25));
        assert_eq!(String::from_token("plain"), Ok("plain".to_string()));
    }

    #[test]
    fn test_named_variant_matches_exactly() {
        #[derive(Debug, PartialEq)]
        enum Color {
            Red,
            Green,
        }
        let cases = || [("red", Color::Red), ("green", Color::Green)];

        assert_eq!(named_variant("red", cases()), Ok(Color::Red));
        let error = named_variant("RED", cases()).unwrap_err();
        assert_eq!(error.token, "RED");
        assert_eq!(error.expected, "Color");
    }

    #[test]
    fn test_backed_variant_propagates_backing_failure() {
        #[derive(Debug, PartialEq)]
        enum Slot {
            First,
        }
        let decode = |raw: u8| (raw == 1).then_some(Slot::First);

        assert_eq!(backed_variant("1", decode), Ok(Slot::First));
        assert_eq!(backed_variant("one", decode).unwrap_err().expected, "u8");
        assert_eq!(backed_variant("9", decode).unwrap_err().expected, "Slot");
    }

    #[test]
    fn test_option_wraps_and_propagates() {
        assert_eq!(Option::<u32>::from_token("5"), Ok(Some(5)));
        let error = Option::<u32>::from_token("five").unwrap_err();
        assert_eq!(error.expected, "u32");

        assert_eq!(Some(5u32).to_token(), "5");
        assert_eq!(None::<u32>.to_token(), "none");
    }

    #[test]
    fn test_type_label_strips_module_paths() {
        assert_eq!(type_label::<String>(), "String");
        assert_eq!(type_label::<u32>(), "u32");
        assert_eq!(type_label::<Option<String>>(), "Option<String>");
        assert_eq!(type_label::<Vec<u8>>(), "Vec<u8>");
    }
}
