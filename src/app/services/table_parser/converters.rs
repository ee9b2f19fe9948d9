//! Field converters
//!
//! A converter turns one cleaned field into a typed [`Value`]. The built-in
//! converters cover the common scalar types; anything else can be wrapped
//! with [`Converter::new`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::app::models::Value;
use crate::app::services::date_parser::parse_date;
use crate::constants::converter_names;
use crate::{Error, Result};

/// Failure reported by a converter for a single field
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

type ConvertFn = dyn Fn(&str) -> std::result::Result<Value, ConversionError> + Send + Sync;

/// A named, shareable conversion function
#[derive(Clone)]
pub struct Converter {
    name: Arc<str>,
    func: Arc<ConvertFn>,
}

impl Converter {
    /// Wrap an arbitrary conversion function
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the converter to an already cleaned field
    pub fn convert(&self, field: &str) -> std::result::Result<Value, ConversionError> {
        (self.func)(field)
    }

    /// Keep the field as text
    pub fn string() -> Self {
        Self::new(converter_names::STRING, |field| Ok(Value::Str(field.to_string())))
    }

    /// Signed 64-bit integer
    pub fn int() -> Self {
        Self::new(converter_names::INT, |field| {
            field.parse::<i64>().map(Value::Int).map_err(|e| {
                ConversionError::new(format!("invalid literal for int: '{}' ({})", field, e))
            })
        })
    }

    /// 64-bit float
    pub fn float() -> Self {
        Self::new(converter_names::FLOAT, |field| {
            field.parse::<f64>().map(Value::Float).map_err(|e| {
                ConversionError::new(format!("could not convert to float: '{}' ({})", field, e))
            })
        })
    }

    /// Boolean from true/false, yes/no or 1/0 (case-insensitive)
    pub fn boolean() -> Self {
        Self::new(converter_names::BOOL, |field| {
            match field.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
                _ => Err(ConversionError::new(format!(
                    "invalid literal for bool: '{}'",
                    field
                ))),
            }
        })
    }

    /// Calendar date; input matching no layout becomes `Value::Null`
    pub fn date() -> Self {
        Self::new(converter_names::DATE, |field| {
            Ok(parse_date(field).map(Value::Date).unwrap_or(Value::Null))
        })
    }

    /// Look up a built-in converter by name
    ///
    /// `raw` and the empty string mean "no converter at this position" and
    /// return `Ok(None)`.
    pub fn from_name(name: &str) -> Result<Option<Self>> {
        let name = name.trim();
        if name.is_empty() || name == converter_names::RAW {
            return Ok(None);
        }
        name.parse().map(Some)
    }

    /// Parse a comma-separated list of converter names
    pub fn parse_list(list: &str) -> Result<Vec<Option<Self>>> {
        list.split(',').map(Self::from_name).collect()
    }
}

impl FromStr for Converter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            converter_names::STRING => Ok(Self::string()),
            converter_names::INT => Ok(Self::int()),
            converter_names::FLOAT => Ok(Self::float()),
            converter_names::BOOL => Ok(Self::boolean()),
            converter_names::DATE => Ok(Self::date()),
            other => Err(Error::configuration(format!(
                "Unknown converter '{}'. Valid converters: {}",
                other,
                converter_names::ALL.join(", ")
            ))),
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Converter").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_converter() {
        let int = Converter::int();
        assert_eq!(int.convert("42").unwrap(), Value::Int(42));
        assert_eq!(int.convert("-7").unwrap(), Value::Int(-7));
        let err = int.convert("4.2").unwrap_err();
        assert!(err.message().contains("'4.2'"));
    }

    #[test]
    fn test_float_converter() {
        let float = Converter::float();
        assert_eq!(float.convert("32.20").unwrap(), Value::Float(32.2));
        assert_eq!(float.convert("1e3").unwrap(), Value::Float(1000.0));
        assert!(float.convert("abc").is_err());
    }

    #[test]
    fn test_bool_converter() {
        let boolean = Converter::boolean();
        assert_eq!(boolean.convert("Yes").unwrap(), Value::Bool(true));
        assert_eq!(boolean.convert("0").unwrap(), Value::Bool(false));
        assert_eq!(boolean.convert("n").unwrap().as_bool(), Some(false));
        assert!(boolean.convert("maybe").is_err());
    }

    #[test]
    fn test_date_converter_yields_null_on_no_match() {
        let date = Converter::date();
        assert_eq!(
            date.convert("2023-06-11").unwrap(),
            Value::Date(chrono::NaiveDate::from_ymd_opt(2023, 6, 11).unwrap())
        );
        assert!(date.convert("not a date").unwrap().is_null());
    }

    #[test]
    fn test_custom_converter() {
        let upper = Converter::new("upper", |field| Ok(Value::Str(field.to_uppercase())));
        assert_eq!(upper.name(), "upper");
        assert_eq!(upper.convert("aa").unwrap(), Value::from("AA"));
        assert_eq!(format!("{:?}", upper), "Converter(\"upper\")");
    }

    #[test]
    fn test_from_name() {
        assert!(Converter::from_name("raw").unwrap().is_none());
        assert!(Converter::from_name("").unwrap().is_none());
        assert_eq!(Converter::from_name(" int ").unwrap().unwrap().name(), "int");
        assert!(Converter::from_name("decimal").unwrap_err().is_configuration());
    }

    #[test]
    fn test_parse_list_keeps_positions() {
        let list = Converter::parse_list("str,,float").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].as_ref().unwrap().name(), "str");
        assert!(list[1].is_none());
        assert_eq!(list[2].as_ref().unwrap().name(), "float");
    }
}
