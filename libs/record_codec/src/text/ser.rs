use serde_json::{Map, Number, Value};

use super::{TYPE_PROPERTY, TextStyle, VERSION_PROPERTY};
use crate::error::{Error, Result};
use crate::record::{Member, Record, Scalar};
use crate::session::Session;
use crate::version::{Versions, gate};

/// A container that is still being filled.
#[derive(Debug)]
enum Open {
    Object {
        map: Map<String, Value>,
        key: Option<String>,
    },
    Array(Vec<Value>),
}

/// Builds a document from a forward stream of tokens.
///
/// Property names must be unique within an object, since the reader matches
/// them positionally and a repeated name would silently replace a value.
#[derive(Debug, Default)]
pub struct TokenWriter {
    open: Vec<Open>,
    root: Option<Value>,
}

impl TokenWriter {
    pub fn start_object(&mut self) -> Result<()> {
        self.check_value_slot()?;
        self.open.push(Open::Object {
            map: Map::new(),
            key: None,
        });
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<()> {
        match self.open.pop() {
            Some(Open::Object { map, key: None }) => self.value(Value::Object(map)),
            other => Err(unbalanced("end of object", other)),
        }
    }

    pub fn start_array(&mut self) -> Result<()> {
        self.check_value_slot()?;
        self.open.push(Open::Array(Vec::new()));
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<()> {
        match self.open.pop() {
            Some(Open::Array(items)) => self.value(Value::Array(items)),
            other => Err(unbalanced("end of array", other)),
        }
    }

    pub fn property(&mut self, name: &str) -> Result<()> {
        match self.open.last_mut() {
            Some(Open::Object { map, key }) if key.is_none() => {
                if map.contains_key(name) {
                    return Err(Error::DuplicateProperty(name.to_owned()));
                }

                *key = Some(name.to_owned());
                Ok(())
            },
            _ => Err(Error::UnexpectedToken {
                expected: "an open object",
                found: format!("property `{name}`"),
            }),
        }
    }

    pub fn integer(&mut self, v: i64) -> Result<()> {
        self.value(Value::from(v))
    }

    pub fn float(&mut self, v: f32) -> Result<()> {
        let n = Number::from_f64(f64::from(v)).ok_or(Error::NonFiniteFloat(v))?;
        self.value(Value::Number(n))
    }

    pub fn null(&mut self) -> Result<()> {
        self.value(Value::Null)
    }

    /// Takes the finished document.
    pub fn into_value(self) -> Result<Value> {
        match (self.open.is_empty(), self.root) {
            (true, Some(root)) => Ok(root),
            _ => Err(Error::UnexpectedToken {
                expected: "a complete document",
                found: "unclosed containers".to_owned(),
            }),
        }
    }

    fn value(&mut self, value: Value) -> Result<()> {
        match self.open.last_mut() {
            Some(Open::Object { map, key }) => {
                let key = key.take().ok_or_else(|| Error::UnexpectedToken {
                    expected: "property name",
                    found: "value".to_owned(),
                })?;
                map.insert(key, value);
            },
            Some(Open::Array(items)) => items.push(value),
            None if self.root.is_none() => self.root = Some(value),
            None => {
                return Err(Error::UnexpectedToken {
                    expected: "end of document",
                    found: "second root value".to_owned(),
                });
            },
        }

        Ok(())
    }

    fn check_value_slot(&self) -> Result<()> {
        match self.open.last() {
            Some(Open::Object { key: None, .. }) => Err(Error::UnexpectedToken {
                expected: "property name",
                found: "value".to_owned(),
            }),
            _ => Ok(()),
        }
    }
}

fn unbalanced(found: &str, open: Option<Open>) -> Error {
    let expected = match open {
        Some(Open::Object { .. }) => "end of object",
        Some(Open::Array(_)) => "end of array",
        None => "an open container",
    };

    Error::UnexpectedToken {
        expected,
        found: found.to_owned(),
    }
}

/// A writing [`Session`] for the text format.
///
/// The document is built in memory and only handed out by
/// [`finish`](Self::finish), so a failed save never yields a partial
/// document.
#[derive(Debug)]
pub struct TextWriter {
    tokens: TokenWriter,
    latest: u32,
    version: u32,
}

impl TextWriter {
    /// Creates a session writing the latest version.
    pub fn new(latest: u32) -> Self {
        let mut tokens = TokenWriter::default();
        open_root(&mut tokens, latest).expect("fresh writer accepts the root object");
        Self {
            tokens,
            latest,
            version: latest,
        }
    }

    /// Creates a session writing an older version.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is newer than `latest`.
    pub fn with_version(latest: u32, version: u32) -> Result<Self> {
        if version > latest {
            return Err(Error::UnsupportedVersion {
                found: version.into(),
                latest,
            });
        }

        let mut tokens = TokenWriter::default();
        open_root(&mut tokens, version)?;
        Ok(Self {
            tokens,
            latest,
            version,
        })
    }

    /// Writes the root record's fields into the root object.
    ///
    /// # Errors
    ///
    /// Returns any error of the record or the writer.
    pub fn write_root<T>(&mut self, record: &mut T) -> Result<()>
    where
        T: Record + ?Sized,
    {
        record.serialize(self)
    }

    /// Closes the root object and returns the document.
    ///
    /// # Errors
    ///
    /// Returns an error if containers opened by records were left open.
    pub fn finish(mut self) -> Result<Value> {
        self.tokens.end_object()?;
        self.tokens.into_value()
    }

    /// Closes the root object and prints the document.
    ///
    /// # Errors
    ///
    /// Same as [`finish`](Self::finish).
    pub fn finish_string(self, style: TextStyle) -> Result<String> {
        let value = self.finish()?;
        let text = match style {
            TextStyle::Compact => serde_json::to_string(&value)?,
            TextStyle::Pretty => serde_json::to_string_pretty(&value)?,
        };

        Ok(text)
    }

    fn write_member<T: Member>(&mut self, member: &mut T) -> Result<()> {
        self.tokens.start_object()?;
        if T::TAGGED {
            self.tokens.property(TYPE_PROPERTY)?;
            self.tokens.integer(member.tag().into())?;
        }

        member.serialize(self)?;
        self.tokens.end_object()
    }
}

fn open_root(tokens: &mut TokenWriter, version: u32) -> Result<()> {
    tokens.start_object()?;
    tokens.property(VERSION_PROPERTY)?;
    tokens.integer(version.into())
}

impl Session for TextWriter {
    fn is_reading(&self) -> bool {
        false
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn latest_version(&self) -> u32 {
        self.latest
    }

    fn scalar<T: Scalar>(
        &mut self,
        name: &str,
        value: &mut T,
        _default: T,
        versions: Versions,
    ) -> Result<()> {
        if !gate(name, versions, self.version, self.latest)? {
            return Ok(());
        }

        self.tokens.property(name)?;
        value.write_token(&mut self.tokens)
    }

    fn object<T: Member>(
        &mut self,
        name: &str,
        value: &mut Option<T>,
        versions: Versions,
    ) -> Result<()> {
        if !gate(name, versions, self.version, self.latest)? {
            return Ok(());
        }

        self.tokens.property(name)?;
        match value {
            Some(member) => self.write_member(member),
            None => self.tokens.null(),
        }
    }

    fn object_array<T: Member>(
        &mut self,
        name: &str,
        values: &mut Vec<T>,
        versions: Versions,
    ) -> Result<()> {
        if !gate(name, versions, self.version, self.latest)? {
            return Ok(());
        }

        self.tokens.property(name)?;
        self.tokens.start_array()?;
        for member in &mut *values {
            self.write_member(member)?;
        }

        self.tokens.end_array()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builds_nested_document() {
        let mut w = TokenWriter::default();
        w.start_object().expect("root");
        w.property("a").expect("name");
        w.integer(5).expect("value");
        w.property("v").expect("name");
        w.start_array().expect("array");
        w.float(1.5).expect("element");
        w.end_array().expect("close array");
        w.end_object().expect("close root");

        let value = w.into_value().expect("complete");
        assert_eq!(value, json!({ "a": 5, "v": [1.5] }), "document mismatch");
    }

    #[test]
    fn rejects_duplicate_property() {
        let mut w = TokenWriter::default();
        w.start_object().expect("root");
        w.property("a").expect("name");
        w.integer(1).expect("value");

        let err = w.property("a").expect_err("repeated name");
        assert!(matches!(err, Error::DuplicateProperty(_)), "wrong error: {err:?}");
    }

    #[test]
    fn rejects_value_without_name() {
        let mut w = TokenWriter::default();
        w.start_object().expect("root");
        w.integer(1).expect_err("objects need a property name first");
    }

    #[test]
    fn rejects_unbalanced_close() {
        let mut w = TokenWriter::default();
        w.start_array().expect("root");
        w.end_object().expect_err("array is open, not an object");
    }

    #[test]
    fn rejects_non_finite_float() {
        let mut w = TokenWriter::default();
        let err = w.float(f32::NAN).expect_err("json has no NaN");
        assert!(matches!(err, Error::NonFiniteFloat(_)), "wrong error: {err:?}");
    }
}
