use std::iter::Peekable;
use std::vec;

use serde_json::Value;

use super::token::{Token, tokenize};
use super::{TYPE_PROPERTY, VERSION_PROPERTY};
use crate::error::{Error, Result};
use crate::record::{Member, Record, Scalar};
use crate::session::Session;
use crate::version::{Versions, gate};

/// A forward stream of tokens with one token of lookahead.
#[derive(Debug)]
pub struct TokenReader {
    tokens: Peekable<vec::IntoIter<Token>>,
}

impl TokenReader {
    /// Creates a reader over the tokens of a parsed document.
    pub fn new(value: Value) -> Self {
        let mut tokens = Vec::new();
        tokenize(value, &mut tokens);
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    pub fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    pub fn next_token(&mut self, expected: &'static str) -> Result<Token> {
        self.tokens.next().ok_or_else(|| Error::UnexpectedToken {
            expected,
            found: "end of input".to_owned(),
        })
    }

    pub fn start_object(&mut self) -> Result<()> {
        self.expect(&Token::StartObject, "start of object")
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.expect(&Token::EndObject, "end of object")
    }

    pub fn start_array(&mut self) -> Result<()> {
        self.expect(&Token::StartArray, "start of array")
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.expect(&Token::EndArray, "end of array")
    }

    /// Reads a property name.
    ///
    /// A name other than `name` is only logged. The token itself must be a
    /// property name.
    pub fn property(&mut self, name: &str) -> Result<()> {
        match self.next_token("property name")? {
            Token::Property(found) => {
                if found != name {
                    log::warn!("incorrect property name: expected `{name}`, found `{found}`");
                }

                Ok(())
            },
            other => Err(mismatch("property name", &other)),
        }
    }

    pub fn integer(&mut self) -> Result<i64> {
        match self.next_token("integer")? {
            Token::Integer(v) => Ok(v),
            other => Err(mismatch("integer", &other)),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn float(&mut self) -> Result<f32> {
        match self.next_token("float")? {
            Token::Float(v) => Ok(v as f32),
            other => Err(mismatch("float", &other)),
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<()> {
        let found = self.next_token(expected)?;
        if found == *token {
            Ok(())
        } else {
            Err(mismatch(expected, &found))
        }
    }
}

fn mismatch(expected: &'static str, found: &Token) -> Error {
    Error::UnexpectedToken {
        expected,
        found: found.to_string(),
    }
}

/// A reading [`Session`] for the text format.
#[derive(Debug)]
pub struct TextReader {
    tokens: TokenReader,
    latest: u32,
    version: u32,
}

impl TextReader {
    /// Parses a document and reads its leading version property.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON, does not start with an
    /// object holding the version, or the version is newer than `latest`.
    pub fn from_str(text: &str, latest: u32) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value, latest)
    }

    /// Reads the leading version property of an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not start with an object holding
    /// the version or the version is newer than `latest`.
    pub fn from_value(value: Value, latest: u32) -> Result<Self> {
        let mut tokens = TokenReader::new(value);
        tokens.start_object()?;
        tokens.property(VERSION_PROPERTY)?;

        let found = tokens.integer()?;
        let version = u32::try_from(found)
            .ok()
            .filter(|&v| v <= latest)
            .ok_or(Error::UnsupportedVersion {
                found: found.unsigned_abs(),
                latest,
            })?;

        log::trace!("read version property: {version}");
        Ok(Self {
            tokens,
            latest,
            version,
        })
    }

    /// Reads the root record's fields from the root object.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not match the record.
    pub fn read_root<T>(&mut self, record: &mut T) -> Result<()>
    where
        T: Record + ?Sized,
    {
        record.serialize(self)
    }

    /// Consumes the end of the root object.
    ///
    /// # Errors
    ///
    /// Returns an error if the root object holds more properties than the
    /// record read.
    pub fn finish(mut self) -> Result<()> {
        self.tokens.end_object()
    }

    fn read_member<T: Member>(&mut self) -> Result<T> {
        self.tokens.start_object()?;
        let tag = if T::TAGGED {
            self.tokens.property(TYPE_PROPERTY)?;
            self.tokens.integer()?
        } else {
            0
        };

        let mut member = u8::try_from(tag)
            .ok()
            .and_then(T::create)
            .ok_or(Error::UnknownTag {
                family: T::FAMILY,
                tag,
            })?;

        member.serialize(self)?;
        self.tokens.end_object()?;
        Ok(member)
    }
}

impl Session for TextReader {
    fn is_reading(&self) -> bool {
        true
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
        default: T,
        versions: Versions,
    ) -> Result<()> {
        if !gate(name, versions, self.version, self.latest)? {
            *value = default;
            return Ok(());
        }

        self.tokens.property(name)?;
        *value = T::read_token(&mut self.tokens)?;
        Ok(())
    }

    fn object<T: Member>(
        &mut self,
        name: &str,
        value: &mut Option<T>,
        versions: Versions,
    ) -> Result<()> {
        if !gate(name, versions, self.version, self.latest)? {
            *value = None;
            return Ok(());
        }

        self.tokens.property(name)?;
        if self.tokens.peek() == Some(&Token::Null) {
            self.tokens.next_token("null")?;
            *value = None;
        } else {
            *value = Some(self.read_member()?);
        }

        Ok(())
    }

    fn object_array<T: Member>(
        &mut self,
        name: &str,
        values: &mut Vec<T>,
        versions: Versions,
    ) -> Result<()> {
        values.clear();
        if !gate(name, versions, self.version, self.latest)? {
            return Ok(());
        }

        self.tokens.property(name)?;
        self.tokens.start_array()?;
        while self.tokens.peek() != Some(&Token::EndArray) {
            let member = self.read_member()?;
            values.push(member);
        }

        self.tokens.end_array()
    }
}
