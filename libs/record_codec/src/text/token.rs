use std::fmt;

use serde_json::Value;

/// One token of the structured text stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Property(String),
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartObject => f.write_str("start of object"),
            Self::EndObject => f.write_str("end of object"),
            Self::StartArray => f.write_str("start of array"),
            Self::EndArray => f.write_str("end of array"),
            Self::Property(name) => write!(f, "property `{name}`"),
            Self::Integer(v) => write!(f, "integer {v}"),
            Self::Float(v) => write!(f, "float {v}"),
            Self::String(v) => write!(f, "string {v:?}"),
            Self::Bool(v) => write!(f, "bool {v}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Flattens a parsed document into its token stream, in document order.
pub fn tokenize(value: Value, out: &mut Vec<Token>) {
    match value {
        Value::Null => out.push(Token::Null),
        Value::Bool(v) => out.push(Token::Bool(v)),
        // numbers with a fraction or exponent never convert to i64
        Value::Number(n) => out.push(match n.as_i64() {
            Some(v) => Token::Integer(v),
            None => Token::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(v) => out.push(Token::String(v)),
        Value::Array(items) => {
            out.push(Token::StartArray);
            for item in items {
                tokenize(item, out);
            }

            out.push(Token::EndArray);
        },
        Value::Object(map) => {
            out.push(Token::StartObject);
            for (key, item) in map {
                out.push(Token::Property(key));
                tokenize(item, out);
            }

            out.push(Token::EndObject);
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keeps_document_order() {
        let mut tokens = Vec::new();
        tokenize(json!({ "b": 1, "a": [1.5, null] }), &mut tokens);
        assert_eq!(
            tokens,
            [
                Token::StartObject,
                Token::Property("b".to_owned()),
                Token::Integer(1),
                Token::Property("a".to_owned()),
                Token::StartArray,
                Token::Float(1.5),
                Token::Null,
                Token::EndArray,
                Token::EndObject,
            ],
            "tokens must follow insertion order"
        );
    }

    #[test]
    fn fraction_is_float() {
        let mut tokens = Vec::new();
        tokenize(serde_json::from_str("[2.0, 2]").expect("valid json"), &mut tokens);
        assert_eq!(tokens[1], Token::Float(2.0), "2.0 is a float");
        assert_eq!(tokens[2], Token::Integer(2), "2 is an integer");
    }
}
