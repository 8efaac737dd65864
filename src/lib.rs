//! Parser for a small JSON-like configuration language.
//!
//! A document is a list of `key: value` pairs with unquoted identifier keys:
//!
//! ```text
//! name: "server"
//! port: 8080
//! tls: { enabled: true, cert: null }
//! hosts: ["a", "b"]
//! ```
//!
//! Pairs are separated by whitespace, newlines or a single comma. Strings run
//! to the next `"` and have no escape sequences, so a string cannot contain a
//! quote. Numbers keep their exact decimal value.
//!
//! ```
//! let config = cfgparse::parse("port: 8080\ntls: { enabled: true }").unwrap();
//! assert_eq!(config.lookup("tls.enabled").and_then(|v| v.as_bool()), Some(true));
//! ```
mod ast;
pub mod cursor;
mod error;
mod margin;
mod number;
mod parser;

pub use ast::{Object, Value};
pub use error::{NumberError, SyntaxError};
pub use margin::{strip_margin, StripMargin};
pub use number::Number;
pub use parser::{Parser, MAX_DEPTH};

/// Parses one document into its root object.
pub fn parse(text: &str) -> Result<Object, SyntaxError> {
    Parser::new(text).parse()
}

impl std::str::FromStr for Object {
    type Err = SyntaxError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse(text)
    }
}
