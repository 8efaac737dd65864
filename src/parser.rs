use crate::ast::{Object, Value};
use crate::cursor::Cursor;
use crate::error::SyntaxError;
use crate::number::Number;
use tracing::{debug, trace};

pub type Result<T> = std::result::Result<T, SyntaxError>;

/// How many objects and arrays may be open at once.
pub const MAX_DEPTH: usize = 128;

/// Recursive-descent parser for one configuration document.
///
/// The document is a sequence of `key: value` pairs and always yields an
/// [`Object`]. The first syntax error aborts the parse. Nesting deeper than
/// [`MAX_DEPTH`] is a syntax error.
pub struct Parser {
    cursor: Cursor,
    depth: usize,
}

impl Parser {
    pub fn new(text: &str) -> Self {
        Self {
            cursor: Cursor::new(text),
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<Object> {
        debug!(chars = self.cursor.source_len(), "parsing document");
        let result = self.parse_document();
        match &result {
            Ok(root) => debug!(entries = root.len(), "parsed document"),
            Err(e) => debug!(
                line = e.line,
                column = e.column,
                error = %e.message,
                "syntax error"
            ),
        }
        result
    }

    fn parse_document(&mut self) -> Result<Object> {
        let mut root = Object::new();
        self.cursor.skip_whitespace();
        while !self.cursor.is_end_of_text() {
            self.parse_pair(&mut root)?;
        }
        Ok(root)
    }

    // key: value, then trailing whitespace and at most one comma
    fn parse_pair(&mut self, object: &mut Object) -> Result<()> {
        let key = self.parse_property()?;
        self.cursor.consume(':')?;
        self.cursor.skip_whitespace();
        let value = self.parse_value()?;
        trace!(key = %key, kind = value.kind(), "read pair");
        object.insert(key, value);

        self.cursor.skip_whitespace();
        if self.cursor.cur_char_is(',') {
            self.cursor.advance();
            self.cursor.skip_whitespace();
        }
        Ok(())
    }

    fn parse_property(&mut self) -> Result<String> {
        let starts_identifier = self
            .cursor
            .current()
            .map_or(false, |ch| ch.is_alphabetic() || ch == '_');
        if !starts_identifier {
            return Err(self.cursor.error(format!(
                "Expected a property name starting with a letter or an underscore, got {}",
                self.cursor.describe_current()
            )));
        }

        self.cursor.begin_capture();
        while self.cursor.is_alphanumeric() || self.cursor.is_underscore() {
            self.cursor.advance();
        }
        let name = self.cursor.end_capture();

        if !self.cursor.cur_char_is(':') {
            return Err(self.cursor.error(format!(
                "Expected an alphanumeric string, or an underscore, got {}",
                self.cursor.describe_current()
            )));
        }
        Ok(name)
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.cursor.current() {
            Some('"') => self.parse_string(),
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_number(),
            Some('t') => self.parse_keyword("true", Value::TRUE),
            Some('f') => self.parse_keyword("false", Value::FALSE),
            Some('n') => self.parse_keyword("null", Value::Null),
            _ => Err(self.cursor.error(format!(
                "Expected a value, got {}",
                self.cursor.describe_current()
            ))),
        }
    }

    // no escapes: the string runs to the next '"'
    fn parse_string(&mut self) -> Result<Value> {
        self.cursor.consume('"')?;
        self.cursor.begin_capture();
        while !self.cursor.cur_char_is('"') {
            if self.cursor.is_end_of_text() {
                return Err(self
                    .cursor
                    .error("Expected '\"' to close the string, got end of text"));
            }
            self.cursor.advance();
        }
        let s = self.cursor.end_capture();
        self.cursor.advance();
        Ok(Value::String(s))
    }

    // checked at the opening bracket, so the error points at it
    fn enter_nested(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.cursor.error(format!(
                "nesting too deep, at most {} objects and arrays may be open",
                MAX_DEPTH
            )));
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.enter_nested()?;
        self.cursor.consume('{')?;
        self.cursor.skip_whitespace();
        let mut object = Object::new();
        loop {
            match self.cursor.current() {
                Some('}') => break,
                None => return Err(self.cursor.error("Expected '}', got end of text")),
                Some(_) => self.parse_pair(&mut object)?,
            }
        }
        self.cursor.advance();
        self.depth -= 1;
        Ok(Value::Object(object))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.enter_nested()?;
        self.cursor.consume('[')?;
        self.cursor.skip_whitespace();
        let mut values = vec![];
        if self.cursor.cur_char_is(']') {
            self.cursor.advance();
            self.depth -= 1;
            return Ok(Value::Array(values));
        }
        loop {
            values.push(self.parse_value()?);
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(',') => {
                    self.cursor.advance();
                    self.cursor.skip_whitespace();
                }
                Some(']') => break,
                _ => {
                    return Err(self.cursor.error(format!(
                        "Expected ',' or ']', got {}",
                        self.cursor.describe_current()
                    )))
                }
            }
        }
        self.cursor.consume(']')?;
        self.depth -= 1;
        Ok(Value::Array(values))
    }

    fn parse_number(&mut self) -> Result<Value> {
        self.cursor.begin_capture();
        if self.cursor.cur_char_is('-') {
            self.cursor.advance();
        }
        self.parse_digits()?;
        if self.cursor.cur_char_is('.') {
            self.cursor.advance();
            self.parse_digits()?;
        }
        if let Some('e') | Some('E') = self.cursor.current() {
            self.cursor.advance();
            if let Some('+') | Some('-') = self.cursor.current() {
                self.cursor.advance();
            }
            self.parse_digits()?;
        }
        let literal = self.cursor.end_capture();
        self.expect_delimiter(&literal)?;

        // the grammar above only matches spans the decimal parser accepts,
        // except for exponents beyond i64
        literal
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|e| self.cursor.error(format!("internal error: {}", e)))
    }

    fn parse_digits(&mut self) -> Result<()> {
        let is_digit = |c: &Cursor| c.current().map_or(false, |ch| ch.is_ascii_digit());
        if !is_digit(&self.cursor) {
            return Err(self.cursor.error(format!(
                "Expected a digit, got {}",
                self.cursor.describe_current()
            )));
        }
        while is_digit(&self.cursor) {
            self.cursor.advance();
        }
        Ok(())
    }

    fn parse_keyword(&mut self, keyword: &str, value: Value) -> Result<Value> {
        for expected in keyword.chars() {
            if !self.cursor.cur_char_is(expected) {
                return Err(self.cursor.error(format!(
                    "Expected '{}', got {}",
                    keyword,
                    self.cursor.describe_current()
                )));
            }
            self.cursor.advance();
        }
        self.expect_delimiter(keyword)?;
        Ok(value)
    }

    // a scalar may not run straight into an identifier: `truex`, `12ab`
    fn expect_delimiter(&self, token: &str) -> Result<()> {
        if self.cursor.is_alphanumeric() || self.cursor.is_underscore() {
            return Err(self.cursor.error(format!(
                "Expected a delimiter after '{}', got {}",
                token,
                self.cursor.describe_current()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str) -> Value {
        Value::String(String::from(s))
    }

    fn number(s: &str) -> Value {
        Value::Number(s.parse().unwrap())
    }

    fn object(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().collect())
    }

    fn parser(s: &str) -> Parser {
        Parser::new(s)
    }

    fn error_at(e: SyntaxError) -> (usize, usize) {
        (e.line, e.column)
    }

    #[test]
    fn test_parse_string() {
        let test = |input: &str, result: &str| {
            let mut p = parser(input);
            let v = p.parse_value().unwrap();
            assert_eq!(v, string(result));
        };
        test(r#""""#, ""); // ""
        test(r#""   ""#, "   "); // "   "
        test(r#""abc de f""#, "abc de f"); // "abc de f"
        test(r#""abc\nde f""#, "abc\\nde f"); // "abc\nde f"
        test(r#""a\""#, "a\\"); // "a\" stops at the first quote
        test("\"two\nlines\"", "two\nlines");
    }

    #[test]
    fn test_ng_parse_string() {
        let test = |input: &str| {
            let mut p = parser(input);
            assert!(p.parse_value().is_err());
        };
        test(r#""abc de f"#); // "abc de f
        test(r#"""#); // "
    }

    #[test]
    fn test_parse_number() {
        let test = |input: &str| {
            let mut p = parser(input);
            let v = p.parse_value().unwrap();
            assert_eq!(v, number(input));
            assert_eq!(v.as_number().map(Number::as_str), Some(input));
        };
        test("0");
        test("-0");
        test("123");
        test("-123.45");
        test("000123");
        test("1e10");
        test("1.5E-3");
        test("-2e+2");
        test("3.14159265358979323846264338327950288");
    }

    #[test]
    fn test_ng_parse_number() {
        let test = |input: &str, column: usize| {
            let mut p = parser(input);
            let e = p.parse_value().unwrap_err();
            assert_eq!(error_at(e), (1, column), "{}", input);
        };
        test("-", 1);
        test("-.5", 2);
        test(".5", 1);
        test("123.", 4);
        test("1e", 2);
        test("1e+", 3);
        test("123abc", 4);
    }

    #[test]
    fn test_number_out_of_range_is_internal_error() {
        let mut p = parser("1e99999999999999999999");
        let e = p.parse_value().unwrap_err();
        assert!(e.message.starts_with("internal error"), "{}", e.message);
    }

    #[test]
    fn test_parse_keywords() {
        let test = |input: &str, expected: Value| {
            let mut p = parser(input);
            assert_eq!(p.parse_value().unwrap(), expected);
        };
        test("true", Value::TRUE);
        test("false", Value::FALSE);
        test("null", Value::Null);
    }

    #[test]
    fn test_ng_parse_keywords() {
        let test = |input: &str, message: &str, column: usize| {
            let mut p = parser(input);
            let e = p.parse_value().unwrap_err();
            assert_eq!(e.message, message);
            assert_eq!(error_at(e), (1, column));
        };
        test("tru3", "Expected 'true', got '3'", 4);
        test("fals", "Expected 'false', got end of text", 4);
        test("nul", "Expected 'null', got end of text", 3);
        test("nil", "Expected 'null', got 'i'", 2);
        test("truex", "Expected a delimiter after 'true', got 'x'", 5);
        test("True", "Expected a value, got 'T'", 1);
    }

    #[test]
    fn test_parse_empty_object() {
        let test = |input: &str| {
            let mut p = parser(input);
            assert_eq!(p.parse_value().unwrap(), Value::Object(Object::new()));
        };
        test("{}");
        test("{     }");
        test("{\n\n}");
    }

    #[test]
    fn test_parse_object() {
        let expected = object(vec![("a", number("123")), ("bc", string("xyz"))]);
        let test = |input: &str| {
            let mut p = parser(input);
            assert_eq!(p.parse_value().unwrap(), expected);
        };
        test(r#"{a: 123 bc: "xyz"}"#);
        test(r#"{a:123,bc:"xyz"}"#);
        test(r#"{ a: 123,   bc:"xyz",  }"#);
        test("{\n    a: 123\n    bc: \"xyz\"\n}");
        test("{\r\n\ta: 123,\r\n\tbc: \"xyz\"\r\n}");
    }

    #[test]
    fn test_parse_duplicate_keys() {
        let mut p = parser(r#"{a: "1" b: "x" a: "2"}"#);
        let v = p.parse_value().unwrap();
        assert_eq!(v, object(vec![("a", string("2")), ("b", string("x"))]));
    }

    #[test]
    fn test_parse_nested_object() {
        let mut p = parser(r#"{a: {bc: 12345, def: "xyz"}, ijk: 0}"#);
        let v = p.parse_value().unwrap();
        let expected = object(vec![
            (
                "a",
                object(vec![("bc", number("12345")), ("def", string("xyz"))]),
            ),
            ("ijk", number("0")),
        ]);
        assert_eq!(v, expected);
    }

    #[test]
    fn test_ng_parse_object() {
        let test = |input: &str| {
            let mut p = parser(input);
            assert!(p.parse_value().is_err(), "{}", input);
        };
        test(r#"{ , }"#);
        test(r#"{a: 123"#); // {a: 123
        test(r#"{a: 123,"#);
        test(r#"{a  123}"#); // missing colon
        test(r#"{a : 123}"#); // space before colon
        test(r#"{"a": 123}"#); // quoted key
        test(r#"{a: 1,, b: 2}"#);
        test(r#"{a:}"#);
    }

    #[test]
    fn test_parse_array() {
        let mut p = parser(r#"[1, 23, 456, "xyz", true, null]"#);
        let v = p.parse_value().unwrap();
        let expected = Value::Array(vec![
            number("1"),
            number("23"),
            number("456"),
            string("xyz"),
            Value::TRUE,
            Value::Null,
        ]);
        assert_eq!(v, expected);

        let test = |input: &str, len: usize| {
            let mut p = parser(input);
            let v = p.parse_value().unwrap();
            assert_eq!(v.as_array().map(<[Value]>::len), Some(len), "{}", input);
        };
        test("[]", 0);
        test("[    ]", 0);
        test("[\n]", 0);
        test("[ 1 ]", 1);
        test("[1 ,2\n,\n3]", 3);
        test("[1, 1, 1]", 3);
    }

    #[test]
    fn test_parse_nested_array() {
        let mut p = parser(r#"[1, [23, 456], [], {a: [false]}]"#);
        let v = p.parse_value().unwrap();
        let expected = Value::Array(vec![
            number("1"),
            Value::Array(vec![number("23"), number("456")]),
            Value::Array(vec![]),
            object(vec![("a", Value::Array(vec![Value::FALSE]))]),
        ]);
        assert_eq!(v, expected);
    }

    #[test]
    fn test_ng_parse_array() {
        let test = |input: &str| {
            let mut p = parser(input);
            assert!(p.parse_value().is_err(), "{}", input);
        };
        test(r#"[ , ]"#);
        test(r#"["a""#); // ["a"
        test(r#"["a","#); // ["a",
        test(r#"["a",]"#); // trailing comma
        test(r#"["a"  123]"#); // missing comma
        test(r#"[1,,2]"#);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |open: &str, close: &str, depth: usize| {
            format!("{}1{}", open.repeat(depth), close.repeat(depth))
        };
        for &(open, close) in &[("[", "]"), ("{b: ", "}")] {
            let text = format!("a: {}", nested(open, close, MAX_DEPTH));
            assert!(parser(&text).parse().is_ok(), "{}", open);

            let text = format!("a: {}", nested(open, close, MAX_DEPTH + 1));
            let e = parser(&text).parse().unwrap_err();
            assert!(e.message.starts_with("nesting too deep"), "{}", e.message);
            let column = 4 + MAX_DEPTH * open.chars().count();
            assert_eq!(error_at(e), (1, column));
        }

        // siblings do not add up
        let inner = nested("[", "]", MAX_DEPTH - 1);
        let text = format!("a: [{}]\nb: [{}]", vec![inner.clone(); 3].join(", "), inner);
        assert!(parser(&text).parse().is_ok());
    }

    #[test]
    fn test_deep_nesting_fails_without_overflow() {
        let text = format!("a: {}{}", "[".repeat(200_000), "]".repeat(200_000));
        let e = parser(&text).parse().unwrap_err();
        assert_eq!(error_at(e), (1, 4 + MAX_DEPTH));
    }

    #[test]
    fn test_parse_property() {
        let test = |input: &str, expected: &str| {
            let mut p = parser(input);
            assert_eq!(p.parse_property().unwrap(), expected);
        };
        test("a:", "a");
        test("_:", "_");
        test("snake_case_1:", "snake_case_1");
        test("_9:", "_9");
        test("ключ:", "ключ");
    }

    #[test]
    fn test_ng_parse_property() {
        let test = |input: &str, message: &str, column: usize| {
            let mut p = parser(input);
            let e = p.parse_property().unwrap_err();
            assert_eq!(e.message, message, "{}", input);
            assert_eq!(error_at(e), (1, column), "{}", input);
        };
        test(
            "1abc:",
            "Expected a property name starting with a letter or an underscore, got '1'",
            1,
        );
        test(
            "ab-c:",
            "Expected an alphanumeric string, or an underscore, got '-'",
            3,
        );
        test(
            "abc",
            "Expected an alphanumeric string, or an underscore, got end of text",
            3,
        );
        test(
            "abc :",
            "Expected an alphanumeric string, or an underscore, got ' '",
            4,
        );
    }

    #[test]
    fn test_parse_document() {
        let doc = parser(
            r#"
            name: "demo"
            size: 3, enabled: true
            nested: {
                list: [1, "two", null]
            }
            "#,
        )
        .parse()
        .unwrap();
        let expected: Object = vec![
            ("name", string("demo")),
            ("size", number("3")),
            ("enabled", Value::TRUE),
            (
                "nested",
                object(vec![(
                    "list",
                    Value::Array(vec![number("1"), string("two"), Value::Null]),
                )]),
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(doc, expected);

        assert_eq!(parser("").parse().unwrap(), Object::new());
        assert_eq!(parser(" \n\t ").parse().unwrap(), Object::new());
    }

    #[test]
    fn test_ng_parse_document() {
        let test = |input: &str| {
            assert!(parser(input).parse().is_err(), "{}", input);
        };
        test(r#"{a: 1}"#);
        test(r#"[1]"#);
        test(r#""a""#);
        test("42");
        test("a: 1 }");
        test("a: 1 ]");
    }

    #[test]
    fn test_error_line() {
        let test = |input: &str, line: usize, column: usize| {
            let e = parser(input).parse().unwrap_err();
            assert_eq!(error_at(e), (line, column), "{}", input);
        };

        // missing colon
        #[rustfmt::skip]
        test(
r#"a: 123,
bc: 45,
d  6
"#,
            3,
            2,
        );

        // bad property character
        #[rustfmt::skip]
        test(
r#"a: 123
b: 45
c-d: 6"#,
            3,
            2,
        );

        // missing close brace
        #[rustfmt::skip]
        test(
r#"o: {
  a: 123
  b: 45
"#,
            3,
            7,
        );

        // unterminated string
        test("a: 1\nb: \"x\n\n", 2, 5);
    }
}
