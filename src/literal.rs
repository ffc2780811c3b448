use std::hash::{BuildHasherDefault, DefaultHasher};

use chaindict::{Value, key};

use crate::ParseError;

/// Parses exactly one literal, surrounding whitespace allowed
pub fn parse_value(src: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(src);
    let value = parser.value()?;
    if !parser.at_end() {
        return Err(ParseError::TrailingInput { pos: parser.pos });
    }
    Ok(value)
}

/// Parses whitespace separated literals until the input runs out
pub fn parse_values(src: &str) -> Result<Vec<Value>, ParseError> {
    let mut parser = Parser::new(src);
    let mut values = Vec::new();
    while !parser.at_end() {
        values.push(parser.value()?);
    }
    Ok(values)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos == self.src.len()
    }

    fn unexpected(&self, c: char) -> ParseError {
        ParseError::UnexpectedChar {
            ch: c,
            pos: self.pos - c.len_utf8(),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(self.unexpected(c)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Every nested literal costs a frame of parser recursion
    const MAX_DEPTH: usize = 100;

    fn value(&mut self) -> Result<Value, ParseError> {
        if self.depth == Self::MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: Self::MAX_DEPTH,
            });
        }
        self.depth += 1;
        let value = self.literal();
        self.depth -= 1;
        value
    }

    fn literal(&mut self) -> Result<Value, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some(q @ ('\'' | '"')) => {
                self.bump();
                Ok(Value::Str(self.quoted(q, false)?))
            }
            Some('(') => {
                self.bump();
                let (mut items, trailing_comma) = self.seq(')')?;
                // `(x)` only groups, `(x,)` is a tuple
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Value::Tuple(items))
                }
            }
            Some('[') => {
                self.bump();
                Ok(Value::List(self.seq(']')?.0))
            }
            Some('{') => {
                self.bump();
                self.braces()
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.int(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            Some(c) => {
                self.bump();
                Err(self.unexpected(c))
            }
        }
    }

    fn int(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }

        let digits = &self.src[start..self.pos];
        digits
            .parse()
            .map(Value::Int)
            .map_err(|_| ParseError::InvalidInt(digits.into()))
    }

    fn word(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }

        let src = self.src;
        match &src[start..self.pos] {
            "None" => Ok(Value::None),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "set" => {
                self.expect('(')?;
                self.skip_ws();
                self.expect(')')?;
                Ok(Value::Set(Vec::new()))
            }
            "b" if matches!(self.peek(), Some('\'' | '"')) => {
                let q = self.bump().unwrap_or('\'');
                let s = self.quoted(q, true)?;
                // every char is ascii or a \x escape, so it fits a byte
                Ok(Value::Bytes(s.chars().map(|c| c as u8).collect()))
            }
            other => Err(ParseError::UnknownName(other.into())),
        }
    }

    /// Reads up to the closing `quote`, the opening one is already consumed
    fn quoted(&mut self, quote: char, bytes: bool) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or(ParseError::UnterminatedString)?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let escaped = self.bump().ok_or(ParseError::UnterminatedString)?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        '\\' | '\'' | '"' => out.push(escaped),
                        'x' => out.push(char::from(self.hex_byte()?)),
                        other => return Err(self.unexpected(other)),
                    }
                }
                c if bytes && !c.is_ascii() => return Err(self.unexpected(c)),
                c => out.push(c),
            }
        }
    }

    fn hex_byte(&mut self) -> Result<u8, ParseError> {
        let mut byte = 0u8;
        for _ in 0..2 {
            let c = self.bump().ok_or(ParseError::UnterminatedString)?;
            match c.to_digit(16) {
                Some(d) => byte = byte * 16 + d as u8,
                None => return Err(self.unexpected(c)),
            }
        }
        Ok(byte)
    }

    /// Comma separated values up to `close`.
    /// Also reports whether the last value was followed by a comma
    fn seq(&mut self, close: char) -> Result<(Vec<Value>, bool), ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                let trailing_comma = !items.is_empty();
                return Ok((items, trailing_comma));
            }

            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok((items, false)),
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }

    /// A set `{a, b}` or a map `{k: v}`, the `{` is already consumed
    fn braces(&mut self) -> Result<Value, ParseError> {
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Map(Vec::new()));
        }

        let first = self.element()?;
        self.skip_ws();
        if self.peek() == Some(':') {
            self.bump();
            let mut pairs = vec![(first, self.value()?)];
            while let Some(k) = self.next_element()? {
                self.skip_ws();
                self.expect(':')?;
                let v = self.value()?;
                match pairs.iter_mut().find(|(existing, _)| *existing == k) {
                    Some(pair) => pair.1 = v,
                    None => pairs.push((k, v)),
                }
            }
            Ok(Value::Map(pairs))
        } else {
            let mut items = vec![first];
            while let Some(item) = self.next_element()? {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
            Ok(Value::Set(items))
        }
    }

    /// After one element of a set or map: `None` once the closing `}` is read
    fn next_element(&mut self) -> Result<Option<Value>, ParseError> {
        self.skip_ws();
        match self.bump() {
            Some('}') => Ok(None),
            Some(',') => {
                self.skip_ws();
                if self.peek() == Some('}') {
                    self.bump();
                    return Ok(None);
                }
                self.element().map(Some)
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Set members and map keys have to be hashable
    fn element(&mut self) -> Result<Value, ParseError> {
        let value = self.value()?;
        key::validate(&value, &BuildHasherDefault::<DefaultHasher>::default())?;
        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use chaindict::{DictError, Value};

    use super::{parse_value, parse_values};
    use crate::ParseError;

    fn int(i: i64) -> Value {
        Value::Int(i)
    }

    #[test]
    fn scalars() {
        assert_eq!(parse_value("None").unwrap(), Value::None);
        assert_eq!(parse_value(" True ").unwrap(), Value::Bool(true));
        assert_eq!(parse_value("False").unwrap(), Value::Bool(false));
        assert_eq!(parse_value("42").unwrap(), int(42));
        assert_eq!(parse_value("-7").unwrap(), int(-7));
        assert_eq!(parse_value("'a'").unwrap(), Value::from("a"));
        assert_eq!(parse_value("\"it's\"").unwrap(), Value::from("it's"));
        assert_eq!(
            parse_value(r"b'a\x00\n'").unwrap(),
            Value::Bytes(vec![b'a', 0, b'\n'])
        );
    }

    #[test]
    fn containers() {
        assert_eq!(
            parse_value("[1, 2, 3]").unwrap(),
            Value::List(vec![int(1), int(2), int(3)])
        );
        assert_eq!(parse_value("(1)").unwrap(), int(1));
        assert_eq!(parse_value("(1,)").unwrap(), Value::Tuple(vec![int(1)]));
        assert_eq!(parse_value("()").unwrap(), Value::Tuple(vec![]));
        assert_eq!(parse_value("{1}").unwrap(), Value::Set(vec![int(1)]));
        assert_eq!(parse_value("{1, 1, 2,}").unwrap(), Value::Set(vec![int(1), int(2)]));
        assert_eq!(parse_value("set()").unwrap(), Value::Set(vec![]));
        assert_eq!(parse_value("{}").unwrap(), Value::Map(vec![]));
        assert_eq!(
            parse_value("{'a': [1], 'a': 2, (1, 2): None}").unwrap(),
            Value::Map(vec![
                (Value::from("a"), int(2)),
                (Value::Tuple(vec![int(1), int(2)]), Value::None),
            ])
        );
    }

    #[test]
    fn display_parses_back() {
        let v = Value::Tuple(vec![
            Value::List(vec![Value::Set(vec![]), Value::Map(vec![(int(1), int(2))])]),
            Value::from("q'\"\t"),
            Value::Bytes(vec![255, b'\'']),
            Value::None,
        ]);
        assert_eq!(parse_value(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn many() {
        assert_eq!(
            parse_values(" 12 [1, 2, 3] ").unwrap(),
            vec![int(12), Value::List(vec![int(1), int(2), int(3)])]
        );
        assert_eq!(parse_values("").unwrap(), vec![]);
    }

    #[test]
    fn errors() {
        assert_eq!(parse_value(""), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse_value("[1, 2"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse_value("'abc"), Err(ParseError::UnterminatedString));
        assert_eq!(
            parse_value("[1; 2]"),
            Err(ParseError::UnexpectedChar { ch: ';', pos: 2 })
        );
        assert_eq!(parse_value("1 2"), Err(ParseError::TrailingInput { pos: 2 }));
        assert_eq!(
            parse_value("99999999999999999999"),
            Err(ParseError::InvalidInt("99999999999999999999".into()))
        );
        assert_eq!(parse_value("nil"), Err(ParseError::UnknownName("nil".into())));
        assert_eq!(
            parse_value("b'é'"),
            Err(ParseError::UnexpectedChar { ch: 'é', pos: 2 })
        );
    }

    #[test]
    fn nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "[".repeat(depth), "]".repeat(depth));

        let mut v = Value::List(vec![]);
        for _ in 1..100 {
            v = Value::List(vec![v]);
        }
        assert_eq!(parse_value(&nested(100)).unwrap(), v);

        assert_eq!(parse_value(&nested(101)), Err(ParseError::TooDeep { limit: 100 }));
        assert_eq!(
            parse_value(&"(".repeat(200_000)),
            Err(ParseError::TooDeep { limit: 100 })
        );
    }

    #[test]
    fn unhashable_members() {
        assert_eq!(
            parse_value("{[1]}"),
            Err(ParseError::Unhashable(DictError::UnhashableKey { type_name: "list" }))
        );
        assert_eq!(
            parse_value("{(1, {2}): 3}"),
            Err(ParseError::Unhashable(DictError::UnhashableKey { type_name: "set" }))
        );
    }
}
