//! Recursive-descent parser for the canonical text format.
//!
//! Accepts exactly the writer's output, plus two declaration conveniences:
//! named row objects `{'col':v,...}` and deferred reference literals
//! `Ref('table','column',value)` inside row declarations.

use chrono::{DateTime, Utc};
use tabula_core::schema::{ColumnSpec, Field, Ref, RowSpec, TableSpec};
use tabula_core::{DataType, Error, RegexpValue, Result, Value};

/// Parses a single value in canonical form, requiring full consumption.
pub fn parse_value(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    parser.expect_end()?;
    Ok(value)
}

/// Parses one table declaration block.
pub fn parse_table_spec(input: &str) -> Result<TableSpec> {
    let mut parser = Parser::new(input);
    let spec = parser.parse_table_spec()?;
    parser.expect_end()?;
    Ok(spec)
}

/// Parses a database block into (name, table declaration) pairs in
/// declaration order.
pub fn parse_database_spec(input: &str) -> Result<Vec<(String, TableSpec)>> {
    let mut parser = Parser::new(input);
    let tables = parser.parse_database_spec()?;
    parser.expect_end()?;
    Ok(tables)
}

/// Parser state.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(Error::syntax(
                format!("expected '{}', found '{}'", expected, c),
                self.pos,
            )),
            None => Err(Error::syntax(
                format!("expected '{}', found end of input", expected),
                self.pos,
            )),
        }
    }

    /// Consumes `word` if it is next, without skipping into it.
    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(Error::syntax("trailing input after value", self.pos));
        }
        Ok(())
    }

    fn parse_string_literal(&mut self) -> Result<String> {
        self.expect('\'')?;
        let mut out = String::new();
        loop {
            match self.peek() {
                Some('\'') => {
                    self.advance();
                    return Ok(out);
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(c) => {
                            out.push(c);
                            self.advance();
                        }
                        None => {
                            return Err(Error::syntax("unterminated escape", self.pos));
                        }
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
                None => return Err(Error::syntax("unterminated string", self.pos)),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Value::Number)
            .map_err(|_| Error::syntax(format!("malformed number '{}'", text), start))
    }

    fn parse_date(&mut self) -> Result<Value> {
        // 'Date' keyword already consumed.
        self.expect('(')?;
        let start = self.pos;
        let text = self.parse_string_literal()?;
        self.expect(')')?;
        let parsed = DateTime::parse_from_rfc3339(&text)
            .map_err(|e| Error::syntax(format!("bad date '{}': {}", text, e), start))?;
        Ok(Value::Date(parsed.with_timezone(&Utc)))
    }

    fn parse_regexp(&mut self) -> Result<Value> {
        self.expect('/')?;
        let start = self.pos;
        let mut pattern = String::new();
        loop {
            match self.peek() {
                Some('/') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        // The delimiter and the backslash itself unescape;
                        // any other pair stays a literal backslash pair for
                        // the pattern engine.
                        Some(c @ ('/' | '\\')) => {
                            pattern.push(c);
                            self.advance();
                        }
                        Some(c) => {
                            pattern.push('\\');
                            pattern.push(c);
                            self.advance();
                        }
                        None => {
                            return Err(Error::syntax("unterminated regexp", self.pos));
                        }
                    }
                }
                Some(c) => {
                    pattern.push(c);
                    self.advance();
                }
                None => return Err(Error::syntax("unterminated regexp", self.pos)),
            }
        }
        let compiled = RegexpValue::new(&pattern)
            .map_err(|e| Error::syntax(format!("bad pattern '{}': {}", pattern, e), start))?;
        Ok(Value::Regexp(compiled))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.advance();
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                _ => break,
            }
        }
        self.expect(']')?;
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut fields = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.advance();
            return Ok(Value::Object(fields));
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string_literal()?;
            self.expect(':')?;
            let value = self.parse_value()?;
            fields.push((key, value));
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                _ => break,
            }
        }
        self.expect('}')?;
        Ok(Value::Object(fields))
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        if self.eat_keyword("null") {
            return Ok(Value::Null);
        }
        if self.eat_keyword("true") {
            return Ok(Value::Boolean(true));
        }
        if self.eat_keyword("false") {
            return Ok(Value::Boolean(false));
        }
        if self.eat_keyword("Date") {
            return self.parse_date();
        }
        if self.eat_keyword("NaN") {
            return Ok(Value::Number(f64::NAN));
        }
        if self.eat_keyword("Infinity") {
            return Ok(Value::Number(f64::INFINITY));
        }
        if self.eat_keyword("-Infinity") {
            return Ok(Value::Number(f64::NEG_INFINITY));
        }
        match self.peek() {
            Some('\'') => Ok(Value::String(self.parse_string_literal()?)),
            Some('/') => self.parse_regexp(),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(Error::syntax(
                format!("unexpected character '{}'", c),
                self.pos,
            )),
            None => Err(Error::syntax("unexpected end of input", self.pos)),
        }
    }

    /// A row cell: a plain value or `Ref('table','column',value)`.
    fn parse_field(&mut self) -> Result<Field> {
        self.skip_whitespace();
        if self.peek() == Some('R') && self.eat_keyword("Ref") {
            self.expect('(')?;
            self.skip_whitespace();
            let table = self.parse_string_literal()?;
            self.expect(',')?;
            self.skip_whitespace();
            let column = self.parse_string_literal()?;
            self.expect(',')?;
            let value = self.parse_value()?;
            self.expect(')')?;
            return Ok(Field::Ref(Ref::new(table, column, value)));
        }
        Ok(Field::Value(self.parse_value()?))
    }

    fn parse_row(&mut self) -> Result<RowSpec> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => {
                self.advance();
                let mut fields = Vec::new();
                self.skip_whitespace();
                if self.peek() == Some(']') {
                    self.advance();
                    return Ok(RowSpec::Tuple(fields));
                }
                loop {
                    fields.push(self.parse_field()?);
                    self.skip_whitespace();
                    match self.peek() {
                        Some(',') => self.advance(),
                        _ => break,
                    }
                }
                self.expect(']')?;
                Ok(RowSpec::Tuple(fields))
            }
            Some('{') => {
                self.advance();
                let mut fields = Vec::new();
                self.skip_whitespace();
                if self.peek() == Some('}') {
                    self.advance();
                    return Ok(RowSpec::Named(fields));
                }
                loop {
                    self.skip_whitespace();
                    let key = self.parse_string_literal()?;
                    self.expect(':')?;
                    fields.push((key, self.parse_field()?));
                    self.skip_whitespace();
                    match self.peek() {
                        Some(',') => self.advance(),
                        _ => break,
                    }
                }
                self.expect('}')?;
                Ok(RowSpec::Named(fields))
            }
            _ => Err(Error::syntax("expected a row declaration", self.pos)),
        }
    }

    fn parse_column_spec(&mut self) -> Result<ColumnSpec> {
        let at = self.pos;
        self.expect('{')?;
        let mut name: Option<String> = None;
        let mut data_type: Option<DataType> = None;
        let mut foreign_key: Option<String> = None;
        let mut primary_key = false;
        let mut generator: Option<Value> = None;

        self.skip_whitespace();
        if self.peek() != Some('}') {
            loop {
                self.skip_whitespace();
                let key_at = self.pos;
                let key = self.parse_string_literal()?;
                self.expect(':')?;
                match key.as_str() {
                    "name" => {
                        self.skip_whitespace();
                        name = Some(self.parse_string_literal()?);
                    }
                    "type" => {
                        self.skip_whitespace();
                        let tag_at = self.pos;
                        let tag = self.parse_string_literal()?;
                        data_type = Some(DataType::parse(&tag).ok_or_else(|| {
                            Error::syntax(format!("unknown type tag '{}'", tag), tag_at)
                        })?);
                    }
                    "fk" => {
                        self.skip_whitespace();
                        foreign_key = Some(self.parse_string_literal()?);
                    }
                    "pk" => {
                        primary_key = self.parse_value()?.as_bool().ok_or_else(|| {
                            Error::syntax("'pk' expects a boolean", key_at)
                        })?;
                    }
                    "generator" => {
                        generator = Some(self.parse_value()?);
                    }
                    _ => {
                        return Err(Error::syntax(
                            format!("unknown column key '{}'", key),
                            key_at,
                        ));
                    }
                }
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.advance(),
                    _ => break,
                }
            }
        }
        self.expect('}')?;

        let name = name.ok_or_else(|| Error::syntax("column declaration without a name", at))?;
        let mut spec = match (data_type, foreign_key) {
            (Some(_), Some(_)) => {
                return Err(Error::syntax(
                    format!("column '{}' declares both 'type' and 'fk'", name),
                    at,
                ));
            }
            (Some(data_type), None) => ColumnSpec::typed(name, data_type),
            (None, Some(table)) => ColumnSpec::foreign_key(name, table),
            (None, None) => {
                return Err(Error::syntax(
                    format!("column '{}' declares neither 'type' nor 'fk'", name),
                    at,
                ));
            }
        };
        if primary_key {
            spec = spec.primary_key();
        }
        if let Some(value) = generator {
            spec = spec.generator(value);
        }
        Ok(spec)
    }

    fn parse_table_spec(&mut self) -> Result<TableSpec> {
        self.expect('{')?;
        let mut columns = Vec::new();
        let mut rows = Vec::new();

        self.skip_whitespace();
        if self.peek() != Some('}') {
            loop {
                self.skip_whitespace();
                let key_at = self.pos;
                let key = self.parse_string_literal()?;
                self.expect(':')?;
                match key.as_str() {
                    "columns" => {
                        self.expect('[')?;
                        self.skip_whitespace();
                        if self.peek() != Some(']') {
                            loop {
                                self.skip_whitespace();
                                columns.push(self.parse_column_spec()?);
                                self.skip_whitespace();
                                match self.peek() {
                                    Some(',') => self.advance(),
                                    _ => break,
                                }
                            }
                        }
                        self.expect(']')?;
                    }
                    "rows" => {
                        self.expect('[')?;
                        self.skip_whitespace();
                        if self.peek() != Some(']') {
                            loop {
                                rows.push(self.parse_row()?);
                                self.skip_whitespace();
                                match self.peek() {
                                    Some(',') => self.advance(),
                                    _ => break,
                                }
                            }
                        }
                        self.expect(']')?;
                    }
                    _ => {
                        return Err(Error::syntax(
                            format!("unknown table key '{}'", key),
                            key_at,
                        ));
                    }
                }
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.advance(),
                    _ => break,
                }
            }
        }
        self.expect('}')?;

        let mut spec = TableSpec::new(columns);
        spec.rows = rows;
        Ok(spec)
    }

    fn parse_database_spec(&mut self) -> Result<Vec<(String, TableSpec)>> {
        self.expect('{')?;
        let mut tables = Vec::new();
        self.skip_whitespace();
        if self.peek() != Some('}') {
            loop {
                self.skip_whitespace();
                let name = self.parse_string_literal()?;
                self.expect(':')?;
                self.skip_whitespace();
                let spec = self.parse_table_spec()?;
                tables.push((name, spec));
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.advance(),
                    _ => break,
                }
            }
        }
        self.expect('}')?;
        Ok(tables)
    }
}
