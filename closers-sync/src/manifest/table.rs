//! Recursive-descent parser for the Lua chunks the manifest decoder prints.
//!
//! The decoder emits plain data assignments such as
//!
//! ```text
//! CODE_TABLE = {
//!   {"DATA/", "a.pak", 3735928559, 1024, 0, 0, "1055", 0, 0, "7"},
//! }
//! DELETE_CODE_TABLE = {}
//! ```
//!
//! Only the data subset of Lua is understood: assignments (global, `local`,
//! dotted and indexed targets), table constructors, string/number/boolean/nil
//! literals, references to previously assigned names, `return` and comments.
//! Anything else (functions, operators) is a parse error.

use std::collections::HashMap;

use thiserror::Error;

/// A Lua data value.
#[derive(Debug, Clone, PartialEq)]
pub enum LuaValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Table(LuaTable),
}

impl LuaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, accepting floats with no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Integer(i) => Some(i),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e18 => Some(n as i64),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&LuaTable> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Textual form of a scalar, as it would appear in a URL.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            other => other.as_integer().map(|i| i.to_string()),
        }
    }

    /// Integral floats become integer keys, as in Lua.
    fn normalize_key(self) -> Self {
        match self.as_integer() {
            Some(i) if matches!(self, Self::Number(_)) => Self::Integer(i),
            _ => self,
        }
    }
}

/// A Lua table split into its sequence part and its keyed part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LuaTable {
    /// Values at keys `1..=n`.
    pub array: Vec<LuaValue>,
    /// Every other key, in insertion order.
    pub fields: Vec<(LuaValue, LuaValue)>,
}

impl LuaTable {
    /// Look up a string-keyed field.
    pub fn field(&self, name: &str) -> Option<&LuaValue> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_str() == Some(name))
            .map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &LuaValue) -> Option<&mut LuaValue> {
        if let LuaValue::Integer(i) = key {
            if *i >= 1 && (*i as usize) <= self.array.len() {
                return self.array.get_mut(*i as usize - 1);
            }
        }
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn set(&mut self, key: LuaValue, value: LuaValue) {
        let key = key.normalize_key();
        if let LuaValue::Integer(i) = key {
            if i >= 1 && i as usize == self.array.len() + 1 {
                self.array.push(value);
                return;
            }
        }
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }
}

/// A parse failure with the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Names bound by a parsed chunk, with their final values.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    bindings: HashMap<String, LuaValue>,
}

impl Chunk {
    pub fn get(&self, name: &str) -> Option<&LuaValue> {
        self.bindings.get(name)
    }
}

/// Parse a whole chunk of assignments.
pub fn parse_chunk(src: &str) -> Result<Chunk, ParseError> {
    let mut parser = Parser::new(src);
    parser.chunk()?;
    Ok(Chunk {
        bindings: parser.env,
    })
}

/// Parse a single expression, e.g. a bare table constructor.
pub fn parse_value(src: &str) -> Result<LuaValue, ParseError> {
    let mut parser = Parser::new(src);
    let value = parser.expression()?;
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

enum Target {
    Name(String),
    Index(String, Vec<LuaValue>),
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    env: HashMap<String, LuaValue>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            env: HashMap::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn eat(&mut self, expected: u8) -> Result<bool, ParseError> {
        self.skip_trivia()?;
        if self.peek() == Some(expected) {
            self.bump();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        if self.eat(expected)? {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", expected as char)))
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    if self.long_bracket_level().is_some() {
                        self.long_bracket()?;
                    } else {
                        while let Some(b) = self.peek() {
                            if b == b'\n' {
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn chunk(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Ok(()),
                Some(b';') => {
                    self.bump();
                }
                Some(_) => self.statement()?,
            }
        }
    }

    fn statement(&mut self) -> Result<(), ParseError> {
        let word = self
            .name()
            .ok_or_else(|| self.error("expected a statement"))?;

        match word.as_str() {
            "local" => {
                let mut names = vec![self.required_name()?];
                while self.eat(b',')? {
                    names.push(self.required_name()?);
                }
                let values = if self.eat(b'=')? {
                    self.expression_list()?
                } else {
                    Vec::new()
                };
                for (i, name) in names.into_iter().enumerate() {
                    let value = values.get(i).cloned().unwrap_or(LuaValue::Nil);
                    self.env.insert(name, value);
                }
                Ok(())
            }
            "return" => {
                self.skip_trivia()?;
                if !matches!(self.peek(), None | Some(b';')) {
                    self.expression()?;
                }
                Ok(())
            }
            _ => {
                let mut targets = vec![self.target(word)?];
                while self.eat(b',')? {
                    let name = self.required_name()?;
                    targets.push(self.target(name)?);
                }
                self.expect(b'=')?;
                let values = self.expression_list()?;
                for (i, target) in targets.into_iter().enumerate() {
                    let value = values.get(i).cloned().unwrap_or(LuaValue::Nil);
                    self.assign(target, value)?;
                }
                Ok(())
            }
        }
    }

    fn target(&mut self, root: String) -> Result<Target, ParseError> {
        let keys = self.index_suffix()?;
        if keys.is_empty() {
            Ok(Target::Name(root))
        } else {
            Ok(Target::Index(root, keys))
        }
    }

    /// Parses any `.name` / `[expr]` suffixes following a name.
    fn index_suffix(&mut self) -> Result<Vec<LuaValue>, ParseError> {
        let mut keys = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b'.') if self.peek_at(1) != Some(b'.') => {
                    self.bump();
                    keys.push(LuaValue::String(self.required_name()?));
                }
                Some(b'[') if !matches!(self.peek_at(1), Some(b'[') | Some(b'=')) => {
                    self.bump();
                    keys.push(self.expression()?);
                    self.expect(b']')?;
                }
                _ => return Ok(keys),
            }
        }
    }

    fn assign(&mut self, target: Target, value: LuaValue) -> Result<(), ParseError> {
        match target {
            Target::Name(name) => {
                self.env.insert(name, value);
                Ok(())
            }
            Target::Index(root, keys) => {
                let line = self.line;
                let fail = |message: String| ParseError { line, message };

                let mut current = match self.env.get_mut(&root) {
                    Some(LuaValue::Table(table)) => table,
                    _ => return Err(fail(format!("'{}' is not a table", root))),
                };
                let (last, path) = keys.split_last().ok_or_else(|| fail("empty index".into()))?;
                for key in path {
                    current = match current.get_mut(key) {
                        Some(LuaValue::Table(table)) => table,
                        _ => return Err(fail(format!("cannot index into '{}'", root))),
                    };
                }
                current.set(last.clone(), value);
                Ok(())
            }
        }
    }

    fn expression_list(&mut self) -> Result<Vec<LuaValue>, ParseError> {
        let mut values = vec![self.expression()?];
        while self.eat(b',')? {
            values.push(self.expression()?);
        }
        Ok(values)
    }

    fn expression(&mut self) -> Result<LuaValue, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'{') => self.table().map(LuaValue::Table),
            Some(q @ (b'"' | b'\'')) => self.quoted_string(q).map(LuaValue::String),
            Some(b'[') if matches!(self.peek_at(1), Some(b'[') | Some(b'=')) => {
                self.long_bracket().map(LuaValue::String)
            }
            Some(b'-') => {
                self.bump();
                self.skip_trivia()?;
                match self.peek() {
                    Some(b) if b.is_ascii_digit() || b == b'.' => self.number(true),
                    _ => Err(self.error("expected a number after '-'")),
                }
            }
            Some(b) if b.is_ascii_digit() => self.number(false),
            Some(b'.') if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.number(false)
            }
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                let name = self.required_name()?;
                match name.as_str() {
                    "true" => Ok(LuaValue::Boolean(true)),
                    "false" => Ok(LuaValue::Boolean(false)),
                    "nil" => Ok(LuaValue::Nil),
                    _ => self.variable(name),
                }
            }
            Some(b) => Err(self.error(format!("unexpected character '{}'", b as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Value of a previously assigned name, with optional indexing.
    fn variable(&mut self, name: String) -> Result<LuaValue, ParseError> {
        let keys = self.index_suffix()?;
        let mut value = self.env.get(&name).cloned().unwrap_or(LuaValue::Nil);
        for key in keys {
            let key = key.normalize_key();
            value = match value {
                LuaValue::Table(mut table) => table
                    .get_mut(&key)
                    .map(|slot| std::mem::replace(slot, LuaValue::Nil))
                    .unwrap_or(LuaValue::Nil),
                _ => return Err(self.error(format!("cannot index non-table '{}'", name))),
            };
        }
        Ok(value)
    }

    fn table(&mut self) -> Result<LuaTable, ParseError> {
        self.expect(b'{')?;
        let mut table = LuaTable::default();

        loop {
            if self.eat(b'}')? {
                return Ok(table);
            }

            match self.peek() {
                Some(b'[') if !matches!(self.peek_at(1), Some(b'[') | Some(b'=')) => {
                    self.bump();
                    let key = self.expression()?;
                    self.expect(b']')?;
                    self.expect(b'=')?;
                    let value = self.expression()?;
                    if key == LuaValue::Nil {
                        return Err(self.error("table index is nil"));
                    }
                    table.set(key, value);
                }
                _ => {
                    if let Some(name) = self.field_name() {
                        let value = self.expression()?;
                        table.set(LuaValue::String(name), value);
                    } else {
                        let value = self.expression()?;
                        table.array.push(value);
                    }
                }
            }

            if !(self.eat(b',')? || self.eat(b';')?) {
                self.expect(b'}')?;
                return Ok(table);
            }
        }
    }

    /// Consumes `name =` if that is what follows, leaving input untouched
    /// otherwise.
    fn field_name(&mut self) -> Option<String> {
        let (pos, line) = (self.pos, self.line);
        if let Some(name) = self.name() {
            if self.skip_trivia().is_ok()
                && self.peek() == Some(b'=')
                && self.peek_at(1) != Some(b'=')
            {
                self.bump();
                return Some(name);
            }
        }
        self.pos = pos;
        self.line = line;
        None
    }

    fn name(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
            _ => return None,
        }
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        Some(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn required_name(&mut self) -> Result<String, ParseError> {
        self.skip_trivia()?;
        self.name().ok_or_else(|| self.error("expected a name"))
    }

    fn number(&mut self, negative: bool) -> Result<LuaValue, ParseError> {
        let start = self.pos;

        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if digits_start == self.pos {
                return Err(self.error("malformed hex number"));
            }
            // Lua wraps hex literals that overflow.
            let value = self.src[digits_start..self.pos].iter().fold(0u64, |acc, b| {
                acc.wrapping_mul(16)
                    .wrapping_add((*b as char).to_digit(16).unwrap_or(0) as u64)
            });
            let value = value as i64;
            return Ok(LuaValue::Integer(if negative {
                value.wrapping_neg()
            } else {
                value
            }));
        }

        let mut is_float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' => {
                    is_float = true;
                    self.pos += 1;
                }
                b'e' | b'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }

        let digits = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error("malformed number"))?;
        let text = if negative {
            format!("-{}", digits)
        } else {
            digits.to_string()
        };
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(LuaValue::Integer(i));
            }
        }
        text.parse::<f64>()
            .map(LuaValue::Number)
            .map_err(|_| self.error(format!("malformed number '{}'", text)))
    }

    fn quoted_string(&mut self, quote: u8) -> Result<String, ParseError> {
        self.bump();
        let mut bytes = Vec::new();

        loop {
            match self.bump() {
                None | Some(b'\n') => return Err(self.error("unterminated string")),
                Some(b) if b == quote => break,
                Some(b'\\') => self.escape(&mut bytes)?,
                Some(b) => bytes.push(b),
            }
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let b = self
            .bump()
            .ok_or_else(|| self.error("unterminated string"))?;
        match b {
            b'n' | b'\n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'\\' | b'"' | b'\'' => out.push(b),
            b'z' => {
                while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
                    self.bump();
                }
            }
            b'x' => {
                let hex = self.src.get(self.pos..self.pos + 2).unwrap_or_default();
                let value = std::str::from_utf8(hex)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| self.error("invalid \\x escape"))?;
                self.pos += 2;
                out.push(value);
            }
            b'u' => {
                if self.bump() != Some(b'{') {
                    return Err(self.error("invalid \\u escape"));
                }
                let start = self.pos;
                while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
                let code = std::str::from_utf8(&self.src[start..self.pos])
                    .ok()
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .and_then(char::from_u32);
                match (code, self.bump()) {
                    (Some(c), Some(b'}')) => {
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                    _ => return Err(self.error("invalid \\u escape")),
                }
            }
            b'0'..=b'9' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'9') => {
                            value = value * 10 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(value).map_err(|_| self.error("decimal escape too large"))?;
                out.push(byte);
            }
            other => {
                return Err(self.error(format!("invalid escape '\\{}'", other as char)));
            }
        }
        Ok(())
    }

    /// Level of a long bracket opening at the cursor (`[[` is 0, `[=[` is 1).
    fn long_bracket_level(&self) -> Option<usize> {
        if self.peek() != Some(b'[') {
            return None;
        }
        let mut level = 0;
        while self.peek_at(1 + level) == Some(b'=') {
            level += 1;
        }
        (self.peek_at(1 + level) == Some(b'[')).then_some(level)
    }

    fn long_bracket(&mut self) -> Result<String, ParseError> {
        let level = self
            .long_bracket_level()
            .ok_or_else(|| self.error("invalid long bracket"))?;
        self.pos += level + 2;
        // A newline directly after the opening bracket is not part of the text.
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek() == Some(b'\n') {
            self.bump();
        }

        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated long bracket")),
                Some(b']')
                    if (1..=level).all(|i| self.peek_at(i) == Some(b'='))
                        && self.peek_at(level + 1) == Some(b']') =>
                {
                    let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                    self.pos += level + 2;
                    return Ok(text);
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_nested_table() {
        let value = parse_value(r#"{ {"DATA/", "a.pak", 1}, {"b", 2.5, true, nil} }"#).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.array.len(), 2);

        let first = table.array[0].as_table().unwrap();
        assert_eq!(first.array[0].as_str(), Some("DATA/"));
        assert_eq!(first.array[2], LuaValue::Integer(1));

        let second = table.array[1].as_table().unwrap();
        assert_eq!(second.array[1], LuaValue::Number(2.5));
        assert_eq!(second.array[2], LuaValue::Boolean(true));
        assert_eq!(second.array[3], LuaValue::Nil);
    }

    #[test]
    fn test_parse_keyed_fields() {
        let value = parse_value(r#"{ name = "x", ["key"] = 1, [3] = "c"; 10 }"#).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.field("name"), Some(&LuaValue::String("x".into())));
        assert_eq!(table.field("key"), Some(&LuaValue::Integer(1)));
        assert_eq!(table.array, vec![LuaValue::Integer(10)]);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_value("-42").unwrap(), LuaValue::Integer(-42));
        assert_eq!(parse_value("0xDEADBEEF").unwrap(), LuaValue::Integer(0xDEAD_BEEF));
        assert_eq!(parse_value("1e3").unwrap(), LuaValue::Number(1000.0));
        assert_eq!(parse_value(".5").unwrap(), LuaValue::Number(0.5));
        assert_eq!(parse_value("3735928559").unwrap().as_integer(), Some(3_735_928_559));
    }

    #[test]
    fn test_parse_string_escapes() {
        assert_eq!(
            parse_value(r#""a\\b\"c\65\x41\u{48}""#).unwrap(),
            LuaValue::String("a\\b\"cAAH".into())
        );
        assert_eq!(
            parse_value("'it''s'").unwrap_err().message,
            "unexpected trailing input"
        );
        assert_eq!(
            parse_value("[==[\nraw ]] text]==]").unwrap(),
            LuaValue::String("raw ]] text".into())
        );
    }

    #[test]
    fn test_chunk_with_comments_and_two_tables() {
        let src = r#"
-- Decompiled using luadec
--[[ block
     comment ]]
CODE_TABLE = {
  {"DATA/", "a.pak", 1, 0, 0, 0, "1055", 0, 0, "7"}, -- trailing
}
DELETE_CODE_TABLE = { "OLD/x.pak" }
"#;
        let chunk = parse_chunk(src).unwrap();
        let code = chunk.get("CODE_TABLE").unwrap().as_table().unwrap();
        assert_eq!(code.array.len(), 1);
        let deleted = chunk.get("DELETE_CODE_TABLE").unwrap().as_table().unwrap();
        assert_eq!(deleted.array[0].as_str(), Some("OLD/x.pak"));
    }

    #[test]
    fn test_chunk_with_locals_and_indexed_assignment() {
        let src = r#"
local L0_1, L1_1
L0_1 = {}
L0_1[1] = {"DATA/", "a.pak"}
L0_1[2] = {"DATA/", "b.pak"}
L0_1[1][2] = "c.pak"
CODE_TABLE = L0_1
return
"#;
        let chunk = parse_chunk(src).unwrap();
        let code = chunk.get("CODE_TABLE").unwrap().as_table().unwrap();
        assert_eq!(code.array.len(), 2);
        assert_eq!(
            code.array[0].as_table().unwrap().array[1].as_str(),
            Some("c.pak")
        );
        assert_eq!(chunk.get("L1_1"), Some(&LuaValue::Nil));
    }

    #[test]
    fn test_errors_report_line() {
        let err = parse_chunk("A = {}\nB = {1, 2\nC = 3").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse_chunk("function f() end").unwrap_err();
        assert!(err.message.contains("expected '='"));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(parse_value("\"abc").is_err());
        assert!(parse_value("\"abc\ndef\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_integer_rows_parse_back(rows in proptest::collection::vec(
            proptest::collection::vec(any::<i64>(), 0..12), 0..20)
        ) {
            let text = format!(
                "{{{}}}",
                rows.iter()
                    .map(|row| format!("{{{}}}", row.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")))
                    .collect::<Vec<_>>()
                    .join(",\n")
            );
            let value = parse_value(&text).unwrap();
            let table = value.as_table().unwrap();
            prop_assert_eq!(table.array.len(), rows.len());
            for (parsed, row) in table.array.iter().zip(&rows) {
                let parsed: Vec<i64> = parsed
                    .as_table()
                    .unwrap()
                    .array
                    .iter()
                    .map(|v| v.as_integer().unwrap())
                    .collect();
                prop_assert_eq!(&parsed, row);
            }
        }
    }
}
