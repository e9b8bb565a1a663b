//! RISON codec.
//!
//! RISON is a compact, URL-friendly encoding of JSON values. Job params are
//! submitted in this form, e.g.
//! `(layout:(id:preserve_layout),objectType:dashboard,relativeUrls:!('/app/x'))`.
//!
//! Grammar summary:
//! - objects `(key:value,...)`, arrays `!(value,...)`
//! - literals `!t`, `!f`, `!n`
//! - numbers with optional `-`, fraction and exponent (`1.5e-3`)
//! - quoted strings `'...'` where `!!` is `!` and `!'` is `'`
//! - bare identifiers for strings made only of id characters

use serde_json::{Map, Number, Value};

/// Characters that may never appear in a bare identifier.
const NOT_ID_CHARS: &str = " '!:(),*@$";

/// Characters that may not start a bare identifier.
const NOT_ID_START: &str = "-0123456789";

/// Deepest allowed nesting of objects and arrays.
pub const MAX_DEPTH: usize = 128;

/// Decoding failure with the character offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at position {position})")]
pub struct RisonError {
    pub position: usize,
    pub message: String,
}

/// Decode a RISON string into a JSON value.
///
/// The whole input must be consumed; trailing characters are an error.
pub fn decode(input: &str) -> Result<Value, RisonError> {
    let mut parser = Parser::new(input);
    let value = parser.read_value()?;
    if parser.index < parser.chars.len() {
        return Err(parser.error(format!(
            "unable to parse string as rison: '{}'",
            input
        )));
    }
    Ok(value)
}

/// Decode a RISON string that must hold an object.
pub fn decode_object(input: &str) -> Result<Map<String, Value>, RisonError> {
    match decode(input)? {
        Value::Object(map) => Ok(map),
        other => Err(RisonError {
            position: 0,
            message: format!("expected an object, found {}", type_name(&other)),
        }),
    }
}

/// Encode a JSON value as RISON. Object keys are emitted in sorted order.
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_id_char(c: char) -> bool {
    !NOT_ID_CHARS.contains(c)
}

fn is_id_start(c: char) -> bool {
    is_id_char(c) && !NOT_ID_START.contains(c)
}

/// True when `s` can be written without quotes.
fn is_bare_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_id_start(first) => chars.all(is_id_char),
        _ => false,
    }
}

struct Parser {
    chars: Vec<char>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
            depth: 0,
        }
    }

    /// Runs `read` one nesting level deeper, failing past `MAX_DEPTH`.
    fn nested(
        &mut self,
        read: fn(&mut Self) -> Result<Value, RisonError>,
    ) -> Result<Value, RisonError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {}", MAX_DEPTH)));
        }
        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    fn error(&self, message: impl Into<String>) -> RisonError {
        RisonError {
            position: self.index,
            message: message.into(),
        }
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn read_value(&mut self) -> Result<Value, RisonError> {
        let c = match self.next() {
            Some(c) => c,
            None => return Err(self.error("empty expression")),
        };

        match c {
            '!' => self.read_bang(),
            '(' => self.nested(Self::read_object),
            '\'' => self.read_string().map(Value::String),
            '-' | '0'..='9' => self.read_number(),
            c if is_id_start(c) => Ok(Value::String(self.read_id())),
            c => {
                self.index -= 1;
                Err(self.error(format!("invalid character: '{}'", c)))
            }
        }
    }

    fn read_bang(&mut self) -> Result<Value, RisonError> {
        match self.next() {
            Some('t') => Ok(Value::Bool(true)),
            Some('f') => Ok(Value::Bool(false)),
            Some('n') => Ok(Value::Null),
            Some('(') => self.nested(Self::read_array),
            Some(c) => Err(self.error(format!("unknown literal: \"!{}\"", c))),
            None => Err(self.error("\"!\" at end of input")),
        }
    }

    fn read_object(&mut self) -> Result<Value, RisonError> {
        let mut map = Map::new();
        loop {
            let c = match self.next() {
                Some(')') => break,
                Some(c) => c,
                None => return Err(self.error("unmatched '('")),
            };
            if !map.is_empty() {
                if c != ',' {
                    return Err(self.error("missing ','"));
                }
            } else if c == ',' {
                return Err(self.error("extra ','"));
            } else {
                self.index -= 1;
            }

            let key = match self.read_value()? {
                Value::String(key) => key,
                _ => return Err(self.error("object keys must be strings")),
            };
            if self.next() != Some(':') {
                return Err(self.error("missing ':'"));
            }
            let value = self.read_value()?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn read_array(&mut self) -> Result<Value, RisonError> {
        let mut items = Vec::new();
        loop {
            let c = match self.next() {
                Some(')') => break,
                Some(c) => c,
                None => return Err(self.error("unmatched '!('")),
            };
            if !items.is_empty() {
                if c != ',' {
                    return Err(self.error("missing ','"));
                }
            } else if c == ',' {
                return Err(self.error("extra ','"));
            } else {
                self.index -= 1;
            }
            items.push(self.read_value()?);
        }
        Ok(Value::Array(items))
    }

    fn read_string(&mut self) -> Result<String, RisonError> {
        let mut out = String::new();
        loop {
            match self.next() {
                Some('\'') => return Ok(out),
                Some('!') => match self.next() {
                    Some(c @ ('!' | '\'')) => out.push(c),
                    Some(c) => {
                        return Err(self.error(format!("invalid string escape: \"!{}\"", c)));
                    }
                    None => return Err(self.error("\"!\" at end of input")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unmatched \"'\"")),
            }
        }
    }

    /// Called with the first character already consumed.
    fn read_id(&mut self) -> String {
        let start = self.index - 1;
        while matches!(self.peek(), Some(c) if is_id_char(c)) {
            self.index += 1;
        }
        self.chars[start..self.index].iter().collect()
    }

    /// Called with the first character (`-` or a digit) already consumed.
    fn read_number(&mut self) -> Result<Value, RisonError> {
        enum State {
            Int,
            Frac,
            Exp,
        }

        let start = self.index - 1;
        let mut state = State::Int;
        // The leading '-' has been consumed; only an exponent may carry another sign.
        let mut sign_allowed = false;
        let mut is_float = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                sign_allowed = false;
                self.index += 1;
                continue;
            }
            match (c, &state) {
                ('-', _) if sign_allowed => sign_allowed = false,
                ('.', State::Int) => {
                    state = State::Frac;
                    is_float = true;
                }
                ('e' | 'E', State::Int | State::Frac) => {
                    state = State::Exp;
                    is_float = true;
                    sign_allowed = true;
                }
                _ => break,
            }
            self.index += 1;
        }

        let text: String = self.chars[start..self.index].iter().collect();
        if text == "-" {
            return Err(self.error("invalid number"));
        }

        if !is_float && let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(format!("invalid number: '{}'", text)))
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("!n"),
        Value::Bool(true) => out.push_str("!t"),
        Value::Bool(false) => out.push_str("!f"),
        // '+' is not URL safe, and RISON exponents never carry it.
        Value::Number(n) => out.push_str(&n.to_string().replace('+', "")),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push_str("!(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(')');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('(');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, &map[key]);
            }
            out.push(')');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    if is_bare_id(s) {
        out.push_str(s);
        return;
    }
    out.push('\'');
    for c in s.chars() {
        if c == '!' || c == '\'' {
            out.push('!');
        }
        out.push(c);
    }
    out.push('\'');
}
