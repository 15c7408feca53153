use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::tags::fragment_around;

#[derive(Debug, Error)]
#[error("malformed metadata at {line}:{column}: {message} (near `{context}`)")]
pub struct MetadataParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub context: String,
}

/// Parses the embedded metadata blob, which is usually a Python `repr` of a
/// dict rather than JSON.
///
/// Accepts JSON plus single-quoted strings, bare keys, trailing commas,
/// comments, `True`/`False`/`None` and `\x` escapes.
pub fn parse_metadata_blob(raw: &str) -> Result<Value, MetadataParseError> {
    let mut parser = Parser::new(raw);
    let value = parser
        .parse_value()
        .and_then(|value| {
            parser.skip_trivia()?;
            if parser.peek().is_some() {
                return Err(parser.error("trailing characters after value"));
            }
            Ok(value)
        })
        .map_err(|failure| MetadataParseError {
            line: failure.line,
            column: failure.column,
            context: fragment_around(raw, failure.line, failure.column),
            message: failure.message,
        })?;
    Ok(value)
}

struct Failure {
    line: usize,
    column: usize,
    message: String,
}

type Step<T> = Result<T, Failure>;

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    const MAX_DEPTH: usize = 128;

    fn new(raw: &'a str) -> Self {
        Self {
            chars: raw.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> Failure {
        Failure {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) -> Step<()> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.next() {
                        Some('/') => {
                            while let Some(ch) = self.bump() {
                                if ch == '\n' {
                                    break;
                                }
                            }
                        }
                        Some('*') => {
                            self.bump();
                            self.bump();
                            let mut previous = '\0';
                            loop {
                                let Some(ch) = self.bump() else {
                                    return Err(self.error("unterminated block comment"));
                                };
                                if previous == '*' && ch == '/' {
                                    break;
                                }
                                previous = ch;
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> Step<Value> {
        self.parse_nested(0)
    }

    fn parse_nested(&mut self, depth: usize) -> Step<Value> {
        if depth > Self::MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }

        self.skip_trivia()?;
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.parse_string(quote).map(Value::String)
            }
            Some(ch) if ch == '-' || ch == '+' || ch == '.' || ch.is_ascii_digit() => {
                self.parse_number()
            }
            Some(ch) if is_identifier_start(ch) => {
                let word = self.parse_identifier();
                match word.as_str() {
                    "true" | "True" => Ok(Value::Bool(true)),
                    "false" | "False" => Ok(Value::Bool(false)),
                    "null" | "None" | "NaN" | "Infinity" => Ok(Value::Null),
                    _ => Err(self.error(format!("unexpected word `{word}`"))),
                }
            }
            Some(ch) => Err(self.error(format!("unexpected character `{ch}`"))),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Step<Value> {
        self.bump();
        let mut map = Map::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                None => return Err(self.error("unterminated object")),
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_trivia()?;
            if self.bump() != Some(':') {
                return Err(self.error(format!("expected `:` after key `{key}`")));
            }
            let value = self.parse_nested(depth + 1)?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.error("expected `,` or `}` in object")),
            }
        }
    }

    fn parse_key(&mut self) -> Step<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.parse_string(quote)
            }
            Some(ch) if is_identifier_start(ch) || ch.is_ascii_digit() => {
                Ok(self.parse_identifier())
            }
            Some(ch) => Err(self.error(format!("unexpected character `{ch}` in key"))),
            None => Err(self.error("unterminated object")),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Step<Value> {
        self.bump();
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                None => return Err(self.error("unterminated array")),
                _ => {}
            }

            items.push(self.parse_nested(depth + 1)?);

            self.skip_trivia()?;
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                _ => return Err(self.error("expected `,` or `]` in array")),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Step<String> {
        let mut out = String::new();

        loop {
            let Some(ch) = self.bump() else {
                return Err(self.error("unterminated string"));
            };

            if ch == quote {
                return Ok(out);
            }

            if ch != '\\' {
                out.push(ch);
                continue;
            }

            let Some(escaped) = self.bump() else {
                return Err(self.error("unterminated escape"));
            };
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                '0' => out.push('\0'),
                'x' => out.push(self.parse_hex_escape(2)?),
                'u' => out.push(self.parse_hex_escape(4)?),
                '\n' => {}
                other => out.push(other),
            }
        }
    }

    fn parse_hex_escape(&mut self, digits: usize) -> Step<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = (code << 4) | digit;
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn parse_number(&mut self) -> Step<Value> {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '+' | '.') {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }

        let unsigned = text.trim_start_matches(['+', '-']);
        if unsigned == "Infinity" || unsigned == "NaN" {
            return Ok(Value::Null);
        }

        let normalized = text.strip_prefix('+').unwrap_or(&text);
        if let Ok(int) = normalized.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        normalized
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(format!("invalid number `{text}`")))
    }

    fn parse_identifier(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                word.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        word
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_python_repr_dict() {
        let raw = "{'title': 'Ethanol from stover', 'process_flow': [{'type': 'fermentation.saccharification', \
                   'parameters': [], 'output': None, 'enabled': True}]}";
        let value = parse_metadata_blob(raw).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Ethanol from stover",
                "process_flow": [{
                    "type": "fermentation.saccharification",
                    "parameters": [],
                    "output": null,
                    "enabled": true
                }]
            })
        );
    }

    #[test]
    fn accepts_bare_keys_comments_and_trailing_commas() {
        let raw = "{\n  // generated\n  id: 'p1',\n  /* weight */ count: +3,\n  ratio: .5,\n}";
        let value = parse_metadata_blob(raw).unwrap();
        assert_eq!(value, json!({"id": "p1", "count": 3, "ratio": 0.5}));
    }

    #[test]
    fn strings_keep_mixed_quotes_and_control_characters() {
        let raw = "{'note': \"it's\tfine\", 'esc': 'a\\x41\\'b'}";
        let value = parse_metadata_blob(raw).unwrap();
        assert_eq!(value["note"], "it's\tfine");
        assert_eq!(value["esc"], "aA'b");
    }

    #[test]
    fn reports_line_and_column() {
        let raw = "{\n  'title': 'x',\n  'flow': [1, 2 3]\n}";
        let error = parse_metadata_blob(raw).unwrap_err();
        assert_eq!(error.line, 3);
        assert!(error.column > 10);
        assert!(error.context.contains("'flow'"));
    }

    #[test]
    fn rejects_unterminated_input() {
        assert!(parse_metadata_blob("{'title': 'x'").is_err());
        assert!(parse_metadata_blob("").is_err());
        assert!(parse_metadata_blob("{'a': 1} extra").is_err());
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let value = parse_metadata_blob("[NaN, -Infinity, 1e3]").unwrap();
        assert_eq!(value, json!([null, null, 1000.0]));
    }
}
