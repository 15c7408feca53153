use thiserror::Error;

const FRAGMENT_RADIUS: usize = 20;

#[derive(Debug, Error)]
#[error("malformed tag array at {line}:{column} ({message}) near `{fragment}`")]
pub struct TagParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub fragment: String,
}

/// Decodes a Python-style list literal such as `['corn_stover', 'ethanol']`.
///
/// Blank input is an empty list. Anything else goes through
/// [`normalize_quotes`] and then strict JSON decoding.
pub fn parse_tag_array(raw: &str) -> Result<Vec<String>, TagParseError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let normalized = normalize_quotes(raw);
    serde_json::from_str::<Vec<String>>(&normalized).map_err(|error| {
        let line = error.line();
        let column = error.column();
        TagParseError {
            line,
            column,
            message: error.to_string(),
            fragment: fragment_around(&normalized, line, column),
        }
    })
}

/// Rewrites single-quoted strings to double-quoted JSON strings.
///
/// `\'` becomes a literal quote, a bare `"` inside a single-quoted string is
/// escaped, and `\xNN` escapes become `\u00NN`.
pub fn normalize_quotes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    let mut chars = raw.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some('x') => {
                    let hex = take_hex_pair(&mut chars);
                    match hex {
                        Some(hex) => {
                            out.push_str("\\u00");
                            out.push_str(&hex);
                        }
                        None => out.push_str("\\\\x"),
                    }
                }
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push_str("\\\\"),
            },
            '\'' if !in_double => {
                in_single = !in_single;
                out.push('"');
            }
            '"' if in_single => out.push_str("\\\""),
            '"' => {
                in_double = !in_double;
                out.push('"');
            }
            _ => out.push(ch),
        }
    }

    out
}

fn take_hex_pair(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut lookahead = chars.clone();
    let first = lookahead.next().filter(char::is_ascii_hexdigit)?;
    let second = lookahead.next().filter(char::is_ascii_hexdigit)?;
    chars.next();
    chars.next();
    Some([first, second].iter().collect())
}

pub(super) fn fragment_around(text: &str, line: usize, column: usize) -> String {
    let Some(line_text) = text.lines().nth(line.saturating_sub(1)) else {
        return String::new();
    };

    let chars = line_text.chars().collect::<Vec<_>>();
    let center = column.saturating_sub(1).min(chars.len());
    let start = center.saturating_sub(FRAGMENT_RADIUS);
    let end = (center + FRAGMENT_RADIUS).min(chars.len());
    chars[start..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_python_style_list() {
        let tags = parse_tag_array("['corn_stover', 'switchgrass']").unwrap();
        assert_eq!(tags, vec!["corn_stover", "switchgrass"]);
    }

    #[test]
    fn plain_identifiers_survive_normalization() {
        let names = ["ethanol", "corn_stover", "Protein2", "a_b_c_9"];
        let raw = format!(
            "[{}]",
            names
                .iter()
                .map(|name| format!("'{name}'"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        assert_eq!(parse_tag_array(&raw).unwrap(), names);
    }

    #[test]
    fn already_valid_json_is_untouched() {
        let tags = parse_tag_array(r#"["lignin", "xylose"]"#).unwrap();
        assert_eq!(tags, vec!["lignin", "xylose"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(parse_tag_array("   ").unwrap().is_empty());
        assert!(parse_tag_array("[]").unwrap().is_empty());
    }

    #[test]
    fn escaped_quote_and_embedded_double_quote() {
        let tags = parse_tag_array(r#"['farmer\'s "best" crop']"#).unwrap();
        assert_eq!(tags, vec![r#"farmer's "best" crop"#]);
    }

    #[test]
    fn hex_control_escape_becomes_unicode() {
        let tags = parse_tag_array(r"['a\x08b']").unwrap();
        assert_eq!(tags, vec!["a\u{8}b"]);
    }

    #[test]
    fn malformed_input_reports_fragment() {
        let error = parse_tag_array("['ethanol', 'protein'").unwrap_err();
        assert_eq!(error.line, 1);
        assert!(error.fragment.contains("protein"));
    }

    #[test]
    fn non_string_entries_are_rejected() {
        assert!(parse_tag_array("['a', 3]").is_err());
    }
}
