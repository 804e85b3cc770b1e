//! Template tokenization
//!
//! A template is scanned once, left to right, into an ordered token
//! sequence. Tokens only live for the duration of compilation plus
//! reverse URL generation; matching itself runs against the compiled
//! expression.

use crate::error::{PatternError, Result};
use crate::params::ParamName;

/// One unit of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Literal text run, regex-escaped on assembly
    Text(String),
    /// `\X` escape carrying the literal character
    Escaped(char),
    /// The delimiter character (`/` for paths, `.` for hosts)
    Delimiter,
    /// `+` or `?` attached to the preceding unit
    Modifier(char),
    /// `*`, an anonymous match-anything capture
    Wildcard { index: usize },
    /// `:name`
    Param { name: String },
    /// `:name(regex)` — a named parameter with a constraint
    ParamRegex { name: String, pattern: String },
    /// `(regex)` — an anonymous capture
    Regex { index: usize, pattern: String },
}

impl Token {
    /// Whether this token contributes a capture group that the
    /// delimiter-absorption rules apply to.
    pub(crate) fn is_capture(&self) -> bool {
        matches!(
            self,
            Token::Param { .. } | Token::ParamRegex { .. } | Token::Regex { .. }
        )
    }

    /// Parameter name of a capturing token, wildcards included.
    pub(crate) fn capture_name(&self) -> Option<ParamName> {
        match self {
            Token::Param { name } | Token::ParamRegex { name, .. } => {
                Some(ParamName::Named(name.clone()))
            }
            Token::Regex { index, .. } | Token::Wildcard { index } => {
                Some(ParamName::Index(*index))
            }
            _ => None,
        }
    }
}

/// Scan a template into tokens. Anonymous captures (wildcards and bare
/// regex groups) are numbered left to right with a shared counter.
pub(crate) fn scan(template: &str, delimiter: char) -> Result<Vec<Token>> {
    let chars: Vec<char> = template.chars().collect();
    let mut tokens = Vec::new();
    let mut anon = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            // A trailing lone backslash stays literal
            let escaped = chars.get(i + 1).copied().unwrap_or('\\');
            tokens.push(Token::Escaped(escaped));
            i += 2;
            continue;
        }

        if c == '*' {
            tokens.push(Token::Wildcard { index: anon });
            anon += 1;
            i += 1;
            continue;
        }

        if c == '+' || c == '?' {
            tokens.push(Token::Modifier(c));
            i += 1;
            continue;
        }

        if c == delimiter {
            tokens.push(Token::Delimiter);
            i += 1;
            continue;
        }

        if c == ':' {
            let mut j = i + 1;
            let mut name = String::new();
            while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
                name.push(chars[j]);
                j += 1;
            }
            if name.is_empty() {
                return Err(PatternError::MissingParamName(i));
            }
            tokens.push(Token::Param { name });
            i = j;
            continue;
        }

        if c == '(' {
            let mut depth = 1u32;
            let mut pattern = String::new();
            let mut j = i + 1;

            if chars.get(j) == Some(&'?') {
                if chars.get(j + 1) == Some(&':') {
                    return Err(PatternError::NonCapturingGroup(j));
                }
                return Err(PatternError::GroupStart(j));
            }

            while j < chars.len() {
                if chars[j] == '\\' {
                    pattern.push(chars[j]);
                    if let Some(&next) = chars.get(j + 1) {
                        pattern.push(next);
                    }
                    j += 2;
                    continue;
                }
                if chars[j] == ')' {
                    depth -= 1;
                    if depth == 0 {
                        j += 1;
                        break;
                    }
                } else if chars[j] == '(' {
                    depth += 1;
                    // Nested groups must be non-capturing
                    if chars.get(j + 1) != Some(&'?') {
                        return Err(PatternError::CapturingGroup(j));
                    }
                }
                pattern.push(chars[j]);
                j += 1;
            }

            if depth != 0 {
                return Err(PatternError::UnbalancedGroup(i));
            }
            if pattern.is_empty() {
                return Err(PatternError::EmptyGroup(i));
            }

            // A fragment directly after `:name` becomes that
            // parameter's constraint
            if let Some(Token::Param { name }) = tokens.last() {
                let name = name.clone();
                tokens.pop();
                tokens.push(Token::ParamRegex { name, pattern });
            } else {
                tokens.push(Token::Regex {
                    index: anon,
                    pattern,
                });
                anon += 1;
            }
            i = j;
            continue;
        }

        // Literal run up to the next special character
        let mut text = String::new();
        let mut j = i;
        while j < chars.len() {
            match chars[j] {
                '\\' | '*' | '+' | '?' | ':' | '(' => break,
                c if c == delimiter => break,
                c => {
                    text.push(c);
                    j += 1;
                }
            }
        }
        tokens.push(Token::Text(text));
        i = j;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_params_and_literals() {
        let tokens = scan("/user/:name/dashboard", '/').unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Delimiter,
                Token::Text("user".to_string()),
                Token::Delimiter,
                Token::Param {
                    name: "name".to_string()
                },
                Token::Delimiter,
                Token::Text("dashboard".to_string()),
            ]
        );
    }

    #[test]
    fn test_scan_param_constraint() {
        let tokens = scan("/blog/:id(\\d+)", '/').unwrap();
        assert_eq!(
            tokens[3],
            Token::ParamRegex {
                name: "id".to_string(),
                pattern: "\\d+".to_string()
            }
        );
    }

    #[test]
    fn test_scan_anonymous_captures_share_counter() {
        let tokens = scan("/a/*/b/([0-9]+)/*", '/').unwrap();
        let indices: Vec<usize> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Wildcard { index } | Token::Regex { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_scan_host_delimiter() {
        let tokens = scan(":name.localhost", '.').unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Param {
                    name: "name".to_string()
                },
                Token::Delimiter,
                Token::Text("localhost".to_string()),
            ]
        );
    }

    #[test]
    fn test_scan_escapes() {
        let tokens = scan("\\:literal\\", '/').unwrap();
        assert_eq!(tokens[0], Token::Escaped(':'));
        // Trailing lone backslash stays literal
        assert_eq!(tokens.last(), Some(&Token::Escaped('\\')));
    }

    #[test]
    fn test_scan_missing_param_name() {
        assert!(matches!(
            scan("/user/:", '/'),
            Err(PatternError::MissingParamName(6))
        ));
    }

    #[test]
    fn test_scan_rejects_non_capturing_group() {
        assert!(matches!(
            scan("/x/(?:abc)", '/'),
            Err(PatternError::NonCapturingGroup(_))
        ));
        assert!(matches!(
            scan("/x/(?=abc)", '/'),
            Err(PatternError::GroupStart(_))
        ));
    }

    #[test]
    fn test_scan_rejects_nested_capturing_group() {
        assert!(matches!(
            scan("/x/(a(b)c)", '/'),
            Err(PatternError::CapturingGroup(_))
        ));
        // Non-capturing nesting is allowed
        assert!(scan("/x/(a(?:b)c)", '/').is_ok());
    }

    #[test]
    fn test_scan_unterminated_and_empty_groups() {
        assert!(matches!(
            scan("/x/(abc", '/'),
            Err(PatternError::UnbalancedGroup(_))
        ));
        assert!(matches!(scan("/x/()", '/'), Err(PatternError::EmptyGroup(_))));
    }
}
