//! Pattern compilation and matching
//!
//! A template like `/blog/:id(\d+)` or `:name.:ext?.localhost` compiles
//! into a [`Matcher`]: a regex with one capture group per parameter, an
//! ordered parameter list, and a reverse generator that turns a value
//! map back into a literal string.
//!
//! Compilation is pure and deterministic; compiling the same template
//! twice yields matchers with identical parameter lists and match
//! behavior. A matcher is built once at registration time and never
//! regenerated.

use regex_lite::Regex;

use crate::error::{PatternError, Result};
use crate::params::{ParamName, ParamSpec, Params};
use crate::template::{scan, Token};

/// How the assembled expression is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Whole-string match (`^/?<body>/?$`) — ordinary path routes
    #[default]
    Exact,
    /// Prefix match — middleware routes; matches when the request path
    /// starts with the pattern followed by `/` or end-of-string
    Prefix,
    /// Host match (`^<body>$`), tolerating a trailing `:port`
    Host,
}

/// Options for [`Matcher::compile`].
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Match case-sensitively. Off by default.
    pub case_sensitive: bool,
    /// Segment delimiter: `/` for paths, `.` for hosts.
    pub delimiter: char,
    /// Anchoring mode.
    pub anchor: Anchor,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            delimiter: crate::PATH_DELIMITER,
            anchor: Anchor::Exact,
        }
    }
}

/// Options for [`Matcher::generate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Match the generated string against the pattern's own expression
    /// and fail if it does not match. Catches values that are not
    /// representable, such as a parameter value containing the
    /// delimiter.
    pub validate: bool,
}

/// A compiled route template.
///
/// Invariant: the expression has exactly `params().len()` capture
/// groups, in parameter order; that is what maps captures back to
/// names positionally.
#[derive(Debug, Clone)]
pub struct Matcher {
    source: String,
    regex: Regex,
    params: Vec<ParamSpec>,
    tokens: Vec<Token>,
    delimiter: char,
}

impl Matcher {
    /// Compile a template.
    pub fn compile(template: &str, options: &CompileOptions) -> Result<Self> {
        let tokens = scan(template, options.delimiter)?;
        let path_mode = options.anchor != Anchor::Host;
        let (body, params) = assemble(&tokens, options.delimiter, path_mode);

        let wrapped = match options.anchor {
            Anchor::Exact => {
                if body.is_empty() {
                    "^/?$".to_string()
                } else {
                    format!("^/?{}/?$", body)
                }
            }
            // regex-lite has no lookahead; `(?:/.*)?$` accepts the same
            // language as the `(?=/|$)` prefix anchor
            Anchor::Prefix => {
                if body.is_empty() {
                    "^/?(?:/.*)?$".to_string()
                } else {
                    format!("^/?{}/?(?:/.*)?$", body)
                }
            }
            Anchor::Host => {
                if body.is_empty() {
                    String::new()
                } else {
                    format!("^{}(?:\\:\\d+)?$", body)
                }
            }
        };

        let expression = if options.case_sensitive {
            wrapped
        } else {
            format!("(?i){}", wrapped)
        };

        let regex =
            Regex::new(&expression).map_err(|source| PatternError::InvalidExpression {
                template: template.to_string(),
                source,
            })?;
        debug_assert_eq!(regex.captures_len(), params.len() + 1);

        Ok(Self {
            source: template.to_string(),
            regex,
            params,
            tokens,
            delimiter: options.delimiter,
        })
    }

    /// Compile a path template with exact (whole-path) semantics.
    pub fn path(template: &str, case_sensitive: bool) -> Result<Self> {
        Self::compile(
            template,
            &CompileOptions {
                case_sensitive,
                delimiter: crate::PATH_DELIMITER,
                anchor: Anchor::Exact,
            },
        )
    }

    /// Compile a path template with prefix (middleware) semantics.
    pub fn prefix(template: &str, case_sensitive: bool) -> Result<Self> {
        Self::compile(
            template,
            &CompileOptions {
                case_sensitive,
                delimiter: crate::PATH_DELIMITER,
                anchor: Anchor::Prefix,
            },
        )
    }

    /// Compile a host template.
    pub fn host(template: &str, case_sensitive: bool) -> Result<Self> {
        Self::compile(
            template,
            &CompileOptions {
                case_sensitive,
                delimiter: crate::HOST_DELIMITER,
                anchor: Anchor::Host,
            },
        )
    }

    /// The template this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled expression.
    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }

    /// Ordered parameter descriptors, one per capture group.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Test an input without extracting parameters.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Match an input and extract parameters. Optional parameters that
    /// did not participate in the match are absent from the result,
    /// never present with a placeholder value.
    pub fn matches(&self, input: &str) -> Option<Params> {
        let caps = self.regex.captures(input)?;
        let mut params = Params::new();
        for (i, spec) in self.params.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.push(spec.name.clone(), m.as_str().to_string());
            }
        }
        Some(params)
    }

    /// Reverse generation: substitute parameter values back into the
    /// template, producing a literal string.
    ///
    /// Absent optional parameters are dropped together with their
    /// absorbed delimiter; an absent required parameter is an error
    /// naming the parameter.
    pub fn generate(&self, values: &Params, options: GenerateOptions) -> Result<String> {
        let mut out = String::new();
        let tokens = &self.tokens;
        let mut i = 0usize;

        while i < tokens.len() {
            match &tokens[i] {
                Token::Delimiter => {
                    // A delimiter absorbed by a following optional
                    // capture disappears with it when the value is
                    // absent
                    if let Some(next) = tokens.get(i + 1) {
                        if next.is_capture()
                            && matches!(tokens.get(i + 2), Some(Token::Modifier('?')))
                            && matches!(tokens.get(i + 3), None | Some(Token::Delimiter))
                            && self.lookup(values, next).is_none()
                        {
                            i += 3;
                            continue;
                        }
                    }
                    out.push(self.delimiter);
                    i += 1;
                }
                token if token.capture_name().is_some() => {
                    match self.lookup(values, token) {
                        Some(value) => {
                            out.push_str(value);
                            i += 1;
                        }
                        None => {
                            let optional =
                                matches!(tokens.get(i + 1), Some(Token::Modifier('?')));
                            if !optional {
                                let name = token
                                    .capture_name()
                                    .map(|n| n.to_string())
                                    .unwrap_or_default();
                                return Err(PatternError::MissingParam(name));
                            }
                            // Drop the capture and its modifier; a
                            // leading capture also takes its absorbed
                            // trailing delimiter along
                            if i == 0 && matches!(tokens.get(i + 2), Some(Token::Delimiter)) {
                                i += 3;
                            } else {
                                i += 2;
                            }
                        }
                    }
                }
                // Quantifiers are regex artifacts, never literal output
                Token::Modifier(_) => i += 1,
                Token::Escaped(c) => {
                    out.push(*c);
                    i += 1;
                }
                Token::Text(text) => {
                    out.push_str(text);
                    i += 1;
                }
                Token::Wildcard { .. } | Token::Param { .. } | Token::ParamRegex { .. }
                | Token::Regex { .. } => unreachable!("capture tokens handled above"),
            }
        }

        if options.validate && !self.regex.is_match(&out) {
            return Err(PatternError::Unrepresentable(out));
        }
        Ok(out)
    }

    fn lookup<'v>(&self, values: &'v Params, token: &Token) -> Option<&'v str> {
        match token.capture_name()? {
            ParamName::Named(name) => values.get(&name),
            ParamName::Index(index) => values.get_index(index),
        }
    }
}

/// Assemble tokens into a regex body plus the ordered parameter list.
fn assemble(tokens: &[Token], delimiter: char, path_mode: bool) -> (String, Vec<ParamSpec>) {
    let escaped_delim = format!("\\{}", delimiter);
    let mut body = String::new();
    let mut params = Vec::new();
    let mut i = 0usize;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Delimiter => {
                // Absorbed into the following optional capture's group;
                // the capture emits `(?:<delim><frag>)?` on its turn
                let absorbed = tokens.get(i + 1).is_some_and(Token::is_capture)
                    && matches!(tokens.get(i + 2), Some(Token::Modifier('?')))
                    && matches!(tokens.get(i + 3), None | Some(Token::Delimiter));
                if absorbed {
                    i += 1;
                    continue;
                }
                // Path bodies are wrapped `^/?…/?$`; edge delimiters are
                // already covered by the wrapper
                if path_mode && (i == 0 || i == tokens.len() - 1) {
                    i += 1;
                    continue;
                }
                body.push_str(&escaped_delim);
                i += 1;
            }
            token if token.is_capture() => {
                let name = token.capture_name().expect("capture token has a name");
                let fragment = match token {
                    Token::Param { .. } => format!("([^{}]+?)", escaped_delim),
                    Token::ParamRegex { pattern, .. } | Token::Regex { pattern, .. } => {
                        format!("({})", pattern)
                    }
                    _ => unreachable!(),
                };
                let optional = matches!(tokens.get(i + 1), Some(Token::Modifier('?')));
                let mut spec = ParamSpec {
                    name,
                    fragment,
                    optional,
                };

                if optional {
                    let prev_delim = i > 0 && matches!(tokens[i - 1], Token::Delimiter);
                    if prev_delim
                        && matches!(tokens.get(i + 2), None | Some(Token::Delimiter))
                    {
                        // `<delim>:param?` at a segment boundary: absorb
                        // the preceding delimiter into one optional group
                        spec.fragment =
                            format!("(?:{}{})?", escaped_delim, spec.fragment);
                        i += 2;
                    } else if i == 0 && matches!(tokens.get(2), Some(Token::Delimiter)) {
                        // `:param?<delim>` at the leading edge: absorb
                        // the trailing delimiter instead
                        spec.fragment =
                            format!("(?:{}{})?", spec.fragment, escaped_delim);
                        i += 3;
                    } else {
                        // Mid-segment optional: the `?` modifier token
                        // lands right after the group as a quantifier
                        i += 1;
                    }
                } else {
                    i += 1;
                }

                body.push_str(&spec.fragment);
                params.push(spec);
            }
            Token::Wildcard { index } => {
                let spec = ParamSpec {
                    name: ParamName::Index(*index),
                    fragment: "(.*)".to_string(),
                    optional: false,
                };
                body.push_str(&spec.fragment);
                params.push(spec);
                i += 1;
            }
            Token::Modifier(c) => {
                body.push(*c);
                i += 1;
            }
            Token::Escaped(c) => {
                push_escaped(&mut body, *c);
                i += 1;
            }
            Token::Text(text) => {
                for c in text.chars() {
                    push_escaped(&mut body, c);
                }
                i += 1;
            }
            Token::Param { .. } | Token::ParamRegex { .. } | Token::Regex { .. } => {
                unreachable!("capture tokens handled above")
            }
        }
    }

    (body, params)
}

/// Append a literal character, escaped for the regex dialect.
fn push_escaped(out: &mut String, c: char) {
    if matches!(
        c,
        '.' | '+' | '*' | '?' | '=' | '^' | '!' | ':' | '$' | '{' | '}' | '(' | ')' | '[' | ']'
            | '|' | '/' | '\\'
    ) {
        out.push('\\');
    }
    out.push(c);
}
