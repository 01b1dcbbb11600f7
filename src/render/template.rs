//! Named-placeholder templates.
//!
//! Two placeholder syntaxes are supported:
//!
//! - [`TemplateSyntax::Dollar`] (default): `${name}`. Braces are ordinary text,
//!   so embedded CSS and JS need no escaping. `$$` is a literal `$`, so `$${`
//!   writes a literal `${` and `$$${total}` a `$` followed by the value.
//! - [`TemplateSyntax::Brace`]: `{name}`, with `{{` and `}}` standing for
//!   literal braces. Kept for templates written against the older format.
//!
//! Templates are parsed once into segments; rendering only concatenates.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::render::RenderError;

/// Placeholder syntax used by a template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSyntax {
    /// `${name}` placeholders
    #[default]
    Dollar,
    /// `{name}` placeholders with doubled literal braces
    Brace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source in the given syntax.
    pub fn parse(source: &str, syntax: TemplateSyntax) -> Result<Self, RenderError> {
        let segments = match syntax {
            TemplateSyntax::Dollar => parse_dollar(source)?,
            TemplateSyntax::Brace => parse_brace(source)?,
        };
        Ok(Self { segments })
    }

    /// Read and parse a template file.
    pub fn load(path: &Path, syntax: TemplateSyntax) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RenderError::TemplateNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                RenderError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&source, syntax)
    }

    /// Placeholder names in order of appearance (with repeats).
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fail on the first placeholder not in `known`.
    pub fn validate(&self, known: &[&str]) -> Result<(), RenderError> {
        match self.placeholders().find(|name| !known.contains(name)) {
            Some(name) => Err(RenderError::UnknownPlaceholder {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Substitute every placeholder from `values`.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, RenderError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values.get(name.as_str()).ok_or_else(|| {
                        RenderError::UnknownPlaceholder { name: name.clone() }
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn push_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn check_name(name: &str, offset: usize) -> Result<(), RenderError> {
    if name.is_empty() {
        return Err(RenderError::syntax(offset, "empty placeholder name"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RenderError::syntax(
            offset,
            format!("invalid placeholder name '{}'", name),
        ));
    }
    Ok(())
}

fn parse_dollar(source: &str) -> Result<Vec<Segment>, RenderError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            literal.push('$');
            rest = tail;
            offset += pos + 2;
        } else if let Some(body) = after.strip_prefix('{') {
            let end = body
                .find('}')
                .ok_or_else(|| RenderError::syntax(offset + pos, "unterminated placeholder"))?;
            let name = body[..end].trim();
            check_name(name, offset + pos)?;

            push_literal(&mut segments, &mut literal);
            segments.push(Segment::Placeholder(name.to_string()));

            rest = &body[end + 1..];
            offset += pos + 2 + end + 1;
        } else {
            // lone `$` is ordinary text
            literal.push('$');
            rest = after;
            offset += pos + 1;
        }
    }

    literal.push_str(rest);
    push_literal(&mut segments, &mut literal);
    Ok(segments)
}

fn parse_brace(source: &str) -> Result<Vec<Segment>, RenderError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let start = i + 1;
                let mut end = None;
                for (j, d) in chars.by_ref() {
                    match d {
                        '}' => {
                            end = Some(j);
                            break;
                        }
                        '{' => return Err(RenderError::syntax(j, "unexpected '{' in field name")),
                        _ => {}
                    }
                }
                let end = end
                    .ok_or_else(|| RenderError::syntax(i, "expected '}' before end of template"))?;
                let name = &source[start..end];
                check_name(name, i)?;

                push_literal(&mut segments, &mut literal);
                segments.push(Segment::Placeholder(name.to_string()));
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(RenderError::syntax(i, "single '}' encountered")),
            _ => literal.push(c),
        }
    }

    push_literal(&mut segments, &mut literal);
    Ok(segments)
}
