/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! A hand-written scanner over the two delimiter families: `{{ expr }}` for
//! interpolation and `{% tag %}` for block structure. Everything outside a
//! delimiter pair is literal text. The language is small enough that a
//! recursive-descent pass over the raw text beats carrying a grammar crate.

use crate::ast::{Expr, Literal, Node};
use crate::error::{TemplateError, TemplateResult};

/// A compiled template ready for evaluation.
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) nodes: Vec<Node>,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] for unbalanced delimiters, unknown
    /// tags, or malformed expressions.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        let mut parser = Parser {
            source,
            pos: 0,
        };
        let (nodes, _) = parser.parse_nodes(&[])?;
        Ok(Template { nodes })
    }

    /// The AST nodes of this template.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// A block tag split into keyword and argument text: `if cond` has
/// keyword `if` and arg `cond`.
struct Tag {
    keyword: String,
    arg: String,
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Parse nodes until end of input or until a tag whose keyword is in
    /// `terminators` (returned without being consumed into the node list).
    fn parse_nodes(&mut self, terminators: &[&str]) -> TemplateResult<(Vec<Node>, Option<Tag>)> {
        let mut nodes = Vec::new();
        loop {
            let rest = self.rest();
            let next_output = rest.find("{{");
            let next_tag = rest.find("{%");

            let (offset, is_output) = match (next_output, next_tag) {
                (None, None) => {
                    if !rest.is_empty() {
                        nodes.push(Node::Text(rest.to_string()));
                        self.pos = self.source.len();
                    }
                    return Ok((nodes, None));
                }
                (Some(o), None) => (o, true),
                (None, Some(t)) => (t, false),
                (Some(o), Some(t)) => {
                    if o < t {
                        (o, true)
                    } else {
                        (t, false)
                    }
                }
            };

            if offset > 0 {
                nodes.push(Node::Text(rest[..offset].to_string()));
                self.pos += offset;
            }

            if is_output {
                nodes.push(self.parse_output()?);
                continue;
            }

            let tag = self.read_tag()?;
            if terminators.contains(&tag.keyword.as_str()) {
                return Ok((nodes, Some(tag)));
            }
            match tag.keyword.as_str() {
                "if" => nodes.push(self.parse_if(&tag.arg)?),
                "for" => nodes.push(self.parse_for(&tag.arg)?),
                "elif" | "else" | "endif" | "endfor" => {
                    return Err(TemplateError::parse(format!(
                        "Unexpected tag '{}'",
                        tag.keyword
                    )));
                }
                other => {
                    return Err(TemplateError::parse(format!("Unknown tag '{other}'")));
                }
            }
        }
    }

    /// Like [`parse_nodes`], but end of input is an error: a block opened
    /// by `if`/`for` must be closed.
    fn parse_block(&mut self, terminators: &[&str]) -> TemplateResult<(Vec<Node>, Tag)> {
        let (nodes, tag) = self.parse_nodes(terminators)?;
        match tag {
            Some(tag) => Ok((nodes, tag)),
            None => Err(TemplateError::parse(format!(
                "Unexpected end of template: expected one of {}",
                terminators
                    .iter()
                    .map(|t| format!("'{{% {t} %}}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// At a `{{`: consume through `}}` and parse the interpolated expression.
    fn parse_output(&mut self) -> TemplateResult<Node> {
        let rest = self.rest();
        let close = rest
            .find("}}")
            .ok_or_else(|| TemplateError::parse("Unclosed '{{'"))?;
        let inner = &rest[2..close];
        self.pos += close + 2;
        Ok(Node::Output(parse_expr_str(inner)?))
    }

    /// At a `{%`: consume through `%}` and split the tag into keyword and
    /// argument text.
    fn read_tag(&mut self) -> TemplateResult<Tag> {
        let rest = self.rest();
        let close = rest
            .find("%}")
            .ok_or_else(|| TemplateError::parse("Unclosed '{%'"))?;
        let inner = rest[2..close].trim();
        self.pos += close + 2;

        let mut words = inner.splitn(2, char::is_whitespace);
        let keyword = words.next().unwrap_or_default().to_string();
        if keyword.is_empty() {
            return Err(TemplateError::parse("Empty tag"));
        }
        let arg = words.next().unwrap_or_default().trim().to_string();
        Ok(Tag { keyword, arg })
    }

    fn parse_if(&mut self, cond_src: &str) -> TemplateResult<Node> {
        let mut branches = Vec::new();
        let mut cond = parse_expr_str(cond_src)?;
        let else_body = loop {
            let (body, tag) = self.parse_block(&["elif", "else", "endif"])?;
            branches.push((cond, body));
            match tag.keyword.as_str() {
                "elif" => cond = parse_expr_str(&tag.arg)?,
                "else" => {
                    let (body, _end) = self.parse_block(&["endif"])?;
                    break Some(body);
                }
                _ => break None, // endif
            }
        };
        Ok(Node::If {
            branches,
            else_body,
        })
    }

    fn parse_for(&mut self, arg: &str) -> TemplateResult<Node> {
        let (var, seq_src) = arg.split_once(" in ").ok_or_else(|| {
            TemplateError::parse(format!(
                "Malformed for tag '{arg}': expected 'for <var> in <expr>'"
            ))
        })?;
        let var = var.trim();
        if !is_identifier(var) {
            return Err(TemplateError::parse(format!(
                "Invalid loop variable '{var}'"
            )));
        }
        let seq = parse_expr_str(seq_src)?;
        let (body, _end) = self.parse_block(&["endfor"])?;
        Ok(Node::For {
            var: var.to_string(),
            seq,
            body,
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a complete expression from the text between delimiters.
pub(crate) fn parse_expr_str(src: &str) -> TemplateResult<Expr> {
    let mut parser = ExprParser { src, pos: 0 };
    let expr = parser.parse_expr()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(TemplateError::parse(format!(
            "Unexpected trailing input in expression: '{}'",
            &parser.src[parser.pos..]
        )));
    }
    Ok(expr)
}

struct ExprParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Parse a primary expression followed by any number of filters.
    fn parse_expr(&mut self) -> TemplateResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_ws();
            if !self.eat('|') {
                break;
            }
            self.skip_ws();
            let name = self.parse_ident().ok_or_else(|| {
                TemplateError::parse("Expected filter name after '|'")
            })?;
            let args = if self.peek() == Some('(') {
                let (args, kwargs) = self.parse_args()?;
                if !kwargs.is_empty() {
                    return Err(TemplateError::parse(format!(
                        "Filter '{name}' takes positional arguments only"
                    )));
                }
                args
            } else {
                Vec::new()
            };
            expr = Expr::Filter {
                input: Box::new(expr),
                name,
                args,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> TemplateResult<Expr> {
        self.skip_ws();
        match self.peek() {
            None => Err(TemplateError::parse("Empty expression")),
            Some('"') | Some('\'') => self.parse_string().map(Expr::Literal),
            Some(c) if c.is_ascii_digit() || c == '-' => {
                self.parse_number().map(Expr::Literal)
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_path_or_call(),
            Some(c) => Err(TemplateError::parse(format!(
                "Unexpected character '{c}' in expression"
            ))),
        }
    }

    fn parse_ident(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
            }
            _ => return None,
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        Some(self.src[start..self.pos].to_string())
    }

    fn parse_path_or_call(&mut self) -> TemplateResult<Expr> {
        let mut segments = Vec::new();
        loop {
            let segment = self.parse_ident().ok_or_else(|| {
                TemplateError::parse("Expected identifier after '.'")
            })?;
            segments.push(segment);
            if !self.eat('.') {
                break;
            }
        }

        if self.peek() == Some('(') {
            let (args, kwargs) = self.parse_args()?;
            return Ok(Expr::Call {
                path: segments,
                args,
                kwargs,
            });
        }

        // Bare keywords are literals.
        if segments.len() == 1 {
            match segments[0].as_str() {
                "true" => return Ok(Expr::Literal(Literal::Bool(true))),
                "false" => return Ok(Expr::Literal(Literal::Bool(false))),
                "null" => return Ok(Expr::Literal(Literal::Null)),
                _ => {}
            }
        }
        Ok(Expr::Path(segments))
    }

    /// Parse a parenthesized argument list. Positional arguments must
    /// precede keyword arguments.
    fn parse_args(&mut self) -> TemplateResult<(Vec<Expr>, Vec<(String, Expr)>)> {
        self.bump(); // consume '('
        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Expr)> = Vec::new();

        self.skip_ws();
        if self.eat(')') {
            return Ok((args, kwargs));
        }

        loop {
            self.skip_ws();

            // Keyword argument lookahead: `ident =` (not part of a path).
            let checkpoint = self.pos;
            let mut matched_kwarg = false;
            if let Some(name) = self.parse_ident() {
                self.skip_ws();
                if self.eat('=') {
                    let value = self.parse_expr()?;
                    kwargs.push((name, value));
                    matched_kwarg = true;
                } else {
                    self.pos = checkpoint;
                }
            }

            if !matched_kwarg {
                if !kwargs.is_empty() {
                    return Err(TemplateError::parse(
                        "Positional argument after keyword argument",
                    ));
                }
                args.push(self.parse_expr()?);
            }

            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                break;
            }
            return Err(TemplateError::parse("Expected ',' or ')' in argument list"));
        }
        Ok((args, kwargs))
    }

    fn parse_string(&mut self) -> TemplateResult<Literal> {
        let quote = self.bump().unwrap_or('"');
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(TemplateError::parse("Unterminated string literal")),
                Some('\\') => match self.bump() {
                    None => return Err(TemplateError::parse("Unterminated string literal")),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c) => text.push(c),
                },
                Some(c) if c == quote => break,
                Some(c) => text.push(c),
            }
        }
        Ok(Literal::Str(text))
    }

    fn parse_number(&mut self) -> TemplateResult<Literal> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        let token = &self.src[start..self.pos];
        token
            .parse::<f64>()
            .map(Literal::Num)
            .map_err(|_| TemplateError::parse(format!("Invalid number literal '{token}'")))
    }
}
