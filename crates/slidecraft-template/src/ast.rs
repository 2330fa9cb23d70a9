/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST node types.

/// A parsed template node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text emitted verbatim.
    Text(String),

    /// `{{ expr }}` interpolation.
    Output(Expr),

    /// `{% if %}`/`{% elif %}` branches with an optional `{% else %}` body.
    If {
        branches: Vec<(Expr, Vec<Node>)>,
        else_body: Option<Vec<Node>>,
    },

    /// `{% for var in expr %}` iteration.
    For {
        var: String,
        seq: Expr,
        body: Vec<Node>,
    },
}

/// An expression inside an interpolation or tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Dotted variable path (`content.title`).
    Path(Vec<String>),

    /// String, number, boolean, or null literal.
    Literal(Literal),

    /// Helper invocation (`icons.render("star", size=24)`). Keyword
    /// arguments collect into a trailing options map at evaluation time.
    Call {
        path: Vec<String>,
        args: Vec<Expr>,
        kwargs: Vec<(String, Expr)>,
    },

    /// Filter application (`expr | default("x")`).
    Filter {
        input: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}
