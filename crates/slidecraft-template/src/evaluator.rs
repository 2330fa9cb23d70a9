/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Evaluation is a single synchronous pass over the AST. Undefined
//! variable references render as the empty string; helper-function results
//! are spliced into output verbatim. Escaping is opt-in through the
//! `escape` filter and never applied by the engine itself: the output
//! target mixes raw HTML and Markdown, so that choice belongs to the
//! caller.

use crate::ast::{Expr, Literal, Node};
use crate::context::{TemplateContext, TemplateValue};
use crate::error::{TemplateError, TemplateResult};
use crate::parser::Template;
use std::collections::HashMap;

impl Template {
    /// Render this template with the given context.
    pub fn render(&self, context: &TemplateContext) -> TemplateResult<String> {
        let mut out = String::new();
        render_nodes(&self.nodes, context, &mut out)?;
        Ok(out)
    }
}

fn render_nodes(
    nodes: &[Node],
    context: &TemplateContext,
    out: &mut String,
) -> TemplateResult<()> {
    for node in nodes {
        render_node(node, context, out)?;
    }
    Ok(())
}

fn render_node(node: &Node, context: &TemplateContext, out: &mut String) -> TemplateResult<()> {
    match node {
        Node::Text(text) => {
            out.push_str(text);
            Ok(())
        }

        Node::Output(expr) => {
            let value = eval_expr(expr, context)?;
            out.push_str(&value.render());
            Ok(())
        }

        Node::If {
            branches,
            else_body,
        } => {
            for (condition, body) in branches {
                if eval_expr(condition, context)?.is_truthy() {
                    return render_nodes(body, context, out);
                }
            }
            if let Some(body) = else_body {
                render_nodes(body, context, out)?;
            }
            Ok(())
        }

        Node::For { var, seq, body } => render_for(var, seq, body, context, out),
    }
}

fn render_for(
    var: &str,
    seq: &Expr,
    body: &[Node],
    context: &TemplateContext,
    out: &mut String,
) -> TemplateResult<()> {
    let value = eval_expr(seq, context)?;

    // Lists iterate per element; any other truthy value iterates once.
    let items: Vec<TemplateValue> = match value {
        TemplateValue::List(items) => items,
        v if v.is_truthy() => vec![v],
        _ => Vec::new(),
    };

    for item in items {
        let mut child = context.child();
        child.insert(var, item);
        render_nodes(body, &child, out)?;
    }
    Ok(())
}

/// Evaluate an expression to a value.
pub(crate) fn eval_expr(expr: &Expr, context: &TemplateContext) -> TemplateResult<TemplateValue> {
    match expr {
        Expr::Path(segments) => {
            let path: Vec<&str> = segments.iter().map(String::as_str).collect();
            Ok(context.get_path(&path).cloned().unwrap_or_default())
        }

        Expr::Literal(literal) => Ok(match literal {
            Literal::Str(s) => TemplateValue::String(s.clone()),
            Literal::Num(n) => TemplateValue::Number(*n),
            Literal::Bool(b) => TemplateValue::Bool(*b),
            Literal::Null => TemplateValue::Null,
        }),

        Expr::Call { path, args, kwargs } => eval_call(path, args, kwargs, context),

        Expr::Filter { input, name, args } => {
            let value = eval_expr(input, context)?;
            apply_filter(value, name, args, context)
        }
    }
}

fn eval_call(
    path: &[String],
    args: &[Expr],
    kwargs: &[(String, Expr)],
    context: &TemplateContext,
) -> TemplateResult<TemplateValue> {
    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
    let helper = match context.get_path(&segments) {
        Some(TemplateValue::Function(f)) => f.clone(),
        Some(_) => {
            return Err(TemplateError::eval(format!(
                "'{}' is not a callable helper",
                path.join(".")
            )));
        }
        None => {
            return Err(TemplateError::eval(format!(
                "Unknown helper '{}'",
                path.join(".")
            )));
        }
    };

    let mut argv = Vec::with_capacity(args.len() + 1);
    for arg in args {
        argv.push(eval_expr(arg, context)?);
    }
    if !kwargs.is_empty() {
        let mut options = HashMap::new();
        for (name, value_expr) in kwargs {
            options.insert(name.clone(), eval_expr(value_expr, context)?);
        }
        argv.push(TemplateValue::Map(options));
    }

    // The helper's return value is spliced in verbatim, no escaping.
    Ok(TemplateValue::String(helper(&argv)))
}

fn apply_filter(
    value: TemplateValue,
    name: &str,
    args: &[Expr],
    context: &TemplateContext,
) -> TemplateResult<TemplateValue> {
    match name {
        "default" => {
            if args.len() != 1 {
                return Err(TemplateError::eval(
                    "Filter 'default' expects exactly one argument",
                ));
            }
            let absent = matches!(&value, TemplateValue::Null)
                || matches!(&value, TemplateValue::String(s) if s.is_empty());
            if absent {
                eval_expr(&args[0], context)
            } else {
                Ok(value)
            }
        }

        "trim" => {
            expect_no_args(name, args)?;
            Ok(TemplateValue::String(value.render().trim().to_string()))
        }

        "escape" => {
            expect_no_args(name, args)?;
            Ok(TemplateValue::String(html_escape(&value.render())))
        }

        "length" => {
            expect_no_args(name, args)?;
            Ok(TemplateValue::Number(value.length().unwrap_or(0) as f64))
        }

        other => Err(TemplateError::UnknownFilter {
            name: other.to_string(),
        }),
    }
}

fn expect_no_args(name: &str, args: &[Expr]) -> TemplateResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(TemplateError::eval(format!(
            "Filter '{name}' takes no arguments"
        )))
    }
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
