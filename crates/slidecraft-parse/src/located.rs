//! Location-tracking YAML parsing.
//!
//! Builds an owned YAML tree where every node carries its 1-based source
//! line and column, using `yaml-rust2`'s marked-event API. Schema
//! defaulting erases positions from the validated document, so the
//! line-tracking parse variant walks this tree instead.

use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};

/// A YAML node annotated with its 1-based source position.
#[derive(Debug, Clone)]
pub enum LocatedYaml {
    Scalar {
        value: Yaml,
        line: usize,
        col: usize,
    },
    Sequence {
        items: Vec<LocatedYaml>,
        line: usize,
        col: usize,
    },
    Mapping {
        entries: Vec<LocatedEntry>,
        line: usize,
        col: usize,
    },
}

/// One key/value pair of a located mapping.
#[derive(Debug, Clone)]
pub struct LocatedEntry {
    pub key: LocatedYaml,
    pub value: LocatedYaml,
}

impl LocatedYaml {
    /// 1-based source line of this node.
    pub fn line(&self) -> usize {
        match self {
            LocatedYaml::Scalar { line, .. }
            | LocatedYaml::Sequence { line, .. }
            | LocatedYaml::Mapping { line, .. } => *line,
        }
    }

    /// 1-based source column of this node.
    pub fn col(&self) -> usize {
        match self {
            LocatedYaml::Scalar { col, .. }
            | LocatedYaml::Sequence { col, .. }
            | LocatedYaml::Mapping { col, .. } => *col,
        }
    }

    /// Sequence items, if this node is a sequence.
    pub fn items(&self) -> Option<&[LocatedYaml]> {
        match self {
            LocatedYaml::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Mapping entries, if this node is a mapping.
    pub fn entries(&self) -> Option<&[LocatedEntry]> {
        match self {
            LocatedYaml::Mapping { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping value by string key.
    pub fn get(&self, key: &str) -> Option<&LocatedYaml> {
        self.entries()?.iter().find_map(|entry| match &entry.key {
            LocatedYaml::Scalar {
                value: Yaml::String(s),
                ..
            } if s == key => Some(&entry.value),
            _ => None,
        })
    }

    /// The scalar string value, if this node is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LocatedYaml::Scalar {
                value: Yaml::String(s),
                ..
            } => Some(s),
            _ => None,
        }
    }
}

/// Parse YAML from a string into a located tree.
///
/// Parses a single document; an empty input yields a null scalar at 1:1.
///
/// # Errors
///
/// Returns the underlying scan error when the input is not well-formed
/// YAML (tab indentation included).
pub fn parse_located(text: &str) -> Result<LocatedYaml, ScanError> {
    let mut parser = Parser::new_from_str(text);
    let mut builder = LocatedBuilder::default();
    parser.load(&mut builder, false)?;
    Ok(builder.root.unwrap_or(LocatedYaml::Scalar {
        value: Yaml::Null,
        line: 1,
        col: 1,
    }))
}

/// Builder that implements `MarkedEventReceiver` to construct the tree.
#[derive(Default)]
struct LocatedBuilder {
    /// Stack of containers being constructed.
    stack: Vec<BuildNode>,
    /// The completed root node.
    root: Option<LocatedYaml>,
}

enum BuildNode {
    Sequence {
        line: usize,
        col: usize,
        items: Vec<LocatedYaml>,
    },
    Mapping {
        line: usize,
        col: usize,
        entries: Vec<(LocatedYaml, Option<LocatedYaml>)>,
    },
}

impl LocatedBuilder {
    fn push_complete(&mut self, node: LocatedYaml) {
        match self.stack.last_mut() {
            None => {
                // Single-document load: keep the first root.
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => {
                if let Some((_, value)) = entries.last_mut() {
                    if value.is_none() {
                        *value = Some(node);
                        return;
                    }
                }
                entries.push((node, None));
            }
        }
    }
}

impl MarkedEventReceiver for LocatedBuilder {
    fn on_event(&mut self, event: Event, marker: Marker) {
        // Marker lines are 1-based, columns 0-based.
        let line = marker.line();
        let col = marker.col() + 1;

        match event {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(text, style, _anchor_id, _tag) => {
                self.push_complete(LocatedYaml::Scalar {
                    value: scalar_value(&text, style),
                    line,
                    col,
                });
            }

            Event::SequenceStart(_anchor_id, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    line,
                    col,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                if let Some(BuildNode::Sequence { line, col, items }) = self.stack.pop() {
                    self.push_complete(LocatedYaml::Sequence { items, line, col });
                }
            }

            Event::MappingStart(_anchor_id, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    line,
                    col,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => {
                if let Some(BuildNode::Mapping { line, col, entries }) = self.stack.pop() {
                    let entries = entries
                        .into_iter()
                        .map(|(key, value)| {
                            let fallback = LocatedYaml::Scalar {
                                value: Yaml::Null,
                                line: key.line(),
                                col: key.col(),
                            };
                            LocatedEntry {
                                key,
                                value: value.unwrap_or(fallback),
                            }
                        })
                        .collect();
                    self.push_complete(LocatedYaml::Mapping { entries, line, col });
                }
            }

            Event::Alias(_anchor_id) => {
                // Aliases are not supported; they surface as null.
                self.push_complete(LocatedYaml::Scalar {
                    value: Yaml::Null,
                    line,
                    col,
                });
            }
        }
    }
}

/// Resolve a scalar to a typed value, honoring its quoting style: only
/// plain scalars undergo type inference.
fn scalar_value(text: &str, style: TScalarStyle) -> Yaml {
    if style != TScalarStyle::Plain {
        return Yaml::String(text.to_string());
    }
    if let Ok(i) = text.parse::<i64>() {
        return Yaml::Integer(i);
    }
    if text.parse::<f64>().is_ok() {
        return Yaml::Real(text.to_string());
    }
    match text {
        "true" | "True" | "TRUE" => Yaml::Boolean(true),
        "false" | "False" | "FALSE" => Yaml::Boolean(false),
        "null" | "Null" | "NULL" | "~" | "" => Yaml::Null,
        _ => Yaml::String(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_location() {
        let node = parse_located("title: My Deck").unwrap();
        let title = node.get("title").unwrap();
        assert_eq!(title.as_str(), Some("My Deck"));
        assert_eq!(title.line(), 1);
    }

    #[test]
    fn test_sequence_item_lines() {
        let text = "slides:\n  - template: title\n  - template: bullets\n";
        let node = parse_located(text).unwrap();
        let slides = node.get("slides").unwrap();
        let lines: Vec<usize> = slides.items().unwrap().iter().map(LocatedYaml::line).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        let node = parse_located("version: \"42\"").unwrap();
        assert_eq!(node.get("version").unwrap().as_str(), Some("42"));
    }

    #[test]
    fn test_empty_document() {
        let node = parse_located("").unwrap();
        assert!(matches!(
            node,
            LocatedYaml::Scalar {
                value: Yaml::Null,
                ..
            }
        ));
    }

    #[test]
    fn test_tab_indentation_is_a_scan_error() {
        assert!(parse_located("meta:\n\ttitle: x\n").is_err());
    }
}
