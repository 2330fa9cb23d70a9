/*
 * common/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Shared collaborator stubs for integration tests.
 */

#![allow(dead_code)]

use anyhow::{Result, bail};
use async_trait::async_trait;
use slidecraft_core::{CitationFormatter, IconOptions, IconResolver};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Icon resolver stub that counts calls and tags each result with its
/// call sequence number, so tests can prove per-occurrence resolution.
#[derive(Default)]
pub struct CountingIcons {
    pub calls: AtomicUsize,
}

#[async_trait]
impl IconResolver for CountingIcons {
    async fn render(&self, name: &str, options: &IconOptions) -> Result<String> {
        let seq = self.calls.fetch_add(1, Ordering::SeqCst);
        let size = options
            .size
            .map(|s| format!(" width=\"{s}\""))
            .unwrap_or_default();
        Ok(format!("<svg data-icon=\"{name}\" data-seq=\"{seq}\"{size}/>"))
    }
}

/// Icon resolver stub that always fails.
pub struct FailingIcons;

#[async_trait]
impl IconResolver for FailingIcons {
    async fn render(&self, name: &str, _options: &IconOptions) -> Result<String> {
        bail!("icon service unavailable: {name}")
    }
}

/// Citation formatter stub with one known id. Unknown ids get the
/// bracketed-id fallback, per the collaborator contract.
pub struct StubRefs;

fn format_id(id: &str) -> String {
    match id {
        "knuth1984" => "(Knuth, 1984)".to_string(),
        other => format!("[{other}]"),
    }
}

#[async_trait]
impl CitationFormatter for StubRefs {
    async fn format_inline(&self, id: &str) -> Result<String> {
        Ok(format_id(id))
    }

    async fn expand_citations(&self, text: &str) -> Result<String> {
        // Replace every [@id] group, applying the per-id fallback.
        let mut out = String::new();
        let mut rest = text;
        while let Some(start) = rest.find("[@") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find(']') {
                Some(end) => {
                    out.push_str(&format_id(&after[..end]));
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                    break;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}
