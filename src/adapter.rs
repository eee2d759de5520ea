//! Adapts the search provider's raw text response into [`SearchResult`]s.
//!
//! The provider interleaves numbered result blocks with administrative
//! status lines:
//!
//! ```text
//! Search completed for "laptop price" with 3 results:
//! **Status:** Search engine: Browser Brave; 3 requested/8 obtained; ...
//! **1. Some Title**
//! URL: https://...
//! Description: optional snippet
//! **Full Content:**
//! optional page text...
//! ---
//! **2. Next Title**
//! ...
//! ```
//!
//! Blocks are split on the bold `**N. Title**` marker; each block's `URL:`
//! line and remaining text are associated with the preceding title. URLs are
//! redirect-resolved before storing and captured content is length-capped to
//! bound downstream extraction cost.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::redirect;
use crate::types::SearchResult;

/// Matches a numbered result title marker, e.g. `**1. Some Title**`.
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*(\d+)\.\s+(.*?)\*\*\s*$").expect("title marker regex"));

/// Lines that carry provider bookkeeping rather than result content.
fn is_administrative(line: &str) -> bool {
    line.starts_with("**Status:**") || line.starts_with("Search completed for ")
}

/// Adapt a raw provider response into at most `limit` search results.
///
/// Content per result is capped at `max_content_chars` characters. Blocks
/// without a `URL:` line are dropped. The output order is provider rank.
pub fn adapt(provider_response: &str, limit: usize, max_content_chars: usize) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = Vec::new();
    let mut current: Option<PartialBlock> = None;

    for line in provider_response.lines() {
        let trimmed = line.trim_end();

        if let Some(caps) = TITLE_RE.captures(trimmed) {
            flush(&mut current, &mut results, max_content_chars);
            if results.len() >= limit {
                break;
            }
            current = Some(PartialBlock {
                title: caps[2].trim().to_string(),
                url: None,
                content: Vec::new(),
            });
            continue;
        }

        if trimmed == "---" {
            flush(&mut current, &mut results, max_content_chars);
            if results.len() >= limit {
                break;
            }
            continue;
        }

        if is_administrative(trimmed) || trimmed == "**Full Content:**" {
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        if let Some(rest) = trimmed.strip_prefix("URL:") {
            if block.url.is_none() {
                block.url = Some(rest.trim().to_string());
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("Description:") {
            block.content.push(rest.trim().to_string());
            continue;
        }

        if !trimmed.is_empty() {
            block.content.push(trimmed.to_string());
        }
    }

    flush(&mut current, &mut results, max_content_chars);
    results.truncate(limit);

    tracing::debug!(count = results.len(), "provider response adapted");
    results
}

struct PartialBlock {
    title: String,
    url: Option<String>,
    content: Vec<String>,
}

/// Finalise the in-progress block, dropping it if no URL was seen.
fn flush(current: &mut Option<PartialBlock>, results: &mut Vec<SearchResult>, max_chars: usize) {
    let Some(block) = current.take() else {
        return;
    };
    let Some(url) = block.url else {
        tracing::trace!(title = %block.title, "result block without URL dropped");
        return;
    };

    let mut content = block.content.join("\n");
    if content.chars().count() > max_chars {
        content = content.chars().take(max_chars).collect();
    }

    results.push(SearchResult {
        title: block.title,
        url: redirect::resolve(&url),
        content,
    });
}
