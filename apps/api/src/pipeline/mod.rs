//! The content normalization pipeline.
//!
//! Everything the generation and design modules feed to or receive from the
//! LLM backend passes through here: free-form responses are parsed into named
//! HTML/CSS blocks, fragments are sanitized and re-scoped under the preview
//! container, and scraped example sets are squeezed into prompt-sized
//! payloads. All of it is pure, synchronous string transformation with no
//! I/O; bad upstream text degrades output, it never aborts a request.

pub mod budget;
pub mod extract;
pub mod sanitize;
pub mod scope;

/// The class selector every generated stylesheet is scoped under for preview.
/// Overridable per-request via config; this is the fixed default.
pub const DEFAULT_SCOPE_SELECTOR: &str = ".ai-resume-isolation";

/// Truncates to at most `limit` characters, never splitting a code point.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}
