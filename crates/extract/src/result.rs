// ABOUTME: ExtractionResult row produced once per input URL, plus table rendering helpers.
// ABOUTME: Constructors enforce the success/failure invariants on content and error fields.

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Column order of the result table.
pub const COLUMNS: [&str; 8] = [
    "url",
    "title",
    "description",
    "content",
    "content_length",
    "paragraphs_count",
    "success",
    "error",
];

/// One row of extraction output.
///
/// Build rows with [`ExtractionResult::success`] or [`ExtractionResult::failure`]:
/// a failed row always has empty content and a non-empty error, and a
/// successful row's `content_length` is the character count of `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: String,
    pub content_length: usize,
    pub paragraphs_count: usize,
    pub success: bool,
    pub error: Option<String>,
}

impl ExtractionResult {
    /// A successful row.
    pub fn success(
        url: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
        content: String,
        paragraphs_count: usize,
    ) -> Self {
        Self {
            url: url.into(),
            title,
            description,
            content_length: content.chars().count(),
            content,
            paragraphs_count,
            success: true,
            error: None,
        }
    }

    /// A failed row carrying the error's message.
    pub fn failure(url: impl Into<String>, err: &ExtractError) -> Self {
        let mut message = err.row_message();
        if message.is_empty() {
            message = err.code.to_string();
        }
        Self {
            url: url.into(),
            title: None,
            description: None,
            content: String::new(),
            content_length: 0,
            paragraphs_count: 0,
            success: false,
            error: Some(message),
        }
    }

    /// Render the row as tab-separated values in [`COLUMNS`] order.
    ///
    /// Tabs, newlines and backslashes inside fields are escaped so one row
    /// stays on one line.
    pub fn to_tsv_row(&self) -> String {
        let fields = [
            escape_tsv(&self.url),
            escape_tsv(self.title.as_deref().unwrap_or("")),
            escape_tsv(self.description.as_deref().unwrap_or("")),
            escape_tsv(&self.content),
            self.content_length.to_string(),
            self.paragraphs_count.to_string(),
            self.success.to_string(),
            escape_tsv(self.error.as_deref().unwrap_or("")),
        ];
        fields.join("\t")
    }
}

/// Header line for [`ExtractionResult::to_tsv_row`] output.
pub fn tsv_header() -> String {
    COLUMNS.join("\t")
}

fn escape_tsv(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Number of successful rows.
pub fn count_successful(results: &[ExtractionResult]) -> usize {
    results.iter().filter(|r| r.success).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_counts_characters() {
        let row = ExtractionResult::success("https://e.com/a", None, None, "héllo".to_string(), 1);
        assert_eq!(row.content_length, 5);
        assert!(row.success);
        assert!(row.error.is_none());
    }

    #[test]
    fn failure_has_empty_content_and_message() {
        let err = ExtractError::unsupported_url(
            "https://e.com/rss",
            "Extract",
            Some(anyhow::anyhow!("RSS URLs are not supported")),
        );
        let row = ExtractionResult::failure("https://e.com/rss", &err);
        assert!(!row.success);
        assert_eq!(row.content, "");
        assert_eq!(row.content_length, 0);
        assert_eq!(row.error.as_deref(), Some("RSS URLs are not supported"));
    }

    #[test]
    fn tsv_row_escapes_and_orders_columns() {
        let row = ExtractionResult::success(
            "https://e.com/a",
            Some("Title\tTab".to_string()),
            None,
            "line one\nline two".to_string(),
            2,
        );
        assert_eq!(
            row.to_tsv_row(),
            "https://e.com/a\tTitle\\tTab\t\tline one\\nline two\t17\t2\ttrue\t"
        );
        assert_eq!(tsv_header().split('\t').count(), 8);
    }

    #[test]
    fn serializes_every_column() {
        let row = ExtractionResult::success("https://e.com/a", None, None, "x".to_string(), 1);
        let value = serde_json::to_value(&row).unwrap();
        let obj = value.as_object().unwrap();
        for col in COLUMNS {
            assert!(obj.contains_key(col), "missing column {}", col);
        }
    }
}
