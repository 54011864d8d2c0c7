//! Purpose: Provide the internal JSON decode entrypoints.
//! Exports: `from_str`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary so persistence never decodes JSON ad hoc.
//! Invariants: Category labels are stable; hints never echo payload text.
//! Notes: Error mapping to crate errors is done by callsites so context stays explicit.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Truncated,
    Data,
    Io,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Truncated => "truncated",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Io => "io",
        }
    }
}

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Eof => ParseFailureCategory::Truncated,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Io,
    }
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; line {} column {}; context: {context}",
        categorize_error(err).label(),
        err.line(),
        err.column()
    )
}

#[cfg(test)]
mod tests {
    use super::{ParseFailureCategory, categorize_error, from_str, hint_for_error};
    use serde_json::Value;

    #[test]
    fn categories_follow_failure_kind() {
        let err = from_str::<Value>(r#"{"a":}"#).expect_err("syntax");
        assert_eq!(categorize_error(&err), ParseFailureCategory::Syntax);

        let err = from_str::<Value>(r#"{"a":"#).expect_err("eof");
        assert_eq!(categorize_error(&err), ParseFailureCategory::Truncated);

        let err = from_str::<Vec<u32>>(r#"["x"]"#).expect_err("data");
        assert_eq!(categorize_error(&err), ParseFailureCategory::Data);
    }

    #[test]
    fn hint_contains_category_and_context() {
        let err = from_str::<Value>("[1,").expect_err("eof");
        let hint = hint_for_error(&err, "settings.json");
        assert!(hint.contains("parse category: truncated"));
        assert!(hint.contains("context: settings.json"));
    }
}
