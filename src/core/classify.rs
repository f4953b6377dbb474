use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content a text blob holds, used to pick the chars-per-token ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Code,
    Json,
    /// Not produced by `detect`; callers may pass it directly when they know
    /// the input is a URL.
    Url,
}

impl ContentType {
    /// Average characters per token for this kind of content.
    pub fn chars_per_token(self) -> f64 {
        match self {
            ContentType::Text => 4.0,
            ContentType::Code => 3.5,
            ContentType::Json => 3.8,
            ContentType::Url => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Json => "json",
            ContentType::Url => "url",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface patterns for common programming-language syntax. Ordered;
/// the first hit wins. The set is a classification-quality knob, not a
/// contract.
static CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"def \w+\(",      // Python function
        r"function \w+\(", // JavaScript function
        r"class \w+",      // class definition
        r"import \w+",     // import statement
        r"const \w+ =",    // JavaScript const
        r"let \w+ =",      // JavaScript let
        r"var \w+ =",      // JavaScript var
        r"if \(.+\) \{",   // braced if
        r"for \(.+\) \{",  // braced for
        r"=>",             // arrow function
        r"async ",         // async marker
    ]
    .iter()
    .map(|p| Regex::new(p).expect("code pattern is valid"))
    .collect()
});

/// Classify a text blob as JSON, code, or plain text.
///
/// A leading `{` or `[` alone is not enough to call something JSON; the
/// whole blob must parse. Parse failure is an expected branch, never an
/// error, so this function is total.
pub fn detect(text: &str) -> ContentType {
    let stripped = text.trim();
    if (stripped.starts_with('{') || stripped.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(stripped).is_ok()
    {
        return ContentType::Json;
    }

    if CODE_PATTERNS.iter().any(|re| re.is_match(text)) {
        return ContentType::Code;
    }

    ContentType::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_json_object() {
        assert_eq!(detect(r#"{"a": 1}"#), ContentType::Json);
    }

    #[test]
    fn detects_json_array() {
        assert_eq!(detect(r#"[1, 2, 3]"#), ContentType::Json);
    }

    #[test]
    fn detects_json_with_surrounding_whitespace() {
        assert_eq!(detect("  \n {\"k\": [true, null]} \n"), ContentType::Json);
    }

    #[test]
    fn leading_brace_alone_is_not_json() {
        // Parse failure falls through to the code/text branches.
        assert_eq!(detect("{not actually json"), ContentType::Text);
    }

    #[test]
    fn detects_python_function() {
        assert_eq!(detect("def foo():\n    pass"), ContentType::Code);
    }

    #[test]
    fn detects_javascript() {
        assert_eq!(detect("const x = 42;"), ContentType::Code);
        assert_eq!(detect("items.map(i => i * 2)"), ContentType::Code);
        assert_eq!(detect("if (ready) { go(); }"), ContentType::Code);
    }

    #[test]
    fn detects_plain_text() {
        assert_eq!(detect("hello world"), ContentType::Text);
        assert_eq!(detect(""), ContentType::Text);
    }

    #[test]
    fn detection_is_deterministic() {
        let sample = "async fetch of the import \\w data";
        assert_eq!(detect(sample), detect(sample));
    }

    #[test]
    fn ratios_cover_every_variant() {
        for ct in [
            ContentType::Text,
            ContentType::Code,
            ContentType::Json,
            ContentType::Url,
        ] {
            assert!(ct.chars_per_token() > 0.0);
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentType::Json).unwrap(),
            "\"json\""
        );
    }
}
