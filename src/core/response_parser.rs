use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub const DEFAULT_POSITIVE_REPHRASING: &str = "Great work! Here's a suggestion for improvement.";
pub const DEFAULT_TECHNICAL_WHY: &str = "This follows good software development practices.";
pub const DEFAULT_SUGGESTED_IMPROVEMENT: &str = "Consider applying standard best practices.";

// Label, optionally behind a list bullet or number at line start and
// decorated as a Markdown heading or bold text, then a colon.
static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:^[ \t]*(?:[-*+][ \t]+|\d+[.)][ \t]*))?(?:#{1,6}[ \t]*)?(?:\*\*)?\b(positive_rephrasing|technical_why|suggested_improvement|code_example)\b[ \t]*(?:\*\*)?[ \t]*:(?:\*\*)?",
    )
    .unwrap()
});

const LANGUAGE_TAGS: &[&str] = &[
    "bash", "c", "c++", "cpp", "cs", "csharp", "css", "go", "html", "java", "javascript", "js",
    "json", "jsx", "kotlin", "kt", "php", "py", "python", "rb", "ruby", "rust", "rs", "scala",
    "sh", "shell", "sql", "swift", "text", "toml", "ts", "tsx", "typescript", "yaml", "yml",
];

/// The four fields extracted from a model reply. Always fully populated
/// except for the code example, which is genuinely optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub positive_rephrasing: String,
    pub technical_why: String,
    pub suggested_improvement: String,
    pub code_example: Option<String>,
}

impl Default for ParsedResponse {
    fn default() -> Self {
        Self {
            positive_rephrasing: DEFAULT_POSITIVE_REPHRASING.to_string(),
            technical_why: DEFAULT_TECHNICAL_WHY.to_string(),
            suggested_improvement: DEFAULT_SUGGESTED_IMPROVEMENT.to_string(),
            code_example: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    PositiveRephrasing,
    TechnicalWhy,
    SuggestedImprovement,
    CodeExample,
}

impl Section {
    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "POSITIVE_REPHRASING" => Some(Section::PositiveRephrasing),
            "TECHNICAL_WHY" => Some(Section::TechnicalWhy),
            "SUGGESTED_IMPROVEMENT" => Some(Section::SuggestedImprovement),
            "CODE_EXAMPLE" => Some(Section::CodeExample),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Section::PositiveRephrasing => "POSITIVE_REPHRASING",
            Section::TechnicalWhy => "TECHNICAL_WHY",
            Section::SuggestedImprovement => "SUGGESTED_IMPROVEMENT",
            Section::CodeExample => "CODE_EXAMPLE",
        }
    }

    /// Code examples routinely contain blank lines, so only the next label
    /// (or end of text) closes them.
    fn ends_at_blank_line(self) -> bool {
        !matches!(self, Section::CodeExample)
    }
}

#[derive(Debug)]
struct Marker {
    section: Section,
    start: usize,
    value_start: usize,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Never fails: any section that cannot be found falls back to its default.
    pub fn parse(raw: &str) -> ParsedResponse {
        let text = raw.replace("\r\n", "\n");
        let markers = Self::locate_markers(&text);

        if markers.is_empty() {
            debug!("Response contained no section labels; using fallback values");
            return ParsedResponse::default();
        }

        let defaults = ParsedResponse::default();
        let capture = |section: Section, fallback: String| {
            Self::capture(&text, &markers, section).unwrap_or_else(|| {
                debug!("Response missing {} section; using fallback", section.label());
                fallback
            })
        };

        ParsedResponse {
            positive_rephrasing: capture(Section::PositiveRephrasing, defaults.positive_rephrasing),
            technical_why: capture(Section::TechnicalWhy, defaults.technical_why),
            suggested_improvement: capture(
                Section::SuggestedImprovement,
                defaults.suggested_improvement,
            ),
            code_example: Self::capture(&text, &markers, Section::CodeExample)
                .and_then(|code| Self::clean_code_example(&code)),
        }
    }

    /// Label markers in text order. Labels inside fenced code blocks are
    /// code, not structure, and are skipped.
    fn locate_markers(text: &str) -> Vec<Marker> {
        let fences = Self::fenced_ranges(text);
        MARKER_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if fences.iter().any(|range| range.contains(&whole.start())) {
                    return None;
                }
                let section = Section::from_label(caps.get(1)?.as_str())?;
                Some(Marker {
                    section,
                    start: whole.start(),
                    value_start: whole.end(),
                })
            })
            .collect()
    }

    /// Byte ranges covered by ``` blocks, from the opening fence to the end
    /// of the closing fence line. An unclosed block runs to end of text.
    fn fenced_ranges(text: &str) -> Vec<std::ops::Range<usize>> {
        let mut ranges = Vec::new();
        let mut open: Option<usize> = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            // An even number of fences on one line is inline code.
            if line.matches("```").count() % 2 == 1 {
                match open.take() {
                    Some(start) => ranges.push(start..offset + line.len()),
                    None => open = Some(offset + line.rfind("```").unwrap_or(0)),
                }
            }
            offset += line.len();
        }

        if let Some(start) = open {
            ranges.push(start..text.len());
        }
        ranges
    }

    /// Content of the first marker for `section`, up to the next marker of
    /// any kind, a blank line (where the section allows it), or end of text.
    fn capture(text: &str, markers: &[Marker], section: Section) -> Option<String> {
        let index = markers.iter().position(|m| m.section == section)?;
        let end = markers
            .get(index + 1)
            .map_or(text.len(), |next| next.start);

        let mut body = text[markers[index].value_start..end].trim_start();
        if section.ends_at_blank_line() {
            body = Self::cut_at_blank_line(body);
        }

        let value = body.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn cut_at_blank_line(body: &str) -> &str {
        let mut search_from = 0;
        while let Some(offset) = body[search_from..].find('\n') {
            let newline = search_from + offset;
            let rest = &body[newline + 1..];
            if rest
                .trim_start_matches(|c: char| c == ' ' || c == '\t')
                .starts_with('\n')
            {
                return &body[..newline];
            }
            search_from = newline + 1;
        }
        body
    }

    fn clean_code_example(code: &str) -> Option<String> {
        let mut code = code.trim();

        if let Some(after_fence) = code.strip_prefix("```") {
            code = match after_fence.find('\n') {
                // Opening fence line carries at most a language tag.
                Some(newline) => &after_fence[newline + 1..],
                None => Self::strip_inline_tag(after_fence.trim_end().trim_end_matches('`')),
            };
            code = code.trim_end();
            code = code.strip_suffix("```").unwrap_or(code);
            code = code.trim_matches('\n').trim_end();
        }

        let normalized = code
            .trim_end_matches(|c: char| c == '.' || c == '!')
            .to_ascii_lowercase();
        if code.is_empty() || matches!(normalized.as_str(), "n/a" | "na" | "none" | "not applicable" | "-") {
            return None;
        }

        Some(code.to_string())
    }

    /// Single-line fence such as "```rust fn x() {}```" or a bare "```python".
    fn strip_inline_tag(inline: &str) -> &str {
        let inline = inline.trim();
        let (first, rest) = match inline.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim_start()),
            None => (inline, ""),
        };
        if LANGUAGE_TAGS.contains(&first.to_ascii_lowercase().as_str()) {
            rest
        } else {
            inline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "POSITIVE_REPHRASING: Nice start on this function!
TECHNICAL_WHY: Descriptive names make intent obvious to readers.
SUGGESTED_IMPROVEMENT: Rename `f` and `x` to describe what they hold.
CODE_EXAMPLE:
```python
def increment(value):
    return value + 1
```";

    #[test]
    fn extracts_all_four_sections() {
        let parsed = ResponseParser::parse(WELL_FORMED);

        assert_eq!(parsed.positive_rephrasing, "Nice start on this function!");
        assert_eq!(
            parsed.technical_why,
            "Descriptive names make intent obvious to readers."
        );
        assert_eq!(
            parsed.suggested_improvement,
            "Rename `f` and `x` to describe what they hold."
        );
        assert_eq!(
            parsed.code_example.as_deref(),
            Some("def increment(value):\n    return value + 1")
        );
    }

    #[test]
    fn no_label_text_leaks_into_values() {
        let parsed = ResponseParser::parse(WELL_FORMED);
        for value in [
            &parsed.positive_rephrasing,
            &parsed.technical_why,
            &parsed.suggested_improvement,
            parsed.code_example.as_ref().unwrap(),
        ] {
            assert!(!value.contains("POSITIVE_REPHRASING"));
            assert!(!value.contains("TECHNICAL_WHY"));
            assert!(!value.contains("SUGGESTED_IMPROVEMENT"));
            assert!(!value.contains("CODE_EXAMPLE"));
        }
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed = ResponseParser::parse("TECHNICAL_WHY: Small functions are easier to test.");

        assert_eq!(parsed.positive_rephrasing, DEFAULT_POSITIVE_REPHRASING);
        assert_eq!(parsed.technical_why, "Small functions are easier to test.");
        assert_eq!(parsed.suggested_improvement, DEFAULT_SUGGESTED_IMPROVEMENT);
        assert_eq!(parsed.code_example, None);
    }

    #[test]
    fn unstructured_text_yields_all_defaults() {
        let parsed = ResponseParser::parse("I think this code is fine, honestly.\n\nNo notes.");
        assert_eq!(parsed, ParsedResponse::default());
        assert!(parsed.code_example.is_none());

        assert_eq!(ResponseParser::parse(""), ParsedResponse::default());
    }

    #[test]
    fn empty_section_uses_default() {
        let parsed = ResponseParser::parse("POSITIVE_REPHRASING:\nTECHNICAL_WHY: reason");
        assert_eq!(parsed.positive_rephrasing, DEFAULT_POSITIVE_REPHRASING);
        assert_eq!(parsed.technical_why, "reason");
    }

    #[test]
    fn section_stops_at_blank_line() {
        let raw = "POSITIVE_REPHRASING: line one\nline two\n\nSome chatter the model added.\nTECHNICAL_WHY: why";
        let parsed = ResponseParser::parse(raw);
        assert_eq!(parsed.positive_rephrasing, "line one\nline two");
        assert_eq!(parsed.technical_why, "why");
    }

    #[test]
    fn blank_line_with_spaces_still_terminates() {
        let parsed = ResponseParser::parse("TECHNICAL_WHY: first\n  \t\nignored");
        assert_eq!(parsed.technical_why, "first");
    }

    #[test]
    fn value_may_start_on_following_line() {
        let parsed = ResponseParser::parse("SUGGESTED_IMPROVEMENT:\n\n  Extract a helper.  \n");
        assert_eq!(parsed.suggested_improvement, "Extract a helper.");
    }

    #[test]
    fn sections_out_of_order_are_matched_by_label() {
        let raw = "TECHNICAL_WHY: w\nCODE_EXAMPLE: let x = 1;\nPOSITIVE_REPHRASING: p\nSUGGESTED_IMPROVEMENT: s";
        let parsed = ResponseParser::parse(raw);

        assert_eq!(parsed.positive_rephrasing, "p");
        assert_eq!(parsed.technical_why, "w");
        assert_eq!(parsed.suggested_improvement, "s");
        assert_eq!(parsed.code_example.as_deref(), Some("let x = 1;"));
    }

    #[test]
    fn labels_are_case_and_decoration_tolerant() {
        let raw = "**Positive_Rephrasing:** Great effort\n### technical_why : Because clarity\n**SUGGESTED_IMPROVEMENT** : Add docs";
        let parsed = ResponseParser::parse(raw);

        assert_eq!(parsed.positive_rephrasing, "Great effort");
        assert_eq!(parsed.technical_why, "Because clarity");
        assert_eq!(parsed.suggested_improvement, "Add docs");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let raw = "POSITIVE_REPHRASING: p\r\nTECHNICAL_WHY: w\r\n\r\ntrailing";
        let parsed = ResponseParser::parse(raw);
        assert_eq!(parsed.positive_rephrasing, "p");
        assert_eq!(parsed.technical_why, "w");
    }

    #[test]
    fn code_example_keeps_blank_lines_until_end() {
        let raw = "CODE_EXAMPLE:\nfn a() {}\n\nfn b() {}\n";
        let parsed = ResponseParser::parse(raw);
        assert_eq!(parsed.code_example.as_deref(), Some("fn a() {}\n\nfn b() {}"));
    }

    #[test]
    fn code_example_placeholder_is_absent() {
        let parsed = ResponseParser::parse("POSITIVE_REPHRASING: p\nCODE_EXAMPLE: N/A");
        assert!(parsed.code_example.is_none());

        let parsed = ResponseParser::parse("CODE_EXAMPLE: Not applicable.");
        assert!(parsed.code_example.is_none());
    }

    #[test]
    fn label_inside_identifier_is_not_a_marker() {
        let parsed = ResponseParser::parse("MY_TECHNICAL_WHY: nope");
        assert_eq!(parsed, ParsedResponse::default());
    }

    #[test]
    fn first_occurrence_of_a_label_wins() {
        let parsed = ResponseParser::parse("TECHNICAL_WHY: first\nTECHNICAL_WHY: second");
        assert_eq!(parsed.technical_why, "first");
    }

    #[test]
    fn labels_inside_code_fence_stay_in_code_example() {
        let raw = "POSITIVE_REPHRASING: p\nCODE_EXAMPLE:\n```python\n# Technical_Why: keep it\nx = 1\n```";
        let parsed = ResponseParser::parse(raw);

        assert_eq!(parsed.positive_rephrasing, "p");
        assert_eq!(parsed.technical_why, DEFAULT_TECHNICAL_WHY);
        assert_eq!(
            parsed.code_example.as_deref(),
            Some("# Technical_Why: keep it\nx = 1")
        );
    }

    #[test]
    fn unclosed_fence_still_protects_code() {
        let raw = "TECHNICAL_WHY: w\nCODE_EXAMPLE:\n```\n// suggested_improvement: later\nlet y = 2;";
        let parsed = ResponseParser::parse(raw);

        assert_eq!(parsed.technical_why, "w");
        assert_eq!(parsed.suggested_improvement, DEFAULT_SUGGESTED_IMPROVEMENT);
        assert_eq!(
            parsed.code_example.as_deref(),
            Some("// suggested_improvement: later\nlet y = 2;")
        );
    }

    #[test]
    fn fence_opened_on_label_line_protects_code() {
        let raw = "CODE_EXAMPLE: ```js\n// TECHNICAL_WHY: inline note\nlet a = 1;\n```";
        let parsed = ResponseParser::parse(raw);

        assert_eq!(parsed.technical_why, DEFAULT_TECHNICAL_WHY);
        assert_eq!(
            parsed.code_example.as_deref(),
            Some("// TECHNICAL_WHY: inline note\nlet a = 1;")
        );
    }

    #[test]
    fn bare_language_tag_is_not_a_code_example() {
        let parsed = ResponseParser::parse("CODE_EXAMPLE: ```python");
        assert!(parsed.code_example.is_none());

        let parsed = ResponseParser::parse("CODE_EXAMPLE:\n```rust\n```");
        assert!(parsed.code_example.is_none());
    }

    #[test]
    fn inline_fence_drops_language_tag() {
        let parsed = ResponseParser::parse("CODE_EXAMPLE: ```rust fn x() {}```");
        assert_eq!(parsed.code_example.as_deref(), Some("fn x() {}"));

        let parsed = ResponseParser::parse("CODE_EXAMPLE: ```total += 1```");
        assert_eq!(parsed.code_example.as_deref(), Some("total += 1"));
    }

    #[test]
    fn list_prefixes_are_part_of_the_marker() {
        let parsed = ResponseParser::parse("1. POSITIVE_REPHRASING: p\n2. TECHNICAL_WHY: w");
        assert_eq!(parsed.positive_rephrasing, "p");
        assert_eq!(parsed.technical_why, "w");

        let parsed = ResponseParser::parse(
            "- **POSITIVE_REPHRASING:** p\n- **TECHNICAL_WHY:** w\n* SUGGESTED_IMPROVEMENT: s",
        );
        assert_eq!(parsed.positive_rephrasing, "p");
        assert_eq!(parsed.technical_why, "w");
        assert_eq!(parsed.suggested_improvement, "s");
    }
}
