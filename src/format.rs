//! Markdown formatting transforms
//!
//! Each format is a pure transform over the selected text: it returns the
//! replacement string plus a hint for where the caret (or selection) should
//! land inside it. Wrap-style formats toggle: applying them to text that
//! already carries their markup strips it again. Empty selections get a
//! descriptive placeholder so the user has something to type over.

/// URL placeholder inserted by [`Format::Link`].
const LINK_URL: &str = "https://example.com";
/// URL placeholder inserted by [`Format::Image`].
const IMAGE_URL: &str = "image-url";

const TABLE_TEMPLATE: &str = "| Header 1 | Header 2 | Header 3 |\n|----------|----------|----------|\n| Cell 1 | Cell 2 | Cell 3 |\n| Cell 4 | Cell 5 | Cell 6 |";

/// A formatting command, one variant per toolbar/shortcut operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Highlight,
    Heading1,
    Heading2,
    Heading3,
    /// Strip a leading heading marker
    Normal,
    BulletList,
    NumberedList,
    Quote,
    /// Inline backticks, or a fenced block when the selection spans lines
    Code,
    Link,
    Image,
    Table,
    /// Horizontal rule
    Rule,
    Checkbox,
}

/// Where the caret should land after the replacement is spliced in.
///
/// Offsets are char positions relative to the start of the inserted text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    /// Immediately after the inserted text, zero-length selection
    After,
    /// Select a span of the inserted text (used to put the URL placeholder
    /// under the caret for immediate replacement)
    Select { start: usize, len: usize },
}

/// Result of applying a format to a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatResult {
    /// Replacement for the selected text
    pub insert: String,
    pub cursor: CursorHint,
}

impl FormatResult {
    fn after(insert: String) -> Self {
        Self {
            insert,
            cursor: CursorHint::After,
        }
    }

    /// Select the first occurrence of `token` inside the inserted text.
    fn selecting(insert: String, token: &str) -> Self {
        let cursor = match insert.find(token) {
            Some(byte_idx) => CursorHint::Select {
                start: insert[..byte_idx].chars().count(),
                len: token.chars().count(),
            },
            None => CursorHint::After,
        };
        Self { insert, cursor }
    }
}

impl Format {
    /// Apply this format to the selected text.
    ///
    /// Total function: every variant produces a result, there are no error
    /// conditions.
    pub fn apply(self, selected: &str) -> FormatResult {
        match self {
            Format::Bold => toggle_wrap(selected, "**", "**", "bold text"),
            Format::Italic => {
                // a single '*' must not be mistaken for bold markup
                if selected.starts_with('*')
                    && selected.ends_with('*')
                    && !selected.starts_with("**")
                {
                    FormatResult::after(strip_delims(selected, 1, 1))
                } else {
                    FormatResult::after(format!("*{}*", or_placeholder(selected, "italic text")))
                }
            }
            Format::Underline => toggle_wrap(selected, "<u>", "</u>", "underlined text"),
            Format::Strikethrough => toggle_wrap(selected, "~~", "~~", "strikethrough text"),
            Format::Highlight => toggle_wrap(selected, "==", "==", "highlighted text"),
            Format::Heading1 => {
                FormatResult::after(format!("# {}", or_placeholder(selected, "Heading 1")))
            }
            Format::Heading2 => {
                FormatResult::after(format!("## {}", or_placeholder(selected, "Heading 2")))
            }
            Format::Heading3 => {
                FormatResult::after(format!("### {}", or_placeholder(selected, "Heading 3")))
            }
            Format::Normal => FormatResult::after(strip_heading(selected)),
            Format::BulletList => {
                FormatResult::after(format!("- {}", or_placeholder(selected, "List item")))
            }
            Format::NumberedList => {
                FormatResult::after(format!("1. {}", or_placeholder(selected, "List item")))
            }
            Format::Quote => {
                FormatResult::after(format!("> {}", or_placeholder(selected, "Quote text")))
            }
            Format::Code => {
                let body = or_placeholder(selected, "code");
                if selected.contains('\n') {
                    FormatResult::after(format!("```\n{body}\n```"))
                } else {
                    FormatResult::after(format!("`{body}`"))
                }
            }
            Format::Link => FormatResult::selecting(
                format!("[{}]({LINK_URL})", or_placeholder(selected, "link text")),
                LINK_URL,
            ),
            Format::Image => FormatResult::selecting(
                format!("![{}]({IMAGE_URL})", or_placeholder(selected, "alt text")),
                IMAGE_URL,
            ),
            Format::Table => FormatResult::after(TABLE_TEMPLATE.to_string()),
            Format::Rule => FormatResult::after("\n---\n".to_string()),
            Format::Checkbox => {
                FormatResult::after(format!("- [ ] {}", or_placeholder(selected, "Task item")))
            }
        }
    }
}

fn or_placeholder<'a>(selected: &'a str, placeholder: &'a str) -> &'a str {
    if selected.is_empty() {
        placeholder
    } else {
        selected
    }
}

/// Wrap in `prefix`/`suffix`, or strip them when both are already present.
fn toggle_wrap(selected: &str, prefix: &str, suffix: &str, placeholder: &str) -> FormatResult {
    if selected.starts_with(prefix) && selected.ends_with(suffix) {
        FormatResult::after(strip_delims(selected, prefix.len(), suffix.len()))
    } else {
        FormatResult::after(format!(
            "{prefix}{}{suffix}",
            or_placeholder(selected, placeholder)
        ))
    }
}

/// Drop `prefix_len` bytes from the front and `suffix_len` from the back.
///
/// All delimiters are ASCII, so byte slicing stays on char boundaries.
/// Degenerate inputs where the delimiters overlap (a lone `*` under
/// italic) collapse to the empty string instead of panicking.
fn strip_delims(text: &str, prefix_len: usize, suffix_len: usize) -> String {
    if text.len() >= prefix_len + suffix_len {
        text[prefix_len..text.len() - suffix_len].to_string()
    } else {
        String::new()
    }
}

/// Strip one leading run of 1–6 `#` plus the single whitespace char after
/// it. Seven or more hashes are not a heading and pass through unchanged.
fn strip_heading(text: &str) -> String {
    let hashes = text.bytes().take_while(|b| *b == b'#').count();
    if (1..=6).contains(&hashes) {
        let rest = &text[hashes..];
        let mut chars = rest.chars();
        if chars.next().is_some_and(char::is_whitespace) {
            return chars.as_str().to_string();
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(format: Format, selected: &str) -> String {
        format.apply(selected).insert
    }

    #[test]
    fn test_bold_round_trip() {
        let once = insert(Format::Bold, "x");
        assert_eq!(once, "**x**");
        assert_eq!(insert(Format::Bold, &once), "x");
    }

    #[test]
    fn test_wrap_placeholders_on_empty_selection() {
        assert_eq!(insert(Format::Bold, ""), "**bold text**");
        assert_eq!(insert(Format::Italic, ""), "*italic text*");
        assert_eq!(insert(Format::Underline, ""), "<u>underlined text</u>");
        assert_eq!(insert(Format::Strikethrough, ""), "~~strikethrough text~~");
        assert_eq!(insert(Format::Highlight, ""), "==highlighted text==");
        assert_eq!(insert(Format::Code, ""), "`code`");
        assert_eq!(insert(Format::Checkbox, ""), "- [ ] Task item");
    }

    #[test]
    fn test_italic_does_not_unwrap_bold() {
        // "**x**" starts with '*' but is bold markup, so italic wraps it
        assert_eq!(insert(Format::Italic, "**x**"), "***x***");
        assert_eq!(insert(Format::Italic, "*x*"), "x");
    }

    #[test]
    fn test_degenerate_toggles_do_not_panic() {
        assert_eq!(insert(Format::Italic, "*"), "");
        assert_eq!(insert(Format::Bold, "***"), "");
        assert_eq!(insert(Format::Highlight, "=="), "");
    }

    #[test]
    fn test_underline_and_strikethrough_toggle() {
        assert_eq!(insert(Format::Underline, "note"), "<u>note</u>");
        assert_eq!(insert(Format::Underline, "<u>note</u>"), "note");
        assert_eq!(insert(Format::Strikethrough, "~~done~~"), "done");
    }

    #[test]
    fn test_headings_always_apply() {
        assert_eq!(insert(Format::Heading1, "Title"), "# Title");
        assert_eq!(insert(Format::Heading2, ""), "## Heading 2");
        assert_eq!(insert(Format::Heading3, "# nested"), "### # nested");
    }

    #[test]
    fn test_normal_strips_heading_markers() {
        assert_eq!(insert(Format::Normal, "## Title"), "Title");
        assert_eq!(insert(Format::Normal, "###### deep"), "deep");
        // seven hashes is not a heading
        assert_eq!(insert(Format::Normal, "####### x"), "####### x");
        assert_eq!(insert(Format::Normal, "#no-space"), "#no-space");
        assert_eq!(insert(Format::Normal, "plain"), "plain");
    }

    #[test]
    fn test_code_picks_fence_by_newline() {
        assert_eq!(insert(Format::Code, "let x = 1;"), "`let x = 1;`");
        assert_eq!(insert(Format::Code, "a\nb"), "```\na\nb\n```");
    }

    #[test]
    fn test_link_selects_url_placeholder() {
        let result = Format::Link.apply("docs");
        assert_eq!(result.insert, "[docs](https://example.com)");
        assert_eq!(
            result.cursor,
            CursorHint::Select { start: 7, len: 19 } // over the URL
        );
    }

    #[test]
    fn test_link_hint_counts_chars_not_bytes() {
        let result = Format::Link.apply("héllo");
        assert_eq!(result.insert, "[héllo](https://example.com)");
        assert_eq!(result.cursor, CursorHint::Select { start: 8, len: 19 });
    }

    #[test]
    fn test_image_selects_url_placeholder() {
        let result = Format::Image.apply("");
        assert_eq!(result.insert, "![alt text](image-url)");
        assert_eq!(result.cursor, CursorHint::Select { start: 12, len: 9 });
    }

    #[test]
    fn test_block_inserts_ignore_selection() {
        assert_eq!(insert(Format::Rule, "anything"), "\n---\n");
        assert!(insert(Format::Table, "anything").starts_with("| Header 1 "));
        assert_eq!(insert(Format::Table, "").lines().count(), 4);
    }

    #[test]
    fn test_lists_and_quote_prefix() {
        assert_eq!(insert(Format::BulletList, "milk"), "- milk");
        assert_eq!(insert(Format::NumberedList, ""), "1. List item");
        assert_eq!(insert(Format::Quote, "wise words"), "> wise words");
    }
}
