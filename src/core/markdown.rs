//! Lightweight markdown scanning.
//!
//! Only what the validator needs: prose lines outside fenced code, headings,
//! paragraphs, inline links and link reference definitions. This is not a
//! markdown renderer.

use std::sync::LazyLock;

use regex::Regex;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!?\[[^\]]*\]\(\s*<?([^)\s>]+)>?(?:\s+["'][^"']*["'])?\s*\)"#)
        .expect("link regex is valid")
});

/// `[label]: target` definitions used by reference-style links. Footnote
/// definitions (`[^1]: ...`) are not links.
static LINK_DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}\[([^\]^][^\]]*)\]:\s*<?([^\s>]+)>?(?:\s|$)")
        .expect("link definition regex is valid")
});

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]*`").expect("inline code regex is valid"));

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").expect("scheme regex is valid")
});

/// A markdown link found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink {
    pub target: String,
    /// 1-indexed line in the file the text came from.
    pub line: usize,
}

impl MarkdownLink {
    /// Whether the link points at a file inside the skill rather than a URL or anchor.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !self.target.starts_with('#') && !SCHEME_RE.is_match(&self.target)
    }

    /// Target with any `#fragment` or `?query` removed.
    #[must_use]
    pub fn path_part(&self) -> &str {
        let end = self
            .target
            .find(['#', '?'])
            .unwrap_or(self.target.len());
        &self.target[..end]
    }

    /// `path_part` with percent-escapes such as `%20` decoded.
    ///
    /// Malformed escapes leave the path as written.
    #[must_use]
    pub fn decoded_path(&self) -> String {
        let raw = self.path_part();
        urlencoding::decode(raw).map_or_else(|_| raw.to_string(), std::borrow::Cow::into_owned)
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Lines outside fenced code blocks, with their 1-indexed file line numbers.
pub fn prose_lines(text: &str, first_line: usize) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut in_fence = false;
    for (idx, line) in text.lines().enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            out.push((first_line + idx, line));
        }
    }
    out
}

/// Inline links, images and link reference definitions outside code.
pub fn links(text: &str, first_line: usize) -> Vec<MarkdownLink> {
    let mut out = Vec::new();
    for (line_no, line) in prose_lines(text, first_line) {
        let stripped = INLINE_CODE_RE.replace_all(line, "");
        if let Some(target) = LINK_DEFINITION_RE.captures(&stripped).and_then(|caps| caps.get(2)) {
            out.push(MarkdownLink {
                target: target.as_str().to_string(),
                line: line_no,
            });
            continue;
        }
        for caps in LINK_RE.captures_iter(&stripped) {
            if let Some(target) = caps.get(1) {
                out.push(MarkdownLink {
                    target: target.as_str().to_string(),
                    line: line_no,
                });
            }
        }
    }
    out
}

/// ATX headings as `(level, text, line)`.
pub fn headings(text: &str, first_line: usize) -> Vec<(usize, String, usize)> {
    prose_lines(text, first_line)
        .into_iter()
        .filter_map(|(line_no, line)| {
            let trimmed = line.trim_start();
            let level = trimmed.chars().take_while(|c| *c == '#').count();
            if level == 0 || level > 6 {
                return None;
            }
            let rest = &trimmed[level..];
            if !rest.is_empty() && !rest.starts_with(' ') {
                return None;
            }
            Some((level, rest.trim().trim_end_matches('#').trim().to_string(), line_no))
        })
        .collect()
}

/// Prose paragraphs with whitespace collapsed, paired with their first line.
pub fn paragraphs(text: &str, first_line: usize) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start = first_line;
    let mut previous: Option<usize> = None;

    let mut flush = |current: &mut Vec<&str>, start: usize| {
        if !current.is_empty() {
            out.push((collapse_whitespace(&current.join(" ")), start));
            current.clear();
        }
    };

    for (line_no, line) in prose_lines(text, first_line) {
        let contiguous = previous.is_some_and(|prev| prev + 1 == line_no);
        if line.trim().is_empty() || !contiguous {
            flush(&mut current, start);
        }
        if !line.trim().is_empty() {
            if current.is_empty() {
                start = line_no;
            }
            current.push(line.trim());
        }
        previous = Some(line_no);
    }
    flush(&mut current, start);
    out
}

/// Collapse runs of whitespace into single spaces.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lexically normalize a relative link path.
///
/// Returns `None` for absolute paths and for paths that climb out of the root.
#[must_use]
pub fn normalize_relative(path: &str) -> Option<String> {
    if path.starts_with('/') || path.starts_with('\\') {
        return None;
    }
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_skip_code_and_report_lines() {
        let body = "See [api](references/api.md).\n```\n[not](a-link.md)\n```\nAlso `[code](x.md)` and ![img](assets/logo.png)\n";
        let found = links(body, 10);
        let targets: Vec<_> = found.iter().map(|l| (l.target.as_str(), l.line)).collect();
        assert_eq!(
            targets,
            vec![("references/api.md", 10), ("assets/logo.png", 14)]
        );
    }

    #[test]
    fn link_locality_and_fragments() {
        let url = MarkdownLink { target: "https://example.com".into(), line: 1 };
        let anchor = MarkdownLink { target: "#usage".into(), line: 1 };
        let local = MarkdownLink { target: "references/a.md#part".into(), line: 1 };
        assert!(!url.is_local());
        assert!(!anchor.is_local());
        assert!(local.is_local());
        assert_eq!(local.path_part(), "references/a.md");
    }

    #[test]
    fn link_definitions_are_links() {
        let body = "Read the [API notes][api].\n\n[api]: references/api.md\n  [img]: <assets/logo.png> \"Logo\"\n[^1]: a footnote, not a link\n```\n[x]: inside-fence.md\n```\n";
        let found = links(body, 1);
        let targets: Vec<_> = found.iter().map(|l| (l.target.as_str(), l.line)).collect();
        assert_eq!(targets, vec![("references/api.md", 3), ("assets/logo.png", 4)]);
    }

    #[test]
    fn decoded_path_handles_escapes() {
        let spaced = MarkdownLink { target: "references/my%20notes.md#intro".into(), line: 1 };
        assert_eq!(spaced.decoded_path(), "references/my notes.md");
        let broken = MarkdownLink { target: "references/100%zz.md".into(), line: 1 };
        assert_eq!(broken.decoded_path(), "references/100%zz.md");
    }

    #[test]
    fn link_with_title() {
        let found = links("[x](references/a.md \"Title\")", 1);
        assert_eq!(found[0].target, "references/a.md");
    }

    #[test]
    fn headings_ignore_fenced_hashes() {
        let body = "# Title\n```bash\n# comment\n```\n## Purpose ##\n#hashtag\n";
        let found = headings(body, 1);
        assert_eq!(
            found,
            vec![(1, "Title".to_string(), 1), (2, "Purpose".to_string(), 5)]
        );
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "first line\ncontinues here\n\nsecond   paragraph\n";
        let found = paragraphs(text, 3);
        assert_eq!(
            found,
            vec![
                ("first line continues here".to_string(), 3),
                ("second paragraph".to_string(), 6)
            ]
        );
    }

    #[test]
    fn normalize_relative_paths() {
        assert_eq!(normalize_relative("./references/a.md").as_deref(), Some("references/a.md"));
        assert_eq!(normalize_relative("references/../assets/x").as_deref(), Some("assets/x"));
        assert_eq!(normalize_relative("../outside.md"), None);
        assert_eq!(normalize_relative("/etc/passwd"), None);
    }
}
