//! Doc-comment lookup and tag parsing.
//!
//! Comments are found by scanning the source text backwards from a node's
//! start offset, so the parser's comment table is not needed. Parsing is
//! lenient: anything that does not look like a tag is dropped and a
//! malformed comment simply yields fewer tags.

use serde::Serialize;

/// Tags whose first word after the optional `{type}` is a name path.
const NAMED_TAGS: &[&str] = &[
    "alias",
    "arg",
    "argument",
    "augments",
    "borrows",
    "callback",
    "class",
    "constructor",
    "event",
    "extends",
    "fires",
    "lends",
    "memberof",
    "mixes",
    "module",
    "name",
    "namespace",
    "param",
    "prop",
    "property",
    "typedef",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTag {
    pub title: String,
    pub name: Option<String>,
    pub type_expression: Option<String>,
    pub description: Option<String>,
}

/// Body of the `/** ... */` comment directly in front of `node_start`.
///
/// Only whitespace may separate the comment from the node, spanning at most
/// one line break. The returned text excludes the `/**` and `*/` markers.
pub fn leading_doc_comment(source: &str, node_start: u32) -> Option<&str> {
    let before = source.get(..node_start as usize)?;
    let trimmed = before.trim_end();
    let gap = &before[trimmed.len()..];
    if gap.matches('\n').count() > 1 || !trimmed.ends_with("*/") {
        return None;
    }

    let comment_end = trimmed.len() - 2;
    let comment_start = trimmed[..comment_end].rfind("/*")?;
    let body = &trimmed[comment_start + 2..comment_end];
    // `/**/` is an empty block comment, not a doc comment.
    if !body.starts_with('*') {
        return None;
    }
    Some(&body[1..])
}

/// Split a doc-comment body into tags.
pub fn parse_tags(text: &str) -> Vec<DocTag> {
    let unwrapped = unwrap(text);
    let mut tags = Vec::new();
    let mut current: Option<String> = None;

    for line in unwrapped.lines() {
        let line = line.trim();
        if line.starts_with('@') {
            if let Some(block) = current.take() {
                tags.extend(parse_tag(&block));
            }
            current = Some(line.to_string());
        } else if let Some(block) = current.as_mut() {
            block.push('\n');
            block.push_str(line);
        }
    }
    if let Some(block) = current {
        tags.extend(parse_tag(&block));
    }
    tags
}

/// Strip the leading `*` decoration from every line.
fn unwrap(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_tag(block: &str) -> Option<DocTag> {
    let rest = block.strip_prefix('@')?;
    let title_len = rest
        .find(|c: char| c.is_whitespace() || c == '{')
        .unwrap_or(rest.len());
    let title = &rest[..title_len];
    if title.is_empty() {
        return None;
    }
    let mut rest = rest[title_len..].trim_start();

    let mut type_expression = None;
    if rest.starts_with('{') {
        let close = matching_brace(rest)?;
        type_expression = Some(rest[1..close].trim().to_string());
        rest = rest[close + 1..].trim_start();
    }

    let mut name = None;
    if NAMED_TAGS.contains(&title) && !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        name = Some(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }

    let description = rest.trim();
    Some(DocTag {
        title: title.to_string(),
        name,
        type_expression,
        description: (!description.is_empty()).then(|| description.to_string()),
    })
}

fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_adjacent_doc_comment() {
        let source = "/**\n * @extends Inferno.Component\n */\nclass Hello {}";
        let start = source.find("class").unwrap() as u32;
        let body = leading_doc_comment(source, start).unwrap();
        assert!(body.contains("@extends Inferno.Component"));
    }

    #[test]
    fn test_ignores_distant_and_plain_comments() {
        let distant = "/** @extends Inferno.Component */\n\n\nclass Hello {}";
        let start = distant.find("class").unwrap() as u32;
        assert!(leading_doc_comment(distant, start).is_none());

        let plain = "/* @extends Inferno.Component */\nclass Hello {}";
        let start = plain.find("class").unwrap() as u32;
        assert!(leading_doc_comment(plain, start).is_none());

        let code = "foo();\nclass Hello {}";
        let start = code.find("class").unwrap() as u32;
        assert!(leading_doc_comment(code, start).is_none());
    }

    #[test]
    fn test_parses_extends_and_augments() {
        let tags = parse_tags("*\n * Greets.\n * @extends Inferno.Component\n * @augments {Base} Other thing\n ");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].title, "extends");
        assert_eq!(tags[0].name.as_deref(), Some("Inferno.Component"));
        assert_eq!(tags[1].title, "augments");
        assert_eq!(tags[1].type_expression.as_deref(), Some("Base"));
        assert_eq!(tags[1].name.as_deref(), Some("Other"));
        assert_eq!(tags[1].description.as_deref(), Some("thing"));
    }

    #[test]
    fn test_malformed_input_yields_no_tags() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags("just prose").is_empty());
        assert!(parse_tags("@ {broken").is_empty());
        let unclosed = parse_tags("@param {string name");
        assert!(unclosed.is_empty());
    }
}
