//! HTML to plain text conversion

use std::iter::Peekable;
use std::str::Chars;

/// Elements whose content is dropped
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "template", "head",
];

/// Elements that end a line when they close
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "section", "article",
    "header", "footer", "blockquote", "pre", "table", "ul", "ol",
];

/// Elements that also start a new line when they open
const LEADING_BREAK_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Convert HTML to plain text
///
/// Tags are removed, the content of scripts, styles and similar elements is
/// dropped, common entities are decoded and whitespace is collapsed with at
/// most one blank line between blocks.
pub fn html_to_text(html: &str) -> String {
    let mut output = String::with_capacity(html.len() / 2);
    let mut skipping: Vec<String> = Vec::new();
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            if skipping.is_empty() {
                output.push(decode_entity(c, &mut chars));
            }
            continue;
        }

        let tag = read_tag(&mut chars);
        let Some((name, closing)) = tag_name(&tag) else {
            continue;
        };

        if SKIP_TAGS.contains(&name.as_str()) {
            if closing {
                if let Some(pos) = skipping.iter().rposition(|t| *t == name) {
                    skipping.truncate(pos);
                }
            } else if !tag.ends_with('/') {
                skipping.push(name);
            }
            continue;
        }

        if !skipping.is_empty() {
            continue;
        }

        let name = name.as_str();
        if (closing || name == "br") && BLOCK_TAGS.contains(&name) {
            output.push('\n');
        } else if !closing && LEADING_BREAK_TAGS.contains(&name) {
            output.push('\n');
        }
    }

    clean_whitespace(&output)
}

/// Consume characters up to and including the closing `>`
fn read_tag(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut tag = String::new();
    for c in chars.by_ref() {
        if c == '>' {
            break;
        }
        tag.push(c);
    }
    tag
}

/// Lowercase element name and whether the tag is a closing tag
fn tag_name(tag: &str) -> Option<(String, bool)> {
    let lower = tag.trim().to_ascii_lowercase();
    let (closing, rest) = match lower.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, lower.as_str()),
    };
    let name = rest
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some((name.to_string(), closing))
    }
}

/// Decode an entity starting at `&`, leaving the input untouched if invalid
fn decode_entity(c: char, chars: &mut Peekable<Chars<'_>>) -> char {
    if c != '&' {
        return c;
    }

    let mut lookahead = chars.clone();
    let mut entity = String::new();
    loop {
        match lookahead.next() {
            Some(';') => break,
            Some(ch) if (ch.is_ascii_alphanumeric() || ch == '#') && entity.len() < 10 => {
                entity.push(ch)
            }
            _ => return '&',
        }
    }

    match named_entity(&entity).or_else(|| numeric_entity(&entity)) {
        Some(decoded) => {
            *chars = lookahead;
            decoded
        }
        None => '&',
    }
}

fn named_entity(entity: &str) -> Option<char> {
    let ch = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "mdash" => '—',
        "ndash" => '–',
        "hellip" => '…',
        "copy" => '©',
        "reg" => '®',
        _ => return None,
    };
    Some(ch)
}

fn numeric_entity(entity: &str) -> Option<char> {
    let num = entity.strip_prefix('#')?;
    let code = match num.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => num.parse().ok()?,
    };
    char::from_u32(code)
}

/// Collapse runs of whitespace within lines and keep at most one blank line
fn clean_whitespace(s: &str) -> String {
    let mut result = String::new();
    let mut pending_blank = false;

    for line in s.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_blank = true;
            continue;
        }
        if !result.is_empty() {
            result.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        result.push_str(&line);
        pending_blank = false;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs() {
        let text = html_to_text("<p>Hello</p><p>World</p>");
        assert_eq!(text, "Hello\n\nWorld");
    }

    #[test]
    fn test_headings_and_body() {
        let html = "<html><head><title>T</title><style>p{}</style></head>\
                    <body><h1>Title</h1><p>Body text</p></body></html>";
        assert_eq!(html_to_text(html), "Title\n\nBody text");
    }

    #[test]
    fn test_list_items_on_own_lines() {
        let text = html_to_text("<ul><li>One</li><li>Two</li></ul>");
        assert_eq!(text, "One\nTwo");
    }

    #[test]
    fn test_skip_script() {
        let html = "<p>Before</p><script>alert('bad');</script><p>After</p>";
        let text = html_to_text(html);
        assert!(text.contains("Before"));
        assert!(text.contains("After"));
        assert!(!text.contains("alert"));
    }

    #[test]
    fn test_inline_tags_removed() {
        let text = html_to_text("<p>A <strong>bold</strong> <a href=\"/x\">link</a></p>");
        assert_eq!(text, "A bold link");
    }

    #[test]
    fn test_br_breaks_line() {
        assert_eq!(html_to_text("one<br/>two<br>three"), "one\ntwo\nthree");
    }

    #[test]
    fn test_entity_decoding() {
        let text = html_to_text("<p>&amp; &lt; &gt; &quot; &apos; &mdash; &copy; &#65; &#x42;</p>");
        assert_eq!(text, "& < > \" ' — © A B");
    }

    #[test]
    fn test_invalid_entity_left_alone() {
        assert_eq!(html_to_text("<p>Tom & Jerry &bogus; x</p>"), "Tom & Jerry &bogus; x");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let text = html_to_text("<div>  lots   of\n\n\n\n   space  </div>");
        assert_eq!(text, "lots of\n\nspace");
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("P class=\"x\""), Some(("p".to_string(), false)));
        assert_eq!(tag_name("/div"), Some(("div".to_string(), true)));
        assert_eq!(tag_name("br/"), Some(("br".to_string(), false)));
        assert_eq!(tag_name(""), None);
    }
}
