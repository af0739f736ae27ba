//! Rich-text markup helpers

use std::borrow::Cow;

/// Strip tags from a markup fragment and decode entities.
///
/// `<span class="keyword">const</span> x &amp; y` becomes `const x & y`.
pub fn plain_text(markup: &str) -> String {
    let mut stripped = String::with_capacity(markup.len());
    let mut in_tag = false;

    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    match html_escape::decode_html_entities(&stripped) {
        Cow::Borrowed(_) => stripped,
        Cow::Owned(decoded) => decoded,
    }
}

/// Escape plain text so it can be embedded in markup verbatim
pub fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "wbr"];

/// Split a markup fragment on newlines so every line is balanced on its own.
///
/// Elements still open at a line break are closed at the end of that line
/// and opened again, with the same attributes, at the start of the next.
/// Plain text of each line is unchanged.
pub fn split_lines(markup: &str) -> Vec<String> {
    // (element name, opening tag as written)
    let mut open: Vec<(String, String)> = Vec::new();
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut tag: Option<String> = None;

    for ch in markup.chars() {
        if let Some(pending) = tag.as_mut() {
            pending.push(ch);
            if ch == '>' {
                if let Some(text) = tag.take() {
                    track_tag(&mut open, &text);
                    line.push_str(&text);
                }
            }
            continue;
        }
        match ch {
            '<' => tag = Some(String::from('<')),
            '\n' => {
                for (name, _) in open.iter().rev() {
                    line.push_str(&format!("</{name}>"));
                }
                lines.push(std::mem::take(&mut line));
                for (_, opening) in &open {
                    line.push_str(opening);
                }
            }
            _ => line.push(ch),
        }
    }
    if let Some(text) = tag {
        line.push_str(&text);
    }
    lines.push(line);
    lines
}

fn track_tag(open: &mut Vec<(String, String)>, tag: &str) {
    let inner = tag.trim_start_matches('<').trim_end_matches('>');
    if inner.starts_with('!') || inner.starts_with('?') || inner.ends_with('/') {
        return;
    }
    if let Some(closing) = inner.strip_prefix('/') {
        let name = closing.trim().to_ascii_lowercase();
        if let Some(pos) = open.iter().rposition(|(open_name, _)| *open_name == name) {
            open.truncate(pos);
        }
        return;
    }
    let name: String = inner
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if !name.is_empty() && !VOID_ELEMENTS.contains(&name.as_str()) {
        open.push((name, tag.to_string()));
    }
}
