//! Renders turn text to HTML for the transcript.
//!
//! Model output is untrusted so the whole string is HTML escaped
//! first. Only a small markdown subset is turned back into markup
//! afterwards: inline code, bold, italic and line breaks.

use std::sync::LazyLock;

use regex::Regex;

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("Invalid code span regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"));
// Runs after BOLD, so `<` stops a match from spanning a strong tag
static ITALIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^*<\s](?:[^*<\n]*[^*<\s])?)\*").expect("Invalid italic regex")
});

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn emphasize(text: &str) -> String {
    let bold = BOLD.replace_all(text, "<strong>$1</strong>");
    ITALIC.replace_all(&bold, "<em>$1</em>").into_owned()
}

pub fn render_markdown(text: &str) -> String {
    let escaped = escape_html(text);
    let mut html = String::with_capacity(escaped.len());
    let mut last = 0;

    // Emphasis markers inside code spans are left alone
    for caps in CODE_SPAN.captures_iter(&escaped) {
        let (Some(span), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        html.push_str(&emphasize(&escaped[last..span.start()]));
        html.push_str("<code>");
        html.push_str(code.as_str());
        html.push_str("</code>");
        last = span.end();
    }
    html.push_str(&emphasize(&escaped[last..]));

    html.replace("\r\n", "\n").replace('\n', "<br>")
}
