//! HTML and XML text helpers

/// Strip HTML tags from content
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Plain-text summary of rendered HTML: tags stripped, whitespace collapsed
pub fn plain_summary(html: &str, length: usize) -> String {
    let text = strip_html(html);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, length, None)
}

/// Truncate to `length` characters, appending `omission` (default `...`) when cut
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(length).collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Wrap text in a CDATA section. A literal `]]>` is split across two sections.
pub fn cdata(s: &str) -> String {
    format!(
        "<![CDATA[{}]]>",
        strip_invalid_xml_chars(s).replace("]]>", "]]]]><![CDATA[>")
    )
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
