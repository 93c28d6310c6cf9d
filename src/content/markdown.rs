//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::error::ContentError;

lazy_static! {
    static ref BARE_URL: Regex = Regex::new(r#"(?:https?://|www\.)[^\s<>"']+"#).unwrap();
}

/// Markdown renderer with syntax highlighting.
///
/// Built once per run and shared read-only between content tasks.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme("InspiredGitHub")
    }

    /// Create with a specific syntect theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render markdown to HTML.
    ///
    /// A panic anywhere in parsing or highlighting is caught and reported as
    /// [`ContentError::Render`].
    pub fn render(&self, markdown: &str) -> Result<String, ContentError> {
        guarded(|| self.render_html(markdown))
    }

    fn render_html(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        // Open links and images; text inside them is never linkified
        let mut link_depth = 0usize;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .filter(|l| !l.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link | TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::Text(text) if link_depth == 0 => linkify(text, &mut events),
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block, or escape it when the language is unknown
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let plain = |lang: &str| {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            )
        };

        let Some(lang) = lang else {
            return format!("<pre><code>{}</code></pre>", html_escape(code));
        };

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang));
        let theme = self.theme_set.themes.get(&self.theme_name);

        let (Some(syntax), Some(theme)) = (syntax, theme) else {
            return plain(lang);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                html_escape(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain(lang)
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a render step, turning a panic into a render error
fn guarded<F: FnOnce() -> String>(render: F) -> Result<String, ContentError> {
    panic::catch_unwind(AssertUnwindSafe(render)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        ContentError::Render(message)
    })
}

/// Split a text event so bare URLs become anchors
fn linkify<'a>(text: CowStr<'a>, events: &mut Vec<Event<'a>>) {
    if !BARE_URL.is_match(&text) {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for m in BARE_URL.find_iter(&text) {
        let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
        if url.is_empty() {
            continue;
        }
        let start = m.start();
        let end = start + url.len();

        if start > last {
            events.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }
        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        events.push(Event::Html(CowStr::from(format!(
            r#"<a href="{}">{}</a>"#,
            html_escape(&href),
            html_escape(url)
        ))));
        last = end;
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
