//! Page layout wrapper, heading primitive and style records

use std::fmt::Write;

use netclock_time::Locale;

/// Name appended to every page title
pub const SITE_NAME: &str = "netclock";

/// Immutable inline style: a list of CSS declarations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style(pub &'static [(&'static str, &'static str)]);

impl Style {
    /// `prop: value; prop: value`
    pub fn css(&self) -> String {
        self.0
            .iter()
            .map(|(prop, value)| format!("{prop}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// ` style="..."`, ready to splice into a start tag
    pub fn attr(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", escape(&self.css()))
        }
    }
}

/// Title, description and language of a page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub locale: Locale,
}

impl PageMeta {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        PageMeta {
            title: title.into(),
            description: description.into(),
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// Wrap page content into the site document
///
/// `head` is trusted markup appended to `<head>`.
pub fn render_page(meta: &PageMeta, head: &str, content: &str) -> String {
    let mut html = String::with_capacity(content.len() + 512);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n",
        meta.locale.tag()
    );
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        html,
        "<title>{} | {}</title>",
        escape(&meta.title),
        SITE_NAME
    );
    let _ = writeln!(
        html,
        "<meta name=\"description\" content=\"{}\">",
        escape(&meta.description)
    );
    html.push_str(head);
    html.push_str("</head>\n<body>\n<main>\n");
    html.push_str(content);
    html.push_str("\n</main>\n</body>\n</html>\n");
    html
}

/// `<hN>text</hN>` with an optional style, level clamped to 1..=6
pub fn heading(level: u8, text: &str, style: Style) -> String {
    let level = level.clamp(1, 6);
    format!("<h{level}{}>{}</h{level}>", style.attr(), escape(text))
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: Style = Style(&[("padding", "2rem"), ("border-radius", "12px")]);

    #[test]
    fn test_style_attr() {
        assert_eq!(CARD.css(), "padding: 2rem; border-radius: 12px");
        assert_eq!(CARD.attr(), " style=\"padding: 2rem; border-radius: 12px\"");
        assert_eq!(Style(&[]).attr(), "");
    }

    #[test]
    fn test_heading_escapes_and_clamps() {
        assert_eq!(heading(3, "a<b", Style(&[])), "<h3>a&lt;b</h3>");
        assert_eq!(heading(9, "x", Style(&[])), "<h6>x</h6>");
    }

    #[test]
    fn test_render_page_metadata() {
        let meta = PageMeta::new("标准网络时钟", "Network \"Time\" Clock");
        let html = render_page(&meta, "", "<p>body</p>");

        assert!(html.contains("<title>标准网络时钟 | netclock</title>"));
        assert!(html.contains("content=\"Network &quot;Time&quot; Clock\""));
        assert!(html.contains("<main>\n<p>body</p>\n</main>"));
        assert!(html.contains("<html lang=\"zh-CN\">"));
    }

    #[test]
    fn test_render_page_language_follows_locale() {
        let meta = PageMeta::new("Clock", "").with_locale(Locale::EnUs);
        let html = render_page(&meta, "", "");
        assert!(html.contains("<html lang=\"en-US\">"));
        assert!(!html.contains("zh-CN"));
    }
}
