//! Markdown to HTML conversion for mdp.
//!
//! Wraps `pulldown-cmark` with the option set the preview page expects and
//! produces the fragment returned by the `/convert` endpoint.
//!
//! # Example
//!
//! ```
//! use mdp_render::MarkdownConverter;
//!
//! let converter = MarkdownConverter::new();
//! let html = converter.render_fragment("# Hello\n\n**Bold** text");
//! assert!(html.starts_with(r#"<div class="markdown-body">"#));
//! ```

use pulldown_cmark::{Options, Parser, html};

/// CSS class of the element wrapping converted markdown.
pub const FRAGMENT_CLASS: &str = "markdown-body";

/// Stateless markdown converter.
///
/// GitHub Flavored Markdown extensions are enabled by default.
#[derive(Clone, Copy, Debug)]
pub struct MarkdownConverter {
    gfm: bool,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    /// Create a converter with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    /// - Footnotes
    /// - Heading attributes (`# Title {#id .class}`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_HEADING_ATTRIBUTES
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Convert markdown to an HTML string.
    #[must_use]
    pub fn convert(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }

    /// Convert markdown and wrap the result in the preview container element.
    #[must_use]
    pub fn render_fragment(&self, markdown: &str) -> String {
        tracing::debug!(length = markdown.len(), "Converting markdown content");

        let html = self.convert(markdown);
        tracing::debug!(length = html.len(), "Generated HTML");

        format!(r#"<div class="{FRAGMENT_CLASS}">{html}</div>"#)
    }
}
