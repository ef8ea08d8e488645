//! Body rendering seam.

/// Turns a stored question or answer body into display HTML.
pub trait MarkdownRenderer {
    fn render(&self, text: &str) -> String;
}

/// Renders bodies as escaped text with line breaks.
///
/// No markdown is interpreted, and nothing in the input can become an
/// active HTML element.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapingRenderer;

impl MarkdownRenderer for EscapingRenderer {
    fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                '\n' => out.push_str("<br>"),
                '\r' => {}
                _ => out.push(ch),
            }
        }
        out
    }
}
