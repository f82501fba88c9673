//! Styled text runs.
//!
//! A [`Span`] is a piece of text with optional overrides for size and color plus a
//! [`FontStyle`].  Spans are resolved against the [`TextStyle`] of the paragraph they belong to,
//! producing [`StyledSpan`] values that carry a [`genpdf`][genpdf] styled string together with the
//! decorations `genpdf` cannot draw on its own.
//!
//! [genpdf]: https://docs.rs/genpdf/

use genpdf::style::{Color, StyledString};

use crate::style::{FontStyle, StyleFlags, TextStyle};

/// A run of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    size: Option<u8>,
    color: Option<Color>,
    style: FontStyle,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the font size override, if any.
    pub fn size(&self) -> Option<u8> {
        self.size
    }

    /// Returns the configured color for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the style value of the span.
    pub fn font_style(&self) -> FontStyle {
        self.style
    }

    pub fn is_bold(&self) -> bool {
        self.style.contains(StyleFlags::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.style.contains(StyleFlags::ITALIC)
    }

    pub fn is_underlined(&self) -> bool {
        self.style.contains(StyleFlags::UNDERLINE)
    }

    pub fn is_struck_through(&self) -> bool {
        self.style.contains(StyleFlags::STRIKETHROUGH)
    }

    /// Adds `flags` to the span style and returns the updated span.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.style = self.style.apply(flags);
        self
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(self) -> Self {
        self.with_flags(StyleFlags::BOLD)
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(self) -> Self {
        self.with_flags(StyleFlags::ITALIC)
    }

    /// Convenience shorthand that marks the span as underlined.
    pub fn underline(self) -> Self {
        self.with_flags(StyleFlags::UNDERLINE)
    }

    /// Convenience shorthand that marks the span as struck through.
    pub fn strikethrough(self) -> Self {
        self.with_flags(StyleFlags::STRIKETHROUGH)
    }

    /// Convenience shorthand that assigns a color to the span.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Overrides the font size of the span.
    pub fn sized(mut self, size: u8) -> Self {
        self.size = Some(size);
        self
    }

    /// Resolves the span against the style of the enclosing paragraph.
    ///
    /// Unset overrides fall back to `base`; flags are combined with the base flags.
    pub fn resolve(&self, base: &TextStyle) -> TextStyle {
        let mut style = *base;
        if let Some(size) = self.size {
            style.set_size(size);
        }
        if let Some(color) = self.color {
            style.set_color(color);
        }
        style.with_flags(self.style.flags())
    }

    /// Converts the span to a [`StyledSpan`] using `base` for unset attributes.
    pub fn to_styled_span(&self, base: &TextStyle) -> StyledSpan {
        let resolved = self.resolve(base);
        StyledSpan::new(
            StyledString::new(self.text.clone(), resolved.to_genpdf_style()),
            resolved.flags(),
        )
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Span::new(text)
    }
}

impl From<String> for Span {
    fn from(text: String) -> Self {
        Span::new(text)
    }
}

/// A styled string ready for `genpdf` together with the full decoration flags.
#[derive(Clone, Debug)]
pub struct StyledSpan {
    /// The styled text fragment.
    pub string: StyledString,
    /// Decorations of the fragment, including the ones drawn as strokes.
    pub flags: StyleFlags,
}

impl StyledSpan {
    /// Creates a new styled span.
    pub fn new(string: StyledString, flags: StyleFlags) -> Self {
        Self { string, flags }
    }

    /// Returns whether the fragment needs an underline stroke.
    pub fn underline(&self) -> bool {
        self.flags.contains(StyleFlags::UNDERLINE)
    }

    /// Returns whether the fragment needs a strikethrough stroke.
    pub fn strikethrough(&self) -> bool {
        self.flags.contains(StyleFlags::STRIKETHROUGH)
    }

    /// Returns whether any stroke decoration is required.
    pub fn is_decorated(&self) -> bool {
        self.underline() || self.strikethrough()
    }
}

/// Resolves a sequence of [`Span`] values against `base`.
pub fn spans_to_styled_strings<'a, I>(spans: I, base: &TextStyle) -> Vec<StyledSpan>
where
    I: IntoIterator<Item = &'a Span>,
{
    spans
        .into_iter()
        .map(|span| span.to_styled_span(base))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_resolves_against_base_style() {
        let base = TextStyle::new(12, Color::Rgb(0, 0, 0));
        let span = Span::new("Hello")
            .bold()
            .italic()
            .colored(Color::Rgb(10, 20, 30));
        let styled = span.to_styled_span(&base);
        assert_eq!(styled.string.s, "Hello");
        assert!(styled.string.style.is_bold());
        assert!(styled.string.style.is_italic());
        assert_eq!(styled.string.style.color(), Some(Color::Rgb(10, 20, 30)));
        assert_eq!(styled.string.style.font_size(), 12);
    }

    #[test]
    fn styled_span_keeps_stroke_decorations() {
        let base = TextStyle::default();
        let styled = Span::new("Underline me")
            .underline()
            .strikethrough()
            .to_styled_span(&base);
        assert!(styled.underline());
        assert!(styled.strikethrough());
    }

    #[test]
    fn span_flags_combine_with_base_flags() {
        let mut base = TextStyle::default();
        base.set_italic();
        let resolved = Span::new("x").bold().sized(20).resolve(&base);
        assert_eq!(resolved.flags(), StyleFlags::BOLD | StyleFlags::ITALIC);
        assert_eq!(resolved.size(), 20);
    }

    #[test]
    fn plain_span_is_not_decorated() {
        let styled = Span::new("plain").to_styled_span(&TextStyle::default());
        assert!(!styled.is_decorated());
        assert!(!styled.string.style.is_bold());
    }
}
