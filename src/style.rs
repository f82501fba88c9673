//! Font style flags and the text style handed to the rendering layer.
//!
//! `genpdf` only understands bold and italic.  Underline and strikethrough are tracked alongside
//! them in [`StyleFlags`] and drawn as strokes by [`crate::elements::DecoratedText`].

use bitflags::bitflags;
use genpdf::style::{Color, Style};

bitflags! {
    /// Independent text decorations combined as a bit set.
    ///
    /// ```
    /// use pdf_dsl::style::StyleFlags;
    ///
    /// let flags = StyleFlags::BOLD | StyleFlags::UNDERLINE;
    /// assert!(flags.contains(StyleFlags::BOLD));
    /// assert!(!flags.contains(StyleFlags::ITALIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold glyphs.
        const BOLD          = 0b0000_0001;
        /// Italic glyphs.
        const ITALIC        = 0b0000_0010;
        /// Stroke below the baseline.
        const UNDERLINE     = 0b0000_0100;
        /// Stroke through the middle of the glyphs.
        const STRIKETHROUGH = 0b0000_1000;
    }
}

/// The style value of a font: either never set, or a combination of [`StyleFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    /// No flag has been applied yet.
    #[default]
    Undefined,
    /// At least one flag has been applied.
    Flags(StyleFlags),
}

impl FontStyle {
    /// Returns the style obtained by adding `flag` to `self`.
    ///
    /// An undefined style becomes exactly `flag`; a defined style becomes the union.
    pub fn apply(self, flag: StyleFlags) -> Self {
        match self {
            FontStyle::Undefined => FontStyle::Flags(flag),
            FontStyle::Flags(current) => FontStyle::Flags(current | flag),
        }
    }

    /// Returns the effective flags, treating an undefined style as empty.
    pub fn flags(self) -> StyleFlags {
        match self {
            FontStyle::Undefined => StyleFlags::empty(),
            FontStyle::Flags(flags) => flags,
        }
    }

    /// Returns whether `flag` is set.
    pub fn contains(self, flag: StyleFlags) -> bool {
        self.flags().contains(flag)
    }

    /// Returns whether no flag has ever been applied.
    pub fn is_undefined(self) -> bool {
        matches!(self, FontStyle::Undefined)
    }
}

impl From<StyleFlags> for FontStyle {
    fn from(flags: StyleFlags) -> Self {
        FontStyle::Undefined.apply(flags)
    }
}

/// Size, color and decorations used for a run of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    size: u8,
    color: Color,
    style: FontStyle,
}

impl TextStyle {
    /// Creates a text style with the given size and color and no decorations.
    pub fn new(size: u8, color: Color) -> Self {
        Self {
            size,
            color,
            style: FontStyle::Undefined,
        }
    }

    /// Font size in points.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Text color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current style value.
    pub fn font_style(&self) -> FontStyle {
        self.style
    }

    /// Effective decoration flags.
    pub fn flags(&self) -> StyleFlags {
        self.style.flags()
    }

    pub fn set_size(&mut self, size: u8) {
        self.size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_bold(&mut self) {
        self.style = self.style.apply(StyleFlags::BOLD);
    }

    pub fn set_italic(&mut self) {
        self.style = self.style.apply(StyleFlags::ITALIC);
    }

    pub fn set_underline(&mut self) {
        self.style = self.style.apply(StyleFlags::UNDERLINE);
    }

    pub fn set_strikethrough(&mut self) {
        self.style = self.style.apply(StyleFlags::STRIKETHROUGH);
    }

    /// Clears every decoration back to the undefined state.
    pub fn set_normal(&mut self) {
        self.style = FontStyle::Undefined;
    }

    /// Applies all flags in `flags` and returns the updated style.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        if !flags.is_empty() {
            self.style = self.style.apply(flags);
        }
        self
    }

    /// Converts the style into the subset understood by `genpdf`.
    pub fn to_genpdf_style(&self) -> Style {
        let mut style = Style::new().with_font_size(self.size).with_color(self.color);
        if self.style.contains(StyleFlags::BOLD) {
            style.set_bold();
        }
        if self.style.contains(StyleFlags::ITALIC) {
            style.set_italic();
        }
        style
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12, Color::Rgb(0, 0, 0))
    }
}
