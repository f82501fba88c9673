//! Per-side border settings for cells and rectangles.

use genpdf::style::Color;

/// Default border width in millimetres, roughly half a point.
pub const DEFAULT_BORDER_WIDTH_MM: f64 = 0.2;

/// Color and width of a single border side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderLine {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in millimetres. Zero disables the side.
    pub width: f64,
}

impl BorderLine {
    /// Creates a border line.
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    /// Returns whether the side produces a visible stroke.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

impl Default for BorderLine {
    fn default() -> Self {
        Self::new(Color::Rgb(0, 0, 0), DEFAULT_BORDER_WIDTH_MM)
    }
}

/// Border settings for the four sides of a rectangular region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Borders {
    pub left: BorderLine,
    pub right: BorderLine,
    pub top: BorderLine,
    pub bottom: BorderLine,
}

impl Borders {
    /// Uses the same line on every side.
    pub fn uniform(line: BorderLine) -> Self {
        Self {
            left: line,
            right: line,
            top: line,
            bottom: line,
        }
    }

    /// Borders with zero width on every side.
    pub fn none() -> Self {
        Self::uniform(BorderLine::new(Color::Rgb(0, 0, 0), 0.0))
    }

    /// Returns the line configured for `side`.
    pub fn side(&self, side: BorderSide) -> &BorderLine {
        match side {
            BorderSide::Left => &self.left,
            BorderSide::Right => &self.right,
            BorderSide::Top => &self.top,
            BorderSide::Bottom => &self.bottom,
        }
    }

    fn side_mut(&mut self, side: BorderSide) -> &mut BorderLine {
        match side {
            BorderSide::Left => &mut self.left,
            BorderSide::Right => &mut self.right,
            BorderSide::Top => &mut self.top,
            BorderSide::Bottom => &mut self.bottom,
        }
    }

    /// Applies the same optional overrides to each of `sides`.
    ///
    /// Pass [`BorderSide::ALL`] to touch every side.  `None` leaves the current value in place.
    pub fn set_all(&mut self, width: Option<f64>, color: Option<Color>, sides: &[BorderSide]) {
        for side in sides {
            side.apply(self, color, width);
        }
    }

    pub fn set_left(&mut self, width: Option<f64>, color: Option<Color>) {
        BorderSide::Left.apply(self, color, width);
    }

    pub fn set_right(&mut self, width: Option<f64>, color: Option<Color>) {
        BorderSide::Right.apply(self, color, width);
    }

    pub fn set_top(&mut self, width: Option<f64>, color: Option<Color>) {
        BorderSide::Top.apply(self, color, width);
    }

    pub fn set_bottom(&mut self, width: Option<f64>, color: Option<Color>) {
        BorderSide::Bottom.apply(self, color, width);
    }
}

/// One side of a rectangular region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl BorderSide {
    /// All four sides.
    pub const ALL: [BorderSide; 4] = [
        BorderSide::Left,
        BorderSide::Right,
        BorderSide::Top,
        BorderSide::Bottom,
    ];

    /// Overrides the color and/or width of this side on `borders`.
    pub fn apply(self, borders: &mut Borders, color: Option<Color>, width: Option<f64>) {
        let line = borders.side_mut(self);
        if let Some(color) = color {
            line.color = color;
        }
        if let Some(width) = width {
            line.width = width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_leaves_borders_untouched() {
        let mut borders = Borders::default();
        borders.set_top(Some(1.5), Some(Color::Rgb(200, 0, 0)));
        let before = borders;

        for side in BorderSide::ALL {
            side.apply(&mut borders, None, None);
        }
        borders.set_all(None, None, &BorderSide::ALL);

        assert_eq!(borders, before);
    }

    #[test]
    fn side_override_only_touches_that_side() {
        let mut borders = Borders::default();
        borders.set_left(Some(2.0), None);

        assert_eq!(borders.left.width, 2.0);
        assert_eq!(borders.left.color, Color::Rgb(0, 0, 0));
        assert_eq!(borders.right, BorderLine::default());
        assert_eq!(borders.top, BorderLine::default());
        assert_eq!(borders.bottom, BorderLine::default());
    }

    #[test]
    fn color_and_width_are_independent() {
        let mut borders = Borders::default();
        BorderSide::Bottom.apply(&mut borders, Some(Color::Greyscale(128)), None);
        assert_eq!(borders.bottom.color, Color::Greyscale(128));
        assert_eq!(borders.bottom.width, DEFAULT_BORDER_WIDTH_MM);
    }

    #[test]
    fn batch_form_respects_side_subset() {
        let mut borders = Borders::none();
        borders.set_all(
            Some(0.5),
            Some(Color::Rgb(0, 0, 255)),
            &[BorderSide::Top, BorderSide::Bottom],
        );

        assert!(borders.top.is_visible());
        assert!(borders.bottom.is_visible());
        assert!(!borders.left.is_visible());
        assert!(!borders.right.is_visible());
    }
}
