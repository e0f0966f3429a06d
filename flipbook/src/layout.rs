//! Responsive scaling of the fixed-size book into the viewport.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Uniform scale that fits `nominal` inside `viewport`.
pub fn scale_factor(viewport: Size, nominal: Size) -> f64 {
    (viewport.width / nominal.width).min(viewport.height / nominal.height)
}

/// CSS `transform` value for a scale factor.
pub fn scale_transform(scale: f64) -> String {
    format!("scale({scale})")
}

/// Value of the `--vh` custom property: one percent of the real inner height.
pub fn viewport_unit(inner_height: f64) -> String {
    format!("{}px", inner_height / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOMINAL: Size = Size::new(720.0, 1280.0);

    #[test]
    fn wide_viewport_is_height_bound() {
        assert_eq!(scale_factor(Size::new(1440.0, 1280.0), NOMINAL), 1.0);
    }

    #[test]
    fn narrow_viewport_is_width_bound() {
        assert_eq!(scale_factor(Size::new(360.0, 1280.0), NOMINAL), 0.5);
        assert_eq!(scale_factor(Size::new(1440.0, 2560.0), NOMINAL), 2.0);
    }

    #[test]
    fn css_values() {
        assert_eq!(scale_transform(0.5), "scale(0.5)");
        assert_eq!(scale_transform(1.0), "scale(1)");
        assert_eq!(viewport_unit(800.0), "8px");
    }
}
