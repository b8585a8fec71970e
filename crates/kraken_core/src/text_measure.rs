//! Text measurement for layout
//!
//! Provides a trait for measuring label widths during text-driven block
//! bounds. Font metrics live elsewhere; the interface only needs widths.

/// Text measurement result
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMetrics {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

/// Trait for measuring text dimensions
///
/// Implement this trait to provide accurate text measurement during layout.
/// Without a real font backend, [`EstimatedTextMeasurer`] is used.
pub trait TextMeasurer {
    /// Measure the dimensions of a single line of text
    ///
    /// # Arguments
    /// * `text` - The text to measure
    /// * `font_size` - Font size in pixels
    fn measure(&self, text: &str, font_size: f32) -> TextMetrics;

    /// Width only (convenience method)
    fn width(&self, text: &str, font_size: f32) -> f32 {
        self.measure(text, font_size).width
    }
}

/// A text measurer that uses estimates
///
/// ~0.55 * font_size per character, conservative for proportional fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMeasurer;

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> TextMetrics {
        let char_count = text.chars().count() as f32;
        TextMetrics {
            width: char_count * font_size * 0.55,
            height: font_size * 1.2,
        }
    }
}

/// Fixed advance per character, handy for layout tests
#[derive(Debug, Clone, Copy)]
pub struct MonospaceTextMeasurer {
    pub advance: f32,
}

impl TextMeasurer for MonospaceTextMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f32 * self.advance,
            height: font_size,
        }
    }
}
