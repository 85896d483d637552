//! Word measurement interface for the layout pass.
//!
//! Text shaping is not this toolkit's job: words reach the layout engine
//! pre-measured. This trait is the seam where a real shaper plugs in;
//! the layout pass calls it once per word to build the engine's word
//! input, and once per font size for spaces, line heights, and
//! baselines.

use numbat_geom::Pos;

/// Per-font measurements the layout pass needs.
///
/// Implementors provide actual advance widths and vertical metrics from
/// font data. The engine itself never sees this trait; it consumes
/// finished word boxes.
pub trait WordMetrics {
    /// Advance width of one word at the given font size.
    fn word_width(&self, word: &str, font_size: f32) -> Pos;

    /// Advance width of a single inter-word space.
    fn space_width(&self, font_size: f32) -> Pos;

    /// Line height for the font size.
    fn line_height(&self, font_size: f32) -> Pos;

    /// Distance from line top to the text baseline.
    fn ascent(&self, font_size: f32) -> Pos;
}

/// Approximate metrics using fixed ratios.
///
/// Without access to font data we use ratio approximations: the average
/// advance width of Latin glyphs in a proportional font is roughly 0.6×
/// the font size, line height 1.2×, and the baseline sits at about 80%
/// of the line height. Used as a fallback when no shaper is wired up,
/// and in tests.
pub struct ApproximateWordMetrics;

/// Average Latin glyph advance relative to font size.
const CHAR_WIDTH_RATIO: f32 = 0.6;
/// Line height relative to font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;
/// Baseline position relative to line height (ascender ≈ 80% of the
/// line in typical font metrics).
const BASELINE_RATIO: f32 = 0.8;

impl WordMetrics for ApproximateWordMetrics {
    fn word_width(&self, word: &str, font_size: f32) -> Pos {
        Pos::from_px(word.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO)
    }

    fn space_width(&self, font_size: f32) -> Pos {
        self.word_width(" ", font_size)
    }

    fn line_height(&self, font_size: f32) -> Pos {
        Pos::from_px(font_size * LINE_HEIGHT_RATIO)
    }

    fn ascent(&self, font_size: f32) -> Pos {
        Pos::from_px(font_size * LINE_HEIGHT_RATIO * BASELINE_RATIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_length_and_size() {
        let m = ApproximateWordMetrics;
        let short = m.word_width("ab", 16.0);
        let long = m.word_width("abcd", 16.0);
        assert_eq!(long.raw(), short.raw() * 2);

        let big = m.word_width("ab", 32.0);
        assert_eq!(big.raw(), short.raw() * 2);
    }

    #[test]
    fn ascent_is_below_line_height() {
        let m = ApproximateWordMetrics;
        assert!(m.ascent(16.0) < m.line_height(16.0));
    }
}
