//! Text reflow and Pango measurement.

use super::FontDescriptor;

/// Font used when a text graph carries a size but no family.
const FALLBACK_FAMILY: &str = "Sans";

/// Splits `content` into rows no wider than `max_width`.
///
/// Width is measured incrementally on the row built so far plus the next
/// character. `'\n'` always starts a new row. When an alphabetic character
/// overflows while the row ends in an alphabetic run, the whole run moves to
/// the next row; any other overflow breaks at the character. A row never
/// starts empty because of an overflow, so a single glyph wider than
/// `max_width` still gets its own row.
pub fn wrap_rows(content: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut rows = Vec::new();
    let mut row = String::new();

    for ch in content.chars() {
        if ch == '\n' {
            rows.push(std::mem::take(&mut row));
            continue;
        }

        let mut candidate = row.clone();
        candidate.push(ch);
        if row.is_empty() || measure(&candidate) <= max_width {
            row = candidate;
            continue;
        }

        if is_word_char(ch)
            && let Some(start) = trailing_word_start(&row)
            && start > 0
        {
            let word = row.split_off(start);
            rows.push(std::mem::take(&mut row));
            row = word;
            row.push(ch);
            continue;
        }

        rows.push(std::mem::take(&mut row));
        row.push(ch);
    }

    rows.push(row);
    rows
}

/// Byte offset where the row's trailing alphabetic run begins.
fn trailing_word_start(row: &str) -> Option<usize> {
    row.char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map(|(index, _)| index)
}

/// Letters that form words. CJK scripts wrap per character instead.
fn is_word_char(ch: char) -> bool {
    ch.is_alphabetic() && !matches!(ch as u32, 0x2E80..=0x9FFF | 0xAC00..=0xD7AF | 0xF900..=0xFAFF)
}

/// Creates a Pango layout on `ctx` for the given font, if any.
pub fn create_layout(
    ctx: &cairo::Context,
    font: Option<&FontDescriptor>,
    size: Option<f64>,
) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(ctx);
    if font.is_some() || size.is_some() {
        let fallback;
        let font = match font {
            Some(font) => font,
            None => {
                fallback = FontDescriptor::regular(FALLBACK_FAMILY);
                &fallback
            }
        };
        let desc = font.to_pango(size.unwrap_or(14.0));
        layout.set_font_description(Some(&desc));
    }
    layout
}

/// Logical pixel size `(width, height)` of `text` laid out on `layout`.
pub fn layout_size(layout: &pango::Layout, text: &str) -> (f64, f64) {
    layout.set_text(text);
    let (width, height) = layout.pixel_size();
    (width as f64, height as f64)
}

/// A layout on a 1x1 scratch surface, for measuring without a target.
///
/// Returns `None` if Cairo cannot create the scratch surface.
pub fn measuring_layout(font: &FontDescriptor, size: f64) -> Option<pango::Layout> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).ok()?;
    let ctx = cairo::Context::new(&surface).ok()?;
    Some(create_layout(&ctx, Some(font), Some(size)))
}

/// Measures one string without a target surface.
pub fn measure_text(font: &FontDescriptor, size: f64, text: &str) -> Option<(f64, f64)> {
    measuring_layout(font, size).map(|layout| layout_size(&layout, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_px_per_char(s: &str) -> f64 {
        s.chars().count() as f64 * 10.0
    }

    #[test]
    fn words_move_to_the_next_row_whole() {
        // "hello world" is 110 px; "hello " is 60 px
        let rows = wrap_rows("hello world", 105.0, ten_px_per_char);
        assert_eq!(rows, vec!["hello ", "world"]);
    }

    #[test]
    fn digit_runs_break_at_the_overflow() {
        let rows = wrap_rows("12345678901", 105.0, ten_px_per_char);
        assert_eq!(rows, vec!["1234567890", "1"]);
    }

    #[test]
    fn newlines_force_row_breaks() {
        let rows = wrap_rows("ab\n\ncd", 1000.0, ten_px_per_char);
        assert_eq!(rows, vec!["ab", "", "cd"]);
    }

    #[test]
    fn word_filling_a_whole_row_breaks_at_character() {
        let rows = wrap_rows("abcdefghijkl", 55.0, ten_px_per_char);
        assert_eq!(rows, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn oversized_glyph_does_not_produce_empty_rows() {
        let rows = wrap_rows("ab", 5.0, ten_px_per_char);
        assert_eq!(rows, vec!["a", "b"]);
    }

    #[test]
    fn punctuation_overflow_keeps_the_word() {
        let rows = wrap_rows("say hello,", 95.0, ten_px_per_char);
        assert_eq!(rows, vec!["say hello", ","]);
    }

    #[test]
    fn measure_text_reports_positive_extent() {
        let (width, height) =
            measure_text(&FontDescriptor::default(), 16.0, "12").expect("scratch surface");
        assert!(width > 0.0);
        assert!(height > 0.0);
    }
}
