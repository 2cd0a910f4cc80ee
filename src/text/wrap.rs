use crate::text::engine::{FontSpec, TextMeasure};

/// One emitted line of wrapped text and its baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<WrappedLine>,
    /// Baseline for whatever is drawn after this block.
    pub next_y: f64,
}

/// Greedy word wrap.
///
/// Words are appended to the current line while the measured candidate fits in
/// `max_width`. A word wider than `max_width` on its own is emitted alone.
/// Whitespace-only input yields no lines and `next_y == start_y`.
pub fn wrap_lines(
    measure: &mut dyn TextMeasure,
    text: &str,
    font: FontSpec,
    start_y: f64,
    max_width: f64,
    line_height: f64,
) -> WrappedText {
    let mut lines = Vec::new();
    let mut y = start_y;
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if !line.is_empty() && measure.measure(&candidate, font) > max_width {
            lines.push(WrappedLine {
                text: std::mem::replace(&mut line, word.to_string()),
                y,
            });
            y += line_height;
        } else {
            line = candidate;
        }
    }

    if line.is_empty() {
        return WrappedText {
            lines,
            next_y: start_y,
        };
    }
    lines.push(WrappedLine { text: line, y });
    WrappedText {
        lines,
        next_y: y + line_height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
