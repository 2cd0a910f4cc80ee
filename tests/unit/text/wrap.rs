use super::*;
use crate::text::engine::ApproxMetrics;

// ApproxMetrics at 10px: 5.6px per char.
const F: FontSpec = FontSpec::px(10.0);

#[test]
fn text_within_width_is_one_line() {
    let out = wrap_lines(&mut ApproxMetrics, "Aurora Brew", F, 100.0, 500.0, 80.0);
    assert_eq!(
        out.lines,
        vec![WrappedLine {
            text: "Aurora Brew".to_string(),
            y: 100.0
        }]
    );
    assert_eq!(out.next_y, 180.0);
}

#[test]
fn wide_text_breaks_greedily() {
    // "aaaa bbbb" = 9 chars = 50.4px > 40
    let out = wrap_lines(&mut ApproxMetrics, "aaaa bbbb cc", F, 0.0, 40.0, 10.0);
    let texts: Vec<_> = out.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["aaaa", "bbbb", "cc"]);
    let ys: Vec<_> = out.lines.iter().map(|l| l.y).collect();
    assert_eq!(ys, vec![0.0, 10.0, 20.0]);
    assert_eq!(out.next_y, 30.0);
}

#[test]
fn whitespace_is_normalized() {
    let out = wrap_lines(&mut ApproxMetrics, "  one \n\t two  ", F, 5.0, 1000.0, 10.0);
    assert_eq!(out.lines.len(), 1);
    assert_eq!(out.lines[0].text, "one two");
}

#[test]
fn empty_input_emits_nothing() {
    for text in ["", "   ", "\n\t"] {
        let out = wrap_lines(&mut ApproxMetrics, text, F, 42.0, 100.0, 10.0);
        assert!(out.lines.is_empty());
        assert_eq!(out.next_y, 42.0);
    }
}

#[test]
fn overwide_words_are_never_dropped() {
    let out = wrap_lines(
        &mut ApproxMetrics,
        "Supercalifragilistic Pneumonoultramicroscopic",
        F,
        0.0,
        20.0,
        10.0,
    );
    let texts: Vec<_> = out.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Supercalifragilistic", "Pneumonoultramicroscopic"]
    );
    assert_eq!(out.next_y, 20.0);
}

#[test]
fn zero_width_puts_each_word_on_its_own_line() {
    let out = wrap_lines(&mut ApproxMetrics, "a b c d", F, 0.0, 0.0, 1.0);
    assert_eq!(out.lines.len(), 4);
}
