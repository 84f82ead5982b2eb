//! Ink coverage estimates for monospace glyphs.
//!
//! Each printable ASCII character maps to how much of the upper and the lower
//! half of its cell is covered by ink, in `0.0..=1.0`. The numbers are eyeballed
//! from common programming fonts; they only need to be good enough to make a
//! few pixels per line resemble the silhouette of the text.

const FIRST_PRINTABLE: u32 = 33;
const LAST_PRINTABLE: u32 = 126;

/// Weight used for anything beyond ASCII.
const EXTENDED_WEIGHT: (f32, f32) = (0.4, 0.4);

#[rustfmt::skip]
const PRINTABLE_WEIGHTS: [(f32, f32); (LAST_PRINTABLE - FIRST_PRINTABLE + 1) as usize] = [
    // ! " # $ % & ' ( ) * + , - . /
    (0.35, 0.25), (0.35, 0.0), (0.6, 0.6), (0.6, 0.6), (0.5, 0.5), (0.5, 0.6), (0.2, 0.0),
    (0.3, 0.3), (0.3, 0.3), (0.4, 0.1), (0.2, 0.2), (0.0, 0.25), (0.1, 0.1), (0.0, 0.15),
    (0.25, 0.25),
    // 0-9
    (0.55, 0.55), (0.4, 0.4), (0.45, 0.55), (0.45, 0.45), (0.45, 0.45), (0.5, 0.45),
    (0.45, 0.55), (0.45, 0.25), (0.55, 0.55), (0.55, 0.45),
    // : ; < = > ? @
    (0.15, 0.15), (0.15, 0.25), (0.2, 0.2), (0.25, 0.25), (0.2, 0.2), (0.45, 0.2), (0.7, 0.7),
    // A-Z
    (0.5, 0.6), (0.65, 0.65), (0.5, 0.5), (0.6, 0.6), (0.6, 0.6), (0.6, 0.3), (0.5, 0.6),
    (0.55, 0.55), (0.4, 0.4), (0.3, 0.5), (0.55, 0.55), (0.3, 0.5), (0.7, 0.6), (0.65, 0.65),
    (0.55, 0.55), (0.65, 0.3), (0.55, 0.7), (0.65, 0.55), (0.55, 0.55), (0.5, 0.25),
    (0.45, 0.55), (0.45, 0.35), (0.6, 0.7), (0.5, 0.5), (0.5, 0.25), (0.55, 0.55),
    // [ \ ] ^ _ `
    (0.4, 0.4), (0.25, 0.25), (0.4, 0.4), (0.3, 0.0), (0.0, 0.3), (0.15, 0.0),
    // a-z
    (0.2, 0.6), (0.35, 0.65), (0.2, 0.5), (0.35, 0.65), (0.25, 0.6), (0.45, 0.3), (0.25, 0.8),
    (0.35, 0.55), (0.25, 0.4), (0.2, 0.55), (0.35, 0.55), (0.35, 0.35), (0.3, 0.6), (0.25, 0.5),
    (0.25, 0.55), (0.25, 0.7), (0.25, 0.7), (0.25, 0.35), (0.25, 0.55), (0.35, 0.45),
    (0.2, 0.55), (0.2, 0.4), (0.3, 0.6), (0.2, 0.5), (0.2, 0.7), (0.25, 0.55),
    // { | } ~
    (0.4, 0.4), (0.3, 0.3), (0.4, 0.4), (0.2, 0.1),
];

/// Returns `(top, bottom)` ink weights for `ch`.
///
/// Whitespace, control characters and DEL weigh nothing.
pub fn glyph_weights(ch: char) -> (f32, f32) {
    let code = ch as u32;
    match code {
        FIRST_PRINTABLE..=LAST_PRINTABLE => {
            PRINTABLE_WEIGHTS[(code - FIRST_PRINTABLE) as usize]
        }
        0..=32 | 127 => (0.0, 0.0),
        _ => EXTENDED_WEIGHT,
    }
}

pub fn top_weight(ch: char) -> f32 {
    glyph_weights(ch).0
}

pub fn bottom_weight(ch: char) -> f32 {
    glyph_weights(ch).1
}

/// Flat per-character weight used by the clean rendering style.
pub fn clean_weight(ch: char) -> f32 {
    match ch as u32 {
        0..=32 => 0.0,
        33..=126 => 0.8,
        _ => 0.4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_has_no_ink() {
        for ch in [' ', '\t', '\n', '\r', '\0', '\u{7f}'] {
            assert_eq!(glyph_weights(ch), (0.0, 0.0), "{:?}", ch);
        }
    }

    #[test]
    fn every_printable_has_ink_within_unit_range() {
        for code in FIRST_PRINTABLE..=LAST_PRINTABLE {
            let ch = char::from_u32(code).unwrap();
            let (top, bottom) = glyph_weights(ch);
            assert!(top > 0.0 || bottom > 0.0, "{:?} has no ink", ch);
            assert!((0.0..=1.0).contains(&top));
            assert!((0.0..=1.0).contains(&bottom));
        }
    }

    #[test]
    fn shapes_follow_the_glyph() {
        // Descenders sit low, punctuation at the baseline has no top ink.
        assert!(bottom_weight('g') > top_weight('g'));
        assert_eq!(top_weight('.'), 0.0);
        assert_eq!(bottom_weight('\''), 0.0);
        assert_eq!(glyph_weights('_'), (0.0, 0.3));
    }

    #[test]
    fn non_ascii_uses_extended_weight() {
        assert_eq!(glyph_weights('é'), EXTENDED_WEIGHT);
        assert_eq!(glyph_weights('漢'), EXTENDED_WEIGHT);
    }

    #[test]
    fn clean_weight_classes() {
        assert_eq!(clean_weight(' '), 0.0);
        assert_eq!(clean_weight('\n'), 0.0);
        assert_eq!(clean_weight('a'), 0.8);
        assert_eq!(clean_weight('~'), 0.8);
        assert_eq!(clean_weight('\u{7f}'), 0.4);
        assert_eq!(clean_weight('ß'), 0.4);
    }
}
