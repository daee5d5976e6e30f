/// One printed stripe of a label symbol.
///
/// A symbol is a run of segments alternating between dark bars and the
/// spaces separating them. `width` is in module units, the narrowest
/// printable stripe; physical size is the printer's unit scale times
/// `width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Stripe width in module units. A zero width is legal and prints
    /// nothing while keeping its slot in the sequence.
    pub width: u8,
    /// Dark bar when `true`, blank space when `false`.
    pub is_bar: bool,
}

/// The start and stop marker, one width-2 bar at each end of a symbol.
const MARKER: Segment = Segment {
    width: 2,
    is_bar: true,
};

/// Substituted for characters without a table row: a width-2 bar
/// followed by a width-1 space.
const FILLER: [Segment; 2] = [
    Segment {
        width: 2,
        is_bar: true,
    },
    Segment {
        width: 1,
        is_bar: false,
    },
];

/// Stripe widths for the printable ASCII range: six elements per
/// character, read as bar, space, bar, space, bar, space.
///
/// The table matches the geometry of the labels already in circulation
/// and must not be corrected toward scanner-grade Code 128. Several
/// characters share a row (`'T'`/`'c'`, `' '`/`'9'`, `'8'`/`'R'` among
/// others) and the `'y'` row ends in a zero-width space. Every printed
/// label encodes these rows as they stand, so any change here reprints
/// the installed base.
const fn pattern(c: char) -> Option<[u8; 6]> {
    match c {
        ' ' => Some([2, 1, 2, 2, 2, 2]),
        '!' => Some([2, 2, 2, 1, 2, 2]),
        '"' => Some([2, 2, 2, 2, 2, 1]),
        '#' => Some([1, 2, 1, 2, 2, 3]),
        '$' => Some([1, 2, 1, 3, 2, 2]),
        '%' => Some([1, 3, 1, 2, 2, 2]),
        '&' => Some([1, 2, 2, 2, 1, 3]),
        '\'' => Some([1, 2, 2, 3, 1, 2]),
        '(' => Some([1, 3, 2, 2, 1, 2]),
        ')' => Some([2, 2, 1, 2, 1, 3]),
        '*' => Some([2, 2, 1, 3, 1, 2]),
        '+' => Some([2, 3, 1, 2, 1, 2]),
        ',' => Some([1, 1, 2, 2, 3, 2]),
        '-' => Some([1, 2, 2, 1, 3, 2]),
        '.' => Some([1, 2, 2, 2, 3, 1]),
        '/' => Some([1, 1, 3, 2, 2, 2]),
        '0' => Some([1, 1, 2, 3, 2, 2]),
        '1' => Some([1, 2, 2, 1, 2, 3]),
        '2' => Some([1, 2, 2, 3, 2, 1]),
        '3' => Some([1, 2, 1, 2, 2, 3]),
        '4' => Some([1, 2, 3, 2, 2, 1]),
        '5' => Some([1, 1, 3, 2, 2, 2]),
        '6' => Some([1, 3, 2, 2, 2, 1]),
        '7' => Some([2, 2, 1, 2, 2, 2]),
        '8' => Some([2, 3, 1, 2, 2, 1]),
        '9' => Some([2, 1, 2, 2, 2, 2]),
        ':' => Some([2, 2, 2, 1, 2, 2]),
        ';' => Some([2, 2, 2, 2, 2, 1]),
        '<' => Some([2, 1, 2, 1, 2, 3]),
        '=' => Some([2, 1, 2, 3, 2, 1]),
        '>' => Some([2, 3, 2, 1, 2, 1]),
        '?' => Some([2, 1, 3, 2, 1, 2]),
        '@' => Some([2, 3, 1, 2, 1, 2]),
        'A' => Some([3, 1, 2, 2, 1, 2]),
        'B' => Some([3, 2, 1, 2, 1, 2]),
        'C' => Some([3, 2, 2, 1, 1, 2]),
        'D' => Some([2, 1, 2, 1, 2, 2]),
        'E' => Some([2, 1, 2, 2, 1, 2]),
        'F' => Some([2, 2, 1, 2, 1, 2]),
        'G' => Some([1, 1, 1, 3, 2, 2]),
        'H' => Some([1, 3, 1, 1, 2, 2]),
        'I' => Some([1, 3, 1, 2, 2, 1]),
        'J' => Some([1, 1, 2, 2, 1, 3]),
        'K' => Some([1, 1, 2, 3, 1, 2]),
        'L' => Some([1, 2, 2, 1, 1, 3]),
        'M' => Some([1, 2, 1, 3, 1, 2]),
        'N' => Some([1, 1, 3, 1, 2, 2]),
        'O' => Some([1, 3, 3, 1, 2, 1]),
        'P' => Some([2, 1, 1, 2, 2, 2]),
        'Q' => Some([2, 3, 1, 1, 2, 2]),
        'R' => Some([2, 3, 1, 2, 2, 1]),
        'S' => Some([1, 1, 1, 2, 2, 3]),
        'T' => Some([1, 1, 2, 2, 2, 2]),
        'U' => Some([1, 2, 2, 2, 1, 2]),
        'V' => Some([3, 1, 2, 1, 2, 1]),
        'W' => Some([3, 1, 1, 2, 2, 1]),
        'X' => Some([3, 2, 1, 1, 2, 1]),
        'Y' => Some([3, 2, 1, 2, 1, 1]),
        'Z' => Some([3, 1, 2, 2, 1, 1]),
        '[' => Some([3, 1, 1, 1, 2, 2]),
        '\\' => Some([3, 1, 1, 2, 1, 2]),
        ']' => Some([3, 2, 1, 1, 1, 2]),
        '^' => Some([3, 2, 2, 1, 1, 1]),
        '_' => Some([2, 1, 2, 1, 2, 2]),
        '`' => Some([2, 1, 2, 2, 1, 2]),
        'a' => Some([2, 2, 1, 2, 1, 2]),
        'b' => Some([1, 1, 1, 2, 3, 2]),
        'c' => Some([1, 1, 2, 2, 2, 2]),
        'd' => Some([1, 2, 2, 2, 1, 2]),
        'e' => Some([1, 2, 1, 2, 2, 2]),
        'f' => Some([1, 2, 2, 1, 2, 2]),
        'g' => Some([1, 2, 2, 2, 2, 1]),
        'h' => Some([1, 1, 3, 2, 1, 1]),
        'i' => Some([1, 1, 1, 2, 2, 2]),
        'j' => Some([1, 1, 2, 2, 1, 2]),
        'k' => Some([1, 1, 2, 1, 2, 2]),
        'l' => Some([1, 1, 2, 2, 2, 1]),
        'm' => Some([1, 2, 1, 1, 2, 2]),
        'n' => Some([1, 2, 2, 1, 1, 2]),
        'o' => Some([1, 2, 2, 2, 1, 1]),
        'p' => Some([1, 1, 1, 2, 1, 3]),
        'q' => Some([1, 1, 2, 1, 1, 3]),
        'r' => Some([1, 1, 2, 3, 1, 1]),
        's' => Some([1, 3, 2, 1, 1, 1]),
        't' => Some([1, 1, 3, 1, 2, 1]),
        'u' => Some([1, 2, 1, 3, 1, 1]),
        'v' => Some([1, 2, 3, 1, 1, 1]),
        'w' => Some([3, 1, 1, 1, 2, 1]),
        'x' => Some([1, 1, 2, 1, 3, 1]),
        'y' => Some([1, 1, 2, 3, 1, 0]),
        'z' => Some([1, 3, 1, 1, 2, 1]),
        '{' => Some([1, 3, 1, 2, 1, 1]),
        '|' => Some([1, 1, 3, 1, 1, 2]),
        '}' => Some([1, 1, 3, 1, 2, 1]),
        '~' => Some([3, 1, 2, 1, 1, 1]),
        _ => None,
    }
}

/// Renders `text` as a printable stripe sequence.
///
/// Encoding never fails: characters with a table row contribute their
/// six stripes, anything else contributes the two-stripe filler, and
/// the whole run is framed by a start and a stop marker. Empty input
/// yields just the two markers.
///
/// The output is pure geometry. Nothing here checks that `text` is a
/// well-formed identifier; callers labeling arbitrary strings get
/// exactly what they asked for.
///
/// ```
/// use tagmint::{encode_symbol, total_width};
///
/// let stripes = encode_symbol("INV-20241118-00001");
/// assert_eq!(stripes.len(), 110);
/// assert_eq!(total_width(&stripes), 199);
/// ```
pub fn encode_symbol(text: &str) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(6 * text.chars().count() + 2);
    segments.push(MARKER);
    for c in text.chars() {
        match pattern(c) {
            Some(widths) => {
                for (i, &width) in widths.iter().enumerate() {
                    segments.push(Segment {
                        width,
                        is_bar: i % 2 == 0,
                    });
                }
            }
            None => segments.extend_from_slice(&FILLER),
        }
    }
    segments.push(MARKER);
    segments
}

/// Sums segment widths in module units, the printed length of the
/// symbol.
pub fn total_width(segments: &[Segment]) -> u32 {
    segments.iter().map(|s| u32::from(s.width)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_frame_an_empty_symbol() {
        let segments = encode_symbol("");
        assert_eq!(segments, vec![MARKER, MARKER]);
        assert_eq!(total_width(&segments), 4);
    }

    #[test]
    fn a_single_character_alternates_bar_and_space() {
        let segments = encode_symbol("A");
        let widths: Vec<u8> = segments.iter().map(|s| s.width).collect();
        assert_eq!(widths, [2, 3, 1, 2, 2, 1, 2, 2]);

        let bars: Vec<bool> = segments.iter().map(|s| s.is_bar).collect();
        assert_eq!(bars, [true, true, false, true, false, true, false, true]);
    }

    #[test]
    fn unknown_characters_collapse_to_filler() {
        let segments = encode_symbol("é");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1..3], FILLER);
        assert_eq!(total_width(&segments), 7);
    }

    #[test]
    fn identifier_text_encodes_to_known_geometry() {
        let segments = encode_symbol("INV-20241118-00001");
        assert_eq!(segments.len(), 110);
        assert_eq!(total_width(&segments), 199);
        assert_eq!(encode_symbol("INV-20241118-00001"), segments);
    }

    #[test]
    fn the_y_row_keeps_its_zero_width_tail() {
        let segments = encode_symbol("y");
        assert_eq!(segments.len(), 8);
        assert_eq!(
            segments[6],
            Segment {
                width: 0,
                is_bar: false
            }
        );
        assert_eq!(total_width(&segments), 12);
    }

    #[test]
    fn rows_shared_between_characters_stay_shared() {
        assert_eq!(pattern('T'), pattern('c'));
        assert_eq!(pattern(' '), pattern('9'));
        assert_eq!(pattern('8'), pattern('R'));
        assert_ne!(pattern('A'), pattern('B'));
    }

    #[test]
    fn every_printable_ascii_character_has_a_row() {
        for c in ' '..='~' {
            assert!(pattern(c).is_some(), "missing row for {c:?}");
        }
        assert!(pattern('\u{7f}').is_none());
        assert!(pattern('\n').is_none());
        assert!(pattern('é').is_none());
    }
}
