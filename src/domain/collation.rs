//! Swedish alphabetical ordering for names.
//!
//! The Swedish alphabet ends `... x y z å ä ö`. Accented Latin letters sort
//! with their base letter (`é` with `e`), `ü` sorts as `y`, and `æ`/`ø` sort
//! as `ä`/`ö`. Accents and case only break ties between otherwise equal names.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Primary weight of `å`. `ä` and `ö` follow it.
const AFTER_Z: u32 = 'z' as u32 + 1;

/// A comparison key giving Swedish alphabetical order.
///
/// Keys are ordered by letter first, then accent, then case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    letters: Vec<u32>,
    accents: Vec<u32>,
    cases: Vec<bool>,
}

impl SortKey {
    /// Builds the key for `text`.
    #[must_use]
    pub fn swedish(text: &str) -> Self {
        let mut key = Self {
            letters: Vec::with_capacity(text.len()),
            accents: Vec::with_capacity(text.len()),
            cases: Vec::with_capacity(text.len()),
        };

        for c in text.chars() {
            let upper = c.is_uppercase();
            for lower in c.to_lowercase() {
                let (letter, accent) = weigh(lower);
                key.letters.push(letter);
                key.accents.push(accent);
                key.cases.push(upper);
            }
        }
        key
    }
}

/// Primary and secondary weight of a lowercase character.
fn weigh(c: char) -> (u32, u32) {
    match c {
        'å' => (AFTER_Z, 0),
        'ä' => (AFTER_Z + 1, 0),
        'æ' => (AFTER_Z + 1, 1),
        'ö' => (AFTER_Z + 2, 0),
        'ø' => (AFTER_Z + 2, 1),
        'ü' => ('y' as u32, 1),
        _ => {
            let mut marks = 0;
            let mut base = c;
            for (i, part) in c.to_string().nfd().enumerate() {
                if i == 0 {
                    base = part;
                } else if is_combining_mark(part) {
                    marks += part as u32;
                }
            }
            (base as u32, marks)
        }
    }
}
