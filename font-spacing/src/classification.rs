//! The shape of the left and right edge of each basic Latin letter.

/// How the outline meets one side of a letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeCategory {
    /// A vertical stem, as on both sides of `H`.
    Straight,
    /// A bowl, as on both sides of `O`.
    Round,
    /// An arch ending in a stem, as on the right of `n`.
    Arch,
    /// A diagonal or open side, as on both sides of `V`.
    Vertex,
}

/// The edge categories of one letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub left: EdgeCategory,
    pub right: EdgeCategory,
}

use EdgeCategory::{Arch as A, Round as R, Straight as S, Vertex as V};

#[rustfmt::skip]
static CLASSIFICATION: [(char, EdgeCategory, EdgeCategory); 52] = [
    ('A', V, V), ('B', S, R), ('C', R, R), ('D', S, R), ('E', S, S), ('F', S, S),
    ('G', R, S), ('H', S, S), ('I', S, S), ('J', R, S), ('K', S, V), ('L', S, V),
    ('M', S, S), ('N', S, S), ('O', R, R), ('P', S, R), ('Q', R, R), ('R', S, V),
    ('S', R, R), ('T', V, V), ('U', S, S), ('V', V, V), ('W', V, V), ('X', V, V),
    ('Y', V, V), ('Z', V, V),
    ('a', R, S), ('b', S, R), ('c', R, R), ('d', R, S), ('e', R, R), ('f', S, V),
    ('g', R, S), ('h', S, A), ('i', S, S), ('j', S, S), ('k', S, V), ('l', S, S),
    ('m', S, A), ('n', S, A), ('o', R, R), ('p', S, R), ('q', R, S), ('r', S, V),
    ('s', R, R), ('t', S, V), ('u', A, S), ('v', V, V), ('w', V, V), ('x', V, V),
    ('y', V, V), ('z', V, V),
];

/// The classification of a letter, if it is one of `A-Z` or `a-z`.
pub fn classify(ch: char) -> Option<Classification> {
    CLASSIFICATION
        .iter()
        .find(|(letter, _, _)| *letter == ch)
        .map(|(_, left, right)| Classification {
            left: *left,
            right: *right,
        })
}

/// Every classified letter, capitals first.
pub fn classified_letters() -> impl Iterator<Item = (char, Classification)> {
    CLASSIFICATION.iter().map(|(ch, left, right)| {
        (
            *ch,
            Classification {
                left: *left,
                right: *right,
            },
        )
    })
}
