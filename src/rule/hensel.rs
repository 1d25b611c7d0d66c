//! The Hensel table: every Moore neighbourhood sorted into a count bucket
//! and, within the bucket, into one lettered isotropic configuration.
//!
//! Neighbourhoods are bitmasks over the eight neighbours in row-major order:
//!
//! ```text
//! 0 1 2
//! 3 . 4
//! 5 6 7
//! ```

use std::fmt;
use std::sync::OnceLock;

/// Hensel letters of each neighbour count, in table order.
pub const LETTERS: [&str; 9] = [
    "",
    "ce",
    "aceikn",
    "aceijknqry",
    "aceijknqrtwyz",
    "aceijknqry",
    "aceikn",
    "ce",
    "",
];

/// Index of the first token of each count; the last entry is the table size.
const OFFSETS: [u8; 10] = [0, 1, 3, 9, 19, 32, 42, 48, 50, 51];

/// Number of tokens in the table, counting the singleton buckets 0 and 8.
pub const TOKEN_COUNT: usize = 51;

/// Neighbour offsets `(dx, dy)` matching the bit order of a neighbourhood mask.
pub const NEIGHBOUR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Neighbourhood masks of every token, in table order.
const NEIGHBOURHOODS: [&[u8]; TOKEN_COUNT] = [
    // 0
    &[0x00],
    // 1c
    &[0x01, 0x04, 0x20, 0x80],
    // 1e
    &[0x02, 0x08, 0x10, 0x40],
    // 2a
    &[0x03, 0x06, 0x09, 0x14, 0x28, 0x60, 0x90, 0xc0],
    // 2c
    &[0x05, 0x21, 0x84, 0xa0],
    // 2e
    &[0x0a, 0x12, 0x48, 0x50],
    // 2i
    &[0x18, 0x42],
    // 2k
    &[0x0c, 0x11, 0x22, 0x30, 0x41, 0x44, 0x82, 0x88],
    // 2n
    &[0x24, 0x81],
    // 3a
    &[0x0b, 0x16, 0x68, 0xd0],
    // 3c
    &[0x25, 0x85, 0xa1, 0xa4],
    // 3e
    &[0x1a, 0x4a, 0x52, 0x58],
    // 3i
    &[0x07, 0x29, 0x94, 0xe0],
    // 3j
    &[0x0e, 0x13, 0x2a, 0x49, 0x54, 0x70, 0x92, 0xc8],
    // 3k
    &[0x32, 0x4c, 0x51, 0x8a],
    // 3n
    &[0x0d, 0x15, 0x23, 0x61, 0x86, 0xa8, 0xb0, 0xc4],
    // 3q
    &[0x26, 0x2c, 0x34, 0x64, 0x83, 0x89, 0x91, 0xc1],
    // 3r
    &[0x19, 0x1c, 0x38, 0x43, 0x46, 0x62, 0x98, 0xc2],
    // 3y
    &[0x31, 0x45, 0x8c, 0xa2],
    // 4a
    &[0x0f, 0x17, 0x2b, 0x69, 0x96, 0xd4, 0xe8, 0xf0],
    // 4c
    &[0xa5],
    // 4e
    &[0x5a],
    // 4i
    &[0x1d, 0x63, 0xb8, 0xc6],
    // 4j
    &[0x3a, 0x4e, 0x53, 0x59, 0x5c, 0x72, 0x9a, 0xca],
    // 4k
    &[0x33, 0x4d, 0x55, 0x71, 0x8e, 0xaa, 0xb2, 0xcc],
    // 4n
    &[0x27, 0x2d, 0x87, 0x95, 0xa9, 0xb4, 0xe1, 0xe4],
    // 4q
    &[0x36, 0x6c, 0x8b, 0xd1],
    // 4r
    &[0x1b, 0x1e, 0x4b, 0x56, 0x6a, 0x78, 0xd2, 0xd8],
    // 4t
    &[0x39, 0x47, 0x9c, 0xe2],
    // 4w
    &[0x2e, 0x74, 0x93, 0xc9],
    // 4y
    &[0x35, 0x65, 0x8d, 0xa3, 0xa6, 0xac, 0xb1, 0xc5],
    // 4z
    &[0x3c, 0x66, 0x99, 0xc3],
    // 5a
    &[0x2f, 0x97, 0xe9, 0xf4],
    // 5c
    &[0x5b, 0x5e, 0x7a, 0xda],
    // 5e
    &[0xa7, 0xad, 0xb5, 0xe5],
    // 5i
    &[0x1f, 0x6b, 0xd6, 0xf8],
    // 5j
    &[0x37, 0x6d, 0x8f, 0xab, 0xb6, 0xd5, 0xec, 0xf1],
    // 5k
    &[0x75, 0xae, 0xb3, 0xcd],
    // 5n
    &[0x3b, 0x4f, 0x57, 0x79, 0x9e, 0xdc, 0xea, 0xf2],
    // 5q
    &[0x3e, 0x6e, 0x76, 0x7c, 0x9b, 0xcb, 0xd3, 0xd9],
    // 5r
    &[0x3d, 0x67, 0x9d, 0xb9, 0xbc, 0xc7, 0xe3, 0xe6],
    // 5y
    &[0x5d, 0x73, 0xba, 0xce],
    // 6a
    &[0x3f, 0x6f, 0x9f, 0xd7, 0xeb, 0xf6, 0xf9, 0xfc],
    // 6c
    &[0x5f, 0x7b, 0xde, 0xfa],
    // 6e
    &[0xaf, 0xb7, 0xed, 0xf5],
    // 6i
    &[0xbd, 0xe7],
    // 6k
    &[0x77, 0x7d, 0xbb, 0xbe, 0xcf, 0xdd, 0xee, 0xf3],
    // 6n
    &[0x7e, 0xdb],
    // 7c
    &[0x7f, 0xdf, 0xfb, 0xfe],
    // 7e
    &[0xbf, 0xef, 0xf7, 0xfd],
    // 8
    &[0xff],
];

/// One condition of the Hensel table, such as `2a` or `8`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u8);

impl Token {
    /// The "birth on zero neighbours" token.
    pub const ZERO: Token = Token(0);

    /// Looks up a token; buckets 0 and 8 take no letter, the others need one.
    pub fn new(count: u8, letter: Option<char>) -> Option<Self> {
        let letters = LETTERS.get(count as usize)?;
        let offset = OFFSETS[count as usize];
        match letter {
            None if letters.is_empty() => Some(Token(offset)),
            Some(letter) => letters.find(letter).map(|i| Token(offset + i as u8)),
            None => None,
        }
    }

    /// Position of this token in the table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Number of live neighbours.
    pub fn count(self) -> u8 {
        (0..9u8)
            .rev()
            .find(|&count| OFFSETS[count as usize] <= self.0)
            .unwrap_or(0)
    }

    pub fn letter(self) -> Option<char> {
        let count = self.count() as usize;
        LETTERS[count]
            .chars()
            .nth((self.0 - OFFSETS[count]) as usize)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// All tokens in table order.
    pub fn all() -> impl Iterator<Item = Token> {
        (0..TOKEN_COUNT as u8).map(Token)
    }

    /// Tokens of one neighbour count, in table order.
    pub fn bucket(count: u8) -> impl Iterator<Item = Token> {
        let count = count.min(8) as usize;
        (OFFSETS[count]..OFFSETS[count + 1]).map(Token)
    }

    /// Number of tokens with the given neighbour count.
    pub fn bucket_len(count: u8) -> usize {
        let count = count.min(8) as usize;
        (OFFSETS[count + 1] - OFFSETS[count]) as usize
    }

    /// The neighbourhood masks this token stands for.
    pub fn neighbourhoods(self) -> &'static [u8] {
        NEIGHBOURHOODS[self.index()]
    }

    /// The token a neighbourhood mask belongs to.
    pub fn classify(mask: u8) -> Token {
        static CLASSES: OnceLock<[Token; 256]> = OnceLock::new();
        CLASSES.get_or_init(|| {
            let mut classes = [Token(0); 256];
            for token in Token::all() {
                for &mask in token.neighbourhoods() {
                    classes[mask as usize] = token;
                }
            }
            classes
        })[mask as usize]
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())?;
        if let Some(letter) = self.letter() {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self)
    }
}

/// A set of tokens, iterated in table order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const fn empty() -> Self {
        TokenSet(0)
    }

    /// Every token of one neighbour count.
    pub fn bucket(count: u8) -> Self {
        Token::bucket(count).collect()
    }

    pub fn contains(self, token: Token) -> bool {
        self.0 & (1u64 << token.0) != 0
    }

    /// This set plus `token`.
    #[must_use]
    pub fn with(self, token: Token) -> Self {
        TokenSet(self.0 | 1u64 << token.0)
    }

    /// This set minus `token`.
    #[must_use]
    pub fn without(self, token: Token) -> Self {
        TokenSet(self.0 & !(1u64 << token.0))
    }

    #[must_use]
    pub fn union(self, other: TokenSet) -> Self {
        TokenSet(self.0 | other.0)
    }

    #[must_use]
    pub fn difference(self, other: TokenSet) -> Self {
        TokenSet(self.0 & !other.0)
    }

    pub fn is_subset(self, other: TokenSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every token of `count` is present.
    pub fn contains_bucket(self, count: u8) -> bool {
        TokenSet::bucket(count).is_subset(self)
    }

    pub fn iter(self) -> impl Iterator<Item = Token> {
        Token::all().filter(move |&token| self.contains(token))
    }

    /// Lookup table answering "is this neighbourhood in the set" per mask.
    pub fn mask_table(self) -> [bool; 256] {
        let mut table = [false; 256];
        for token in self.iter() {
            for &mask in token.neighbourhoods() {
                table[mask as usize] = true;
            }
        }
        table
    }
}

impl FromIterator<Token> for TokenSet {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        iter.into_iter().fold(TokenSet::empty(), TokenSet::with)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|t| t.to_string())).finish()
    }
}
