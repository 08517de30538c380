//! CPGN game data structures

use core::fmt;

use crate::error::{CpgnError, Result};

/// A board square: file 0-7 (a-h) and rank 0-7 (ranks 1-8).
///
/// Bijective with the 3-bit file + 3-bit rank wire code. The linear index
/// `file * 8 + rank` (a1 smallest) orders disambiguation candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Create a square, failing with [`CpgnError::SquareOutOfRange`] if
    /// `file` or `rank` is not in 0..=7.
    pub fn new(file: u8, rank: u8) -> Result<Self> {
        if file > 7 || rank > 7 {
            return Err(CpgnError::SquareOutOfRange { file, rank });
        }
        Ok(Self { file, rank })
    }

    /// File 0-7, 0 = a.
    pub fn file(self) -> u8 {
        self.file
    }

    /// Rank 0-7, 0 = rank 1.
    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Linear index `file * 8 + rank`, 0 = a1, 63 = h8.
    pub fn index(self) -> u8 {
        self.file * 8 + self.rank
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

/// Piece kinds and their 3-bit wire codes.
///
/// Codes 110 and 111 are permanently reserved: no piece uses them, so every
/// move token starts with a code below `110` and every meta token starts
/// with `11`. This keeps the token table prefix-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceKind {
    /// The 3-bit wire code (000-101).
    pub const fn code(self) -> u8 {
        match self {
            PieceKind::King => 0b000,
            PieceKind::Queen => 0b001,
            PieceKind::Bishop => 0b010,
            PieceKind::Knight => 0b011,
            PieceKind::Rook => 0b100,
            PieceKind::Pawn => 0b101,
        }
    }

    /// Inverse of [`PieceKind::code`]; `None` for the reserved codes 110/111.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0b000 => Some(PieceKind::King),
            0b001 => Some(PieceKind::Queen),
            0b010 => Some(PieceKind::Bishop),
            0b011 => Some(PieceKind::Knight),
            0b100 => Some(PieceKind::Rook),
            0b101 => Some(PieceKind::Pawn),
            _ => None,
        }
    }
}

/// Promotion targets and their 2-bit wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionPiece {
    Queen,
    Bishop,
    Knight,
    Rook,
}

impl PromotionPiece {
    /// The 2-bit wire code.
    pub const fn code(self) -> u8 {
        match self {
            PromotionPiece::Queen => 0b00,
            PromotionPiece::Bishop => 0b01,
            PromotionPiece::Knight => 0b10,
            PromotionPiece::Rook => 0b11,
        }
    }

    /// Inverse of [`PromotionPiece::code`]; total, all four codes are valid.
    pub const fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => PromotionPiece::Queen,
            0b01 => PromotionPiece::Bishop,
            0b10 => PromotionPiece::Knight,
            _ => PromotionPiece::Rook,
        }
    }
}

/// Castling direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

/// Terminal game result and its 2-bit wire code.
///
/// Code 11 is unassigned and rejected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    /// The 2-bit wire code.
    pub const fn code(self) -> u8 {
        match self {
            GameResult::WhiteWins => 0b00,
            GameResult::BlackWins => 0b01,
            GameResult::Draw => 0b10,
        }
    }

    /// Inverse of [`GameResult::code`]; `None` for the unassigned code 11.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0b00 => Some(GameResult::WhiteWins),
            0b01 => Some(GameResult::BlackWins),
            0b10 => Some(GameResult::Draw),
            _ => None,
        }
    }
}

/// A metadata tag: name and value, both NUL-free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    /// Tag name; must not be empty (an empty name is the end-of-list sentinel)
    pub name: String,
    /// Tag value
    pub value: String,
}

impl TagPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The en-passant header: a 4-bit entry count followed by one flag bit per
/// entry.
///
/// The flag semantics are not interpreted by this codec; the layout is
/// carried through verbatim. An absent marker is written as a count of 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnPassantMarker {
    flags: Vec<bool>,
}

impl EnPassantMarker {
    /// Create a marker from its flag bits.
    ///
    /// The entry count must fit the 4-bit field and be nonzero (a zero
    /// count is the wire encoding of "no marker"), so `flags` must hold
    /// 1..=15 entries; anything else fails with [`CpgnError::ValueTooWide`].
    pub fn new(flags: Vec<bool>) -> Result<Self> {
        if flags.is_empty() || flags.len() > crate::MAX_EN_PASSANT_ENTRIES {
            return Err(CpgnError::ValueTooWide {
                value: flags.len() as u32,
                width: 4,
            });
        }
        Ok(Self { flags })
    }

    /// The flag bits, one per entry.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }
}

/// One semantic construct of the move text.
///
/// Variation brackets and the end-of-game marker are wire constructs only:
/// in memory, variations live on [`Ply`] and the result on [`Game`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A piece moving to a destination square. `disambiguation` selects
    /// among the resolver's candidate source squares and must be `Some`
    /// exactly when more than one candidate exists.
    Move {
        piece: PieceKind,
        to: Square,
        disambiguation: Option<u8>,
    },
    Castling {
        side: CastlingSide,
    },
    /// A pawn promotion. `disambiguation` selects among the resolver's
    /// promotion candidates, under the same rule as for `Move`.
    Promotion {
        target: PromotionPiece,
        disambiguation: Option<u8>,
    },
    Comment {
        text: String,
    },
    /// Numeric annotation glyph, 0-255
    Nag {
        value: u8,
    },
}

/// A token in a line, together with the alternative lines that branch off
/// immediately after it.
///
/// Each variation is an alternative to this ply, replayed from the position
/// before it. Nesting is well-formed by construction: brackets only exist on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ply {
    pub token: Token,
    pub variations: Vec<Vec<Ply>>,
}

impl From<Token> for Ply {
    fn from(token: Token) -> Self {
        Self {
            token,
            variations: Vec::new(),
        }
    }
}

/// A complete game record: exactly what one CPGN stream encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Format version byte; see [`crate::FORMAT_VERSION`]
    pub version: u8,
    /// Metadata tag block
    pub tags: Vec<TagPair>,
    /// Optional en-passant header
    pub en_passant: Option<EnPassantMarker>,
    /// The main line
    pub plies: Vec<Ply>,
    /// Terminal result
    pub result: GameResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(7, 7).is_ok());
        assert_eq!(
            Square::new(8, 0),
            Err(CpgnError::SquareOutOfRange { file: 8, rank: 0 })
        );
        assert_eq!(
            Square::new(0, 9),
            Err(CpgnError::SquareOutOfRange { file: 0, rank: 9 })
        );
    }

    #[test]
    fn test_square_index_ordering() {
        let a1 = Square::new(0, 0).unwrap();
        let a2 = Square::new(0, 1).unwrap();
        let b1 = Square::new(1, 0).unwrap();
        assert_eq!(a1.index(), 0);
        assert_eq!(a2.index(), 1);
        assert_eq!(b1.index(), 8);
        assert_eq!(Square::new(7, 7).unwrap().index(), 63);
    }

    #[test]
    fn test_square_display() {
        assert_eq!(Square::new(4, 3).unwrap().to_string(), "e4");
        assert_eq!(Square::new(0, 0).unwrap().to_string(), "a1");
        assert_eq!(Square::new(7, 7).unwrap().to_string(), "h8");
    }

    #[test]
    fn test_piece_codes() {
        for code in 0..=5 {
            let piece = PieceKind::from_code(code).unwrap();
            assert_eq!(piece.code(), code);
        }
        assert_eq!(PieceKind::from_code(0b110), None);
        assert_eq!(PieceKind::from_code(0b111), None);
    }

    #[test]
    fn test_promotion_codes() {
        for code in 0..=3 {
            assert_eq!(PromotionPiece::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(GameResult::from_code(0b01), Some(GameResult::BlackWins));
        assert_eq!(GameResult::from_code(0b11), None);
    }

    #[test]
    fn test_en_passant_marker_bounds() {
        assert!(EnPassantMarker::new(vec![true]).is_ok());
        assert!(EnPassantMarker::new(vec![false; 15]).is_ok());
        assert!(EnPassantMarker::new(Vec::new()).is_err());
        assert!(EnPassantMarker::new(vec![false; 16]).is_err());
    }
}
