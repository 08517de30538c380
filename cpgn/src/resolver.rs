//! Board-state resolver interface
//!
//! The codec never tracks chess rules itself. Disambiguation widths depend
//! on how many pieces could legally play a token, which is a function of the
//! board position, and the position is derived by replaying every prior
//! token. Both sides of a round trip must therefore drive an identical
//! resolver over an identical token sequence: the format is
//! resolver-agnostic, the round trip is not.

use crate::game::{PieceKind, Square, Token};

/// Legal-move oracle driven by the encoder and decoder.
///
/// Queries are side-effect-free; the codec reports stream progress through
/// [`advance`](LegalMoveResolver::advance) and the variation hooks so a
/// stateful implementation can replay the game on its own board.
pub trait LegalMoveResolver {
    /// Source squares from which a `piece` could legally reach `to` in the
    /// current position.
    ///
    /// Ordering does not matter: the codec sorts candidates by ascending
    /// linear index ([`Square::index`], a1 smallest) before applying a
    /// disambiguation index.
    fn move_candidates(&self, piece: PieceKind, to: Square) -> Vec<Square>;

    /// Source squares of pawns that could promote in the current position.
    ///
    /// Promotion tokens carry no destination square, so their
    /// disambiguation runs against this set instead of
    /// [`move_candidates`](LegalMoveResolver::move_candidates).
    fn promotion_candidates(&self) -> Vec<Square>;

    /// A token was committed to the current line; apply it to the board.
    fn advance(&mut self, token: &Token) {
        let _ = token;
    }

    /// An alternative line begins. It replays from the position *before*
    /// the most recently committed token; implementations should save the
    /// current position and rewind that token.
    fn begin_variation(&mut self) {}

    /// The current alternative line ended; restore the position saved by
    /// the matching [`begin_variation`](LegalMoveResolver::begin_variation).
    fn end_variation(&mut self) {}
}
