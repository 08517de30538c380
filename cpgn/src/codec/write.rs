//! CPGN encoding: token grammar and game assembly

use crate::bitstream::BitWriter;
use crate::error::{CpgnError, Result};
use crate::game::{CastlingSide, EnPassantMarker, Game, Ply, Token};
use crate::resolver::LegalMoveResolver;

use super::{index_bits, ordered, primitives};

/// Encode a game to its byte-aligned CPGN representation.
///
/// Sequencing: version byte, tag block, en-passant header, the token stream
/// walked depth-first with variations bracketed in place, the end-of-game
/// marker, zero padding to the next byte boundary.
///
/// The resolver must start from the game's initial position; it is advanced
/// token by token as the stream is written.
pub fn encode_game(game: &Game, resolver: &mut dyn LegalMoveResolver) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();

    writer.write_bits(game.version as u32, 8)?;
    primitives::write_tags(&mut writer, &game.tags)?;
    write_en_passant(&mut writer, game.en_passant.as_ref())?;
    write_line(&mut writer, &game.plies, resolver)?;

    let (marker, width) = super::END_OF_GAME;
    writer.write_bits(marker, width)?;
    writer.write_bits(game.result.code() as u32, 2)?;

    log::debug!(
        "encoded game: {} plies, {} bits before padding",
        game.plies.len(),
        writer.bit_len()
    );
    Ok(writer.finish())
}

/// 4-bit entry count, then one flag bit per entry; absence is a zero count.
fn write_en_passant(writer: &mut BitWriter, marker: Option<&EnPassantMarker>) -> Result<()> {
    let Some(marker) = marker else {
        return writer.write_bits(0, 4);
    };
    writer.write_bits(marker.flags().len() as u32, 4)?;
    for &flag in marker.flags() {
        writer.write_bit(flag);
    }
    Ok(())
}

fn write_line(
    writer: &mut BitWriter,
    plies: &[Ply],
    resolver: &mut dyn LegalMoveResolver,
) -> Result<()> {
    for ply in plies {
        write_token(writer, &ply.token, resolver)?;
        resolver.advance(&ply.token);
        for variation in &ply.variations {
            let (start, width) = super::VARIATION_START;
            writer.write_bits(start, width)?;
            resolver.begin_variation();
            write_line(writer, variation, resolver)?;
            resolver.end_variation();
            let (end, width) = super::VARIATION_END;
            writer.write_bits(end, width)?;
        }
    }
    Ok(())
}

fn write_token(
    writer: &mut BitWriter,
    token: &Token,
    resolver: &mut dyn LegalMoveResolver,
) -> Result<()> {
    match token {
        Token::Move {
            piece,
            to,
            disambiguation,
        } => {
            writer.write_bits(piece.code() as u32, 3)?;
            primitives::write_square(writer, *to)?;
            let candidates = ordered(resolver.move_candidates(*piece, *to));
            log::trace!("{piece:?} to {to}: {} candidate(s)", candidates.len());
            write_disambiguation(writer, *disambiguation, candidates.len())
        }
        Token::Castling { side } => {
            let (value, width) = match side {
                CastlingSide::Kingside => super::KINGSIDE_CASTLING,
                CastlingSide::Queenside => super::QUEENSIDE_CASTLING,
            };
            writer.write_bits(value, width)
        }
        Token::Promotion {
            target,
            disambiguation,
        } => {
            let (value, width) = super::PROMOTION;
            writer.write_bits(value, width)?;
            writer.write_bits(target.code() as u32, 2)?;
            let candidates = ordered(resolver.promotion_candidates());
            write_disambiguation(writer, *disambiguation, candidates.len())
        }
        Token::Comment { text } => {
            let (value, width) = super::COMMENT;
            writer.write_bits(value, width)?;
            primitives::write_text(writer, text)
        }
        Token::Nag { value } => {
            let (prefix, width) = super::NAG;
            writer.write_bits(prefix, width)?;
            writer.write_bits(*value as u32, 8)
        }
    }
}

/// A token must carry an index exactly when more than one candidate exists,
/// and the index must select one of them; anything else has no canonical
/// encoding and is rejected.
fn write_disambiguation(
    writer: &mut BitWriter,
    disambiguation: Option<u8>,
    count: usize,
) -> Result<()> {
    match disambiguation {
        None if count <= 1 => Ok(()),
        None => Err(CpgnError::MissingDisambiguation { count }),
        Some(index) if count > 1 && (index as usize) < count => {
            writer.write_bits(index as u32, index_bits(count))
        }
        Some(index) => Err(CpgnError::IndexOutOfRange { index, count }),
    }
}
