//! CPGN decoding: token grammar and game disassembly

use crate::bitstream::BitReader;
use crate::error::{CpgnError, Result};
use crate::game::{
    CastlingSide, EnPassantMarker, Game, GameResult, PieceKind, Ply, PromotionPiece, Token,
};
use crate::resolver::LegalMoveResolver;

use super::{index_bits, ordered, primitives};

/// One wire-level item of the token stream.
enum Event {
    Token(Token),
    VariationStart,
    VariationEnd,
    EndOfGame(GameResult),
}

/// Decode a CPGN byte buffer back into a [`Game`].
///
/// The resolver must start from the same initial position the encoder's
/// resolver did; it is advanced token by token as the stream is replayed,
/// which is what makes the disambiguation widths line up.
pub fn decode_game(bytes: &[u8], resolver: &mut dyn LegalMoveResolver) -> Result<Game> {
    let mut reader = BitReader::new(bytes);

    let version = reader.read_bits(8)? as u8;
    if version != crate::FORMAT_VERSION {
        return Err(CpgnError::UnsupportedVersion(version));
    }
    let tags = primitives::read_tags(&mut reader)?;
    let en_passant = read_en_passant(&mut reader)?;

    let (plies, terminator) = read_line(&mut reader, resolver, false)?;
    let Some(result) = terminator else {
        return Err(CpgnError::MissingTerminator);
    };

    // anything after end-of-game must be the byte-alignment padding
    if !reader.remaining_are_padding() {
        return Err(CpgnError::MalformedStream {
            bit: reader.bit_position(),
        });
    }

    log::debug!("decoded game: {} plies, {} tags", plies.len(), tags.len());
    Ok(Game {
        version,
        tags,
        en_passant,
        plies,
        result,
    })
}

fn read_en_passant(reader: &mut BitReader<'_>) -> Result<Option<EnPassantMarker>> {
    let count = reader.read_bits(4)? as usize;
    if count == 0 {
        return Ok(None);
    }
    let mut flags = Vec::with_capacity(count);
    for _ in 0..count {
        flags.push(reader.read_bit()?);
    }
    Ok(Some(EnPassantMarker::new(flags)?))
}

/// Read tokens until the line terminates.
///
/// A nested line ends at a variation-end bracket and yields no result; the
/// top-level line ends at the end-of-game marker. Everything else at a line
/// boundary is a structural error.
fn read_line(
    reader: &mut BitReader<'_>,
    resolver: &mut dyn LegalMoveResolver,
    nested: bool,
) -> Result<(Vec<Ply>, Option<GameResult>)> {
    let mut plies: Vec<Ply> = Vec::new();
    loop {
        if !nested && reader.remaining_are_padding() {
            return Err(CpgnError::MissingTerminator);
        }
        let bit = reader.bit_position();
        match read_event(reader, resolver)? {
            Event::Token(token) => {
                resolver.advance(&token);
                plies.push(Ply::from(token));
            }
            Event::VariationStart => {
                // brackets attach to the token just before them
                let Some(ply) = plies.last_mut() else {
                    return Err(CpgnError::MalformedStream { bit });
                };
                resolver.begin_variation();
                let (line, _) = read_line(reader, resolver, true)?;
                resolver.end_variation();
                ply.variations.push(line);
            }
            Event::VariationEnd if nested => return Ok((plies, None)),
            Event::VariationEnd => return Err(CpgnError::MalformedStream { bit }),
            Event::EndOfGame(result) if !nested => return Ok((plies, Some(result))),
            Event::EndOfGame(_) => return Err(CpgnError::MalformedStream { bit }),
        }
    }
}

/// Decode one token. The leading 3 bits either name a piece (000-101) or
/// select the meta space (110/111), whose members are discriminated by the
/// following one or two bits; see the table in the crate docs.
fn read_event(reader: &mut BitReader<'_>, resolver: &mut dyn LegalMoveResolver) -> Result<Event> {
    let bit = reader.bit_position();
    let lead = reader.read_bits(3)? as u8;
    match lead {
        0b110 => {
            if reader.read_bit()? {
                // 1101: promotion
                let target = PromotionPiece::from_code(reader.read_bits(2)? as u8);
                let candidates = ordered(resolver.promotion_candidates());
                let disambiguation = read_disambiguation(reader, candidates.len())?;
                Ok(Event::Token(Token::Promotion {
                    target,
                    disambiguation,
                }))
            } else {
                // 1100x: castling
                let side = if reader.read_bit()? {
                    CastlingSide::Queenside
                } else {
                    CastlingSide::Kingside
                };
                Ok(Event::Token(Token::Castling { side }))
            }
        }
        0b111 => match reader.read_bits(2)? {
            0b00 => {
                let text = primitives::read_text(reader)?;
                Ok(Event::Token(Token::Comment { text }))
            }
            0b01 => {
                if reader.read_bit()? {
                    Ok(Event::VariationStart)
                } else {
                    Ok(Event::VariationEnd)
                }
            }
            0b10 => {
                let value = reader.read_bits(8)? as u8;
                Ok(Event::Token(Token::Nag { value }))
            }
            _ => {
                let code = reader.read_bits(2)? as u8;
                let result =
                    GameResult::from_code(code).ok_or(CpgnError::MalformedStream { bit })?;
                Ok(Event::EndOfGame(result))
            }
        },
        code => {
            let piece = PieceKind::from_code(code).ok_or(CpgnError::MalformedStream { bit })?;
            let to = primitives::read_square(reader)?;
            let candidates = ordered(resolver.move_candidates(piece, to));
            let disambiguation = read_disambiguation(reader, candidates.len())?;
            match disambiguation.and_then(|index| candidates.get(index as usize)) {
                Some(from) => log::trace!("{piece:?} {from} -> {to}"),
                None => log::trace!("{piece:?} to {to}"),
            }
            Ok(Event::Token(Token::Move {
                piece,
                to,
                disambiguation,
            }))
        }
    }
}

fn read_disambiguation(reader: &mut BitReader<'_>, count: usize) -> Result<Option<u8>> {
    if count <= 1 {
        return Ok(None);
    }
    let index = reader.read_bits(index_bits(count))? as u8;
    if index as usize >= count {
        return Err(CpgnError::IndexOutOfRange { index, count });
    }
    Ok(Some(index))
}
