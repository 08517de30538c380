//! Fixed-width primitives: text, squares, and the tag block
//!
//! Plain unsigned integers go straight through [`BitWriter::write_bits`] /
//! [`BitReader::read_bits`]; the helpers here cover the composite encodings
//! shared by the encoder and decoder.

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{CpgnError, Result};
use crate::game::{Square, TagPair};

/// Write the string's bytes, 8 bits each, then one zero terminator byte.
pub(crate) fn write_text(writer: &mut BitWriter, text: &str) -> Result<()> {
    if text.bytes().any(|byte| byte == 0) {
        return Err(CpgnError::TextContainsNull);
    }
    for byte in text.bytes() {
        writer.write_bits(byte as u32, 8)?;
    }
    writer.write_bits(0, 8)
}

/// Read 8-bit groups until a zero byte.
pub(crate) fn read_text(reader: &mut BitReader<'_>) -> Result<String> {
    let mut bytes = Vec::new();
    loop {
        let byte = reader.read_bits(8)? as u8;
        if byte == 0 {
            break;
        }
        bytes.push(byte);
    }
    String::from_utf8(bytes).map_err(|_| CpgnError::MalformedStream {
        bit: reader.bit_position(),
    })
}

/// Write a square as 3-bit file then 3-bit rank.
pub(crate) fn write_square(writer: &mut BitWriter, square: Square) -> Result<()> {
    writer.write_bits(square.file() as u32, 3)?;
    writer.write_bits(square.rank() as u32, 3)
}

pub(crate) fn read_square(reader: &mut BitReader<'_>) -> Result<Square> {
    let file = reader.read_bits(3)? as u8;
    let rank = reader.read_bits(3)? as u8;
    // 3-bit values are always in range
    Square::new(file, rank)
}

/// Write the tag block: each pair as name text + value text, closed by one
/// extra zero byte (an empty-name tag is the end-of-list sentinel, so empty
/// names are unencodable).
pub(crate) fn write_tags(writer: &mut BitWriter, tags: &[TagPair]) -> Result<()> {
    for tag in tags {
        if tag.name.is_empty() {
            return Err(CpgnError::EmptyTagName);
        }
        write_text(writer, &tag.name)?;
        write_text(writer, &tag.value)?;
    }
    writer.write_bits(0, 8)
}

pub(crate) fn read_tags(reader: &mut BitReader<'_>) -> Result<Vec<TagPair>> {
    let mut tags = Vec::new();
    loop {
        let name = read_text(reader)?;
        if name.is_empty() {
            // end-of-list sentinel
            return Ok(tags);
        }
        let value = read_text(reader)?;
        tags.push(TagPair { name, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_vector() {
        // 'A' = 0x41, then the 8-bit terminator
        let mut writer = BitWriter::new();
        write_text(&mut writer, "A").unwrap();
        assert_eq!(writer.finish(), vec![0x41, 0x00]);
    }

    #[test]
    fn test_text_rejects_nul() {
        let mut writer = BitWriter::new();
        assert_eq!(
            write_text(&mut writer, "a\0b"),
            Err(CpgnError::TextContainsNull)
        );
    }

    #[test]
    fn test_text_roundtrip() {
        let mut writer = BitWriter::new();
        write_text(&mut writer, "Épine !").unwrap();
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(read_text(&mut reader).unwrap(), "Épine !");
    }

    #[test]
    fn test_square_vector() {
        // e4: file e = 4 = 100, rank 4 = index 3 = 011
        let mut writer = BitWriter::new();
        write_square(&mut writer, Square::new(4, 3).unwrap()).unwrap();
        assert_eq!(writer.bit_len(), 6);
        assert_eq!(writer.finish(), vec![0b100011_00]);
    }

    #[test]
    fn test_square_bijection() {
        for file in 0..8 {
            for rank in 0..8 {
                let square = Square::new(file, rank).unwrap();
                let mut writer = BitWriter::new();
                write_square(&mut writer, square).unwrap();
                let bytes = writer.finish();
                let mut reader = BitReader::new(&bytes);
                assert_eq!(read_square(&mut reader).unwrap(), square);
            }
        }
    }

    #[test]
    fn test_empty_tag_block() {
        let mut writer = BitWriter::new();
        write_tags(&mut writer, &[]).unwrap();
        assert_eq!(writer.finish(), vec![0x00]);
    }

    #[test]
    fn test_tags_roundtrip() {
        let tags = vec![
            TagPair::new("Event", "Casual Game"),
            TagPair::new("Result", "0-1"),
        ];
        let mut writer = BitWriter::new();
        write_tags(&mut writer, &tags).unwrap();
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(read_tags(&mut reader).unwrap(), tags);
    }

    #[test]
    fn test_empty_tag_name_rejected() {
        let mut writer = BitWriter::new();
        assert_eq!(
            write_tags(&mut writer, &[TagPair::new("", "x")]),
            Err(CpgnError::EmptyTagName)
        );
    }
}
