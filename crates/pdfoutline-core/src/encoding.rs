//! PDF text-string codec.
//!
//! Converts between UTF-8 text, 32-bit code-point buffers (the working
//! representation for page-text search and chapter parsing), and the
//! UTF-16BE byte form PDF requires for text strings in outline titles and
//! the Info dictionary.

/// Decode UTF-8 bytes into code points, truncating at `max_len` entries.
///
/// Decoding stops silently at the first malformed sequence instead of
/// failing: scanned documents routinely carry garbage trailing bytes, and a
/// truncated title must not abort the whole run.
pub fn utf8_to_codepoints(bytes: &[u8], max_len: usize) -> Vec<u32> {
    let mut points = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() && points.len() < max_len {
        let b0 = bytes[pos];
        let (len, mut cp) = match b0 {
            0x00..=0x7F => (1, b0 as u32),
            0xC0..=0xDF => (2, (b0 & 0x1F) as u32),
            0xE0..=0xEF => (3, (b0 & 0x0F) as u32),
            0xF0..=0xF7 => (4, (b0 & 0x07) as u32),
            _ => break, // stray continuation or invalid lead byte
        };
        if pos + len > bytes.len() {
            break;
        }
        let mut valid = true;
        for &b in &bytes[pos + 1..pos + len] {
            if b & 0xC0 != 0x80 {
                valid = false;
                break;
            }
            cp = (cp << 6) | (b & 0x3F) as u32;
        }
        if !valid || cp > 0x10FFFF || (0xD800..=0xDFFF).contains(&cp) {
            break;
        }
        points.push(cp);
        pos += len;
    }

    points
}

/// Decode a `&str` into code points without truncation.
pub fn str_to_codepoints(text: &str) -> Vec<u32> {
    text.chars().map(|c| c as u32).collect()
}

/// Encode code points back into a UTF-8 string.
///
/// Surrogate and out-of-range values are skipped; the inputs here come from
/// page text that already passed through the decoder, so in practice this is
/// lossless.
pub fn codepoints_to_utf8(points: &[u32]) -> String {
    points.iter().filter_map(|&cp| char::from_u32(cp)).collect()
}

/// Encode code points as PDF text-string bytes: a UTF-16BE byte-order mark
/// followed by each code point as one big-endian 16-bit unit, or a surrogate
/// pair for code points at or above `0x10000`.
///
/// The result is embedded raw between the literal-string delimiters `(` and
/// `)`. No escaping of `(`, `)` or `\` is performed, so titles containing
/// those characters will corrupt the emitted object. Documented limitation.
pub fn encode_text_string(points: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + points.len() * 2);
    bytes.push(0xFE);
    bytes.push(0xFF);

    for &cp in points {
        if cp < 0x10000 {
            bytes.push((cp >> 8) as u8);
            bytes.push(cp as u8);
        } else {
            let v = cp - 0x10000;
            let high = 0xD800 | ((v >> 10) & 0x3FF);
            let low = 0xDC00 | (v & 0x3FF);
            bytes.push((high >> 8) as u8);
            bytes.push(high as u8);
            bytes.push((low >> 8) as u8);
            bytes.push(low as u8);
        }
    }

    bytes
}

/// Decode PDF text-string bytes back into a `String`.
///
/// Bytes starting with the `FE FF` byte-order mark are treated as UTF-16BE
/// (surrogate pairs recombined, malformed units replaced); anything else is
/// treated as a single-byte string, one byte per code point. A trailing odd
/// byte in the UTF-16 form is ignored.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}
