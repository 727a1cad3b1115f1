//! Single-byte code page encoding for Western thermal printers
//!
//! Thermal printers power up in an IBM PC code page. Ticket text is
//! converted from UTF-8 to one byte per character:
//! - ASCII (U+0000-U+007F) passes through unchanged, so control bytes
//!   embedded in text survive
//! - Upper-half characters map through the selected code page
//! - Anything the code page cannot represent becomes `?`

use serde::{Deserialize, Serialize};

/// Replacement byte for unmappable characters
pub const REPLACEMENT: u8 = b'?';

/// Code page used for ticket text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// IBM code page 850 (Multilingual Latin-1), the printer default
    #[default]
    Cp850,
    /// Windows-1252, for printers switched to WPC1252
    Windows1252,
}

impl Charset {
    /// Encode text, replacing unmappable characters with `?`
    pub fn encode(self, s: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(s.len());
        for c in s.chars() {
            if c.is_ascii() {
                out.push(c as u8);
                continue;
            }
            let byte = match self {
                Charset::Cp850 => cp850_byte(c),
                Charset::Windows1252 => windows_1252_byte(c),
            };
            out.push(byte.unwrap_or(REPLACEMENT));
        }
        out
    }
}

/// CP850 upper half, indexed by `byte - 0x80`
const CP850_HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
    // 0xD0
    'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀',
    // 0xE0
    'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´',
    // 0xF0
    '\u{AD}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{A0}',
];

fn cp850_byte(c: char) -> Option<u8> {
    CP850_HIGH
        .iter()
        .position(|&m| m == c)
        .map(|i| 0x80 + i as u8)
}

fn windows_1252_byte(c: char) -> Option<u8> {
    let mut tmp = [0u8; 4];
    let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut tmp));
    match (had_errors, cow.as_ref()) {
        (false, [b]) => Some(*b),
        _ => None,
    }
}
