//! Text support for overlay drawing using the standard Helvetica fonts
//!
//! The overlay only needs two faces, both from the standard 14 PDF fonts, so
//! nothing is embedded. Text is encoded with WinAnsiEncoding; characters
//! outside that encoding (emoji, CJK) are dropped from the drawn string.

use lopdf::{Dictionary, Object};

/// Glyph width used for characters without an entry in the width tables
const DEFAULT_WIDTH: u16 = 556;

/// Helvetica widths for chars 32-126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    278, 278, 584, 584, 584, 556, 1015, // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    278, 278, 278, 469, 556, 333, // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n - z
    334, 260, 334, 584, // { - ~
];

/// Helvetica-Bold widths for chars 32-126, in 1/1000 em
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    333, 333, 584, 584, 584, 611, 975, // : - @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    333, 278, 333, 584, 556, 333, // [ - `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a - m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n - z
    389, 280, 389, 584, // { - ~
];

/// Font faces available to the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Name of the font in the page's /Font resources
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn base_font(&self) -> &'static [u8] {
        match self {
            Font::Regular => b"Helvetica",
            Font::Bold => b"Helvetica-Bold",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of one WinAnsi byte in 1/1000 em
    fn glyph_width(&self, byte: u8) -> u16 {
        match byte {
            32..=126 => self.widths()[(byte - 32) as usize],
            _ => DEFAULT_WIDTH,
        }
    }

    /// Type1 font dictionary for one of the standard 14 fonts
    pub fn dictionary(&self) -> Dictionary {
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(self.base_font().to_vec()));
        font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        font
    }
}

/// Text converted to WinAnsi bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub bytes: Vec<u8>,
    /// Number of characters that had no WinAnsi code and were left out
    pub dropped: usize,
}

impl EncodedText {
    /// Encode `text`, dropping unsupported characters and trimming the
    /// spaces they leave behind at either end
    pub fn new(text: &str) -> Self {
        let mut bytes = Vec::with_capacity(text.len());
        let mut dropped = 0;

        for ch in text.chars() {
            match win_ansi_code(ch) {
                Some(code) => bytes.push(code),
                // Variation selectors trail many emoji and have no glyph of their own
                None if ('\u{FE00}'..='\u{FE0F}').contains(&ch) => {}
                None => dropped += 1,
            }
        }

        let start = bytes.iter().position(|&b| b != b' ').unwrap_or(bytes.len());
        let end = bytes.iter().rposition(|&b| b != b' ').map_or(start, |i| i + 1);

        Self {
            bytes: bytes[start..end].to_vec(),
            dropped,
        }
    }

    /// Rendered width in points
    pub fn width(&self, font: Font, size: f64) -> f64 {
        let units: u32 = self.bytes.iter().map(|&b| u32::from(font.glyph_width(b))).sum();
        f64::from(units) * size / 1000.0
    }

    /// PDF literal string, e.g. `(Slides 1-5)`
    ///
    /// Bytes above 0x7E are written as octal escapes so the content stream
    /// stays ASCII.
    pub fn to_pdf_literal(&self) -> String {
        let mut out = String::with_capacity(self.bytes.len() + 2);
        out.push('(');
        for &b in &self.bytes {
            match b {
                b'(' | b')' | b'\\' => {
                    out.push('\\');
                    out.push(b as char);
                }
                32..=126 => out.push(b as char),
                _ => out.push_str(&format!("\\{:03o}", b)),
            }
        }
        out.push(')');
        out
    }
}

/// WinAnsiEncoding code for a character, if it has one
fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        ' '..='~' => ch as u32,
        '\u{A0}'..='\u{FF}' => ch as u32,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code as u8)
}

/// Format a coordinate for a content stream: at most three decimals, no
/// trailing zeros
pub fn fmt_num(value: f64) -> String {
    fmt_decimals(value, 3)
}

/// Like [`fmt_num`] with a caller-chosen number of decimals
pub fn fmt_decimals(value: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}
