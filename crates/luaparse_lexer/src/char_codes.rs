//! Character classes used by the lexer.

use unicode_xid::UnicodeXID;

pub const TAB: u8 = b'\t';
pub const LINE_FEED: u8 = b'\n';
pub const VERTICAL_TAB: u8 = 0x0B;
pub const FORM_FEED: u8 = 0x0C;
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const SPACE: u8 = b' ';

#[inline]
pub fn is_line_terminator(ch: u8) -> bool {
    ch == LINE_FEED || ch == CARRIAGE_RETURN
}

/// Whitespace that does not end a line.
#[inline]
pub fn is_white_space(ch: u8) -> bool {
    matches!(ch, SPACE | TAB | VERTICAL_TAB | FORM_FEED)
}

#[inline]
pub fn is_dec_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn hex_value(ch: u8) -> Option<u32> {
    (ch as char).to_digit(16)
}

#[inline]
pub fn is_identifier_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

#[inline]
pub fn is_identifier_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

/// Identifier start outside the Basic Latin block.
#[inline]
pub fn is_extended_identifier_start(ch: char) -> bool {
    UnicodeXID::is_xid_start(ch)
}

#[inline]
pub fn is_extended_identifier_part(ch: char) -> bool {
    UnicodeXID::is_xid_continue(ch)
}

/// Append the UTF-8 encoding of `code`, including surrogate halves.
pub fn push_utf8(buf: &mut Vec<u8>, code: u32) {
    if code < 0x80 {
        buf.push(code as u8);
    } else if code < 0x800 {
        buf.push(0xC0 | (code >> 6) as u8);
        buf.push(0x80 | (code & 0x3F) as u8);
    } else if code < 0x10000 {
        buf.push(0xE0 | (code >> 12) as u8);
        buf.push(0x80 | ((code >> 6) & 0x3F) as u8);
        buf.push(0x80 | (code & 0x3F) as u8);
    } else {
        buf.push(0xF0 | (code >> 18) as u8);
        buf.push(0x80 | ((code >> 12) & 0x3F) as u8);
        buf.push(0x80 | ((code >> 6) & 0x3F) as u8);
        buf.push(0x80 | (code & 0x3F) as u8);
    }
}

/// Decode string literal bytes. Bytes that do not form UTF-8 map one to one
/// onto code points U+0000..U+00FF.
pub fn decode_string_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}
