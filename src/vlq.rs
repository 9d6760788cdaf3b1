use crate::{CodecError, CodecResult};
use std::io;
use std::io::Write;

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_VALUES: [i8; 256] = get_base64_map();

const CONTINUATION_BIT: u64 = 0b100000;
const DIGIT_MASK: u64 = 0b11111;
// the 13th digit starts at bit 60, only its low 4 bits still fit in a u64
const LAST_SHIFT: u32 = 60;

/// Maximum number of fields in one segment.
pub const MAX_SEGMENT_FIELDS: usize = 5;

const fn get_base64_map() -> [i8; 256] {
    let mut res = [-1i8; 256];
    // `for in` is not allowed in const fn
    let mut idx = 0;
    while idx < 64 {
        res[BASE64_CHARS[idx] as usize] = idx as i8;
        idx += 1;
    }
    res
}

/// A read position inside one segment of the `mappings` field.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    segment: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(segment: &'a str) -> Self {
        Self { segment, offset: 0 }
    }

    /// Returns `true` once every byte of the segment has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.segment.len()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.segment.as_bytes().get(self.offset)?;
        self.offset += 1;
        Some(byte)
    }

    fn malformed(&self) -> String {
        self.segment.to_owned()
    }
}

/// Decodes the next signed value starting at the cursor.
///
/// Digits carry 5 payload bits, least significant group first, and bit `0x20` asks for
/// another digit. The lowest bit of the accumulated value is the sign.
pub fn decode_next(cursor: &mut Cursor<'_>) -> CodecResult<i64> {
    let mut accumulated: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(byte) = cursor.next_byte() else {
            return Err(CodecError::Truncated {
                segment: cursor.malformed(),
            });
        };

        let value = BASE64_VALUES[byte as usize];
        if value < 0 {
            return Err(CodecError::InvalidBase64 {
                segment: cursor.malformed(),
                byte,
            });
        }
        let value = value as u64;
        let digit = value & DIGIT_MASK;

        // zero digits past the top bit are padding and contribute nothing
        if digit != 0 {
            if shift > LAST_SHIFT || (shift == LAST_SHIFT && digit > 0xF) {
                return Err(CodecError::Overflow {
                    segment: cursor.malformed(),
                });
            }
            accumulated |= digit << shift;
        }
        shift = shift.saturating_add(5);

        if value & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = (accumulated >> 1) as i64;
    Ok(if accumulated & 1 == 1 {
        -magnitude
    } else {
        magnitude
    })
}

/// Splits one segment into its VLQ fields.
///
/// Reuses a fixed buffer, so the returned slice is only valid until the next call.
#[derive(Debug)]
pub(crate) struct VlqDecoder {
    buf: [i64; MAX_SEGMENT_FIELDS],
}

impl VlqDecoder {
    pub fn new() -> Self {
        Self {
            buf: [0; MAX_SEGMENT_FIELDS],
        }
    }

    pub fn decode(&mut self, segment: &str) -> CodecResult<&[i64]> {
        let mut cursor = Cursor::new(segment);
        let mut fields = 0;

        while !cursor.is_exhausted() {
            let value = decode_next(&mut cursor)?;
            if let Some(slot) = self.buf.get_mut(fields) {
                *slot = value;
            }
            fields += 1;
        }

        if matches!(fields, 1 | 4 | 5) {
            Ok(&self.buf[..fields])
        } else {
            Err(CodecError::MalformedRecord {
                segment: segment.to_owned(),
                fields,
            })
        }
    }
}

/// Writes base64 VLQ values.
#[derive(Debug)]
pub struct VlqEncoder<'a, W>
where
    W: Write,
{
    writer: &'a mut W,
}

impl<'a, W> VlqEncoder<'a, W>
where
    W: Write,
{
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    /// Encodes `value`. `i64::MIN` has no representation and is rejected.
    pub fn encode(&mut self, value: i64) -> io::Result<()> {
        if value == i64::MIN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "i64::MIN cannot be encoded as VLQ",
            ));
        }

        let mut num = (value.unsigned_abs() << 1) | u64::from(value < 0);

        loop {
            let mut digit = num & DIGIT_MASK;
            num >>= 5;
            if num != 0 {
                digit |= CONTINUATION_BIT;
            }
            self.writer.write_all(&[BASE64_CHARS[digit as usize]])?;
            if num == 0 {
                break;
            }
        }

        Ok(())
    }

    /// Encodes the difference between two running totals.
    pub fn encode_delta(&mut self, prev: u32, cur: u32) -> io::Result<()> {
        self.encode(i64::from(cur) - i64::from(prev))
    }
}
