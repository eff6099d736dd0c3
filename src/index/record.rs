//! Record payload codec.
//!
//! ```text
//! u16 length                 bytes that follow
//! u8  n                      title length
//! [u8; n + 1]                title and its NUL terminator
//! u16 L                      lead length
//! [u16; L]                   one place-notation change per row
//! u16                        lead count
//! u16                        hunt-bell mask
//! ```
//!
//! Bytes after the hunt-bell mask are ignored.

use crate::error::{Error, Result};
use crate::index::types::MAX_RECORD_LENGTH;
use crate::ringing::{Method, PlaceNotation, MAX_NOTATION_LENGTH, MAX_TITLE_LENGTH};
use crate::utils::{le_u16, write_u16_le};

/// Reject declared lengths that are empty or past the sanity ceiling.
pub(crate) fn check_length(length: usize, offset: u64) -> Result<()> {
    if length == 0 {
        return Err(Error::corrupt(offset, "declared length is zero"));
    }
    if length >= MAX_RECORD_LENGTH {
        return Err(Error::corrupt(
            offset,
            format!("declared length {length} is not below {MAX_RECORD_LENGTH}"),
        ));
    }
    Ok(())
}

/// Bounds-checked walk over a payload.
struct Fields<'a> {
    data: &'a [u8],
    pos: usize,
    offset: u64,
}

impl<'a> Fields<'a> {
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let remaining = self.data.len() - self.pos;
        if len > remaining {
            return Err(Error::corrupt(
                self.offset,
                format!("payload ends before {what} ({len} bytes needed, {remaining} left)"),
            ));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &str) -> Result<u16> {
        let bytes = self.take(2, what)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

/// Decode a record payload (everything after the length prefix).
///
/// `offset` is only used to label errors.
pub fn decode_payload(payload: &[u8], stage: u8, offset: u64) -> Result<Method> {
    let mut fields = Fields {
        data: payload,
        pos: 0,
        offset,
    };

    let title_len = fields.u8("title length")? as usize;
    if title_len + 1 > MAX_TITLE_LENGTH {
        return Err(Error::corrupt(
            offset,
            format!("title of {} bytes exceeds {MAX_TITLE_LENGTH}", title_len + 1),
        ));
    }
    let title = fields.take(title_len + 1, "title")?;
    if title[title_len] != 0 {
        return Err(Error::corrupt(offset, "title is not terminated"));
    }

    let lead_length = fields.u16("lead length")? as usize;
    if lead_length > MAX_NOTATION_LENGTH {
        return Err(Error::corrupt(
            offset,
            format!("lead length {lead_length} exceeds {MAX_NOTATION_LENGTH}"),
        ));
    }
    let notation: Vec<PlaceNotation> = fields
        .take(lead_length * 2, "place notation")?
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let lead_count = fields.u16("lead count")?;
    let hunt_bells = fields.u16("hunt bells")?;

    Ok(Method {
        title: title[..title_len].to_vec(),
        stage,
        notation,
        lead_count,
        hunt_bells,
    })
}

/// Decode a whole record, length prefix included, from the front of `bytes`.
pub fn decode_record(bytes: &[u8], stage: u8) -> Result<Method> {
    let length = le_u16(bytes, 0)
        .ok_or_else(|| Error::corrupt(0, "missing length prefix"))? as usize;
    check_length(length, 0)?;
    let payload = bytes
        .get(2..2 + length)
        .ok_or_else(|| Error::corrupt(0, format!("record of {length} bytes is truncated")))?;
    decode_payload(payload, stage, 0)
}

/// Encode a method as a record, length prefix included.
pub fn encode_record(method: &Method) -> Result<Vec<u8>> {
    if method.title.len() + 1 > MAX_TITLE_LENGTH {
        return Err(Error::Unencodable {
            detail: format!(
                "title of {} bytes leaves no room for the terminator",
                method.title.len()
            ),
        });
    }
    if method.notation.len() > MAX_NOTATION_LENGTH {
        return Err(Error::Unencodable {
            detail: format!("lead of {} changes is too long", method.notation.len()),
        });
    }

    let mut payload = Vec::with_capacity(7 + method.title.len() + 2 * method.notation.len());
    payload.push(method.title.len() as u8);
    payload.extend_from_slice(&method.title);
    payload.push(0);
    write_u16_le(&mut payload, method.notation.len() as u16)?;
    for &step in &method.notation {
        write_u16_le(&mut payload, step)?;
    }
    write_u16_le(&mut payload, method.lead_count)?;
    write_u16_le(&mut payload, method.hunt_bells)?;

    let mut record = Vec::with_capacity(2 + payload.len());
    write_u16_le(&mut record, payload.len() as u16)?;
    record.extend_from_slice(&payload);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_bob_minor() -> Method {
        Method {
            title: b"Plain Bob".to_vec(),
            stage: 6,
            notation: vec![
                0, 0b100001, 0, 0b100001, 0, 0b100001, 0, 0b100001, 0, 0b100001, 0, 0b11,
            ],
            lead_count: 5,
            hunt_bells: 0b1,
        }
    }

    #[test]
    fn test_encode_layout() {
        let method = Method {
            title: b"AB".to_vec(),
            stage: 4,
            notation: vec![0, 0b1001],
            lead_count: 3,
            hunt_bells: 0b1,
        };
        let record = encode_record(&method).unwrap();
        assert_eq!(
            record,
            [
                14, 0, // length
                2, b'A', b'B', 0, // title
                2, 0, 0, 0, 9, 0, // notation
                3, 0, // lead count
                1, 0, // hunt bells
            ]
        );
    }

    #[test]
    fn test_decode_matches_encode() {
        let method = plain_bob_minor();
        let record = encode_record(&method).unwrap();
        let decoded = decode_record(&record, 6).unwrap();
        assert_eq!(decoded, method);
        assert_eq!(encode_record(&decoded).unwrap(), record);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut record = encode_record(&plain_bob_minor()).unwrap();
        let length = u16::from_le_bytes([record[0], record[1]]) + 3;
        record[..2].copy_from_slice(&length.to_le_bytes());
        record.extend_from_slice(&[0xaa, 0xbb, 0xcc]);
        assert_eq!(decode_record(&record, 6).unwrap(), plain_bob_minor());
    }

    #[test]
    fn test_decode_rejects_truncated_fields() {
        let record = encode_record(&plain_bob_minor()).unwrap();
        let payload = &record[2..];
        for cut in 0..payload.len() {
            let err = decode_payload(&payload[..cut], 6, 100).unwrap_err();
            assert!(err.is_corrupt(), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn test_decode_rejects_oversized_fields() {
        // Title length 200
        let mut payload = vec![200u8];
        payload.extend(std::iter::repeat_n(b'A', 201));
        assert!(decode_payload(&payload, 6, 0).unwrap_err().is_corrupt());

        // Lead length 300
        let mut payload = vec![1, b'A', 0];
        payload.extend_from_slice(&300u16.to_le_bytes());
        payload.extend(std::iter::repeat_n(0u8, 604));
        let err = decode_payload(&payload, 6, 0).unwrap_err();
        assert!(err.to_string().contains("lead length 300"));
    }

    #[test]
    fn test_decode_rejects_unterminated_title() {
        let mut record = encode_record(&plain_bob_minor()).unwrap();
        record[2 + 1 + 9] = b'!';
        assert!(decode_record(&record, 6).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_length_ceiling() {
        assert!(check_length(0, 0).is_err());
        assert!(check_length(1, 0).is_ok());
        assert!(check_length(1023, 0).is_ok());
        assert!(check_length(1024, 0).is_err());

        let bytes = [0x00, 0x04, 1, 2, 3];
        assert!(decode_record(&bytes, 6).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_encode_limits() {
        let mut method = plain_bob_minor();
        method.title = vec![b'A'; 127];
        assert!(encode_record(&method).is_ok());
        method.title = vec![b'A'; 128];
        assert!(matches!(encode_record(&method), Err(Error::Unencodable { .. })));

        let mut method = plain_bob_minor();
        method.notation = vec![0; 257];
        assert!(matches!(encode_record(&method), Err(Error::Unencodable { .. })));
    }
}
