//! Lazy reader over a tag stream

use crate::tag::{Record, RecordHeader, TagCode};
use crate::{Error, Result};

/// Single-pass iterator over the records of a tag stream
///
/// Each item is one record together with the exact bytes it occupied, so
/// untouched records can be copied to the output without re-encoding. The
/// iterator ends after yielding the `End` record. Running out of data before
/// `End` yields [`Error::TruncatedStream`], after which the iterator is fused.
///
/// # Examples
///
/// ```
/// use swf_tags::reader::TagReader;
/// use swf_tags::tag::TagCode;
///
/// // ShowFrame, End
/// let stream = [0x40, 0x00, 0x00, 0x00];
/// let codes: Vec<TagCode> = TagReader::new(&stream)
///     .map(|record| record.map(|r| r.code()))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(codes, [TagCode::ShowFrame, TagCode::End]);
/// ```
#[derive(Debug, Clone)]
pub struct TagReader<'a> {
    data: &'a [u8],
    position: usize,
    finished: bool,
}

impl<'a> TagReader<'a> {
    /// Read records from the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Read records from `data` starting at `position`
    ///
    /// Record offsets are reported relative to the start of `data`.
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position,
            finished: false,
        }
    }

    /// Current read offset
    pub fn offset(&self) -> usize {
        self.position
    }

    /// Whether the `End` record (or an error) has been reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes not consumed by the reader
    ///
    /// After the `End` record this is whatever trails the tag stream.
    pub fn remainder(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    fn read_record(&mut self) -> Result<Record<'a>> {
        let offset = self.position;
        let header = RecordHeader::parse(self.data, offset)?;

        let payload_start = offset + header.encoded_size();
        let available = self.data.len() - payload_start;
        let length = header.length as usize;
        if available < length {
            return Err(Error::truncated(
                payload_start,
                u64::from(header.length),
                available,
            ));
        }

        let end = payload_start + length;
        self.position = end;

        log::trace!(
            "Record {} at offset {offset}, {} byte payload",
            header.code,
            header.length
        );

        Ok(Record {
            header,
            offset,
            payload: &self.data[payload_start..end],
            raw: &self.data[offset..end],
        })
    }
}

impl<'a> Iterator for TagReader<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let record = self.read_record();
        match &record {
            Ok(record) if record.code() == TagCode::End => self.finished = true,
            Ok(_) => {}
            Err(_) => self.finished = true,
        }
        Some(record)
    }
}

impl std::iter::FusedIterator for TagReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::LengthForm;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn record(code: u16, payload: &[u8], form: LengthForm) -> Vec<u8> {
        let header =
            RecordHeader::with_form(TagCode::from_raw(code), payload.len() as u32, form);
        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_reads_until_end() {
        let mut stream = record(69, &[1, 0, 0, 0], LengthForm::Short);
        stream.extend(record(1, &[], LengthForm::Short));
        stream.extend(record(0, &[], LengthForm::Short));
        stream.extend([0xFF, 0xFF]);

        let mut reader = TagReader::new(&stream);
        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.code(), TagCode::FileAttributes);
        assert_eq!(first.offset, 0);
        assert_eq!(first.payload, &[1, 0, 0, 0]);
        assert_eq!(first.raw, &stream[..6]);

        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.code(), TagCode::ShowFrame);
        assert_eq!(second.offset, 6);

        let end = reader.next().unwrap().unwrap();
        assert_eq!(end.code(), TagCode::End);
        assert!(reader.is_finished());
        assert!(reader.next().is_none());
        assert_eq!(reader.remainder(), &[0xFF, 0xFF]);
    }

    #[test]
    fn test_truncated_payload() {
        let mut stream = record(12, &[0u8; 10], LengthForm::Short);
        stream.truncate(8);

        let mut reader = TagReader::new(&stream);
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream {
                offset: 2,
                needed: 10,
                available: 6
            }
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_missing_end_is_truncation() {
        let stream = record(1, &[], LengthForm::Short);
        let results: Vec<_> = TagReader::new(&stream).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::TruncatedStream { .. })));
    }

    #[test]
    fn test_huge_declared_length() {
        let stream = [0x3F, 0x03, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
        let err = TagReader::new(&stream).next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream {
                needed: 0xFFFF_FFFF,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_boundary_lengths_round_trip() {
        for (len, header_size) in [(0x3E, 2), (0x3F, 6)] {
            let payload = vec![0x5A; len];
            let mut stream = record(12, &payload, LengthForm::Short);
            stream.extend(record(0, &[], LengthForm::Short));

            let parsed = TagReader::new(&stream).next().unwrap().unwrap();
            assert_eq!(parsed.header.encoded_size(), header_size);
            assert_eq!(parsed.payload.len(), len);
            assert_eq!(parsed.to_bytes(), parsed.raw);
        }
    }

    #[test]
    fn test_long_form_small_payload_preserved() {
        let mut stream = record(12, &[7, 7, 7], LengthForm::Long);
        stream.extend(record(0, &[], LengthForm::Short));

        let parsed = TagReader::new(&stream).next().unwrap().unwrap();
        assert_eq!(parsed.header.form, LengthForm::Long);
        assert_eq!(parsed.raw.len(), 9);
        assert_eq!(parsed.to_bytes(), parsed.raw);
    }

    proptest! {
        #[test]
        fn prop_record_round_trip(
            code in 1u16..=0x3FF,
            payload in prop::collection::vec(any::<u8>(), 0..200),
            long in any::<bool>(),
        ) {
            let form = if long { LengthForm::Long } else { LengthForm::Short };
            let mut stream = record(code, &payload, form);
            stream.extend(record(0, &[], LengthForm::Short));

            let parsed = TagReader::new(&stream).next().unwrap().unwrap();
            prop_assert_eq!(parsed.header.code.raw(), code);
            prop_assert_eq!(parsed.payload, &payload[..]);
            prop_assert_eq!(parsed.to_bytes(), parsed.raw.to_vec());
        }
    }
}
