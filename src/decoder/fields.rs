//! Positional field access with typed conversion

use super::DecodeError;
use crate::types::EventTag;

/// Offset of the first payload field in a line (after timestamp and tag)
pub(crate) const PAYLOAD_OFFSET: usize = 2;

/// Cursor over the payload fields of one line
pub(crate) struct FieldReader<'a> {
    tag: EventTag,
    fields: &'a [&'a str],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(tag: EventTag, fields: &'a [&'a str]) -> Self {
        Self {
            tag,
            fields,
            pos: 0,
        }
    }

    /// Index of the current field within the whole line
    fn line_index(&self) -> usize {
        self.pos + PAYLOAD_OFFSET
    }

    fn next_raw(&mut self, field: &'static str) -> Result<&'a str, DecodeError> {
        match self.fields.get(self.pos) {
            Some(raw) => {
                self.pos += 1;
                Ok(raw.trim())
            }
            None => Err(DecodeError::MissingField {
                tag: self.tag,
                index: self.line_index(),
                field,
            }),
        }
    }

    fn invalid(&self, field: &'static str, value: &str) -> DecodeError {
        DecodeError::InvalidNumber {
            tag: self.tag,
            // the cursor already moved past the offending field
            index: self.line_index() - 1,
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn int(&mut self, field: &'static str) -> Result<i64, DecodeError> {
        let raw = self.next_raw(field)?;
        raw.parse::<i64>().map_err(|_| self.invalid(field, raw))
    }

    pub(crate) fn float(&mut self, field: &'static str) -> Result<f64, DecodeError> {
        let raw = self.next_raw(field)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.invalid(field, raw)),
        }
    }

    pub(crate) fn text(&mut self, field: &'static str) -> Result<String, DecodeError> {
        self.next_raw(field).map(str::to_string)
    }

    /// Next field if present and non-empty; the cursor advances either way
    pub(crate) fn optional(&mut self) -> Option<&'a str> {
        let raw = self.fields.get(self.pos).map(|s| s.trim());
        self.pos += 1;
        raw.filter(|s| !s.is_empty())
    }

    /// Parse every remaining field as an unsigned integer
    pub(crate) fn remaining_unsigned(&mut self, field: &'static str) -> Result<Vec<u64>, DecodeError> {
        let mut values = Vec::with_capacity(self.fields.len().saturating_sub(self.pos));
        while self.pos < self.fields.len() {
            let raw = self.next_raw(field)?;
            values.push(raw.parse::<u64>().map_err(|_| self.invalid(field, raw))?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_typed_fields_in_order() {
        let fields = ["3", " 1.5 ", "Default"];
        let mut reader = FieldReader::new(EventTag::Start, &fields);

        assert_eq!(reader.int("a").unwrap(), 3);
        assert_eq!(reader.float("b").unwrap(), 1.5);
        assert_eq!(reader.text("c").unwrap(), "Default");
        assert!(matches!(
            reader.int("d"),
            Err(DecodeError::MissingField { index: 5, field: "d", .. })
        ));
    }

    #[test]
    fn test_rejects_non_numeric_and_nan() {
        let fields = ["abc", "NaN", "inf"];
        let mut reader = FieldReader::new(EventTag::NodeStats, &fields);

        assert!(matches!(
            reader.int("id"),
            Err(DecodeError::InvalidNumber { index: 2, .. })
        ));
        assert!(reader.float("x").is_err());
        assert!(reader.float("y").is_err());
    }

    #[test]
    fn test_optional_advances_past_empty_field() {
        let fields = ["", "1,2", "7"];
        let mut reader = FieldReader::new(EventTag::NodeStats, &fields);

        assert_eq!(reader.optional(), None);
        assert_eq!(reader.optional(), Some("1,2"));
        assert_eq!(reader.int("after").unwrap(), 7);
        assert_eq!(reader.optional(), None);
    }

    #[test]
    fn test_remaining_unsigned() {
        let fields = ["1", "0", "42"];
        let mut reader = FieldReader::new(EventTag::SlotStatsStation, &fields);
        assert_eq!(reader.remaining_unsigned("slot").unwrap(), vec![1, 0, 42]);

        let fields = ["1", "-3"];
        let mut reader = FieldReader::new(EventTag::SlotStatsStation, &fields);
        assert!(reader.remaining_unsigned("slot").is_err());
    }
}
