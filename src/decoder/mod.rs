//! Event Decoder
//!
//! Turns one raw telemetry line into a typed [`Event`]. A line is a list
//! of `;`-separated fields:
//!
//! ```text
//! <timestamp ns>;<tag>;<payload field 0>;<payload field 1>;...
//! ```
//!
//! Each known tag has its own decode function with a fixed schema. Schema
//! mismatches (missing fields, non-numeric text, malformed drop-reason
//! records) are reported as [`DecodeError`] instead of producing NaN values.
//! Unknown tags decode to [`EventRecord::Unrecognized`].

mod fields;
mod records;

use thiserror::Error;

use crate::types::{Event, EventRecord, EventTag, RawEntry, SlotUsageKind};
use fields::{FieldReader, PAYLOAD_OFFSET};

/// Field delimiter on the wire
pub const DELIMITER: char = ';';

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Errors produced while decoding a line
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("empty line")]
    EmptyLine,

    #[error("line has no event tag")]
    MissingTag,

    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("{tag}: missing field {field} at index {index}")]
    MissingField {
        tag: EventTag,
        index: usize,
        field: &'static str,
    },

    #[error("{tag}: field {field} at index {index} is not a number: '{value}'")]
    InvalidNumber {
        tag: EventTag,
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("malformed drop reason record {field}: '{value}'")]
    InvalidDropReasons { field: &'static str, value: String },
}

/// Decode a delivered entry
pub fn decode_entry(entry: &RawEntry) -> Result<Event, DecodeError> {
    decode_line(&entry.stream, &entry.line)
}

/// Decode one line for `stream`
pub fn decode_line(stream: &str, line: &str) -> Result<Event, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(DecodeError::EmptyLine);
    }

    let mut parts: Vec<&str> = line.split(DELIMITER).collect();
    // a trailing delimiter leaves one empty field behind
    if parts.len() > PAYLOAD_OFFSET && parts.last().is_some_and(|p| p.trim().is_empty()) {
        parts.pop();
    }

    let timestamp_ms = parse_timestamp(parts[0])?;
    let tag = parts.get(1).map(|t| t.trim()).ok_or(DecodeError::MissingTag)?;
    if tag.is_empty() {
        return Err(DecodeError::MissingTag);
    }

    let Some(known) = EventTag::from_wire(tag) else {
        return Ok(Event::new(
            stream,
            timestamp_ms,
            EventRecord::Unrecognized {
                tag: tag.to_string(),
            },
        ));
    };

    let payload = &parts[PAYLOAD_OFFSET.min(parts.len())..];
    let mut reader = FieldReader::new(known, payload);
    let record = match known {
        EventTag::Start => records::start(&mut reader)?,
        EventTag::StationAdded => records::station_added(&mut reader)?,
        EventTag::AccessPointAdded => records::access_point_added(&mut reader)?,
        EventTag::StationAssociated => records::station_associated(&mut reader)?,
        EventTag::StationDeassociated => records::station_deassociated(&mut reader)?,
        EventTag::NodeStats => records::node_stats(&mut reader, timestamp_ms)?,
        EventTag::SlotStatsStation => records::slot_stats(&mut reader, SlotUsageKind::Station)?,
        EventTag::SlotStatsAccessPoint => {
            records::slot_stats(&mut reader, SlotUsageKind::AccessPoint)?
        }
    };

    Ok(Event::new(stream, timestamp_ms, record))
}

/// Integer nanoseconds to fractional milliseconds
fn parse_timestamp(raw: &str) -> Result<f64, DecodeError> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(|ns| ns as f64 / NANOS_PER_MILLI)
        .map_err(|_| DecodeError::InvalidTimestamp {
            value: raw.to_string(),
        })
}
