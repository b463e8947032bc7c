//! Tolerant, line-oriented MIF reader.
//!
//! [`MifReader`] is a two-state machine with one terminal state:
//!
//! ```text
//!   BeforeContent --"CONTENT BEGIN"--> InContent --"END"--> Done
//! ```
//!
//! Before the content section only header fields are recorded. Inside it, every
//! line shaped like `<address> : <value>;` yields a record and anything else is
//! skipped. Once `END` is seen no further line is consumed. Nothing here fails:
//! a file without a content section simply produces no records.

use std::collections::HashMap;

use log::{debug, warn};

use crate::{Radix, Rgb};

/// How record values are written in the content section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// A plain number in the given radix.
    Number(Radix),
    /// Six hex digits `RRGGBB`, decoded channel by channel into `0xRRGGBB`.
    RgbHex,
}

impl Default for ValueFormat {
    fn default() -> Self {
        ValueFormat::Number(Radix::Hex)
    }
}

/// Reader configuration. The value format is chosen by the caller; it is never
/// inferred from `DATA_RADIX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Radix for record addresses. `None` follows the `ADDRESS_RADIX` header
    /// and falls back to hexadecimal when the header is absent.
    pub address_radix: Option<Radix>,
    pub value_format: ValueFormat,
    /// Log a warning when `DEPTH` disagrees with the number of records.
    pub check_depth: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            address_radix: None,
            value_format: ValueFormat::default(),
            check_depth: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    BeforeContent,
    InContent,
    Done,
}

/// Header fields seen before `CONTENT BEGIN`. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MifHeader {
    pub width: Option<u32>,
    pub depth: Option<usize>,
    pub address_radix: Option<Radix>,
    pub data_radix: Option<Radix>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Width(u32),
    Depth(usize),
    AddressRadix(Radix),
    DataRadix(Radix),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record {
    pub address: u32,
    pub value: u32,
}

impl From<(u32, u32)> for Record {
    fn from((address, value): (u32, u32)) -> Self {
        Self { address, value }
    }
}

/// What the reader did with one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    Header(HeaderField),
    ContentBegin,
    Record(Record),
    /// A content line that does not parse as a record; it was skipped.
    Malformed,
    End,
    /// Blank, comment, unknown header, or anything after `END`.
    Ignored,
}

/// Incremental MIF reader. Feed it lines, then [`finish`](Self::finish).
#[derive(Debug)]
pub struct MifReader {
    state: ParseState,
    options: ReadOptions,
    header: MifHeader,
    records: Vec<Record>,
    malformed: usize,
}

impl MifReader {
    pub fn new(options: ReadOptions) -> Self {
        Self {
            state: ParseState::BeforeContent,
            options,
            header: MifHeader::default(),
            records: Vec::new(),
            malformed: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn feed_line(&mut self, line: &str) -> LineEvent {
        let line = line.trim();
        match self.state {
            ParseState::Done => LineEvent::Ignored,
            _ if line.is_empty() || line.starts_with("--") => LineEvent::Ignored,
            ParseState::BeforeContent => self.before_content(line),
            ParseState::InContent => self.in_content(line),
        }
    }

    fn before_content(&mut self, line: &str) -> LineEvent {
        if starts_with_ignore_case(line, "CONTENT BEGIN") {
            debug!("entering content section");
            self.state = ParseState::InContent;
            return LineEvent::ContentBegin;
        }

        match parse_header_field(line) {
            Some(field) => {
                match field {
                    HeaderField::Width(width) => self.header.width = Some(width),
                    HeaderField::Depth(depth) => self.header.depth = Some(depth),
                    HeaderField::AddressRadix(radix) => self.header.address_radix = Some(radix),
                    HeaderField::DataRadix(radix) => self.header.data_radix = Some(radix),
                }
                LineEvent::Header(field)
            }
            None => LineEvent::Ignored,
        }
    }

    fn in_content(&mut self, line: &str) -> LineEvent {
        if starts_with_ignore_case(line, "END") {
            debug!("content section closed after {} records", self.records.len());
            self.state = ParseState::Done;
            return LineEvent::End;
        }

        let address_radix = self
            .options
            .address_radix
            .or(self.header.address_radix)
            .unwrap_or(Radix::Hex);

        match parse_record(line, address_radix, self.options.value_format) {
            Some(record) => {
                self.records.push(record);
                LineEvent::Record(record)
            }
            None => {
                debug!("skipping malformed record line: {line:?}");
                self.malformed += 1;
                LineEvent::Malformed
            }
        }
    }

    /// Consumes the reader. Reaching the end of input in any state is fine.
    pub fn finish(self) -> MifDocument {
        let document = MifDocument {
            header: self.header,
            records: self.records,
            malformed: self.malformed,
        };
        if self.options.check_depth {
            if let Some((declared, parsed)) = document.depth_mismatch() {
                warn!("DEPTH={declared} but {parsed} records were parsed");
            }
        }
        document
    }
}

/// Parses a whole MIF text.
pub fn read_mif(text: &str, options: &ReadOptions) -> MifDocument {
    let mut reader = MifReader::new(*options);
    for line in text.lines() {
        if reader.feed_line(line) == LineEvent::End {
            break;
        }
    }
    reader.finish()
}

/// Parsed MIF content: header fields and records in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MifDocument {
    pub header: MifHeader,
    pub records: Vec<Record>,
    /// Number of skipped content lines.
    pub malformed: usize,
}

impl MifDocument {
    /// Values in input order. Input order is assumed to be address order; the
    /// records are not re-sorted.
    pub fn values(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Address → value lookup. A repeated address keeps its last value.
    pub fn address_map(&self) -> HashMap<u32, u32> {
        self.records.iter().map(|r| (r.address, r.value)).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(declared DEPTH, parsed records)` when both are known and differ.
    pub fn depth_mismatch(&self) -> Option<(usize, usize)> {
        self.header
            .depth
            .filter(|&depth| depth != self.records.len())
            .map(|depth| (depth, self.records.len()))
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn parse_header_field(line: &str) -> Option<HeaderField> {
    let (key, value) = line.split_once('=')?;
    let value = value.trim().trim_end_matches(';').trim();
    let key = key.trim();

    if key.eq_ignore_ascii_case("WIDTH") {
        Radix::Dec.parse(value).map(HeaderField::Width)
    } else if key.eq_ignore_ascii_case("DEPTH") {
        Radix::Dec
            .parse(value)
            .map(|depth| HeaderField::Depth(depth as usize))
    } else if key.eq_ignore_ascii_case("ADDRESS_RADIX") {
        value.parse().ok().map(HeaderField::AddressRadix)
    } else if key.eq_ignore_ascii_case("DATA_RADIX") {
        value.parse().ok().map(HeaderField::DataRadix)
    } else {
        None
    }
}

fn parse_record(line: &str, address_radix: Radix, value_format: ValueFormat) -> Option<Record> {
    let (address, value) = line.split_once(':')?;
    let address = address_radix.parse(address.trim())?;
    // Anything after the first `;` is a trailing comment.
    let value = value.split_once(';').map_or(value, |(v, _)| v).trim();

    let value = match value_format {
        ValueFormat::Number(radix) => radix.parse(value)?,
        ValueFormat::RgbHex => parse_rrggbb(value)?.to_u24(),
    };
    Some(Record { address, value })
}

fn parse_rrggbb(text: &str) -> Option<Rgb> {
    if text.len() != 6 {
        return None;
    }
    let channel = |range: core::ops::Range<usize>| {
        text.get(range)
            .and_then(|digits| Radix::Hex.parse(digits))
            .map(|v| v as u8)
    };
    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
