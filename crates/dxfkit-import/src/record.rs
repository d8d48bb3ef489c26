//! # DXF Record Stream
//!
//! A DXF file is a sequence of two-line records: an integer group code
//! followed by a value line. [`RecordReader`] exposes the stream one record
//! at a time so the section parser never deals with raw lines;
//! [`AsciiRecordReader`] implements it for text DXF input.

use std::io::BufRead;

use dxfkit_core::error::{DxfError, Result};

/// Record-by-record access to a DXF stream.
///
/// After a successful [`next_record`](Self::next_record) the current record
/// stays addressable until the next call: the group code through
/// [`gc`](Self::gc) and the value line through the typed accessors.
pub trait RecordReader {
    /// Advances to the next record. Returns `false` once the stream or the
    /// `EOF` marker record is reached.
    fn next_record(&mut self) -> Result<bool>;

    /// Group code of the current record.
    fn gc(&self) -> i32;

    /// Value line parsed as an integer.
    fn int(&self) -> Result<i32>;

    /// Value line parsed as a number.
    fn dbl(&self) -> Result<f64>;

    /// Value line verbatim.
    fn str_value(&self) -> &str;

    /// True when the current record has this group code and exactly this
    /// value.
    fn matches(&self, gc: i32, value: &str) -> bool;

    /// Position for error messages, e.g. "line 42".
    fn position(&self) -> String;
}

fn parse_int(line: &str) -> Result<i32> {
    line.trim()
        .parse()
        .map_err(|_| DxfError::InvalidInt.into())
}

fn parse_dbl(line: &str) -> Result<f64> {
    line.trim()
        .parse()
        .map_err(|_| DxfError::InvalidNumber.into())
}

/// Reads records from text DXF input.
///
/// Lines may end in LF or CRLF. The line counter covers both lines of each
/// record, so reported positions point at the value line of the record that
/// failed.
pub struct AsciiRecordReader<R> {
    input: R,
    eof: bool,
    line_num: u64,
    line: String,
    gc: i32,
}

impl<R: BufRead> AsciiRecordReader<R> {
    pub fn new(input: R) -> Self {
        AsciiRecordReader {
            input,
            eof: false,
            line_num: 0,
            line: String::new(),
            gc: 0,
        }
    }

    fn next_line(&mut self) -> Result<()> {
        self.line.clear();
        let n = self.input.read_line(&mut self.line).map_err(DxfError::Read)?;
        let had_newline = self.line.ends_with('\n');
        if had_newline {
            self.line.pop();
        }
        if self.line.ends_with('\r') {
            self.line.pop();
        }
        if self.line_num == 0 {
            if n == 0 {
                return Err(DxfError::MissingFirstLine.into());
            }
            if self.line == "AutoCAD Binary DXF" {
                return Err(DxfError::BinaryFile.into());
            }
        }
        self.line_num += 1;
        if n == 0 || !had_newline {
            self.eof = true;
        }
        Ok(())
    }
}

impl<R: BufRead> RecordReader for AsciiRecordReader<R> {
    fn next_record(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }
        self.next_line()?;
        if self.eof {
            // The group code line was the last line of the stream; no
            // value line can follow.
            return Ok(false);
        }
        self.gc = parse_int(&self.line)?;
        self.next_line()?;
        if self.matches(0, "EOF") {
            self.eof = true;
            return Ok(false);
        }
        Ok(true)
    }

    fn gc(&self) -> i32 {
        self.gc
    }

    fn int(&self) -> Result<i32> {
        parse_int(&self.line)
    }

    fn dbl(&self) -> Result<f64> {
        parse_dbl(&self.line)
    }

    fn str_value(&self) -> &str {
        &self.line
    }

    fn matches(&self, gc: i32, value: &str) -> bool {
        self.gc == gc && self.line == value
    }

    fn position(&self) -> String {
        format!("line {}", self.line_num)
    }
}
