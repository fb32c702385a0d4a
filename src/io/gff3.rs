//! Streaming reader for 9-column GFF3 feature files
//!
//! Only `CDS`, `rRNA` and `tRNA` features are returned; every other feature
//! type is skipped silently. Parsing stops for good at a `##FASTA` line,
//! since what follows is the embedded genome rather than annotation.

use std::collections::HashMap;
use std::io::{self, BufRead};

use crate::error::{Result, TrackError};
use crate::io::open_input;

const FASTA_SENTINEL: &str = "##FASTA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Cds,
    Rrna,
    Trna,
}

impl FeatureType {
    /// Case-sensitive match on column 3; `None` for types we ignore.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CDS" => Some(FeatureType::Cds),
            "rRNA" => Some(FeatureType::Rrna),
            "tRNA" => Some(FeatureType::Trna),
            _ => None,
        }
    }
}

/// A feature line; coordinates are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub contig: String,
    pub feature_type: FeatureType,
    pub start: u64,
    pub end: u64,
    pub attributes: HashMap<String, String>,
    pub product: Option<String>,
    /// Source line, kept for warnings
    pub line: String,
}

/// Undo GFF3 percent-encoding (`%3B` -> `;`). Invalid escapes are kept verbatim.
pub fn percent_decode(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Split a `key=value;key=value` attribute column.
///
/// Returns the attribute map and the `product` value. When `product=`
/// appears more than once the last occurrence wins.
pub fn parse_attributes(column: &str) -> (HashMap<String, String>, Option<String>) {
    let mut attributes = HashMap::new();
    let mut product = None;

    for token in column.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(value) = token.strip_prefix("product=") {
            product = Some(percent_decode(value));
        }
        if let Some((key, value)) = token.split_once('=') {
            attributes.insert(key.to_string(), percent_decode(value));
        }
    }

    (attributes, product)
}

/// Strict line parser over a GFF3 stream.
pub struct GffReader<R: BufRead> {
    lines: io::Lines<R>,
    path: String,
    line_no: usize,
    done: bool,
}

impl GffReader<Box<dyn BufRead>> {
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::new(open_input(path)?, path))
    }
}

impl<R: BufRead> GffReader<R> {
    pub fn new(reader: R, path: &str) -> Self {
        Self {
            lines: reader.lines(),
            path: path.to_string(),
            line_no: 0,
            done: false,
        }
    }

    fn parse_line(&self, line: &str) -> Result<Option<FeatureRecord>> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 9 {
            return Err(TrackError::malformed(
                &self.path,
                self.line_no,
                format!("expected 9 tab-separated columns, found {}", cols.len()),
            ));
        }

        let feature_type = match FeatureType::parse(cols[2]) {
            Some(t) => t,
            None => return Ok(None),
        };

        let start = self.parse_coord(cols[3], "start")?;
        let end = self.parse_coord(cols[4], "end")?;
        if start > end {
            return Err(TrackError::malformed(
                &self.path,
                self.line_no,
                format!("start {} is after end {}", start, end),
            ));
        }

        let (attributes, product) = parse_attributes(cols[8]);

        Ok(Some(FeatureRecord {
            contig: cols[0].to_string(),
            feature_type,
            start,
            end,
            attributes,
            product,
            line: line.to_string(),
        }))
    }

    fn parse_coord(&self, value: &str, name: &str) -> Result<u64> {
        value.trim().parse::<u64>().map_err(|_| {
            TrackError::malformed(
                &self.path,
                self.line_no,
                format!("invalid {} coordinate '{}'", name, value),
            )
        })
    }
}

impl<R: BufRead> Iterator for GffReader<R> {
    type Item = Result<FeatureRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };
            self.line_no += 1;

            if line.starts_with(FASTA_SENTINEL) {
                self.done = true;
                return None;
            }
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let line = line.trim_end_matches('\r');
            match self.parse_line(line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
