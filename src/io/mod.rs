//! Input readers and output track writers
//!
//! Every reader accepts plain or gzip-compressed input, chosen by a `.gz`
//! suffix on the path.

pub mod coverage;
pub mod fasta;
pub mod fastq;
pub mod gff3;
pub mod sequence;
pub mod tracks;

use crate::error::{Result, TrackError};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a file for line-oriented reading, decompressing `.gz` files on the fly.
pub fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if !Path::new(path).exists() {
        return Err(TrackError::NotFound(path.to_string()));
    }
    let file = File::open(path)?;
    if path.ends_with(".gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
