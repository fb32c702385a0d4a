//! Writers for the space-separated track files read by the circular plot.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::style::ContigStyle;
use crate::track::{FeaturePoint, Karyotype, SegmentKind, WindowedPoint};

/// `chr - <id> <rank> 0 <length> <color>` per segment.
pub fn write_karyotype<W: Write>(
    writer: &mut W,
    karyotype: &Karyotype,
    style: &ContigStyle,
) -> io::Result<()> {
    for segment in &karyotype.segments {
        let color = match segment.kind {
            SegmentKind::Contig => &style.color,
            SegmentKind::Other => &style.filtered_color,
            SegmentKind::Missing => &style.missing_color,
        };
        writeln!(
            writer,
            "chr - {} {} 0 {} {}",
            segment.id, segment.rank, segment.length, color
        )?;
    }
    Ok(())
}

/// `<contig> <start> <end> <value> fill_color=<color>` per window.
pub fn write_windows<W: Write>(writer: &mut W, points: &[WindowedPoint]) -> io::Result<()> {
    for p in points {
        writeln!(
            writer,
            "{} {} {} {} fill_color={}",
            p.contig, p.start, p.end, p.value, p.color
        )?;
    }
    Ok(())
}

/// `<contig> <start> <end> <symbol> color=<color>` per feature.
pub fn write_features<W: Write>(writer: &mut W, points: &[FeaturePoint]) -> io::Result<()> {
    for p in points {
        writeln!(
            writer,
            "{} {} {} {} color={}",
            p.contig, p.start, p.end, p.symbol, p.color
        )?;
    }
    Ok(())
}

/// Create (or truncate) `path` and run `write` against a buffered handle.
pub fn export_track<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}
