//! GC deviation track: per-window GC% minus the genome-wide GC%.

use rayon::prelude::*;

use crate::error::{Result, TrackError};
use crate::io::sequence::Contig;
use crate::stats::{count_nt, count_nt_bytes, NucleotideCounts};
use crate::style::DeviationStyle;
use crate::track::window::{WindowBounds, WindowedPoint};

#[derive(Debug, Clone)]
pub struct GcTrack {
    /// Genome-wide GC in percent
    pub mean_gc: f64,
    pub points: Vec<WindowedPoint>,
}

/// Pooled GC percentage over all contigs.
///
/// Fails with `InvalidInput` when the genome has no A/C/G/T bases at all.
pub fn mean_gc(contigs: &[Contig]) -> Result<f64> {
    let totals = contigs
        .par_iter()
        .map(|c| count_nt(&c.sequence))
        .reduce(NucleotideCounts::default, |mut acc, counts| {
            acc += counts;
            acc
        });

    if totals.total() == 0 {
        return Err(TrackError::InvalidInput(
            "genome has no unambiguous bases, mean GC is undefined".to_string(),
        ));
    }
    Ok(100.0 * totals.gc_fraction())
}

/// Deviation points for a single contig, windows in ascending start order, produced lazily.
pub fn gc_windows<'a>(
    contig: &'a Contig,
    window: usize,
    mean_gc: f64,
    style: &'a DeviationStyle,
) -> Result<impl Iterator<Item = WindowedPoint> + 'a> {
    let seq = contig.sequence.as_bytes();
    let points = WindowBounds::new(seq.len(), window)?.map(move |(start, end)| {
        let value = 100.0 * count_nt_bytes(&seq[start..end]).gc_fraction() - mean_gc;
        WindowedPoint {
            contig: contig.id.clone(),
            start,
            end,
            value,
            color: style.color_for(value).to_string(),
        }
    });
    Ok(points)
}

/// Whole-genome GC track, contigs in input order.
pub fn gc_track(contigs: &[Contig], style: &DeviationStyle) -> Result<GcTrack> {
    let mean_gc = mean_gc(contigs)?;

    let per_contig: Vec<Vec<WindowedPoint>> = contigs
        .par_iter()
        .map(|contig| {
            gc_windows(contig, style.window_size, mean_gc, style)
                .map(|points| points.collect::<Vec<_>>())
        })
        .collect::<Result<_>>()?;

    Ok(GcTrack {
        mean_gc,
        points: per_contig.into_iter().flatten().collect(),
    })
}
