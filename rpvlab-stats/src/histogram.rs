//! Histograms
//!
//! Bins one or more sample series over a shared range so they can be drawn
//! overlaid. Each series keeps raw counts and a density normalisation
//! (`count / (n * bin_width)`, integrating to 1 over the range).

use thiserror::Error;

/// Default number of bins
pub const DEFAULT_BINS: usize = 50;

/// One binned series
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    /// Series label (e.g. "control")
    pub label: String,
    /// Count per bin
    pub counts: Vec<u64>,
    /// Density per bin
    pub density: Vec<f64>,
}

impl HistogramSeries {
    /// Number of samples binned
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Vertical reference line (a group mean, or zero difference)
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Marker label
    pub label: String,
    /// Position on the value axis
    pub value: f64,
}

/// Binned series over shared edges
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, `bins + 1` ascending values
    pub edges: Vec<f64>,
    /// Binned series, in input order
    pub series: Vec<HistogramSeries>,
    /// Reference lines
    pub markers: Vec<Marker>,
}

/// Errors from histogram construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistogramError {
    #[error("histogram needs at least one bin")]
    NoBins,

    #[error("series '{0}' has no finite samples")]
    EmptySeries(String),
}

impl Histogram {
    /// Bin every series over the combined min..max range
    ///
    /// Non-finite samples are skipped. A zero-width range is widened to one
    /// unit around the single value.
    pub fn new(series: &[(&str, &[f64])], bins: usize) -> Result<Self, HistogramError> {
        Self::spanning(series, bins, &[])
    }

    /// Like [`Histogram::new`], with the range stretched to cover `include`
    ///
    /// Used to keep reference values (such as zero difference) on the axis.
    pub fn spanning(
        series: &[(&str, &[f64])],
        bins: usize,
        include: &[f64],
    ) -> Result<Self, HistogramError> {
        if bins == 0 {
            return Err(HistogramError::NoBins);
        }

        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (label, samples) in series {
            let mut any = false;
            for &x in samples.iter().filter(|x| x.is_finite()) {
                lo = lo.min(x);
                hi = hi.max(x);
                any = true;
            }
            if !any {
                return Err(HistogramError::EmptySeries(label.to_string()));
            }
        }
        for &x in include.iter().filter(|x| x.is_finite()) {
            lo = lo.min(x);
            hi = hi.max(x);
        }
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let series = series
            .iter()
            .map(|(label, samples)| {
                let mut counts = vec![0u64; bins];
                for &x in samples.iter().filter(|x| x.is_finite()) {
                    // The top edge belongs to the last bin
                    let idx = (((x - lo) / width) as usize).min(bins - 1);
                    counts[idx] += 1;
                }
                let n = counts.iter().sum::<u64>() as f64;
                let density = counts.iter().map(|&c| c as f64 / (n * width)).collect();
                HistogramSeries {
                    label: label.to_string(),
                    counts,
                    density,
                }
            })
            .collect();

        Ok(Self {
            edges,
            series,
            markers: Vec::new(),
        })
    }

    /// Add a reference line
    pub fn with_marker(mut self, label: impl Into<String>, value: f64) -> Self {
        self.markers.push(Marker {
            label: label.into(),
            value,
        });
        self
    }

    /// Number of bins
    pub fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Width of every bin
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if self.bins() > 0 => (hi - lo) / self.bins() as f64,
            _ => 0.0,
        }
    }

    /// Center of bin `i`
    pub fn bin_center(&self, i: usize) -> f64 {
        (self.edges[i] + self.edges[i + 1]) / 2.0
    }
}
