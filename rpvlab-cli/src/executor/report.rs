//! Report Building

use super::metadata::build_report_meta;
use rpvlab_report::Report;
use rpvlab_stats::{ComparisonConfig, ComparisonResult};

/// Build a complete Report from a comparison result
///
/// `with_histogram` controls whether the binned distributions are included.
pub fn build_report(
    result: &ComparisonResult,
    config: &ComparisonConfig,
    with_histogram: bool,
) -> Report {
    let meta = build_report_meta(config, result.duration_ms);
    Report::from_result(meta, result, with_histogram)
}
