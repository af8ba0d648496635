//! Output Formatting
//!
//! Human-readable output formatting for comparison reports.
//!
//! Generates terminal-friendly output with:
//! - Group metrics with currency-prefixed RPV
//! - Probability of improvement and the verdict explanation
//! - Difference summary and credible interval
//! - MCMC diagnostics
//! - An ASCII histogram of the sampled distributions

use rpvlab_report::{HistogramReport, Report};
use rpvlab_stats::SamplingMethod;

/// Glyphs for the first and second series, and for overlap
const SERIES_GLYPHS: [char; 2] = ['o', 'x'];
const OVERLAP_GLYPH: char = '#';

/// Presentation settings for human output
#[derive(Debug, Clone)]
pub struct HumanOptions {
    /// Prefix for monetary values
    pub currency: String,
    /// Histogram width in columns
    pub histogram_width: usize,
    /// Histogram height in rows
    pub histogram_height: usize,
}

impl Default for HumanOptions {
    fn default() -> Self {
        Self {
            currency: "R$".to_string(),
            histogram_width: 50,
            histogram_height: 12,
        }
    }
}

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report, options: &HumanOptions) -> String {
    let currency = &options.currency;
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!(
        "Bayesian RPV A/B Test ({})\n",
        report.meta.config.method
    ));
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for (name, group) in [("Control", &report.control), ("Variation", &report.variation)] {
        output.push_str(&format!(
            "  {:<10} RPV: {} {:.2}{}\n",
            name,
            currency,
            group.rpv,
            if group.rpv_overridden { " (manual)" } else { "" }
        ));
        output.push_str(&format!(
            "             sessions: {}  revenue: {} {:.2}  SE: {:.4}\n",
            group.sessions, currency, group.revenue, group.standard_error
        ));
    }

    output.push_str(&format!(
        "\n  Probability the variation is better: {:.2}%\n\n",
        report.probability.variation_better * 100.0
    ));

    output.push_str(&format!(
        "  {} {}\n",
        report.verdict.verdict.icon(),
        report.verdict.explanation
    ));

    let d = &report.difference;
    output.push_str("\nDifference (variation - control)\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  mean: {} {:.4}  median: {} {:.4}  uplift: {:+.2}%\n",
        currency, d.mean, currency, d.median, d.relative_uplift_pct
    ));
    output.push_str(&format!(
        "  {:.0}% credible interval: [{} {:.4}, {} {:.4}]\n",
        d.ci_level * 100.0,
        currency,
        d.ci_lower,
        currency,
        d.ci_upper
    ));
    if let Some(analytic) = report.probability.analytic {
        output.push_str(&format!(
            "  closed-form probability: {:.2}%\n",
            analytic * 100.0
        ));
    }

    if let Some(diag) = &report.diagnostics {
        output.push_str(&format!(
            "\nDiagnostics ({} chains x {} draws, {} tuning)\n",
            diag.chains, diag.draws_per_chain, diag.tune
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for p in &diag.parameters {
            let status = if p.r_hat < rpvlab_stats::RHAT_THRESHOLD
                && p.ess >= rpvlab_stats::MIN_EFFECTIVE_SAMPLES
            {
                "✓"
            } else {
                "✗"
            };
            output.push_str(&format!(
                "  {} {:<14} r_hat: {:.4}  ess: {:.0}  acceptance: {:.1}%\n",
                status,
                p.name,
                p.r_hat,
                p.ess,
                p.acceptance_rate * 100.0
            ));
        }
    }

    if let Some(hist) = &report.histogram {
        let (title, use_density) = match report.meta.config.method {
            SamplingMethod::Normal => ("RPV distribution (density)", true),
            SamplingMethod::Mcmc => ("Posterior RPV difference (frequency)", false),
        };
        output.push_str(&format!("\n{}\n", title));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&render_histogram(
            hist,
            options.histogram_width,
            options.histogram_height,
            use_density,
        ));
    }

    output.push('\n');
    output
}

/// Draw a histogram as ASCII art
///
/// Bins are merged into at most `width` columns. Series are overlaid; cells
/// covered by more than one series use `#`. Markers are drawn beneath the
/// axis as numbered ticks with a legend; markers outside the edges show as a
/// `<` or `>` past the matching end of the axis.
pub fn render_histogram(
    hist: &HistogramReport,
    width: usize,
    height: usize,
    use_density: bool,
) -> String {
    let bins = hist.edges.len().saturating_sub(1);
    if bins == 0 || hist.series.is_empty() || height == 0 {
        return String::new();
    }
    let cols = width.clamp(1, bins);

    // Column heights per series, mean over the merged bins
    let columns: Vec<Vec<f64>> = hist
        .series
        .iter()
        .map(|s| {
            let mut sums = vec![0.0; cols];
            let mut counts = vec![0usize; cols];
            for b in 0..bins {
                let c = b * cols / bins;
                sums[c] += if use_density {
                    s.density[b]
                } else {
                    s.counts[b] as f64
                };
                counts[c] += 1;
            }
            sums.iter()
                .zip(&counts)
                .map(|(s, &n)| if n == 0 { 0.0 } else { s / n as f64 })
                .collect()
        })
        .collect();

    let max = columns
        .iter()
        .flatten()
        .cloned()
        .fold(0.0_f64, f64::max);
    let bar_height = |v: f64| {
        if max <= 0.0 {
            0
        } else {
            ((v / max) * height as f64).round() as usize
        }
    };

    let mut out = String::new();
    for row in (1..=height).rev() {
        out.push_str("  |");
        for c in 0..cols {
            let filled: Vec<usize> = columns
                .iter()
                .enumerate()
                .filter(|(_, col)| bar_height(col[c]) >= row)
                .map(|(i, _)| i)
                .collect();
            out.push(match filled.as_slice() {
                [] => ' ',
                [only] => SERIES_GLYPHS.get(*only).copied().unwrap_or(OVERLAP_GLYPH),
                _ => OVERLAP_GLYPH,
            });
        }
        out.push('\n');
    }
    out.push_str("  +");
    out.push_str(&"-".repeat(cols));
    out.push('\n');

    let lo = hist.edges[0];
    let hi = hist.edges[bins];
    if !hist.markers.is_empty() {
        // Off-scale markers point past the edge instead of sitting inside the plot
        let mut left_arrow = ' ';
        let mut right_arrow = ' ';
        let mut ticks = vec![' '; cols];
        for (i, m) in hist.markers.iter().enumerate() {
            if m.value < lo {
                left_arrow = '<';
            } else if m.value > hi {
                right_arrow = '>';
            } else {
                let c = (((m.value - lo) / (hi - lo)) * cols as f64).floor();
                let c = (c.max(0.0) as usize).min(cols - 1);
                ticks[c] = char::from_digit((i + 1) as u32 % 10, 10).unwrap_or('^');
            }
        }
        out.push_str("  ");
        out.push(left_arrow);
        out.extend(ticks);
        out.push(right_arrow);
        out.push('\n');
    }

    let left = format!("{:.2}", lo);
    let right = format!("{:.2}", hi);
    let gap = (cols + 1).saturating_sub(left.len() + right.len()).max(1);
    out.push_str(&format!("   {}{}{}\n", left, " ".repeat(gap), right));

    let legend: Vec<String> = hist
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{} {}",
                SERIES_GLYPHS.get(i).copied().unwrap_or(OVERLAP_GLYPH),
                s.label
            )
        })
        .collect();
    let overlap = if hist.series.len() > 1 {
        format!("  {} both", OVERLAP_GLYPH)
    } else {
        String::new()
    };
    out.push_str(&format!("   {}{}\n", legend.join("  "), overlap));

    for (i, m) in hist.markers.iter().enumerate() {
        let off_scale = if m.value < lo || m.value > hi {
            " (off scale)"
        } else {
            ""
        };
        out.push_str(&format!(
            "   {} {} = {:.2}{}\n",
            (i + 1) % 10,
            m.label,
            m.value,
            off_scale
        ));
    }

    out
}
