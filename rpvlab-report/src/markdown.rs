//! Markdown Output
//!
//! Table summary suitable for pasting into an issue or pull request.

use crate::report::Report;
use std::fmt::Write;

/// Generate a Markdown summary of the report
///
/// `currency` prefixes every monetary value (e.g. `"R$"`).
pub fn generate_markdown_report(report: &Report, currency: &str) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "## RPV A/B Test ({})\n", report.meta.config.method);

    md.push_str("| Group | Sessions | Revenue | RPV | Std. error |\n");
    md.push_str("|-------|---------:|--------:|----:|-----------:|\n");
    for (name, group) in [("Control", &report.control), ("Variation", &report.variation)] {
        let override_mark = if group.rpv_overridden { " *" } else { "" };
        let _ = writeln!(
            md,
            "| {} | {} | {} {:.2} | {} {:.2}{} | {:.4} |",
            name,
            group.sessions,
            currency,
            group.revenue,
            currency,
            group.rpv,
            override_mark,
            group.standard_error
        );
    }
    if report.control.rpv_overridden || report.variation.rpv_overridden {
        md.push_str("\n\\* RPV entered manually\n");
    }

    let _ = writeln!(
        md,
        "\n**Probability the variation is better:** {:.2}%\n",
        report.probability.variation_better * 100.0
    );
    let _ = writeln!(
        md,
        "> {} **{}**: {}\n",
        report.verdict.verdict.icon(),
        report.verdict.headline,
        report.verdict.explanation
    );

    let d = &report.difference;
    md.push_str("| Difference | Value |\n");
    md.push_str("|------------|------:|\n");
    let _ = writeln!(md, "| Mean | {} {:.4} |", currency, d.mean);
    let _ = writeln!(md, "| Relative uplift | {:+.2}% |", d.relative_uplift_pct);
    let _ = writeln!(
        md,
        "| {:.0}% credible interval | [{:.4}, {:.4}] |",
        d.ci_level * 100.0,
        d.ci_lower,
        d.ci_upper
    );
    if let Some(analytic) = report.probability.analytic {
        let _ = writeln!(md, "| Closed-form probability | {:.2}% |", analytic * 100.0);
    }

    if let Some(diag) = &report.diagnostics {
        let _ = writeln!(
            md,
            "\n### Diagnostics ({} chains x {} draws, {} tuning)\n",
            diag.chains, diag.draws_per_chain, diag.tune
        );
        md.push_str("| Parameter | R-hat | ESS | Acceptance |\n");
        md.push_str("|-----------|------:|----:|-----------:|\n");
        for p in &diag.parameters {
            let _ = writeln!(
                md,
                "| {} | {:.4} | {:.0} | {:.1}% |",
                p.name,
                p.r_hat,
                p.ess,
                p.acceptance_rate * 100.0
            );
        }
        if !diag.converged {
            md.push_str("\n:warning: Chains may not have converged.\n");
        }
    }

    md
}
