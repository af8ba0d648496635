//! Methodology Text
//!
//! Step-by-step description of the calculation for each method, printed by
//! the `methodology` subcommand.

use rpvlab_stats::{McmcConfig, NormalConfig, SamplingMethod};

/// Describe how the probability is computed for `method`
pub fn methodology_text(method: SamplingMethod, normal: &NormalConfig, mcmc: &McmcConfig) -> String {
    let mut out = String::new();

    out.push_str("How the calculation works\n");
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");

    out.push_str("1. Revenue per visit (RPV)\n");
    out.push_str("   RPV = total revenue / sessions\n");
    out.push_str("   A manually entered RPV replaces the derived value.\n");
    out.push_str("   Standard error: SE = RPV / sqrt(sessions)\n\n");

    match method {
        SamplingMethod::Normal => {
            out.push_str("2. Model\n");
            out.push_str("   Each group's RPV is approximately Normal:\n");
            out.push_str("   RPV_control   ~ N(RPV_c, SE_c)\n");
            out.push_str("   RPV_variation ~ N(RPV_v, SE_v)\n\n");

            out.push_str("3. Monte Carlo sampling\n");
            out.push_str(&format!(
                "   {} independent draws per group (seed {}), control first.\n\n",
                normal.samples, normal.seed
            ));

            out.push_str("4. Probability\n");
            out.push_str("   P(variation > control) = #(draw_v > draw_c) / draws\n");
            out.push_str("   computed pairwise over the two sample vectors.\n");
        }
        SamplingMethod::Mcmc => {
            out.push_str("2. Bayesian model\n");
            out.push_str("   mu_control   ~ N(RPV_c, RPV_c / sqrt(sessions_c))\n");
            out.push_str("   mu_variation ~ N(RPV_v, RPV_v / sqrt(sessions_v))\n");
            out.push_str("   diff = mu_variation - mu_control\n\n");

            out.push_str("3. MCMC sampling\n");
            out.push_str(&format!(
                "   Random-walk Metropolis, {} chains x {} draws after {} tuning steps (seed {}).\n",
                mcmc.chains, mcmc.draws, mcmc.tune, mcmc.seed
            ));
            out.push_str(&format!(
                "   Step sizes adapt toward a {:.0}% acceptance rate while tuning.\n\n",
                mcmc.target_acceptance * 100.0
            ));

            out.push_str("4. Probability\n");
            out.push_str("   P(mu_variation > mu_control) = #(diff > 0) / total draws\n");
        }
    }

    out.push_str("\nVerdict: > 95% high chance, > 75% good chance, > 55% inconclusive,\n");
    out.push_str("otherwise the control remains best.\n");
    out
}
