//! Judge spend estimation.

use crate::types::Usage;

/// Per-1k-token pricing used to estimate judge spend.
///
/// Defaults match Groq's Llama-3.1-8B rates; override through
/// [`AuditConfig`](crate::pipeline::AuditConfig) when pointing the
/// pipeline at differently-priced models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingTable {
    pub input_cost_per_1k: f64,
    pub output_cost_per_1k: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            input_cost_per_1k: 0.000_05,
            output_cost_per_1k: 0.000_08,
        }
    }
}

impl PricingTable {
    /// Estimated USD cost for the given token usage, rounded to 6 decimals.
    pub fn estimate(&self, usage: &Usage) -> f64 {
        let input = f64::from(usage.prompt_tokens) / 1000.0 * self.input_cost_per_1k;
        let output = f64::from(usage.completion_tokens) / 1000.0 * self.output_cost_per_1k;
        round6(input + output)
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_usage_costs_nothing() {
        assert_eq!(PricingTable::default().estimate(&Usage::default()), 0.0);
    }

    #[test]
    fn known_rates() {
        let pricing = PricingTable {
            input_cost_per_1k: 0.001,
            output_cost_per_1k: 0.002,
        };
        // 2000 prompt tokens at $0.001/1k + 500 completion tokens at $0.002/1k
        let cost = pricing.estimate(&Usage::new(2000, 500));
        assert!((cost - 0.003).abs() < 1e-12);
    }

    #[test]
    fn rounds_to_six_decimals() {
        let cost = PricingTable::default().estimate(&Usage::new(333, 77));
        assert_eq!(cost, (cost * 1_000_000.0).round() / 1_000_000.0);
    }
}
