use serde::{Deserialize, Serialize};

/// The three client-price markups, each in whole percent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkupParams {
    #[serde(default)]
    pub contingency_pct: f64,
    #[serde(default)]
    pub commission_pct: f64,
    #[serde(default)]
    pub profit_pct: f64,
}

/// Fully itemized markup cascade, exposing every intermediate subtotal for
/// the client-facing quote sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkupBreakdown {
    pub base_total: f64,
    pub contingency_amount: f64,
    pub subtotal_after_contingency: f64,
    pub commission_amount: f64,
    pub subtotal_after_commission: f64,
    pub profit_amount: f64,
    pub final_total: f64,
    pub final_per_person: f64,
}

/// Apply the contingency → commission → profit cascade.
///
/// Each percentage applies to the running subtotal, not the original base;
/// the compounding order is part of the quoting contract.
pub fn apply_markups(base_total: f64, params: &MarkupParams, travelers: u32) -> MarkupBreakdown {
    let contingency_amount = base_total * params.contingency_pct / 100.0;
    let subtotal_after_contingency = base_total + contingency_amount;

    let commission_amount = subtotal_after_contingency * params.commission_pct / 100.0;
    let subtotal_after_commission = subtotal_after_contingency + commission_amount;

    let profit_amount = subtotal_after_commission * params.profit_pct / 100.0;
    let final_total = subtotal_after_commission + profit_amount;

    let final_per_person = if travelers > 0 {
        final_total / travelers as f64
    } else {
        0.0
    };

    MarkupBreakdown {
        base_total,
        contingency_amount,
        subtotal_after_contingency,
        commission_amount,
        subtotal_after_commission,
        profit_amount,
        final_total,
        final_per_person,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compounding_cascade() {
        let params = MarkupParams {
            contingency_pct: 10.0,
            commission_pct: 5.0,
            profit_pct: 20.0,
        };
        let result = apply_markups(10000.0, &params, 4);

        assert!((result.contingency_amount - 1000.0).abs() < 1e-9);
        assert!((result.subtotal_after_contingency - 11000.0).abs() < 1e-9);
        assert!((result.commission_amount - 550.0).abs() < 1e-9);
        assert!((result.subtotal_after_commission - 11550.0).abs() < 1e-9);
        assert!((result.profit_amount - 2310.0).abs() < 1e-9);
        assert!((result.final_total - 13860.0).abs() < 1e-9);
        assert!((result.final_per_person - 3465.0).abs() < 1e-9);
    }

    #[test]
    fn test_cascade_matches_closed_form() {
        let cases = [
            (10000.0, 10.0, 5.0, 20.0),
            (0.0, 10.0, 5.0, 20.0),
            (5432.1, 0.0, 0.0, 0.0),
            (888.0, 3.5, 12.0, 7.25),
        ];
        for (base, c, m, p) in cases {
            let params = MarkupParams {
                contingency_pct: c,
                commission_pct: m,
                profit_pct: p,
            };
            let result = apply_markups(base, &params, 2);
            let expected = base * (1.0 + c / 100.0) * (1.0 + m / 100.0) * (1.0 + p / 100.0);
            assert!((result.final_total - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_travelers_zeroes_per_person() {
        let result = apply_markups(10000.0, &MarkupParams::default(), 0);
        assert_eq!(result.final_total, 10000.0);
        assert_eq!(result.final_per_person, 0.0);
    }
}
