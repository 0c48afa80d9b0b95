//! The static fee table, grounded on the original's
//! `routing/services/fee_service.py`.

use router_core::{CostStructure, Provider};
use rust_decimal::Decimal;

/// A fee row, optionally scoped to a network/card type/region. `None`
/// fields are wildcards that match any value.
#[derive(Debug, Clone)]
pub struct FeeStructure {
    pub provider: Provider,
    pub card_network: Option<String>,
    pub card_type: Option<String>,
    pub region: Option<String>,
    pub fixed_fee: Decimal,
    pub variable_fee_percent: Decimal,
}

impl FeeStructure {
    fn specificity(&self) -> u8 {
        self.card_network.is_some() as u8 + self.card_type.is_some() as u8 + self.region.is_some() as u8
    }

    fn matches(&self, network: &str, card_type: &str, region: &str) -> bool {
        self.card_network.as_deref().map_or(true, |v| v == network)
            && self.card_type.as_deref().map_or(true, |v| v == card_type)
            && self.region.as_deref().map_or(true, |v| v == region)
    }
}

/// Holds every configured fee row and resolves the most specific match
/// for a given provider and dimension.
#[derive(Debug, Clone, Default)]
pub struct FeeTable {
    rows: Vec<FeeStructure>,
}

impl FeeTable {
    pub fn new(rows: Vec<FeeStructure>) -> Self {
        FeeTable { rows }
    }

    /// The set of providers that have at least one row in this table.
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.rows.iter().map(|row| row.provider).collect();
        providers.sort_by_key(|p| p.to_string());
        providers.dedup();
        providers
    }

    /// The most specific matching row for `provider` given `network`,
    /// `card_type`, and `region`, falling back to a wildcard row if one
    /// exists.
    pub fn resolve(
        &self,
        provider: Provider,
        network: &str,
        card_type: &str,
        region: &str,
    ) -> Option<CostStructure> {
        self.rows
            .iter()
            .filter(|row| row.provider == provider && row.matches(network, card_type, region))
            .max_by_key(|row| row.specificity())
            .map(|row| CostStructure {
                variable_fee_percent: row.variable_fee_percent,
                fixed_fee: row.fixed_fee,
                interchange_plus_basis_points: Decimal::ZERO,
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn more_specific_row_wins_over_wildcard() {
        let table = FeeTable::new(vec![
            FeeStructure {
                provider: Provider::Internal,
                card_network: None,
                card_type: None,
                region: None,
                fixed_fee: dec!(0.50),
                variable_fee_percent: dec!(2.5),
            },
            FeeStructure {
                provider: Provider::Internal,
                card_network: None,
                card_type: Some("debit".to_string()),
                region: Some("domestic".to_string()),
                fixed_fee: dec!(0.25),
                variable_fee_percent: dec!(1.0),
            },
        ]);

        let resolved = table
            .resolve(Provider::Internal, "visa", "debit", "domestic")
            .unwrap();
        assert_eq!(resolved.fixed_fee, dec!(0.25));

        let fallback = table
            .resolve(Provider::Internal, "visa", "credit", "international")
            .unwrap();
        assert_eq!(fallback.fixed_fee, dec!(0.50));
    }

    #[test]
    fn no_matching_row_resolves_to_none() {
        let table = FeeTable::new(vec![]);
        assert!(table
            .resolve(Provider::Stripe, "visa", "credit", "domestic")
            .is_none());
    }
}
