use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The closed set of payment providers the engine can route to. Identifies
/// both the decision target and the registered processor adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    Stripe,
    Adyen,
    Braintree,
    Internal,
}

impl Provider {
    /// All known providers, in a stable order used to break cost ties.
    pub const ALL: [Provider; 4] = [
        Provider::Stripe,
        Provider::Adyen,
        Provider::Braintree,
        Provider::Internal,
    ];

    /// Parses a provider name from an LLM response, case-insensitively, and
    /// rejects anything outside the closed enumeration. Strategies must
    /// validate every LLM-sourced provider name through this before use.
    pub fn parse_validated(name: &str) -> Option<Provider> {
        Provider::from_str(&name.to_lowercase()).ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_display_and_parse() {
        for provider in Provider::ALL {
            let s = provider.to_string();
            assert_eq!(Provider::parse_validated(&s), Some(provider));
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(Provider::parse_validated("paypal"), None);
        assert_eq!(Provider::parse_validated(""), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Provider::parse_validated("STRIPE"), Some(Provider::Stripe));
        assert_eq!(Provider::parse_validated("AdYeN"), Some(Provider::Adyen));
    }
}
