//! The dimensioned key used to bucket provider performance, grounded on the
//! original's `routing/preprocessing/models.py` dimension derivation and the
//! design notes' "fixed core plus side map" resolution of dynamic fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A frozen, hashable composite key identifying a slice of traffic.
///
/// Equality is structural equality of every field, `extras` included.
/// `extras` is a `BTreeMap` rather than a `HashMap` so that two
/// dimensions built from the same logical fields always serialize to the
/// same canonical JSON, regardless of insertion order. This is what makes
/// the key usable as a `KeyValueStore` lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutingDimension {
    pub payment_method_type: String,
    pub payment_form: String,
    pub network: String,
    pub card_type: String,
    pub region: String,
    pub currency: String,
    pub network_tokenized: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl RoutingDimension {
    /// Builds a dimension leaving every field at a neutral default, so
    /// callers can construct one field-by-field with struct update syntax.
    pub fn unknown() -> Self {
        RoutingDimension {
            payment_method_type: "unknown".to_string(),
            payment_form: "unknown".to_string(),
            network: "unknown".to_string(),
            card_type: "unknown".to_string(),
            region: "unknown".to_string(),
            currency: "unknown".to_string(),
            network_tokenized: false,
            extras: BTreeMap::new(),
        }
    }

    /// The canonical serialized form used as a storage key. Stable field
    /// ordering (struct field order, sorted `extras`) means logically
    /// equal dimensions always produce the same string.
    pub fn canonical_key(&self) -> String {
        serde_json::to_string(self).expect("RoutingDimension serialization is infallible")
    }

    /// Promotes a value from a record's extra-fields map into `extras`,
    /// used by the aggregator when configured with dynamic-dimension
    /// fields (e.g. `merchant_category`).
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

impl Default for RoutingDimension {
    fn default() -> Self {
        Self::unknown()
    }
}
