//! Derives a `RoutingDimension` from a charge request: explicit request
//! context fields take priority, falling back to BIN metadata mapping
//! brand→network, type→card_type, country→region.

use router_core::{BinMetadataProvider, ChargeRequest, RoutingDimension};

pub async fn derive_dimension(
    request: &ChargeRequest,
    bin_provider: &dyn BinMetadataProvider,
) -> RoutingDimension {
    let mut dimension = RoutingDimension::unknown();
    dimension.currency = request.currency.clone();

    let Some(context) = &request.context else {
        return dimension;
    };

    if let Some(payment_method_type) = &context.payment_method_type {
        dimension.payment_method_type = payment_method_type.clone();
    }
    if let Some(payment_form) = &context.payment_form {
        dimension.payment_form = payment_form.clone();
    }
    if let Some(tokenized) = context.network_tokenized {
        dimension.network_tokenized = tokenized;
    }

    let resolved_bin_metadata = match &context.bin_metadata {
        Some(metadata) => Some(metadata.clone()),
        None => match &context.card_bin {
            Some(bin) => bin_provider.lookup(bin).await,
            None => None,
        },
    };

    let brand = context
        .card_brand
        .clone()
        .or_else(|| resolved_bin_metadata.as_ref().and_then(|m| m.brand.clone()));
    let card_type = context
        .card_type
        .clone()
        .or_else(|| resolved_bin_metadata.as_ref().and_then(|m| m.card_type.clone()));
    let country = context
        .country
        .clone()
        .or_else(|| resolved_bin_metadata.as_ref().and_then(|m| m.country.clone()));

    if let Some(brand) = brand {
        dimension.network = brand;
    }
    if let Some(card_type) = card_type {
        dimension.card_type = card_type;
    }
    if let Some(country) = country {
        dimension.region = country;
    }

    dimension
}

#[cfg(test)]
mod test {
    use super::*;
    use router_core::{CardBinMetadata, InMemoryBinMetadataProvider, RequestContext};
    use rust_decimal_macros::dec;

    fn request(context: RequestContext) -> ChargeRequest {
        ChargeRequest {
            merchant_id: "m1".to_string(),
            customer_id: "c1".to_string(),
            amount: dec!(10),
            currency: "USD".to_string(),
            description: "test".to_string(),
            provider: None,
            subscription_id: None,
            context: Some(context),
        }
    }

    #[tokio::test]
    async fn explicit_context_fields_take_priority() {
        let context = RequestContext {
            card_brand: Some("visa".to_string()),
            card_type: Some("credit".to_string()),
            country: Some("domestic".to_string()),
            ..Default::default()
        };
        let provider = InMemoryBinMetadataProvider::new();
        let dimension = derive_dimension(&request(context), &provider).await;
        assert_eq!(dimension.network, "visa");
        assert_eq!(dimension.card_type, "credit");
        assert_eq!(dimension.region, "domestic");
    }

    #[tokio::test]
    async fn falls_back_to_bin_lookup() {
        let context = RequestContext {
            card_bin: Some("411111".to_string()),
            ..Default::default()
        };
        let provider = InMemoryBinMetadataProvider::new().with_entry(CardBinMetadata {
            bin: "411111".to_string(),
            brand: Some("visa".to_string()),
            card_type: Some("debit".to_string()),
            country: Some("international".to_string()),
        });
        let dimension = derive_dimension(&request(context), &provider).await;
        assert_eq!(dimension.network, "visa");
        assert_eq!(dimension.card_type, "debit");
        assert_eq!(dimension.region, "international");
    }

    #[tokio::test]
    async fn no_context_yields_unknown_dimension() {
        let dimension = derive_dimension(
            &ChargeRequest {
                merchant_id: "m1".to_string(),
                customer_id: "c1".to_string(),
                amount: dec!(10),
                currency: "USD".to_string(),
                description: "test".to_string(),
                provider: None,
                subscription_id: None,
                context: None,
            },
            &InMemoryBinMetadataProvider::new(),
        )
        .await;
        assert_eq!(dimension.network, "unknown");
    }
}
