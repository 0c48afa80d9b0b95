//! Narrow merchant/customer contracts the orchestrator consumes. Full
//! merchant/customer CRUD lives outside this workspace; these traits are
//! the only seam the Charge Orchestrator needs: existence checks and the
//! customer's stored payment method token.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use router_core::{RouterError, RouterResult};
use tokio::sync::RwLock;

#[async_trait]
pub trait MerchantDirectory: Send + Sync {
    async fn exists(&self, merchant_id: &str) -> RouterResult<bool>;
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn exists(&self, customer_id: &str) -> RouterResult<bool>;

    /// The tokenized payment method on file, used to build a
    /// `ProcessorRequest` without ever touching raw cardholder data.
    async fn payment_method_token(&self, customer_id: &str) -> RouterResult<String>;
}

/// In-memory merchant directory sufficient for tests; a real deployment
/// backs this with the merchant CRUD service.
#[derive(Default)]
pub struct InMemoryMerchantDirectory {
    known: RwLock<HashSet<String>>,
}

impl InMemoryMerchantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, merchant_id: impl Into<String>) {
        self.known.write().await.insert(merchant_id.into());
    }
}

#[async_trait]
impl MerchantDirectory for InMemoryMerchantDirectory {
    async fn exists(&self, merchant_id: &str) -> RouterResult<bool> {
        Ok(self.known.read().await.contains(merchant_id))
    }
}

/// In-memory customer directory; each registered customer carries a
/// synthesized payment method token.
#[derive(Default)]
pub struct InMemoryCustomerDirectory {
    tokens: RwLock<HashMap<String, String>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, customer_id: impl Into<String>, payment_method_token: impl Into<String>) {
        self.tokens
            .write()
            .await
            .insert(customer_id.into(), payment_method_token.into());
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn exists(&self, customer_id: &str) -> RouterResult<bool> {
        Ok(self.tokens.read().await.contains_key(customer_id))
    }

    async fn payment_method_token(&self, customer_id: &str) -> RouterResult<String> {
        self.tokens
            .read()
            .await
            .get(customer_id)
            .cloned()
            .ok_or_else(|| RouterError::NotFound(format!("customer {customer_id} has no payment method on file")))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn unregistered_merchant_does_not_exist() {
        let directory = InMemoryMerchantDirectory::new();
        assert!(!directory.exists("m1").await.unwrap());
        directory.register("m1").await;
        assert!(directory.exists("m1").await.unwrap());
    }

    #[tokio::test]
    async fn customer_token_lookup_fails_when_unregistered() {
        let directory = InMemoryCustomerDirectory::new();
        assert!(directory.payment_method_token("c1").await.is_err());
        directory.register("c1", "tok_abc").await;
        assert_eq!(directory.payment_method_token("c1").await.unwrap(), "tok_abc");
    }
}
