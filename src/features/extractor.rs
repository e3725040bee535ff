//! Feature extractor
//!
//! Computes the behavioral fields from the transaction and wallet history
//! and merges in the enrichment fields. Missing history never fails an
//! extraction; each affected field degrades to its documented default.

use chrono::{DateTime, Timelike, Utc};
use std::sync::Arc;
use tracing::debug;

use super::enrichment::{EnrichmentData, EnrichmentProvider};
use super::FeatureVector;
use crate::core::domain::{Transaction, WalletHistory};
use crate::core::errors::Result;
use crate::core::validation::validate_transaction;

/// Gas assumed for a plain transfer when no history is available.
const DEFAULT_AVG_GAS: f64 = 21_000.0;

/// Hours [0, ODD_HOURS_END) count as the odd-hours window.
const ODD_HOURS_END: u32 = 4;

/// Derives the fixed-schema feature vector for a transaction.
pub struct FeatureExtractor {
    enrichment: Arc<dyn EnrichmentProvider>,
}

impl FeatureExtractor {
    pub fn new(enrichment: Arc<dyn EnrichmentProvider>) -> Self {
        Self { enrichment }
    }

    /// Extract all eleven fields for `tx`.
    ///
    /// Fails with `InvalidTransaction` on malformed input; enrichment
    /// failures propagate for the engine to handle.
    pub async fn extract(
        &self,
        tx: &Transaction,
        history: Option<&WalletHistory>,
    ) -> Result<FeatureVector> {
        validate_transaction(tx)?;
        let enrichment = self.enrichment.enrich(tx).await?;
        Ok(self.assemble(tx, history, enrichment))
    }

    /// Build the vector from already-fetched enrichment data. Used by the
    /// engine when enrichment degraded to its neutral stand-in.
    pub fn assemble(
        &self,
        tx: &Transaction,
        history: Option<&WalletHistory>,
        enrichment: EnrichmentData,
    ) -> FeatureVector {
        // Division by 1 when no average is known: the ratio then equals
        // the raw value. A zero average is treated the same way.
        let avg_tx_value = history
            .and_then(|h| h.avg_tx_value)
            .filter(|v| *v != 0.0)
            .unwrap_or(1.0);
        let avg_gas = history
            .and_then(|h| h.avg_gas)
            .filter(|g| *g != 0.0)
            .unwrap_or(DEFAULT_AVG_GAS);

        let interaction_frequency = history
            .map(|h| h.interaction_count(&tx.recipient))
            .unwrap_or(0) as f64;

        let gas_volatility_score = (tx.gas as f64 - avg_gas).abs() / avg_gas;
        let tx_time_deviation = if Self::is_odd_hour(tx.timestamp) { 1.0 } else { 0.0 };

        let features = FeatureVector {
            recipient_contract_type: enrichment.contract_type,
            recipient_ens: enrichment.ens_name,
            recipient_cluster_risk: enrichment.cluster_risk,
            wallet_age_days: enrichment.sender_age_days,
            recipient_age_days: enrichment.recipient_age_days,
            value_to_avg_ratio: tx.value / avg_tx_value,
            interaction_frequency,
            recipient_token_hygiene: enrichment.token_hygiene,
            contract_code_similarity_score: enrichment.contract_similarity,
            gas_volatility_score,
            tx_time_deviation,
        };

        debug!(
            tx_id = %tx.id,
            value_ratio = features.value_to_avg_ratio,
            gas_volatility = features.gas_volatility_score,
            interaction_frequency,
            "extracted transaction features"
        );

        features
    }

    /// Hour-of-day check in UTC so assessments do not depend on the
    /// server's timezone.
    fn is_odd_hour(timestamp: i64) -> bool {
        let hour = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .hour();
        hour < ODD_HOURS_END
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ContractType;
    use async_trait::async_trait;

    /// Enrichment returning fixed values so behavioral fields can be
    /// asserted exactly.
    struct FixedEnrichment;

    #[async_trait]
    impl EnrichmentProvider for FixedEnrichment {
        async fn enrich(&self, _tx: &Transaction) -> Result<EnrichmentData> {
            Ok(EnrichmentData {
                contract_type: ContractType::Contract,
                ens_name: None,
                cluster_risk: 0.25,
                sender_age_days: 100.0,
                recipient_age_days: 200.0,
                token_hygiene: 0.9,
                contract_similarity: 0.1,
            })
        }
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(Arc::new(FixedEnrichment))
    }

    // Noon UTC, well outside the odd-hours window.
    const NOON: i64 = 1_700_000_000 - 1_700_000_000 % 86_400 + 12 * 3600;

    #[tokio::test]
    async fn test_extraction_with_history() {
        let tx = Transaction::new("0x123test", "0xabc001...", "0xabc991...", 1.25, 21000, NOON);
        let history = WalletHistory::new(0.5, 21000.0).with_interaction("0xabc991...", 2);

        let features = extractor().extract(&tx, Some(&history)).await.unwrap();

        assert_eq!(features.value_to_avg_ratio, 2.5);
        assert_eq!(features.interaction_frequency, 2.0);
        assert_eq!(features.gas_volatility_score, 0.0);
        assert_eq!(features.tx_time_deviation, 0.0);
    }

    #[tokio::test]
    async fn test_extraction_without_history_uses_defaults() {
        let tx = Transaction::new("0x1", "0xaaa", "0xbbb", 3.5, 42000, NOON);

        let features = extractor().extract(&tx, None).await.unwrap();

        // Ratio over an implicit average of 1 equals the raw value.
        assert_eq!(features.value_to_avg_ratio, 3.5);
        assert_eq!(features.interaction_frequency, 0.0);
        // |42000 - 21000| / 21000
        assert_eq!(features.gas_volatility_score, 1.0);
    }

    #[tokio::test]
    async fn test_zero_average_falls_back_to_raw_value() {
        let tx = Transaction::new("0x1", "0xaaa", "0xbbb", 2.0, 21000, NOON);
        let history = WalletHistory::new(0.0, 21000.0);

        let features = extractor().extract(&tx, Some(&history)).await.unwrap();
        assert_eq!(features.value_to_avg_ratio, 2.0);
    }

    #[tokio::test]
    async fn test_odd_hour_flag() {
        let midnight = NOON - 12 * 3600;
        let three_am = midnight + 3 * 3600;
        let four_am = midnight + 4 * 3600;

        let ex = extractor();
        for (ts, expected) in [(midnight, 1.0), (three_am, 1.0), (four_am, 0.0), (NOON, 0.0)] {
            let tx = Transaction::new("0x1", "0xaaa", "0xbbb", 1.0, 21000, ts);
            let features = ex.extract(&tx, None).await.unwrap();
            assert_eq!(features.tx_time_deviation, expected, "ts={}", ts);
        }
    }

    #[tokio::test]
    async fn test_invalid_transaction_rejected() {
        let tx = Transaction::new("0x1", "", "0xbbb", 1.0, 21000, NOON);
        assert!(extractor().extract(&tx, None).await.is_err());
    }

    #[tokio::test]
    async fn test_enrichment_fields_pass_through() {
        let tx = Transaction::new("0x1", "0xaaa", "0xbbb", 1.0, 21000, NOON);
        let features = extractor().extract(&tx, None).await.unwrap();

        assert_eq!(features.recipient_cluster_risk, 0.25);
        assert_eq!(features.wallet_age_days, 100.0);
        assert_eq!(features.recipient_age_days, 200.0);
        assert_eq!(features.recipient_token_hygiene, 0.9);
        assert_eq!(features.contract_code_similarity_score, 0.1);
        assert_eq!(features.recipient_contract_type, ContractType::Contract);
    }
}
