//! Transaction intent classification
//!
//! Heuristic labeling of a transaction's likely real-world purpose. The
//! rules are evaluated strictly in order and the first match wins; that
//! ordering is part of the contract with the fusion engine and must not be
//! rearranged. The two stochastic branches delegate to a pluggable
//! discriminator so tests can pin the outcome.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Number of leading address characters compared by the shared-prefix
/// rule.
const CLUSTER_PREFIX_LEN: usize = 6;

/// Values that read as "clean" payment amounts after rounding to two
/// decimals.
const ROUND_PAYMENT_VALUES: [f64; 4] = [1.0, 5.0, 10.0, 100.0];

/// Possible transaction intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    PaymentForGoodsOrServices,
    ExchangeSwap,
    SmartContractInteraction,
    TransferBetweenWallets,
    Donation,
    #[serde(rename = "NFT_purchase")]
    NftPurchase,
    #[serde(rename = "DEX_liquidity_move")]
    DexLiquidityMove,
    Gambling,
    LoanRepayment,
    PhishingSuspected,
}

impl IntentLabel {
    /// All labels the fallback discriminator may choose from.
    pub const ALL: [IntentLabel; 10] = [
        IntentLabel::PaymentForGoodsOrServices,
        IntentLabel::ExchangeSwap,
        IntentLabel::SmartContractInteraction,
        IntentLabel::TransferBetweenWallets,
        IntentLabel::Donation,
        IntentLabel::NftPurchase,
        IntentLabel::DexLiquidityMove,
        IntentLabel::Gambling,
        IntentLabel::LoanRepayment,
        IntentLabel::PhishingSuspected,
    ];
}

/// Classification outcome: label, confidence and the reasons behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: IntentLabel,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Human-readable justifications, at least one per classification.
    pub reasons: Vec<String>,
}

/// Decides the outcomes the heuristics cannot: whether a very low value
/// transfer looks like a donation or phishing, and which label to assign
/// when no rule matches.
pub trait IntentDiscriminator: Send + Sync {
    /// True if a sub-0.01 transfer should be read as a donation rather
    /// than suspected phishing.
    fn low_value_is_donation(&self) -> bool;

    /// Label and confidence for transactions no heuristic matched.
    /// Confidence must fall in [0.40, 0.70].
    fn fallback(&self) -> (IntentLabel, f64);
}

/// Coin-flip discriminator mirroring the behavior of the unavailable
/// trained discriminator model.
#[derive(Debug, Default)]
pub struct RandomDiscriminator;

impl IntentDiscriminator for RandomDiscriminator {
    fn low_value_is_donation(&self) -> bool {
        rand::thread_rng().gen::<f64>() < 0.5
    }

    fn fallback(&self) -> (IntentLabel, f64) {
        let mut rng = rand::thread_rng();
        let label = *IntentLabel::ALL.choose(&mut rng).unwrap_or(&IntentLabel::ExchangeSwap);
        let confidence = (rng.gen_range(0.4f64..0.7) * 100.0).round() / 100.0;
        (label, confidence)
    }
}

/// Rule-ordered intent classifier.
pub struct IntentClassifier {
    discriminator: Arc<dyn IntentDiscriminator>,
}

impl IntentClassifier {
    pub fn new(discriminator: Arc<dyn IntentDiscriminator>) -> Self {
        Self { discriminator }
    }

    /// Classifier backed by the coin-flip discriminator.
    pub fn simulated() -> Self {
        Self::new(Arc::new(RandomDiscriminator))
    }

    /// Classify the likely purpose of a transfer. First matching rule
    /// wins; every branch records at least one reason.
    pub fn classify(&self, sender: &str, recipient: &str, value: f64) -> IntentResult {
        let mut reasons = Vec::new();

        // Rule 1: shared address prefix, read as one wallet cluster.
        let result = if shares_prefix(sender, recipient) {
            reasons.push(
                "Sender and recipient share a wallet prefix (likely self-transfer)".to_string(),
            );
            IntentResult {
                intent: IntentLabel::TransferBetweenWallets,
                confidence: 0.85,
                reasons,
            }
        // Rule 2: very low value, donation or bait.
        } else if value < 0.01 {
            reasons.push("Transaction value is very low".to_string());
            let (intent, confidence) = if self.discriminator.low_value_is_donation() {
                (IntentLabel::Donation, 0.65)
            } else {
                (IntentLabel::PhishingSuspected, 0.75)
            };
            IntentResult {
                intent,
                confidence,
                reasons,
            }
        // Rule 3: clean round numbers read as priced payments.
        } else if is_round_payment(value) {
            reasons.push("Transaction value is a clean round number".to_string());
            IntentResult {
                intent: IntentLabel::PaymentForGoodsOrServices,
                confidence: 0.78,
                reasons,
            }
        // Rule 4: common NFT price range.
        } else if (0.05..=2.5).contains(&value) {
            reasons.push("Transaction value falls in common NFT pricing range".to_string());
            IntentResult {
                intent: IntentLabel::NftPurchase,
                confidence: 0.70,
                reasons,
            }
        // Rule 5: unusually high value.
        } else if value > 1000.0 {
            reasons.push("Transaction value is unusually high".to_string());
            IntentResult {
                intent: IntentLabel::LoanRepayment,
                confidence: 0.80,
                reasons,
            }
        // Rule 6: nothing matched, defer to the discriminator.
        } else {
            let (intent, confidence) = self.discriminator.fallback();
            reasons.push("No strong heuristics matched; inferred from fallback model".to_string());
            IntentResult {
                intent,
                confidence,
                reasons,
            }
        };

        debug!(
            sender,
            recipient,
            value,
            intent = ?result.intent,
            confidence = result.confidence,
            "classified transaction intent"
        );
        result
    }
}

// Byte-wise comparison: addresses are expected to be ASCII, but slicing
// must not assume it.
fn shares_prefix(sender: &str, recipient: &str) -> bool {
    let (sender, recipient) = (sender.as_bytes(), recipient.as_bytes());
    sender.len() >= CLUSTER_PREFIX_LEN
        && recipient.len() >= CLUSTER_PREFIX_LEN
        && sender[..CLUSTER_PREFIX_LEN] == recipient[..CLUSTER_PREFIX_LEN]
}

fn is_round_payment(value: f64) -> bool {
    let rounded = (value * 100.0).round() / 100.0;
    ROUND_PAYMENT_VALUES.iter().any(|v| *v == rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    /// Discriminator with pinned answers.
    struct FixedDiscriminator {
        donation: bool,
        fallback: (IntentLabel, f64),
    }

    impl IntentDiscriminator for FixedDiscriminator {
        fn low_value_is_donation(&self) -> bool {
            self.donation
        }

        fn fallback(&self) -> (IntentLabel, f64) {
            self.fallback
        }
    }

    fn classifier(donation: bool) -> IntentClassifier {
        IntentClassifier::new(Arc::new(FixedDiscriminator {
            donation,
            fallback: (IntentLabel::Gambling, 0.55),
        }))
    }

    #[test]
    fn test_shared_prefix_rule() {
        let result = classifier(true).classify("0xabc0123...", "0xabc0991...", 1.25);

        assert_eq!(result.intent, IntentLabel::TransferBetweenWallets);
        assert_eq!(result.confidence, 0.85);
        assert!(!result.reasons.is_empty());
    }

    #[test]
    fn test_prefix_rule_wins_over_round_number() {
        // Value 1.00 would match the round-number rule, but the prefix
        // rule is evaluated first.
        let result = classifier(true).classify("0xabc0123", "0xabc0991", 1.0);
        assert_eq!(result.intent, IntentLabel::TransferBetweenWallets);
    }

    #[test]
    fn test_low_value_donation_branch() {
        let result = classifier(true).classify("0xaaa111", "0xbbb222", 0.005);
        assert_eq!(result.intent, IntentLabel::Donation);
        assert_eq!(result.confidence, 0.65);
    }

    #[test]
    fn test_low_value_phishing_branch() {
        let result = classifier(false).classify("0xaaa111", "0xbbb222", 0.005);
        assert_eq!(result.intent, IntentLabel::PhishingSuspected);
        assert_eq!(result.confidence, 0.75);
    }

    #[test_case(1.0)]
    #[test_case(5.0)]
    #[test_case(10.0)]
    #[test_case(100.0)]
    #[test_case(4.999 ; "rounds to five")]
    fn test_round_number_payment(value: f64) {
        let result = classifier(true).classify("0xaaa111", "0xbbb222", value);
        assert_eq!(result.intent, IntentLabel::PaymentForGoodsOrServices);
        assert_eq!(result.confidence, 0.78);
    }

    #[test]
    fn test_nft_price_range() {
        let result = classifier(true).classify("0xaaa111", "0xbbb222", 1.8);
        assert_eq!(result.intent, IntentLabel::NftPurchase);
        assert_eq!(result.confidence, 0.70);
    }

    #[test]
    fn test_high_value_loan_repayment() {
        let result = classifier(true).classify("0xaaa111", "0xbbb222", 2500.0);
        assert_eq!(result.intent, IntentLabel::LoanRepayment);
        assert_eq!(result.confidence, 0.80);
    }

    #[test]
    fn test_fallback_branch() {
        // 3.3: not low, not round, outside NFT range, not high value.
        let result = classifier(true).classify("0xaaa111", "0xbbb222", 3.3);
        assert_eq!(result.intent, IntentLabel::Gambling);
        assert_eq!(result.confidence, 0.55);
        assert!(result.reasons[0].contains("fallback"));
    }

    #[test]
    fn test_random_fallback_confidence_bounds() {
        let discriminator = RandomDiscriminator;
        for _ in 0..100 {
            let (_, confidence) = discriminator.fallback();
            assert!((0.4..=0.7).contains(&confidence));
        }
    }

    #[test]
    fn test_short_addresses_never_match_prefix_rule() {
        let result = classifier(true).classify("0xa", "0xa", 1.8);
        assert_eq!(result.intent, IntentLabel::NftPurchase);
    }

    #[test]
    fn test_multibyte_addresses_do_not_panic() {
        // Byte 6 lands inside a multibyte character here; the prefix
        // comparison works on raw bytes, never on char boundaries.
        let result = classifier(true).classify("aa€€", "aa€€zz", 1.8);
        assert_eq!(result.intent, IntentLabel::TransferBetweenWallets);

        let result = classifier(true).classify("€€aaaa", "₿₿aaaa", 1.8);
        assert_eq!(result.intent, IntentLabel::NftPurchase);
    }

    #[test]
    fn test_label_serialization_names() {
        assert_eq!(
            serde_json::to_string(&IntentLabel::NftPurchase).unwrap(),
            "\"NFT_purchase\""
        );
        assert_eq!(
            serde_json::to_string(&IntentLabel::TransferBetweenWallets).unwrap(),
            "\"transfer_between_wallets\""
        );
    }
}
