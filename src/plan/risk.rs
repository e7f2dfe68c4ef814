/// Corridor risk classification
///
/// A deterministic rule table mapping (decision, jurisdiction risk tier,
/// channel) to LOW/MEDIUM/HIGH. Ties resolve toward the higher tier so
/// ambiguity always lands on the stricter review path.
use crate::plan::types::RiskTier;
use crate::validation::{Corridor, Decision};

/// Jurisdictions screened at the highest tier
const HIGH_RISK_JURISDICTIONS: &[&str] = &["IRN", "PRK", "MMR", "AFG", "SYR", "YEM", "SSD"];

/// Jurisdictions under enhanced monitoring
const MEDIUM_RISK_JURISDICTIONS: &[&str] = &[
    "PAK", "NGA", "VEN", "KHM", "LAO", "HTI", "MLI", "UGA", "TZA", "PAN",
];

/// Risk tier of a single jurisdiction
pub fn jurisdiction_tier(country: &str) -> RiskTier {
    if HIGH_RISK_JURISDICTIONS.contains(&country) {
        RiskTier::High
    } else if MEDIUM_RISK_JURISDICTIONS.contains(&country) {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Risk weight of the transfer channel
///
/// Unrecognized channels score Medium: a channel the table has never
/// seen should not silently rate as safe.
pub fn channel_tier(channel: &str) -> RiskTier {
    match channel {
        "CRYPTO" | "CASH_AGENT" => RiskTier::High,
        "WALLET" => RiskTier::Medium,
        "WIRE" | "CARD" => RiskTier::Low,
        _ => RiskTier::Medium,
    }
}

/// Classify the corridor risk for a validated screening result
pub fn classify(decision: Decision, corridor: &Corridor) -> RiskTier {
    let jurisdiction = jurisdiction_tier(&corridor.origin_country)
        .max(jurisdiction_tier(&corridor.destination_country));
    let channel = channel_tier(&corridor.channel);

    match decision {
        Decision::Fail => RiskTier::High,
        Decision::Review => {
            if jurisdiction == RiskTier::High || channel == RiskTier::High {
                RiskTier::High
            } else {
                RiskTier::Medium
            }
        }
        Decision::Pass => {
            if jurisdiction == RiskTier::High || channel == RiskTier::High {
                RiskTier::Medium
            } else if jurisdiction == RiskTier::Medium && channel == RiskTier::Medium {
                RiskTier::Medium
            } else {
                RiskTier::Low
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor(origin: &str, dest: &str, channel: &str) -> Corridor {
        Corridor {
            origin_country: origin.to_string(),
            destination_country: dest.to_string(),
            channel: channel.to_string(),
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn fail_decisions_are_always_high() {
        assert_eq!(
            classify(Decision::Fail, &corridor("SGP", "SGP", "CARD")),
            RiskTier::High
        );
        assert_eq!(
            classify(Decision::Fail, &corridor("USA", "GBR", "WIRE")),
            RiskTier::High
        );
    }

    #[test]
    fn review_escalates_on_high_risk_jurisdiction_or_channel() {
        assert_eq!(
            classify(Decision::Review, &corridor("USA", "IRN", "WIRE")),
            RiskTier::High
        );
        assert_eq!(
            classify(Decision::Review, &corridor("USA", "GBR", "CRYPTO")),
            RiskTier::High
        );
        assert_eq!(
            classify(Decision::Review, &corridor("USA", "GBR", "WIRE")),
            RiskTier::Medium
        );
    }

    #[test]
    fn pass_stays_low_on_clean_corridors() {
        assert_eq!(
            classify(Decision::Pass, &corridor("SGP", "SGP", "CARD")),
            RiskTier::Low
        );
    }

    #[test]
    fn pass_is_raised_by_risky_context_but_never_to_high() {
        assert_eq!(
            classify(Decision::Pass, &corridor("USA", "PRK", "WIRE")),
            RiskTier::Medium
        );
        assert_eq!(
            classify(Decision::Pass, &corridor("USA", "GBR", "CASH_AGENT")),
            RiskTier::Medium
        );
        assert_eq!(
            classify(Decision::Pass, &corridor("PAK", "USA", "WALLET")),
            RiskTier::Medium
        );
    }

    #[test]
    fn unknown_channel_rates_medium_not_low() {
        assert_eq!(channel_tier("CARRIER_PIGEON"), RiskTier::Medium);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = corridor("NGA", "VEN", "WALLET");
        let first = classify(Decision::Review, &c);
        for _ in 0..10 {
            assert_eq!(classify(Decision::Review, &c), first);
        }
    }
}
