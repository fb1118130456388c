// Redemption Status Classifier
// Maps (final balance, lifetime received) to a status label + display color

use serde::{Deserialize, Serialize};

// ============================================================================
// STATUS LABEL
// ============================================================================

/// Redemption status of a single coin address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    /// Address was never funded - the coin was never loaded with value
    NeverLoaded,

    /// Everything ever received is still at the address
    NeverRedeemed,

    /// Funds were received and have all been withdrawn
    FullyRedeemed,

    /// Some but not all received funds have been withdrawn
    PartialRedeemed,

    /// Balance lookup failed for this address
    Error,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::NeverLoaded => "NeverLoaded",
            StatusLabel::NeverRedeemed => "NeverRedeemed",
            StatusLabel::FullyRedeemed => "FullyRedeemed",
            StatusLabel::PartialRedeemed => "PartialRedeemed",
            StatusLabel::Error => "Error",
        }
    }

    /// Hex color token used by the web view
    pub fn color(&self) -> &'static str {
        match self {
            StatusLabel::NeverLoaded => "#000000",
            StatusLabel::NeverRedeemed => "#008000",
            StatusLabel::FullyRedeemed => "#FF0000",
            StatusLabel::PartialRedeemed => "#FFA500",
            StatusLabel::Error => "#FF0000",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// STATUS (label + color, as rendered)
// ============================================================================

/// Status as exposed to the view layer: `{ "label": ..., "color": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub label: StatusLabel,
    pub color: String,
}

impl From<StatusLabel> for Status {
    fn from(label: StatusLabel) -> Self {
        Status {
            label,
            color: label.color().to_string(),
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Classify an address by its current balance and lifetime received total.
///
/// Both values are whole-coin amounts. Rules are checked in order, first
/// match wins:
/// 1. nothing ever received  -> NeverLoaded
/// 2. balance == received    -> NeverRedeemed
/// 3. balance == 0           -> FullyRedeemed
/// 4. otherwise              -> PartialRedeemed
///
/// `final_balance > total_received` cannot come from consistent chain data;
/// no status exists for it and it falls through to PartialRedeemed.
pub fn classify(final_balance: f64, total_received: f64) -> Status {
    let label = if total_received == 0.0 {
        StatusLabel::NeverLoaded
    } else if final_balance == total_received {
        StatusLabel::NeverRedeemed
    } else if final_balance == 0.0 {
        StatusLabel::FullyRedeemed
    } else {
        StatusLabel::PartialRedeemed
    };

    label.into()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_loaded_when_nothing_received() {
        assert_eq!(classify(0.0, 0.0).label, StatusLabel::NeverLoaded);
        // total_received wins over final_balance
        assert_eq!(classify(3.0, 0.0).label, StatusLabel::NeverLoaded);
    }

    #[test]
    fn test_never_redeemed() {
        let status = classify(5.0, 5.0);
        assert_eq!(status.label, StatusLabel::NeverRedeemed);
        assert_eq!(status.color, "#008000");
    }

    #[test]
    fn test_fully_redeemed() {
        let status = classify(0.0, 5.0);
        assert_eq!(status.label, StatusLabel::FullyRedeemed);
        assert_eq!(status.color, "#FF0000");
    }

    #[test]
    fn test_partial_redeemed() {
        let status = classify(2.0, 5.0);
        assert_eq!(status.label, StatusLabel::PartialRedeemed);
        assert_eq!(status.color, "#FFA500");
    }

    #[test]
    fn test_fractional_amounts() {
        assert_eq!(classify(0.005, 0.005).label, StatusLabel::NeverRedeemed);
        assert_eq!(classify(0.001, 0.005).label, StatusLabel::PartialRedeemed);
    }

    #[test]
    fn test_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&StatusLabel::PartialRedeemed).unwrap();
        assert_eq!(json, "\"PartialRedeemed\"");
    }

    #[test]
    fn test_status_json_shape() {
        let json = serde_json::to_value(classify(5.0, 5.0)).unwrap();
        assert_eq!(json["label"], "NeverRedeemed");
        assert_eq!(json["color"], "#008000");
    }
}
