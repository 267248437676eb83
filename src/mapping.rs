use serde::Serialize;

/// Backend risk vocabulary. Unknown strings land in `Low`: for confidence
/// purposes they count as neither HIGH nor MEDIUM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_backend(raw: &str) -> Self {
        match raw {
            "HIGH" => RiskLevel::High,
            "MEDIUM" => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    /// Fixed one-to-one risk-to-severity mapping.
    pub fn severity(self) -> Severity {
        match self {
            RiskLevel::Low => Severity::Low,
            RiskLevel::Medium => Severity::Medium,
            RiskLevel::High => Severity::High,
        }
    }
}

/// Finding severity in the dashboard vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// The dashboard's two-valued recommendation, collapsed from the backend's
/// three-valued one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Approve,
    Block,
}

impl Recommendation {
    /// APPROVE maps to Approve; REQUEST_CHANGES, BLOCK, and any
    /// unrecognized value fail safe to Block.
    pub fn from_backend(raw: &str) -> Self {
        match raw {
            "APPROVE" => Recommendation::Approve,
            _ => Recommendation::Block,
        }
    }
}

pub const CONFIDENCE_HIGH_RISK: u8 = 50;
pub const CONFIDENCE_MEDIUM_RISK: u8 = 75;
pub const CONFIDENCE_LOW_RISK: u8 = 95;
/// An empty agent list means "no signal", which is not the same thing as
/// "every agent confirmed low risk", so it gets 75 instead of 95.
pub const CONFIDENCE_NO_SIGNAL: u8 = 75;

/// Derive a confidence percentage from the multiset of agent risk levels:
/// the worst level present wins.
pub fn confidence_for(risk_levels: &[RiskLevel]) -> u8 {
    if risk_levels.is_empty() {
        return CONFIDENCE_NO_SIGNAL;
    }
    if risk_levels.contains(&RiskLevel::High) {
        CONFIDENCE_HIGH_RISK
    } else if risk_levels.contains(&RiskLevel::Medium) {
        CONFIDENCE_MEDIUM_RISK
    } else {
        CONFIDENCE_LOW_RISK
    }
}
