use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The six predefined case-study views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStudy {
    TransactionDynamics,
    DeviceDominance,
    InsurancePenetration,
    MarketExpansion,
    UserEngagement,
    InsuranceEngagement,
}

impl CaseStudy {
    pub const ALL: [CaseStudy; 6] = [
        CaseStudy::TransactionDynamics,
        CaseStudy::DeviceDominance,
        CaseStudy::InsurancePenetration,
        CaseStudy::MarketExpansion,
        CaseStudy::UserEngagement,
        CaseStudy::InsuranceEngagement,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            CaseStudy::TransactionDynamics => "Decoding Transaction Dynamics on PhonePe",
            CaseStudy::DeviceDominance => "Device Dominance and User Engagement Analysis",
            CaseStudy::InsurancePenetration => "Insurance Penetration and Growth Potential",
            CaseStudy::MarketExpansion => "Transaction Analysis for Market Expansion",
            CaseStudy::UserEngagement => "User Engagement and Growth Strategy",
            CaseStudy::InsuranceEngagement => "Insurance Engagement Analysis",
        }
    }

    /// Short command-line name
    pub fn slug(&self) -> &'static str {
        match self {
            CaseStudy::TransactionDynamics => "transaction-dynamics",
            CaseStudy::DeviceDominance => "device-dominance",
            CaseStudy::InsurancePenetration => "insurance-penetration",
            CaseStudy::MarketExpansion => "market-expansion",
            CaseStudy::UserEngagement => "user-engagement",
            CaseStudy::InsuranceEngagement => "insurance-engagement",
        }
    }

    /// Catalog dataset the view is built around
    pub fn primary_dataset(&self) -> &'static str {
        match self {
            CaseStudy::TransactionDynamics => "aggregated_transaction",
            CaseStudy::DeviceDominance => "map_user",
            CaseStudy::InsurancePenetration => "map_insurance",
            CaseStudy::MarketExpansion => "map_transaction",
            CaseStudy::UserEngagement => "top_user",
            CaseStudy::InsuranceEngagement => "top_insurance",
        }
    }

    /// File name offered for the state-level CSV download
    pub fn download_name(&self) -> &'static str {
        match self {
            CaseStudy::TransactionDynamics => "transaction_dynamics_state_data.csv",
            CaseStudy::DeviceDominance => "user_state_data.csv",
            CaseStudy::InsurancePenetration => "insurance_state_data.csv",
            CaseStudy::MarketExpansion => "transaction_state_data.csv",
            CaseStudy::UserEngagement => "top_user_state_data.csv",
            CaseStudy::InsuranceEngagement => "insurance_engagement_state_data.csv",
        }
    }
}

impl fmt::Display for CaseStudy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone)]
pub struct ParseCaseStudyError {
    pub input: String,
}

impl fmt::Display for ParseCaseStudyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<&str> = CaseStudy::ALL.iter().map(|c| c.slug()).collect();
        write!(
            f,
            "Unknown case study '{}'. Valid options: 1-6, {}",
            self.input,
            valid.join(", ")
        )
    }
}

impl std::error::Error for ParseCaseStudyError {}

impl FromStr for CaseStudy {
    type Err = ParseCaseStudyError;

    /// Accepts the slug, the full title (any case) or the 1-based position
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Ok(n) = wanted.parse::<usize>() {
            if (1..=CaseStudy::ALL.len()).contains(&n) {
                return Ok(CaseStudy::ALL[n - 1]);
            }
        }
        CaseStudy::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(wanted) || c.title().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCaseStudyError { input: s.to_string() })
    }
}

impl Serialize for CaseStudy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_slug_title_and_position() {
        assert_eq!("device-dominance".parse::<CaseStudy>().unwrap(), CaseStudy::DeviceDominance);
        assert_eq!(
            "insurance engagement analysis".parse::<CaseStudy>().unwrap(),
            CaseStudy::InsuranceEngagement
        );
        assert_eq!("1".parse::<CaseStudy>().unwrap(), CaseStudy::TransactionDynamics);
        assert_eq!("6".parse::<CaseStudy>().unwrap(), CaseStudy::InsuranceEngagement);
        assert!("0".parse::<CaseStudy>().is_err());
        assert!("7".parse::<CaseStudy>().is_err());
        assert!("districts".parse::<CaseStudy>().is_err());
    }

    #[test]
    fn test_download_names_are_distinct() {
        let mut names: Vec<&str> = CaseStudy::ALL.iter().map(|c| c.download_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_serializes_as_title() {
        let json = serde_json::to_string(&CaseStudy::MarketExpansion).unwrap();
        assert_eq!(json, "\"Transaction Analysis for Market Expansion\"");
    }
}
