//! Recommendation labels derived from score thresholds
//!
//! Labels are for display only and never change persisted data.

/// Peer score above which a pairing is excellent
pub const PEER_EXCELLENT: f64 = 0.7;
/// Peer score above which a pairing is good
pub const PEER_GOOD: f64 = 0.5;
/// Peer score above which a pairing is moderate; at or below it the pair needs supervision
pub const PEER_MODERATE: f64 = 0.3;

/// Supervisor score above which a match is excellent
pub const SUPERVISOR_EXCELLENT: f64 = 0.8;
/// Supervisor score above which a match is good
pub const SUPERVISOR_GOOD: f64 = 0.6;
/// Supervisor score above which a match is moderate
pub const SUPERVISOR_MODERATE: f64 = 0.4;

/// Discrete recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationLabel {
    /// Strongly recommended
    Excellent,
    /// Recommended
    Good,
    /// Acceptable
    Moderate,
    /// Not recommended (peer rooms with this label require supervision)
    NotRecommended,
    /// Room with a single occupant
    SingleOccupancy,
}

impl RecommendationLabel {
    /// Label for a peer (roommate) score
    ///
    /// # Examples
    ///
    /// ```
    /// use billet_domain::RecommendationLabel;
    ///
    /// assert_eq!(RecommendationLabel::for_peer(0.71), RecommendationLabel::Excellent);
    /// assert_eq!(RecommendationLabel::for_peer(0.7), RecommendationLabel::Good);
    /// ```
    pub fn for_peer(score: f64) -> Self {
        Self::from_thresholds(score, PEER_EXCELLENT, PEER_GOOD, PEER_MODERATE)
    }

    /// Label for a supervisor score
    pub fn for_supervisor(score: f64) -> Self {
        Self::from_thresholds(score, SUPERVISOR_EXCELLENT, SUPERVISOR_GOOD, SUPERVISOR_MODERATE)
    }

    fn from_thresholds(score: f64, excellent: f64, good: f64, moderate: f64) -> Self {
        if score > excellent {
            RecommendationLabel::Excellent
        } else if score > good {
            RecommendationLabel::Good
        } else if score > moderate {
            RecommendationLabel::Moderate
        } else {
            RecommendationLabel::NotRecommended
        }
    }

    /// Get the label name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationLabel::Excellent => "excellent",
            RecommendationLabel::Good => "good",
            RecommendationLabel::Moderate => "moderate",
            RecommendationLabel::NotRecommended => "not_recommended",
            RecommendationLabel::SingleOccupancy => "single_occupancy",
        }
    }

    /// Parse a label from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "excellent" => Some(RecommendationLabel::Excellent),
            "good" => Some(RecommendationLabel::Good),
            "moderate" => Some(RecommendationLabel::Moderate),
            "not_recommended" => Some(RecommendationLabel::NotRecommended),
            "single_occupancy" => Some(RecommendationLabel::SingleOccupancy),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_thresholds_are_exclusive() {
        assert_eq!(RecommendationLabel::for_peer(0.9), RecommendationLabel::Excellent);
        assert_eq!(RecommendationLabel::for_peer(0.51), RecommendationLabel::Good);
        assert_eq!(RecommendationLabel::for_peer(0.5), RecommendationLabel::Moderate);
        assert_eq!(RecommendationLabel::for_peer(0.31), RecommendationLabel::Moderate);
        assert_eq!(RecommendationLabel::for_peer(0.3), RecommendationLabel::NotRecommended);
        assert_eq!(RecommendationLabel::for_peer(0.0), RecommendationLabel::NotRecommended);
    }

    #[test]
    fn test_supervisor_thresholds() {
        assert_eq!(RecommendationLabel::for_supervisor(0.81), RecommendationLabel::Excellent);
        assert_eq!(RecommendationLabel::for_supervisor(0.8), RecommendationLabel::Good);
        assert_eq!(RecommendationLabel::for_supervisor(0.6), RecommendationLabel::Moderate);
        assert_eq!(RecommendationLabel::for_supervisor(0.4), RecommendationLabel::NotRecommended);
    }

    #[test]
    fn test_parse_round_trip() {
        for label in [
            RecommendationLabel::Excellent,
            RecommendationLabel::Good,
            RecommendationLabel::Moderate,
            RecommendationLabel::NotRecommended,
            RecommendationLabel::SingleOccupancy,
        ] {
            assert_eq!(RecommendationLabel::parse(label.as_str()), Some(label));
        }
        assert_eq!(RecommendationLabel::parse("requires_supervision"), None);
    }
}
