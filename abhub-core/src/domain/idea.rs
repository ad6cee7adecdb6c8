use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::ids::IdeaId;
use crate::error::{CoreError, Result};

// ===== Idea Status =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    Planned,
    Running,
    Completed,
}

impl IdeaStatus {
    pub fn can_transition_to(&self, target: &IdeaStatus) -> bool {
        use IdeaStatus::*;
        match (self, target) {
            // Forward progression
            (Planned, Running) => true,
            (Running, Completed) => true,

            // A finished test can be reopened for a retest
            (Completed, Planned) => true,

            // All other transitions are invalid
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, IdeaStatus::Running)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, IdeaStatus::Completed)
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdeaStatus::Planned => write!(f, "planned"),
            IdeaStatus::Running => write!(f, "running"),
            IdeaStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for IdeaStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planned" => Ok(IdeaStatus::Planned),
            "running" => Ok(IdeaStatus::Running),
            "completed" => Ok(IdeaStatus::Completed),
            other => Err(format!(
                "Unknown status '{}' (expected planned, running or completed)",
                other
            )),
        }
    }
}

// ===== Priority Band =====

/// Priority bucket derived from the ICE score.
///
/// Thresholds: >= 600 top, >= 400 high, >= 200 medium, below that low.
/// The maximum possible score is 1000 (10 x 10 x 10).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PriorityBand {
    Top,
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub fn from_score(score: u16) -> Self {
        if score >= 600 {
            PriorityBand::Top
        } else if score >= 400 {
            PriorityBand::High
        } else if score >= 200 {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }
}

impl fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityBand::Top => write!(f, "top"),
            PriorityBand::High => write!(f, "high"),
            PriorityBand::Medium => write!(f, "medium"),
            PriorityBand::Low => write!(f, "low"),
        }
    }
}

/// ICE score for a factor triple. Each factor is expected in [1, 10].
pub fn ice_score(impact: u8, confidence: u8, ease: u8) -> u16 {
    impact as u16 * confidence as u16 * ease as u16
}

// ===== Test Idea Domain Model =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestIdea {
    pub id: IdeaId,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(range(min = 1, max = 10))]
    pub impact: u8,

    #[validate(range(min = 1, max = 10))]
    pub confidence: u8,

    #[validate(range(min = 1, max = 10))]
    pub ease: u8,

    /// Derived: always `impact * confidence * ease`. Mutate the factors
    /// through `set_factors` so this never goes stale.
    pub ice_score: u16,

    /// Current conversion rate in percent, (0, 100].
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub current_conversion_rate: f64,

    /// Expected relative uplift in percent.
    #[validate(range(exclusive_min = 0.0))]
    pub expected_improvement: f64,

    pub monthly_traffic: u64,

    pub status: IdeaStatus,

    pub created_at: DateTime<Utc>,

    /// Duration of the test run in days, once known.
    pub test_duration: Option<u32>,

    /// Measured relative uplift in percent, recorded on completion.
    pub actual_result: Option<f64>,
}

impl TestIdea {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        impact: u8,
        confidence: u8,
        ease: u8,
        current_conversion_rate: f64,
        expected_improvement: f64,
        monthly_traffic: u64,
    ) -> Result<Self> {
        let idea = Self {
            id: IdeaId::new(),
            name: name.into(),
            impact,
            confidence,
            ease,
            ice_score: ice_score(impact, confidence, ease),
            current_conversion_rate,
            expected_improvement,
            monthly_traffic,
            status: IdeaStatus::Planned,
            created_at: Utc::now(),
            test_duration: None,
            actual_result: None,
        };
        idea.validate()?;
        Ok(idea)
    }

    pub fn with_status(mut self, status: IdeaStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_test_duration(mut self, days: u32) -> Self {
        self.test_duration = Some(days);
        self
    }

    pub fn with_actual_result(mut self, result: f64) -> Self {
        self.actual_result = Some(result);
        self
    }

    // State transition methods

    pub fn start(&mut self) -> Result<()> {
        self.transition_to(IdeaStatus::Running)
    }

    /// Complete a running test, recording the measured uplift in percent.
    pub fn complete(&mut self, actual_result: f64) -> Result<()> {
        self.transition_to(IdeaStatus::Completed)?;
        self.actual_result = Some(actual_result);
        Ok(())
    }

    /// Reopen a completed test for a retest. Clears the recorded result;
    /// the previous duration is kept until the next completion.
    pub fn reopen(&mut self) -> Result<()> {
        self.transition_to(IdeaStatus::Planned)?;
        self.actual_result = None;
        Ok(())
    }

    fn transition_to(&mut self, target: IdeaStatus) -> Result<()> {
        if !self.status.can_transition_to(&target) {
            return Err(CoreError::InvalidState(format!(
                "Cannot transition from {} to {}",
                self.status, target
            )));
        }
        self.status = target;
        Ok(())
    }

    // Mutation methods that keep the ICE invariant

    pub fn set_factors(&mut self, impact: u8, confidence: u8, ease: u8) -> Result<()> {
        let previous = (self.impact, self.confidence, self.ease);
        self.impact = impact;
        self.confidence = confidence;
        self.ease = ease;
        if let Err(err) = self.validate() {
            (self.impact, self.confidence, self.ease) = previous;
            return Err(err.into());
        }
        self.ice_score = ice_score(impact, confidence, ease);
        Ok(())
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let previous = std::mem::replace(&mut self.name, name.into());
        if let Err(err) = self.validate() {
            self.name = previous;
            return Err(err.into());
        }
        Ok(())
    }

    pub fn set_conversion_profile(
        &mut self,
        current_conversion_rate: f64,
        expected_improvement: f64,
        monthly_traffic: u64,
    ) -> Result<()> {
        let previous = (
            self.current_conversion_rate,
            self.expected_improvement,
            self.monthly_traffic,
        );
        self.current_conversion_rate = current_conversion_rate;
        self.expected_improvement = expected_improvement;
        self.monthly_traffic = monthly_traffic;
        if let Err(err) = self.validate() {
            (
                self.current_conversion_rate,
                self.expected_improvement,
                self.monthly_traffic,
            ) = previous;
            return Err(err.into());
        }
        Ok(())
    }

    pub fn set_test_duration(&mut self, days: u32) {
        self.test_duration = Some(days);
    }

    // Derived metrics

    pub fn priority_band(&self) -> PriorityBand {
        PriorityBand::from_score(self.ice_score)
    }

    /// Conversion rate in percent this idea is expected to reach.
    pub fn expected_conversion_rate(&self) -> f64 {
        self.current_conversion_rate * (1.0 + self.expected_improvement / 100.0)
    }

    /// Extra conversions per month if the expected uplift materializes.
    pub fn additional_monthly_conversions(&self) -> u64 {
        (self.monthly_traffic as f64 * self.current_conversion_rate / 100.0
            * self.expected_improvement
            / 100.0)
            .round() as u64
    }

    /// How close the measured uplift came to the prediction, in percent.
    /// Only available for completed tests with a recorded result.
    pub fn prediction_accuracy(&self) -> Option<f64> {
        if !self.status.is_completed() || self.expected_improvement == 0.0 {
            return None;
        }
        self.actual_result
            .map(|actual| actual / self.expected_improvement * 100.0)
    }
}

// ===== Idea Summary (for listings) =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSummary {
    pub id: IdeaId,
    pub name: String,
    pub ice_score: u16,
    pub priority: PriorityBand,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&TestIdea> for IdeaSummary {
    fn from(idea: &TestIdea) -> Self {
        Self {
            id: idea.id,
            name: idea.name.clone(),
            ice_score: idea.ice_score,
            priority: idea.priority_band(),
            status: idea.status,
            created_at: idea.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_idea() -> TestIdea {
        TestIdea::new("Simplify checkout flow", 8, 7, 6, 3.0, 15.0, 50000).unwrap()
    }

    #[test]
    fn test_idea_status_transitions() {
        use IdeaStatus::*;

        assert!(Planned.can_transition_to(&Running));
        assert!(!Planned.can_transition_to(&Completed));

        assert!(Running.can_transition_to(&Completed));
        assert!(!Running.can_transition_to(&Planned));

        // Retest path
        assert!(Completed.can_transition_to(&Planned));
        assert!(!Completed.can_transition_to(&Running));

        // Same-state moves are not transitions
        assert!(!Planned.can_transition_to(&Planned));
        assert!(!Running.can_transition_to(&Running));
    }

    #[test]
    fn test_idea_creation() {
        let idea = sample_idea();

        assert_eq!(idea.name, "Simplify checkout flow");
        assert_eq!(idea.status, IdeaStatus::Planned);
        assert_eq!(idea.ice_score, 8 * 7 * 6);
        assert_eq!(idea.priority_band(), PriorityBand::Medium);
        assert!(idea.test_duration.is_none());
        assert!(idea.actual_result.is_none());
    }

    #[test]
    fn test_idea_creation_rejects_bad_factors() {
        assert!(TestIdea::new("x", 0, 5, 5, 3.0, 15.0, 1000).is_err());
        assert!(TestIdea::new("x", 5, 11, 5, 3.0, 15.0, 1000).is_err());
        assert!(TestIdea::new("", 5, 5, 5, 3.0, 15.0, 1000).is_err());
        assert!(TestIdea::new("x", 5, 5, 5, 0.0, 15.0, 1000).is_err());
        assert!(TestIdea::new("x", 5, 5, 5, 120.0, 15.0, 1000).is_err());
        assert!(TestIdea::new("x", 5, 5, 5, 3.0, 0.0, 1000).is_err());
    }

    #[test]
    fn test_idea_lifecycle() {
        let mut idea = sample_idea();

        assert!(idea.start().is_ok());
        assert_eq!(idea.status, IdeaStatus::Running);
        assert!(idea.status.is_running());

        assert!(idea.complete(12.5).is_ok());
        assert_eq!(idea.status, IdeaStatus::Completed);
        assert_eq!(idea.actual_result, Some(12.5));

        // Reopen for a retest drops the recorded result
        assert!(idea.reopen().is_ok());
        assert_eq!(idea.status, IdeaStatus::Planned);
        assert!(idea.actual_result.is_none());
    }

    #[test]
    fn test_invalid_state_transitions() {
        let mut idea = sample_idea();

        // Cannot complete or reopen a planned idea
        assert!(idea.complete(10.0).is_err());
        assert!(idea.reopen().is_err());
        assert!(idea.actual_result.is_none());

        idea.start().unwrap();
        assert!(idea.start().is_err());
    }

    #[test]
    fn test_ice_recomputed_on_factor_change() {
        let mut idea = sample_idea();
        assert_eq!(idea.ice_score, 336);

        idea.set_factors(10, 9, 8).unwrap();
        assert_eq!(idea.ice_score, 720);
        assert_eq!(idea.priority_band(), PriorityBand::Top);

        // Invalid factors leave both factors and score untouched
        assert!(idea.set_factors(10, 0, 8).is_err());
        assert_eq!((idea.impact, idea.confidence, idea.ease), (10, 9, 8));
        assert_eq!(idea.ice_score, 720);
    }

    #[test]
    fn test_priority_bands() {
        assert_eq!(PriorityBand::from_score(1000), PriorityBand::Top);
        assert_eq!(PriorityBand::from_score(600), PriorityBand::Top);
        assert_eq!(PriorityBand::from_score(599), PriorityBand::High);
        assert_eq!(PriorityBand::from_score(400), PriorityBand::High);
        assert_eq!(PriorityBand::from_score(399), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_score(200), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_score(199), PriorityBand::Low);
        assert_eq!(PriorityBand::from_score(0), PriorityBand::Low);
    }

    #[test]
    fn test_expected_conversion_rate() {
        let idea = sample_idea();
        assert!((idea.expected_conversion_rate() - 3.45).abs() < 1e-10);
    }

    #[test]
    fn test_additional_monthly_conversions() {
        let idea = sample_idea();
        // 50_000 visitors * 3% rate * 15% uplift
        assert_eq!(idea.additional_monthly_conversions(), 225);
    }

    #[test]
    fn test_prediction_accuracy() {
        let mut idea = sample_idea();
        assert!(idea.prediction_accuracy().is_none());

        idea.start().unwrap();
        idea.complete(12.0).unwrap();

        // 12% measured against 15% expected
        let accuracy = idea.prediction_accuracy().unwrap();
        assert!((accuracy - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_rename_and_conversion_profile() {
        let mut idea = sample_idea();

        idea.rename("Trust badges on payment page").unwrap();
        assert_eq!(idea.name, "Trust badges on payment page");

        assert!(idea.rename("").is_err());
        assert_eq!(idea.name, "Trust badges on payment page");

        idea.set_conversion_profile(4.2, 20.0, 80000).unwrap();
        assert_eq!(idea.monthly_traffic, 80000);

        assert!(idea.set_conversion_profile(0.0, 20.0, 80000).is_err());
        assert!((idea.current_conversion_rate - 4.2).abs() < 1e-10);
    }

    #[test]
    fn test_summary_from_idea() {
        let idea = sample_idea();
        let summary = IdeaSummary::from(&idea);

        assert_eq!(summary.id, idea.id);
        assert_eq!(summary.ice_score, 336);
        assert_eq!(summary.priority, PriorityBand::Medium);
        assert_eq!(summary.status, IdeaStatus::Planned);
    }
}
