use std::fmt;
use std::time::Duration;

/// One page of the assignment-helper wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    SelectCourse,
    UploadMaterials,
    UploadAssignment,
    Analyze,
    SelectLevel,
    GuidedLearning,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::SelectCourse,
        WizardStep::UploadMaterials,
        WizardStep::UploadAssignment,
        WizardStep::Analyze,
        WizardStep::SelectLevel,
        WizardStep::GuidedLearning,
    ];

    /// Position shown on the step bar, `1..=6`.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            WizardStep::SelectCourse => 1,
            WizardStep::UploadMaterials => 2,
            WizardStep::UploadAssignment => 3,
            WizardStep::Analyze => 4,
            WizardStep::SelectLevel => 5,
            WizardStep::GuidedLearning => 6,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::SelectCourse => "Select Course",
            WizardStep::UploadMaterials => "Upload Materials",
            WizardStep::UploadAssignment => "Upload Assignment",
            WizardStep::Analyze => "Material Analysis",
            WizardStep::SelectLevel => "Select Assistance Level",
            WizardStep::GuidedLearning => "Guided Learning",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            WizardStep::SelectCourse => "Choose the course for which you need assignment help.",
            WizardStep::UploadMaterials => {
                "Upload lecture notes, textbook chapters, and other study materials."
            }
            WizardStep::UploadAssignment => {
                "Upload your assignment instructions, rubrics, and requirements."
            }
            WizardStep::Analyze => "AI processes your materials to understand course concepts.",
            WizardStep::SelectLevel => "Choose the level of assistance you need.",
            WizardStep::GuidedLearning => {
                "Get personalized guidance that references your materials."
            }
        }
    }

    /// Back is refused on the first step, while analysing, and once learning started.
    #[must_use]
    pub fn allows_back(self) -> bool {
        !matches!(
            self,
            WizardStep::SelectCourse | WizardStep::Analyze | WizardStep::GuidedLearning
        )
    }

    /// Where back leads. The analysis step is skipped on the way down.
    #[must_use]
    pub(crate) fn back_target(self) -> Option<WizardStep> {
        match self {
            WizardStep::UploadMaterials => Some(WizardStep::SelectCourse),
            WizardStep::UploadAssignment => Some(WizardStep::UploadMaterials),
            WizardStep::SelectLevel => Some(WizardStep::UploadAssignment),
            WizardStep::SelectCourse | WizardStep::Analyze | WizardStep::GuidedLearning => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Delays of the wizard's automatic transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardTimings {
    pub analysis: Duration,
}

impl Default for WizardTimings {
    fn default() -> Self {
        Self {
            analysis: Duration::from_millis(3000),
        }
    }
}

/// The material analysis has run its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisComplete;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_follow_declaration_order() {
        let numbers: Vec<u8> = WizardStep::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        assert!(WizardStep::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn back_is_refused_on_first_analysis_and_last_step() {
        let refused: Vec<u8> = WizardStep::ALL
            .iter()
            .filter(|s| !s.allows_back())
            .map(|s| s.number())
            .collect();
        assert_eq!(refused, vec![1, 4, 6]);
        for step in WizardStep::ALL {
            assert_eq!(step.allows_back(), step.back_target().is_some());
        }
    }

    #[test]
    fn display_shows_number_and_title() {
        assert_eq!(WizardStep::Analyze.to_string(), "4. Material Analysis");
    }
}
