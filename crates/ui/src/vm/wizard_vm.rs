use services::{WizardController, WizardStep};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepVm {
    pub number: u8,
    pub title: &'static str,
    pub state: StepState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardVm {
    pub step: WizardStep,
    pub steps: Vec<StepVm>,
    pub title: &'static str,
    pub description: &'static str,
    pub progress_percent: u8,
    pub can_go_back: bool,
    pub assistance_level: u8,
    pub course_label: Option<String>,
    pub upload_count: usize,
}

#[must_use]
pub fn map_wizard_vm(wizard: &WizardController) -> WizardVm {
    let current = wizard.step();
    let steps = WizardStep::ALL
        .iter()
        .map(|step| StepVm {
            number: step.number(),
            title: step.title(),
            state: match step.cmp(&current) {
                std::cmp::Ordering::Less => StepState::Done,
                std::cmp::Ordering::Equal => StepState::Current,
                std::cmp::Ordering::Greater => StepState::Upcoming,
            },
        })
        .collect();

    WizardVm {
        step: current,
        steps,
        title: current.title(),
        description: current.description(),
        progress_percent: wizard.progress_percent(),
        can_go_back: wizard.can_go_back(),
        assistance_level: wizard.assistance_level().value(),
        course_label: wizard.course().map(|c| c.as_str().to_owned()),
        upload_count: wizard.materials().len() + wizard.assignment().len(),
    }
}
