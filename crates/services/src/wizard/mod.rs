mod controller;
mod steps;

pub use controller::{UploadPublisher, WizardController};
pub use steps::{AnalysisComplete, WizardStep, WizardTimings};
