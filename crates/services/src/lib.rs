#![forbid(unsafe_code)]

pub mod content;
pub mod deferred;
pub mod error;
pub mod levels;
pub mod notice;
pub mod wizard;

pub use content::{ContentService, ContentServiceConfig, HttpContentService, PriorSubmission};
pub use deferred::{Deferred, TimerSlot};
pub use error::{ContentServiceError, LevelError, WizardError};
pub use levels::{
    AnswersUpload, LevelController, LevelEffect, LevelEntry, LevelTimer, LevelTimings,
    LoadOutcome, LoadReport, LoadTicket, Navigation, SubmitOutcome, SubmitTicket,
};
pub use notice::{Notice, NoticeTone};
pub use wizard::{AnalysisComplete, UploadPublisher, WizardController, WizardStep, WizardTimings};
