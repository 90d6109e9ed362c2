mod controller;
mod flow;
mod timers;

// Public API of the level subsystem.
pub use crate::error::LevelError;
pub use controller::{LevelController, LevelEntry, Navigation};
pub use flow::{AnswersUpload, LoadOutcome, LoadReport, LoadTicket, SubmitOutcome, SubmitTicket};
pub use timers::{LevelEffect, LevelTimer, LevelTimings};
