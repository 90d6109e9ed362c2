mod level_vm;
mod markdown_vm;
mod upload_vm;
mod wizard_vm;

pub use level_vm::{FlashcardVm, LevelVm, OptionVm, QuestionVm, SidebarEntryVm, map_level_vm};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use upload_vm::{file_ref_from_bytes, guess_mime_type};
pub use wizard_vm::{StepState, StepVm, WizardVm, map_wizard_vm};
