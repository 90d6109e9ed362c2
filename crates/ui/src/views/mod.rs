mod home;
mod master_it;
mod notice;
mod process;
mod state;
mod upload;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use master_it::MasterItView;
pub use notice::{NoticeHost, Notices};
pub use process::ProcessView;
pub use state::ViewError;
pub use upload::FilePicker;
