#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    InvalidLevel,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::InvalidLevel => "That level does not exist.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}
