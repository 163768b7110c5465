pub mod validate;

/// Bad invocation: the message is followed by the usage text
#[derive(Debug)]
pub struct UsageError(pub String);

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

/// How a command that ran to completion ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Accepted,
    Declined,
}

impl Status {
    pub fn code(&self) -> i32 {
        match self {
            Status::Accepted => 0,
            Status::Declined => 2,
        }
    }
}
