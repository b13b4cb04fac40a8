use crate::fit::EstimateError;

/// Exit code for invalid arguments, configuration, or unreadable files.
pub const EXIT_USAGE: u8 = 2;
/// Exit code when the data cannot support an estimate.
pub const EXIT_DATA: u8 = 3;
/// Exit code for terminal and other internal failures.
pub const EXIT_INTERNAL: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        let code = match err {
            EstimateError::InsufficientData { .. } => EXIT_DATA,
            EstimateError::InvalidRange { .. } | EstimateError::InvalidInput(_) => EXIT_USAGE,
        };
        AppError::new(code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
