//! Error types for isoflow.
//!
//! The simulation itself never fails; errors only come from parsing user
//! supplied colors and from the windowing host.

use druid::PlatformError;
use std::fmt;

/// Errors that can occur when parsing a `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// The input did not contain exactly six hex digits.
    InvalidLength(String),
    /// The input contained a character that is not a hex digit.
    InvalidDigit(String),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength(input) => {
                write!(f, "Expected a color of the form #rrggbb, got '{}'", input)
            }
            ParseColorError::InvalidDigit(input) => {
                write!(f, "Color '{}' contains a non-hex digit", input)
            }
        }
    }
}

impl std::error::Error for ParseColorError {}

/// Errors that stop the application from running.
#[derive(Debug)]
pub enum AppError {
    /// The windowing platform could not open a window or drawing context.
    Platform(PlatformError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Platform(e) => write!(f, "Failed to start the window: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Platform(e) => Some(e),
        }
    }
}

impl From<PlatformError> for AppError {
    fn from(e: PlatformError) -> Self {
        AppError::Platform(e)
    }
}
