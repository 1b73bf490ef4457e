//! CLI error handling with user-facing messages.

use std::fmt;
use std::process;

use mipforge::compiler::CompileError;
use mipforge::pack::PackError;

/// CLI-level failures, each with a message a user can act on.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging.
    LoggingInit(std::io::Error),
    /// The input image could not be opened or decoded.
    Decode { path: String, error: image::ImageError },
    /// Invalid argument combination.
    Config(String),
    /// The compile pipeline failed.
    Compile(CompileError),
    /// The compiled image cannot be packed to the requested format.
    Pack(PackError),
    /// The output file could not be written.
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Print the error and terminate with a nonzero exit code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        if let CliError::Pack(PackError::ChannelMismatch { required, actual, .. }) = self {
            eprintln!();
            eprintln!(
                "The decoded image has {} channels but the format needs {}.",
                actual, required
            );
            eprintln!("Pick a format that matches the source, or convert the source first.");
        }
        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(error) => write!(f, "failed to initialize logging: {}", error),
            CliError::Decode { path, error } => {
                write!(f, "could not decode '{}': {}", path, error)
            }
            CliError::Config(message) => write!(f, "{}", message),
            CliError::Compile(error) => write!(f, "compile failed: {}", error),
            CliError::Pack(error) => write!(f, "packing failed: {}", error),
            CliError::FileWrite { path, error } => {
                write!(f, "could not write '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<CompileError> for CliError {
    fn from(error: CompileError) -> Self {
        CliError::Compile(error)
    }
}

impl From<mipforge::buffer::AllocError> for CliError {
    fn from(error: mipforge::buffer::AllocError) -> Self {
        CliError::Compile(error.into())
    }
}

impl From<PackError> for CliError {
    fn from(error: PackError) -> Self {
        CliError::Pack(error)
    }
}
