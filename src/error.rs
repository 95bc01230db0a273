use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudFilterError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed header {path}: {message}")]
    MalformedHeader { path: String, message: String },

    #[error("Header {path} has no <{element}> element")]
    MissingElement { path: String, element: String },

    #[error("Header {path} has a non-integer cloud coverage: {value:?}")]
    InvalidCoverage { path: String, value: String },

    #[error("Attempted path traversal in archive {archive}: {entry}")]
    PathTraversal { archive: String, entry: String },

    #[error("Archive not found: {path}")]
    MissingArchive { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for CloudFilterError {
    fn user_message(&self) -> String {
        match self {
            CloudFilterError::MalformedHeader { path, message } => {
                format!("Could not parse header {}: {}", path, message)
            }
            CloudFilterError::MissingElement { path, element } => {
                format!("Header {} is missing the {} element", path, element)
            }
            CloudFilterError::InvalidCoverage { path, value } => {
                format!("Cloud coverage in {} is not an integer: {:?}", path, value)
            }
            CloudFilterError::PathTraversal { archive, entry } => {
                format!(
                    "Refusing to extract {}: entry {} escapes the data directory",
                    archive, entry
                )
            }
            CloudFilterError::MissingArchive { path } => {
                format!("Archive not found for matching scene: {}", path)
            }
            CloudFilterError::InvalidPath { path } => {
                format!("Invalid data directory: {}", path)
            }
            CloudFilterError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            CloudFilterError::MalformedHeader { .. } | CloudFilterError::MissingElement { .. } => Some(
                "Check that the header is a complete XML document and that [header] namespace and coverage_path match the product format.".to_string()
            ),
            CloudFilterError::InvalidCoverage { .. } => Some(
                "The coverage element must contain a whole number of percent (e.g. 30).".to_string()
            ),
            CloudFilterError::PathTraversal { .. } => Some(
                "The archive may be corrupted or malicious. Inspect it with `tar -tvf` before extracting it manually.".to_string()
            ),
            CloudFilterError::MissingArchive { .. } => Some(
                "Make sure every header has its archive next to it, or run with --operation report first.".to_string()
            ),
            CloudFilterError::InvalidPath { .. } => Some(
                "Pass an existing directory with --data_dir.".to_string()
            ),
            CloudFilterError::Config { .. } => Some(
                "Check your configuration file syntax or generate a fresh one with --generate-config.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for CloudFilterError {
    fn from(error: toml::de::Error) -> Self {
        CloudFilterError::Config {
            message: error.to_string(),
        }
    }
}

impl From<walkdir::Error> for CloudFilterError {
    fn from(error: walkdir::Error) -> Self {
        let path = error.path().map(|p| p.display().to_string());
        match error.into_io_error() {
            Some(io) => CloudFilterError::Io(io),
            None => CloudFilterError::InvalidPath {
                path: path.unwrap_or_else(|| "filesystem loop detected".to_string()),
            },
        }
    }
}

impl From<regex::Error> for CloudFilterError {
    fn from(error: regex::Error) -> Self {
        CloudFilterError::Config {
            message: format!("Invalid exclude pattern: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudFilterError>;
