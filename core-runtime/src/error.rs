//! Errors raised while assembling the runtime

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is out of range or unparsable
    #[error("Configuration error: {0}")]
    Config(String),

    /// No bridge was injected and this build has no default for it
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The built-in default for a bridge could not be constructed
    #[error("Failed to initialize default {capability}: {message}")]
    BridgeInit { capability: String, message: String },
}

impl Error {
    pub(crate) fn bridge_init(capability: &str, message: impl Into<String>) -> Self {
        Self::BridgeInit {
            capability: capability.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
