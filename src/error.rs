use crate::transcript::Platform;
use thiserror::Error;

/// Coarse classification of an [`ImportError`], used by callers to decide
/// how to present the failure and whether trying again can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Credential,
    RateLimit,
    Network,
    Timeout,
    Server,
    Extraction,
    Transcript,
    InvalidInput,
    Config,
}

/// Errors that can occur while importing or transcribing a recipe
#[derive(Error, Debug)]
pub enum ImportError {
    /// The request itself was unusable (empty URL, missing transcript text, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required API key was never configured
    #[error("Missing API key for {service}")]
    MissingApiKey {
        service: String,
        platform: Option<Platform>,
    },

    /// A provider or service rejected the configured credentials
    #[error("Invalid credentials for {service}: {message}")]
    InvalidCredentials { service: String, message: String },

    /// A provider or service asked us to slow down
    #[error("Rate limited by {service}")]
    RateLimited {
        service: String,
        retry_after: Option<u64>,
    },

    /// Connectivity failure while fetching a URL
    #[error("Failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    /// The transport gave up waiting on a URL
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// A dependency answered with a non-success status
    #[error("{service} responded with status {status}: {message}")]
    Server {
        service: String,
        status: u16,
        message: String,
    },

    /// The provider explicitly reported that the content holds no recipe
    #[error("No recipe found in {source_url}")]
    NoRecipeFound { source_url: String },

    /// The provider reply did not contain usable JSON
    #[error("Could not parse provider reply: {message}")]
    MalformedReply { message: String, raw: String },

    /// No transcript could be produced for a video
    #[error("Transcript unavailable for {platform} video {url}: {message}")]
    Transcript {
        platform: Platform,
        url: String,
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::InvalidInput(_) => ErrorKind::InvalidInput,
            ImportError::MissingApiKey { .. } | ImportError::InvalidCredentials { .. } => {
                ErrorKind::Credential
            }
            ImportError::RateLimited { .. } => ErrorKind::RateLimit,
            ImportError::Network { .. } => ErrorKind::Network,
            ImportError::Timeout { .. } => ErrorKind::Timeout,
            ImportError::Server { .. } => ErrorKind::Server,
            ImportError::NoRecipeFound { .. } | ImportError::MalformedReply { .. } => {
                ErrorKind::Extraction
            }
            ImportError::Transcript { .. } => ErrorKind::Transcript,
            ImportError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the same request may succeed if the caller repeats it later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ImportError::RateLimited { .. }
            | ImportError::Network { .. }
            | ImportError::Timeout { .. } => true,
            ImportError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_credential(&self) -> bool {
        self.kind() == ErrorKind::Credential
    }

    pub fn user_message(&self) -> String {
        match self {
            ImportError::InvalidInput(reason) => format!("The request could not be used: {reason}"),
            ImportError::MissingApiKey {
                service,
                platform: Some(platform),
            } => format!("Importing from {platform} needs a {service} API key."),
            ImportError::MissingApiKey { service, .. } => {
                format!("No API key is configured for {service}.")
            }
            ImportError::InvalidCredentials { service, .. } => {
                format!("{service} rejected the configured API key.")
            }
            ImportError::RateLimited { service, .. } => {
                format!("{service} is receiving too many requests right now.")
            }
            ImportError::Network { url, .. } => format!("Could not reach {url}."),
            ImportError::Timeout { url } => format!("{url} took too long to respond."),
            ImportError::Server { service, .. } => format!("{service} is having problems."),
            ImportError::NoRecipeFound { source_url } => {
                format!("No recipe could be found at {source_url}.")
            }
            ImportError::MalformedReply { .. } => {
                "The AI provider returned a reply that could not be read.".to_string()
            }
            ImportError::Transcript { platform, .. } => {
                format!("No transcript is available for this {platform} video.")
            }
            ImportError::Config(_) => "The importer is not configured correctly.".to_string(),
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            ImportError::InvalidInput(_) => "Check the link and try again.".to_string(),
            ImportError::MissingApiKey { service, .. } => {
                format!("Add a {service} API key in settings.")
            }
            ImportError::InvalidCredentials { service, .. } => {
                format!("Check the {service} API key in settings.")
            }
            ImportError::RateLimited {
                retry_after: Some(seconds),
                ..
            } => format!("Wait {seconds} seconds and try again."),
            ImportError::RateLimited { .. } => "Wait a moment and try again.".to_string(),
            ImportError::Network { .. } => "Check your connection and try again.".to_string(),
            ImportError::Timeout { .. } => "Try again in a moment.".to_string(),
            ImportError::Server { .. } => "Try again later.".to_string(),
            ImportError::NoRecipeFound { .. } | ImportError::MalformedReply { .. } => {
                "Try a different link, or paste the recipe text instead.".to_string()
            }
            ImportError::Transcript {
                platform: Platform::Youtube,
                ..
            } => "This video has no captions. Paste the recipe from the description instead."
                .to_string(),
            ImportError::Transcript { .. } => {
                "Paste the recipe from the video description instead.".to_string()
            }
            ImportError::Config(_) => "Review config.toml and the environment.".to_string(),
        }
    }

    /// HTTP status used when the error is returned from the extraction endpoint.
    pub fn http_status(&self) -> u16 {
        match self {
            ImportError::InvalidInput(_) | ImportError::MissingApiKey { .. } => 400,
            ImportError::InvalidCredentials { .. } => 401,
            ImportError::RateLimited { .. } => 429,
            _ => 500,
        }
    }

    /// Classify a transport failure, keeping the URL it happened on.
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| url.to_string());
        if err.is_timeout() {
            ImportError::Timeout { url }
        } else {
            ImportError::Network {
                url,
                message: err.to_string(),
            }
        }
    }

    /// Map a non-success response from `service` onto the error taxonomy.
    pub fn from_status(
        service: &str,
        status: reqwest::StatusCode,
        retry_after: Option<u64>,
        body: String,
    ) -> Self {
        match status.as_u16() {
            401 | 403 => ImportError::InvalidCredentials {
                service: service.to_string(),
                message: body,
            },
            429 => ImportError::RateLimited {
                service: service.to_string(),
                retry_after,
            },
            code => ImportError::Server {
                service: service.to_string(),
                status: code,
                message: body,
            },
        }
    }
}

impl From<config::ConfigError> for ImportError {
    fn from(err: config::ConfigError) -> Self {
        ImportError::Config(err.to_string())
    }
}

/// Read a `Retry-After` header expressed in seconds.
pub(crate) fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
