use thiserror::Error;

use crate::context::Interrupted;

/// Errors raised while retrieving raw content for a URL
#[derive(Error, Debug)]
pub enum FetchError {
    /// The redirect chain exceeded the configured limit
    #[error("too many redirects")]
    TooManyRedirects,

    /// The server answered with a non-2xx status
    #[error("unexpected status code: {status}")]
    Status { status: u16 },

    /// DNS, connect, timeout or body read failure
    #[error("failed to fetch URL: {0}")]
    Transport(#[source] reqwest::Error),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_redirect() {
            FetchError::TooManyRedirects
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Errors raised while isolating recipe text from an HTML document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no content found")]
    NoContentFound,

    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

/// Errors raised while pulling text out of a PDF
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read PDF: {0}")]
    InvalidPdf(#[from] lopdf::Error),

    #[error("no text content found in PDF")]
    NoTextFound,

    #[error("PDF extraction task failed: {0}")]
    Worker(String),
}

/// Errors raised while turning model output into domain records
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("no JSON found in response")]
    NoJsonFound,

    #[error("failed to parse JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("parsed recipe missing title")]
    MissingTitle,
}

/// Errors raised by a model provider
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unsupported model: {provider}-{version}")]
    UnsupportedModel { provider: String, version: String },

    #[error("no API key configured for {provider}")]
    MissingApiKey { provider: &'static str },

    #[error("{provider} API error: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API returned status {status}: {message}")]
    Status {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("no response content from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error(transparent)]
    MalformedResponse(#[from] NormalizeError),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

/// Errors raised by the persistence and file storage collaborators
#[derive(Error, Debug)]
#[error("storage error: {0}")]
pub struct StoreError(pub String);

/// Errors surfaced by the orchestration entry points
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to extract recipe content from {url}: {source}")]
    ParseFailed {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to extract text from PDF: {0}")]
    ExtractFailed(#[from] ExtractError),

    #[error("model error: {0}")]
    Model(#[source] ModelError),

    #[error("malformed model response: {0}")]
    MalformedModelResponse(#[source] NormalizeError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("recipe {recipe_id} has no servings to scale from")]
    InvalidServings { recipe_id: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while wiring the pipeline together
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("failed to build content fetcher: {0}")]
    Fetcher(#[from] FetchError),

    #[error("failed to build content parser: {0}")]
    Parser(#[from] ParseError),

    #[error("invalid model configuration: {0}")]
    Model(#[from] ModelError),
}

impl ImportError {
    /// Wrap a fetch failure with the URL it concerned
    pub fn fetch(url: &str, err: FetchError) -> Self {
        match err {
            FetchError::Interrupted(interrupted) => interrupted.into(),
            other => ImportError::FetchFailed {
                url: url.to_string(),
                source: other,
            },
        }
    }

    /// Wrap a content extraction failure with the URL it concerned
    pub fn parse(url: &str, err: ParseError) -> Self {
        ImportError::ParseFailed {
            url: url.to_string(),
            source: err,
        }
    }

    pub fn not_found(kind: &'static str, id: &str) -> Self {
        ImportError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<Interrupted> for ImportError {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::Cancelled => ImportError::Cancelled,
            Interrupted::DeadlineExceeded => ImportError::DeadlineExceeded,
        }
    }
}

impl From<ModelError> for ImportError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MalformedResponse(inner) => ImportError::MalformedModelResponse(inner),
            ModelError::Interrupted(interrupted) => interrupted.into(),
            other => ImportError::Model(other),
        }
    }
}
