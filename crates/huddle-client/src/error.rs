#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Huddle API answered with an error body.
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("chat connection failed: {0}")]
    Connection(String),

    #[error("no signed-in session")]
    NotSignedIn,
}
