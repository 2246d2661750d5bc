//! Error types for subnet orchestration.

use thiserror::Error;

pub type SubnetliteResult<T> = Result<T, SubnetliteError>;

/// Errors produced while bootstrapping a subnet.
///
/// Leaf variants carry a human-readable message. Stages wrap the leaf with
/// [`SubnetliteError::context`], so the top-level error reads like
/// `failed creating subnet: api error: ...`. The whole chain is in the
/// `Display` output, and `source()` is always `None` so reporters that walk
/// the source chain do not print a layer twice.
#[derive(Debug, Error)]
pub enum SubnetliteError {
    /// Invalid workflow input detected before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The fleet handle was torn down.
    #[error("network stopped")]
    NetworkStopped,

    /// A node rejected a call or its API could not be reached.
    #[error("api error: {0}")]
    Api(String),

    /// A confirmation succeeded but the resulting state is not observable.
    #[error("inconsistent state: {0}")]
    Inconsistent(String),

    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("io error: {0}")]
    Io(std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("{context}: {inner}")]
    Context {
        context: String,
        inner: Box<SubnetliteError>,
    },
}

impl From<std::io::Error> for SubnetliteError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl SubnetliteError {
    /// Wrap this error with a message describing where it happened.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            inner: Box::new(self),
        }
    }

    /// The innermost error beneath all context layers.
    pub fn root_cause(&self) -> &Self {
        let mut err = self;
        while let Self::Context { inner, .. } = err {
            err = inner;
        }
        err
    }

    /// True if the root cause is a cancellation or an expired deadline.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Cancelled | Self::DeadlineExceeded
        )
    }
}
