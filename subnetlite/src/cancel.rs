//! Cancellation and deadline carrier passed to every blocking call.
//!
//! A [`Cancellation`] is a `CancellationToken` plus an optional deadline.
//! Poll loops never sleep unguarded: they use [`Cancellation::sleep`] and
//! [`Cancellation::run`], which return as soon as the token fires or the
//! deadline passes.

use std::future::Future;
use std::time::Duration;
use subnetlite_shared::{SubnetliteError, SubnetliteResult};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// A root carrier with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A child that is cancelled with this carrier but can also be cancelled
    /// on its own without affecting the parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// A child whose deadline is `timeout` from now, or the parent's
    /// deadline if that is earlier.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        Self {
            token: self.token.child_token(),
            deadline: Some(match self.deadline {
                Some(parent) => parent.min(deadline),
                None => deadline,
            }),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The error this carrier resolves to, if it is already done.
    pub fn err(&self) -> Option<SubnetliteError> {
        if self.token.is_cancelled() {
            Some(SubnetliteError::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(SubnetliteError::DeadlineExceeded)
        } else {
            None
        }
    }

    pub fn check(&self) -> SubnetliteResult<()> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolves once the token fires or the deadline passes.
    pub async fn done(&self) -> SubnetliteError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => SubnetliteError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => SubnetliteError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                SubnetliteError::Cancelled
            }
        }
    }

    /// Sleep for `interval` unless cancelled first.
    pub async fn sleep(&self, interval: Duration) -> SubnetliteResult<()> {
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            _ = tokio::time::sleep(interval) => Ok(()),
        }
    }

    /// Drive `future` to completion unless cancelled first.
    pub async fn run<F: Future>(&self, future: F) -> SubnetliteResult<F::Output> {
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            output = future => Ok(output),
        }
    }
}
