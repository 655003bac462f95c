//! Branch/chain executor for sequencing dependent operations.
//!
//! A [`Step`] holds a work function and up to two successors. Running a step
//! calls its work and dispatches on the returned [`Flow`]:
//!
//! - [`Flow::Branch`]: `true` runs successor 0, `false` runs successor 1.
//!   Nothing is forwarded across a branch.
//! - [`Flow::Continue`]: the pending work is awaited and its value becomes
//!   the input of successor 0. Successor 1 is never consulted.
//! - [`Flow::Halt`]: the path ends.
//!
//! A missing successor turns the corresponding transition into a no-op.
//! Graphs are inert until [`Step::run`] is called and can be run any number
//! of times; every run replays the work.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::trace;

use crate::error::CoreError;

type WorkFn<T> = Box<dyn Fn(Option<T>) -> Flow<T> + Send + Sync>;

/// What a step's work asks the executor to do next.
pub enum Flow<T> {
    Branch(bool),
    Continue(BoxFuture<'static, Result<T, CoreError>>),
    Halt,
}

impl<T> Flow<T> {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        Self::Continue(future.boxed())
    }
}

impl<T> From<bool> for Flow<T> {
    fn from(taken: bool) -> Self {
        Self::Branch(taken)
    }
}

impl<T> fmt::Debug for Flow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(taken) => f.debug_tuple("Branch").field(taken).finish(),
            Self::Continue(_) => f.write_str("Continue(..)"),
            Self::Halt => f.write_str("Halt"),
        }
    }
}

pub struct Step<T> {
    work: WorkFn<T>,
    successors: [Option<Arc<Step<T>>>; 2],
}

impl<T> Step<T>
where
    T: Send + 'static,
{
    pub fn new<F>(work: F) -> Self
    where
        F: Fn(Option<T>) -> Flow<T> + Send + Sync + 'static,
    {
        Self {
            work: Box::new(work),
            successors: [None, None],
        }
    }

    /// Successor 0: taken on `Branch(true)` and after `Continue`.
    pub fn then(mut self, next: impl Into<Arc<Step<T>>>) -> Self {
        self.successors[0] = Some(next.into());
        self
    }

    /// Successor 1: taken on `Branch(false)`.
    pub fn otherwise(mut self, next: impl Into<Arc<Step<T>>>) -> Self {
        self.successors[1] = Some(next.into());
        self
    }

    pub fn run(&self, input: Option<T>) -> BoxFuture<'_, Result<(), CoreError>> {
        async move {
            match (self.work)(input) {
                Flow::Branch(taken) => {
                    let slot = if taken { 0 } else { 1 };
                    trace!(taken, has_successor = self.successors[slot].is_some(), "step branch");
                    match &self.successors[slot] {
                        Some(next) => next.run(None).await,
                        None => Ok(()),
                    }
                }
                Flow::Continue(pending) => {
                    let value = pending
                        .await
                        .map_err(|err| CoreError::StepChain(Box::new(err)))?;
                    trace!(has_successor = self.successors[0].is_some(), "step continue");
                    match &self.successors[0] {
                        Some(next) => next.run(Some(value)).await,
                        None => Ok(()),
                    }
                }
                Flow::Halt => {
                    trace!("step halt");
                    Ok(())
                }
            }
        }
        .boxed()
    }
}

impl<T> fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("then", &self.successors[0].is_some())
            .field("otherwise", &self.successors[1].is_some())
            .finish_non_exhaustive()
    }
}
