//! Command completion future
//!
//! Timed and positional commands finish when the hub reports the port idle,
//! not when the write returns. The port holds the sending half of a oneshot
//! channel; the caller awaits the receiving half.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;

/// Reasons a command never reached physical completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionError {
    /// A later command on the same port took over the completion slot
    Superseded,
    /// Writing the command to the link failed
    Link,
    /// The link went away, or the hub was dropped, while the command was in flight
    Disconnected,
}

pub type CompletionResult = Result<(), CompletionError>;

pub(crate) type CompletionSender = oneshot::Sender<CompletionResult>;

/// Resolves when a command has physically finished.
///
/// Commands with nothing to wait for (untimed motor runs, LED changes)
/// return an already resolved completion. There is no built-in timeout;
/// a completion whose acknowledgement never arrives stays pending until the
/// link is reported lost.
#[must_use = "a completion does nothing unless awaited"]
pub struct Completion {
    state: State,
}

enum State {
    Ready(CompletionResult),
    Pending(oneshot::Receiver<CompletionResult>),
}

impl Completion {
    pub(crate) fn ready() -> Self {
        Self {
            state: State::Ready(Ok(())),
        }
    }

    pub(crate) fn pending() -> (CompletionSender, Self) {
        let (sender, receiver) = oneshot::channel();
        let completion = Self {
            state: State::Pending(receiver),
        };
        (sender, completion)
    }

    /// Check for a result without waiting.
    ///
    /// Returns `None` while the command is still running.
    pub fn try_result(&mut self) -> Option<CompletionResult> {
        match &mut self.state {
            State::Ready(result) => Some(*result),
            State::Pending(receiver) => {
                let result = match receiver.try_recv() {
                    Ok(None) => return None,
                    Ok(Some(result)) => result,
                    Err(oneshot::Canceled) => Err(CompletionError::Disconnected),
                };
                self.state = State::Ready(result);
                Some(result)
            }
        }
    }
}

impl Future for Completion {
    type Output = CompletionResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            State::Ready(result) => Poll::Ready(*result),
            State::Pending(receiver) => {
                let result = match Pin::new(receiver).poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(result) => result.unwrap_or(Err(CompletionError::Disconnected)),
                };
                this.state = State::Ready(result);
                Poll::Ready(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_resolves_immediately() {
        let mut completion = Completion::ready();
        assert_eq!(completion.try_result(), Some(Ok(())));
        assert_eq!(futures::executor::block_on(completion), Ok(()));
    }

    #[test]
    fn test_pending_resolves_on_send() {
        let (sender, mut completion) = Completion::pending();
        assert_eq!(completion.try_result(), None);

        sender.send(Ok(())).unwrap();
        assert_eq!(completion.try_result(), Some(Ok(())));
        // The result is kept for a later await
        assert_eq!(futures::executor::block_on(completion), Ok(()));
    }

    #[test]
    fn test_dropped_sender_reports_disconnect() {
        let (sender, completion) = Completion::pending();
        drop(sender);
        assert_eq!(
            futures::executor::block_on(completion),
            Err(CompletionError::Disconnected)
        );
    }
}
