use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;

/// Key of a tracked operation, assigned by the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub(crate) u64);

impl Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Succeeded,
    Failed(String),
}

/// An eventual result the notifier can watch.
///
/// Whatever the caller is waiting on (a request, a job, a timer) is reduced
/// to a [`Settlement`] so that the notifier only needs to know whether it
/// succeeded.
pub struct Operation {
    future: Pin<Box<dyn Future<Output = Settlement> + Send + 'static>>,
}

impl Operation {
    pub fn new<F, T, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Display,
    {
        Self::from_settlement(async move {
            match future.await {
                Ok(_) => Settlement::Succeeded,
                Err(e) => Settlement::Failed(e.to_string()),
            }
        })
    }

    /// Like [`Operation::new`] but the original result is forwarded to the
    /// returned receiver once the operation settles.
    pub fn with_result<F, T, E>(future: F) -> (Self, oneshot::Receiver<Result<T, E>>)
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let operation = Self::from_settlement(async move {
            let result = future.await;
            let settlement = match &result {
                Ok(_) => Settlement::Succeeded,
                Err(e) => Settlement::Failed(e.to_string()),
            };
            // the caller is free to stop listening
            let _ = sender.send(result);
            settlement
        });
        (operation, receiver)
    }

    pub fn from_settlement<F>(future: F) -> Self
    where
        F: Future<Output = Settlement> + Send + 'static,
    {
        Operation {
            future: Box::pin(future),
        }
    }

    pub fn resolved() -> Self {
        Self::from_settlement(std::future::ready(Settlement::Succeeded))
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::from_settlement(std::future::ready(Settlement::Failed(reason.into())))
    }

    /// Never settles.
    pub fn pending() -> Self {
        Self::from_settlement(std::future::pending())
    }

    /// Succeeds once, `delay` after it is first polled.
    pub fn timer(delay: Duration) -> Self {
        Self::from_settlement(async move {
            tokio::time::sleep(delay).await;
            Settlement::Succeeded
        })
    }

    /// Settled through the returned [`Deferred`]. Dropping the `Deferred`
    /// without settling leaves the operation pending forever.
    pub fn deferred() -> (Self, Deferred) {
        let (sender, receiver) = oneshot::channel();
        let operation = Self::from_settlement(async move {
            match receiver.await {
                Ok(settlement) => settlement,
                Err(_) => std::future::pending().await,
            }
        });
        (operation, Deferred { sender })
    }
}

impl Future for Operation {
    type Output = Settlement;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

/// Settles the operation returned alongside it by [`Operation::deferred`].
#[derive(Debug)]
pub struct Deferred {
    sender: oneshot::Sender<Settlement>,
}

impl Deferred {
    pub fn resolve(self) {
        let _ = self.sender.send(Settlement::Succeeded);
    }

    pub fn reject(self, reason: impl Into<String>) {
        let _ = self.sender.send(Settlement::Failed(reason.into()));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_new_maps_result() {
        let ok = Operation::new(async { Ok::<u8, String>(1) });
        assert_eq!(Settlement::Succeeded, ok.await);

        let err = Operation::new(async { Err::<u8, String>("timeout".to_string()) });
        assert_eq!(Settlement::Failed("timeout".to_string()), err.await);
    }

    #[tokio::test]
    async fn test_with_result_forwards_value() -> Result<(), anyhow::Error> {
        let (operation, result) = Operation::with_result(async { Ok::<u8, String>(42) });
        assert_eq!(Settlement::Succeeded, operation.await);
        assert_eq!(Ok(42), result.await?);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred() {
        let (operation, deferred) = Operation::deferred();
        deferred.reject("nope");
        assert_eq!(Settlement::Failed("nope".to_string()), operation.await);

        let (operation, deferred) = Operation::deferred();
        drop(deferred);
        let result = tokio::time::timeout(Duration::from_secs(60), operation).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_settles_after_delay() {
        let started = tokio::time::Instant::now();
        assert_eq!(
            Settlement::Succeeded,
            Operation::timer(Duration::from_millis(8000)).await
        );
        assert!(started.elapsed() >= Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_never_settles() {
        let result = tokio::time::timeout(Duration::from_secs(60), Operation::pending()).await;
        assert!(result.is_err());
    }
}
