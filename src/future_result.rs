use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::{future::Future, pin::Pin, task::{Context, Poll, Waker}};
use tracing::{debug, warn};
use crate::Error;

/// The resolved value of a [`FutureResult`].
pub type Outcome<T, E> = Result<T, E>;

type Observer<T, E> = Box<dyn FnOnce(&Outcome<T, E>)>;

/// A single-fire container for the outcome of one asynchronous operation.
///
/// Clones are handles onto the same slot: the producer keeps one to complete
/// it, consumers keep theirs to observe it. The handle is single-threaded
/// (`!Send`), observers run synchronously on the thread that completes it.
///
/// # Examples
///
/// ```
/// use flow_result::FutureResult;
/// use std::{cell::Cell, rc::Rc};
///
/// let future = FutureResult::<u32, String>::new();
/// let seen = Rc::new(Cell::new(0));
/// let sink = seen.clone();
/// future.observe(move |outcome| sink.set(*outcome.as_ref().unwrap()));
/// future.resolve(42).unwrap();
/// assert_eq!(seen.get(), 42);
/// ```
pub struct FutureResult<T, E> {
    inner: Rc<RefCell<Inner<T, E>>>,
}

struct Inner<T, E> {
    outcome: Option<Rc<Outcome<T, E>>>,
    observers: Vec<Observer<T, E>>,
    wakers: Vec<Waker>,
}

impl<T, E> FutureResult<T, E> {
    /// A pending future.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                outcome: None,
                observers: vec![],
                wakers: vec![],
            })),
        }
    }

    /// A future that already succeeded with `value`.
    ///
    /// ```
    /// use flow_result::FutureResult;
    /// use futures::executor::block_on;
    ///
    /// let stored = FutureResult::<(), String>::with_value(());
    /// assert!(stored.is_completed());
    /// assert_eq!(block_on(stored), Ok(()));
    /// ```
    pub fn with_value(value: T) -> Self {
        Self::from(Ok(value))
    }

    /// Registers `observer`.
    ///
    /// Pending futures keep it and call it on completion, in registration
    /// order. Completed futures call it right away with the stored outcome.
    pub fn observe<F>(&self, observer: F)
    where
        F: FnOnce(&Outcome<T, E>) + 'static,
    {
        // Release the borrow before running anything, observers may re-enter.
        let completed = self.inner.borrow().outcome.clone();
        match completed {
            Some(outcome) => observer(&*outcome),
            None => self.inner.borrow_mut().observers.push(Box::new(observer)),
        }
    }

    /// Stores `outcome` and reports it to every registered observer, then
    /// wakes any task awaiting this future.
    ///
    /// A future completes once. Later calls leave the first outcome in place,
    /// notify nobody and return [`Error::AlreadyCompleted`].
    pub fn complete(&self, outcome: Outcome<T, E>) -> Result<(), Error> {
        let (outcome, observers, wakers) = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_some() {
                warn!("ignoring second completion of a future result");
                return Err(Error::AlreadyCompleted);
            }
            let outcome = Rc::new(outcome);
            inner.outcome = Some(outcome.clone());
            (
                outcome,
                std::mem::take(&mut inner.observers),
                std::mem::take(&mut inner.wakers),
            )
        };
        debug!(
            success = outcome.is_ok(),
            observers = observers.len(),
            "future result completed"
        );
        for observer in observers {
            observer(&*outcome);
        }
        for waker in wakers {
            waker.wake()
        }
        Ok(())
    }

    /// Completes with `Ok(value)`.
    pub fn resolve(&self, value: T) -> Result<(), Error> {
        self.complete(Ok(value))
    }

    /// Completes with `Err(error)`.
    pub fn reject(&self, error: E) -> Result<(), Error> {
        self.complete(Err(error))
    }

    pub fn is_completed(&self) -> bool {
        self.inner.borrow().outcome.is_some()
    }
}

impl<T: Clone, E: Clone> FutureResult<T, E> {
    /// A snapshot of the stored outcome, if any.
    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        self.inner
            .borrow()
            .outcome
            .as_ref()
            .map(|outcome| (**outcome).clone())
    }
}

impl<T, E> FutureResult<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Chains the next step onto this one.
    ///
    /// On success the value is handed to `next` and the returned future
    /// settles with whatever `next`'s future settles with. On failure the
    /// error is forwarded as-is and `next` is never called.
    ///
    /// ```
    /// use flow_result::FutureResult;
    ///
    /// let step = FutureResult::<&str, String>::new();
    /// let stored = step.and_then(|text| FutureResult::with_value(text.len()));
    /// assert!(!stored.is_completed());
    /// step.resolve("A, B").unwrap();
    /// assert_eq!(stored.outcome(), Some(Ok(4)));
    /// ```
    pub fn and_then<U, F>(&self, next: F) -> FutureResult<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> FutureResult<U, E> + 'static,
    {
        let chained = FutureResult::new();
        let forward = chained.clone();
        self.observe(move |outcome| match outcome {
            Ok(value) => {
                debug!("step succeeded, chaining next future");
                next(value.clone()).observe(move |settled| {
                    // A rejected write is already logged by `complete`.
                    let _ = forward.complete(settled.clone());
                });
            }
            Err(error) => {
                debug!("step failed, skipping next future");
                let _ = forward.reject(error.clone());
            }
        });
        chained
    }
}

impl<T, E> From<Outcome<T, E>> for FutureResult<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        let future = Self::new();
        future.inner.borrow_mut().outcome = Some(Rc::new(outcome));
        future
    }
}

impl<T, E> Default for FutureResult<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for FutureResult<T, E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T, E> fmt::Debug for FutureResult<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FutureResult")
            .field("completed", &inner.outcome.is_some())
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl<T: Clone, E: Clone> Future for FutureResult<T, E> {
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.inner.borrow_mut();
        if let Some(outcome) = inner.outcome.clone() {
            return Poll::Ready((*outcome).clone());
        }
        if !inner.wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
            inner.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}
