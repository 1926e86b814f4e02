use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<A> {
    Answered(A),
    Closed,
    TimedOut,
}

#[derive(Debug)]
enum Slot<Q, A> {
    Idle,
    Pending(Q),
    Answered(A),
    Closed,
}

/// Single-slot handoff between one waiting requester and one responder.
///
/// The requester parks in [`request`](Self::request) until a responder stores
/// an answer, the slot is closed, or (with a timeout) the deadline passes. At
/// most one request is outstanding; there is no queue.
#[derive(Debug)]
pub struct Rendezvous<Q, A> {
    slot: Mutex<Slot<Q, A>>,
    ready: Condvar,
}

impl<Q, A> Default for Rendezvous<Q, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, A> Rendezvous<Q, A> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Idle),
            ready: Condvar::new(),
        }
    }

    pub fn request(&self, question: Q) -> Delivery<A> {
        self.wait(question, None)
    }

    pub fn request_timeout(&self, question: Q, timeout: Duration) -> Delivery<A> {
        self.wait(question, Some(Instant::now() + timeout))
    }

    fn wait(&self, question: Q, deadline: Option<Instant>) -> Delivery<A> {
        let mut slot = self.slot.lock();
        if matches!(*slot, Slot::Closed) {
            return Delivery::Closed;
        }
        *slot = Slot::Pending(question);

        loop {
            match std::mem::replace(&mut *slot, Slot::Idle) {
                Slot::Answered(answer) => return Delivery::Answered(answer),
                Slot::Closed => {
                    *slot = Slot::Closed;
                    return Delivery::Closed;
                }
                other => *slot = other,
            }

            match deadline {
                None => self.ready.wait(&mut slot),
                Some(deadline) => {
                    if self.ready.wait_until(&mut slot, deadline).timed_out() {
                        return match std::mem::replace(&mut *slot, Slot::Idle) {
                            Slot::Answered(answer) => Delivery::Answered(answer),
                            Slot::Closed => {
                                *slot = Slot::Closed;
                                Delivery::Closed
                            }
                            _ => Delivery::TimedOut,
                        };
                    }
                }
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.slot.lock(), Slot::Pending(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(*self.slot.lock(), Slot::Closed)
    }

    /// A copy of the outstanding request, if any.
    pub fn pending(&self) -> Option<Q>
    where
        Q: Clone,
    {
        match &*self.slot.lock() {
            Slot::Pending(question) => Some(question.clone()),
            _ => None,
        }
    }

    /// Answers the outstanding request with whatever `answer` produces.
    ///
    /// Returns `Ok(false)` when nothing is pending. When `answer` fails the
    /// error is returned and the request stays pending.
    pub fn respond_with<E>(&self, answer: impl FnOnce(&Q) -> Result<A, E>) -> Result<bool, E> {
        let mut slot = self.slot.lock();
        let Slot::Pending(question) = &*slot else {
            return Ok(false);
        };
        let answer = answer(question)?;
        *slot = Slot::Answered(answer);
        self.ready.notify_all();
        Ok(true)
    }

    /// Wakes any waiter with [`Delivery::Closed`]; later requests return
    /// immediately.
    pub fn close(&self) {
        *self.slot.lock() = Slot::Closed;
        self.ready.notify_all();
    }
}
