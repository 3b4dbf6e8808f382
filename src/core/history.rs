//! Transition history tracking.
//!
//! A [`TransitionHistory`] is a cheap, cloneable handle onto a shared log.
//! Register its [`recorder`](TransitionHistory::recorder) as a transition
//! observer and every completed commit is appended with a timestamp.

use super::node::ActionResult;
use super::state::{State, Trigger};
use super::transition::Transition;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// A transition together with the moment it was observed.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord<S: State, T: Trigger> {
    pub transition: Transition<S, T>,
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of observed transitions.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::TransitionHistory;
/// use hsm_engine::StateMachine;
///
/// let mut machine = StateMachine::new("off");
/// machine.configure("off").permit("toggle", "on");
/// machine.configure("on").permit("toggle", "off");
///
/// let history = TransitionHistory::new();
/// machine.on_transitioned(history.recorder());
///
/// machine.fire("toggle").unwrap();
/// machine.fire("toggle").unwrap();
///
/// assert_eq!(history.path(), vec!["off", "on", "off"]);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionHistory<S: State, T: Trigger> {
    records: Rc<RefCell<Vec<TransitionRecord<S, T>>>>,
}

impl<S: State, T: Trigger> Default for TransitionHistory<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Trigger> TransitionHistory<S, T> {
    pub fn new() -> Self {
        Self {
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Append a transition stamped with the current time.
    pub fn record(&self, transition: &Transition<S, T>) {
        self.records.borrow_mut().push(TransitionRecord {
            transition: transition.clone(),
            timestamp: Utc::now(),
        });
    }

    /// An observer that records into this history.
    pub fn recorder(&self) -> impl Fn(&Transition<S, T>) -> ActionResult + 'static {
        let history = self.clone();
        move |transition| {
            history.record(transition);
            Ok(())
        }
    }

    /// Snapshot of every record so far.
    pub fn records(&self) -> Vec<TransitionRecord<S, T>> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// States traversed: the first source, then each destination.
    pub fn path(&self) -> Vec<S> {
        let records = self.records.borrow();
        let mut path = Vec::with_capacity(records.len() + 1);
        if let Some(first) = records.first() {
            path.push(first.transition.source().clone());
        }
        path.extend(
            records
                .iter()
                .map(|record| record.transition.destination().clone()),
        );
        path
    }

    /// Time between the first and last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let records = self.records.borrow();
        let (first, last) = (records.first()?, records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}
