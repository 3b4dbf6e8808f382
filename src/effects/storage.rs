//! Where the current state lives.
//!
//! The engine never assumes a storage location. It reads and writes the
//! current state only through [`StateStorage`].

use crate::core::State;
use std::fmt;

/// Read/write access to the current-state cell.
///
/// # Example
///
/// ```rust
/// use hsm_engine::effects::StateStorage;
/// use hsm_engine::StateMachine;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Shared(Rc<Cell<u8>>);
///
/// impl StateStorage<u8> for Shared {
///     fn load(&self) -> u8 {
///         self.0.get()
///     }
///
///     fn store(&mut self, state: u8) {
///         self.0.set(state)
///     }
/// }
///
/// let cell = Rc::new(Cell::new(0));
/// let mut machine: StateMachine<u8, char> = StateMachine::with_storage(Shared(Rc::clone(&cell)));
/// machine.configure(0).permit('n', 1);
///
/// machine.fire('n').unwrap();
/// assert_eq!(cell.get(), 1);
/// ```
pub trait StateStorage<S: State> {
    fn load(&self) -> S;

    fn store(&mut self, state: S);
}

/// Storage owned by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedState<S: State> {
    current: S,
}

impl<S: State> OwnedState<S> {
    pub fn new(initial: S) -> Self {
        Self { current: initial }
    }
}

impl<S: State> StateStorage<S> for OwnedState<S> {
    fn load(&self) -> S {
        self.current.clone()
    }

    fn store(&mut self, state: S) {
        self.current = state;
    }
}

/// Storage delegated to caller-supplied accessor and mutator closures.
pub struct ExternalState<G, M> {
    accessor: G,
    mutator: M,
}

impl<G, M> ExternalState<G, M> {
    pub fn new(accessor: G, mutator: M) -> Self {
        Self { accessor, mutator }
    }
}

impl<S, G, M> StateStorage<S> for ExternalState<G, M>
where
    S: State,
    G: Fn() -> S,
    M: FnMut(S),
{
    fn load(&self) -> S {
        (self.accessor)()
    }

    fn store(&mut self, state: S) {
        (self.mutator)(state)
    }
}

impl<G, M> fmt::Debug for ExternalState<G, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalState").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn owned_state_stores_and_loads() {
        let mut storage = OwnedState::new("a");
        assert_eq!(storage.load(), "a");

        storage.store("b");
        assert_eq!(storage.load(), "b");
    }

    #[test]
    fn external_state_delegates_to_closures() {
        let cell = Rc::new(Cell::new(1u8));
        let mut storage = {
            let read = Rc::clone(&cell);
            let write = Rc::clone(&cell);
            ExternalState::new(move || read.get(), move |s| write.set(s))
        };

        assert_eq!(storage.load(), 1);
        storage.store(7);
        assert_eq!(cell.get(), 7);
        assert_eq!(storage.load(), 7);
    }
}
