//! The engine: current-state storage, node registry, and the fire protocol.

use crate::audit::{self, ConfigIssue};
use crate::builder::{ConfigError, StateConfiguration};
use crate::core::{ActionResult, State, StateGraph, Transition, Trigger};
use crate::effects::error::FireError;
use crate::effects::storage::{ExternalState, OwnedState, StateStorage};
use crate::parameters::{Args, ParameterSpec, Parameters, TriggerWithParameters};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, debug_span, info, trace};

type Observer<S, T> = Box<dyn Fn(&Transition<S, T>) -> ActionResult>;
type UnhandledHandler<S, T> = Box<dyn Fn(&S, &T)>;

/// What a successful `fire` did.
#[derive(Clone, Debug, PartialEq)]
pub enum FireOutcome<S: State, T: Trigger> {
    /// The full exit/commit/notify/enter sequence ran.
    Transitioned(Transition<S, T>),

    /// The resolved behaviour ignores the trigger; nothing ran.
    Ignored,

    /// No single guard-satisfied behaviour was found; the unhandled-trigger
    /// handler ran and the state is unchanged.
    Unhandled,
}

impl<S: State, T: Trigger> FireOutcome<S, T> {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned(_))
    }

    pub fn transition(&self) -> Option<&Transition<S, T>> {
        match self {
            Self::Transitioned(transition) => Some(transition),
            _ => None,
        }
    }
}

fn log_unhandled<S: State, T: Trigger>(state: &S, trigger: &T) {
    info!(state = ?state, trigger = ?trigger, "trigger not permitted in current state, ignoring");
}

/// Hierarchical state machine over states `S` and triggers `T`.
///
/// All operations are synchronous and run to completion before returning.
/// The machine is not meant to be fired re-entrantly from inside its own
/// actions or observers; the `&mut self` receiver on [`fire`](Self::fire)
/// rules that out for safe code, and wrapping the machine in a `RefCell` to
/// get around it panics on the nested borrow.
///
/// # Example
///
/// ```rust
/// use hsm_engine::{state_enum, trigger_enum, StateMachine};
///
/// state_enum! {
///     enum Player { Stopped, Playing, Paused }
/// }
///
/// trigger_enum! {
///     enum Button { Play, Pause, Stop }
/// }
///
/// let mut player = StateMachine::new(Player::Stopped);
/// player
///     .configure(Player::Stopped)
///     .permit(Button::Play, Player::Playing);
/// player
///     .configure(Player::Playing)
///     .permit(Button::Pause, Player::Paused)
///     .permit(Button::Stop, Player::Stopped);
/// player
///     .configure(Player::Paused)
///     .permit(Button::Play, Player::Playing)
///     .permit(Button::Stop, Player::Stopped);
///
/// player.fire(Button::Play).unwrap();
/// assert_eq!(player.state(), Player::Playing);
/// assert!(player.can_fire(&Button::Pause));
/// assert!(!player.can_fire(&Button::Play));
/// ```
pub struct StateMachine<S: State, T: Trigger> {
    storage: Box<dyn StateStorage<S>>,
    graph: StateGraph<S, T>,
    parameters: HashMap<T, ParameterSpec>,
    observers: Vec<Observer<S, T>>,
    unhandled: UnhandledHandler<S, T>,
}

impl<S: State, T: Trigger> StateMachine<S, T> {
    /// Create a machine that owns its current state.
    pub fn new(initial: S) -> Self {
        Self::with_storage(OwnedState::new(initial))
    }

    /// Create a machine whose current state lives outside it.
    pub fn with_accessors<G, M>(accessor: G, mutator: M) -> Self
    where
        G: Fn() -> S + 'static,
        M: FnMut(S) + 'static,
    {
        Self::with_storage(ExternalState::new(accessor, mutator))
    }

    /// Create a machine over any [`StateStorage`].
    pub fn with_storage<St>(storage: St) -> Self
    where
        St: StateStorage<S> + 'static,
    {
        Self {
            storage: Box::new(storage),
            graph: StateGraph::new(),
            parameters: HashMap::new(),
            observers: Vec::new(),
            unhandled: Box::new(log_unhandled::<S, T>),
        }
    }

    /// The current state, read through the storage.
    pub fn state(&self) -> S {
        self.storage.load()
    }

    /// Begin configuring `state`, creating its node on first reference.
    pub fn configure(&mut self, state: S) -> StateConfiguration<'_, S, T> {
        StateConfiguration::new(&mut self.graph, state)
    }

    /// Declare the argument types `P` for `trigger`.
    ///
    /// A trigger can be given parameters once; later declarations are rejected
    /// and the first one stays in force.
    pub fn set_trigger_parameters<P: Parameters>(
        &mut self,
        trigger: T,
    ) -> Result<TriggerWithParameters<T, P>, ConfigError> {
        match self.parameters.entry(trigger) {
            Entry::Occupied(slot) => Err(ConfigError::ParametersAlreadyConfigured {
                trigger: format!("{:?}", slot.key()),
            }),
            Entry::Vacant(slot) => {
                let handle = TriggerWithParameters::new(slot.key().clone());
                slot.insert(P::spec());
                Ok(handle)
            }
        }
    }

    /// The parameter spec registered for `trigger`, if any.
    pub fn parameters_for(&self, trigger: &T) -> Option<&ParameterSpec> {
        self.parameters.get(trigger)
    }

    /// Replace the handler invoked when a fired trigger has no handler.
    pub fn on_unhandled_trigger<F>(&mut self, handler: F)
    where
        F: Fn(&S, &T) + 'static,
    {
        self.unhandled = Box::new(handler);
    }

    /// Register an observer called after each commit, in registration order.
    ///
    /// An observer returning an error stops the remaining observers and the
    /// entry phase.
    pub fn on_transitioned<F>(&mut self, observer: F)
    where
        F: Fn(&Transition<S, T>) -> ActionResult + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// True when firing `trigger` now would resolve to a behaviour.
    pub fn can_fire(&self, trigger: &T) -> bool {
        self.graph.can_handle(&self.state(), trigger)
    }

    /// True when the current state is `state` or one of its substates.
    pub fn is_in_state(&self, state: &S) -> bool {
        self.graph.is_included_in(&self.state(), state)
    }

    /// Triggers with a satisfied guard in the current state or any ancestor.
    pub fn permitted_triggers(&self) -> Vec<T> {
        self.graph.permitted_triggers(&self.state())
    }

    /// Fire a trigger without arguments.
    pub fn fire(&mut self, trigger: T) -> Result<FireOutcome<S, T>, FireError> {
        self.fire_args(trigger, Args::new())
    }

    /// Fire a parameterized trigger with typed arguments.
    pub fn fire_with<P: Parameters>(
        &mut self,
        trigger: &TriggerWithParameters<T, P>,
        params: P,
    ) -> Result<FireOutcome<S, T>, FireError> {
        self.fire_args(trigger.trigger().clone(), params.into_args())
    }

    /// Fire a trigger with loosely typed arguments.
    ///
    /// Arguments are checked against the trigger's parameter spec when one
    /// exists; mismatches are logged and consumers see them as absent.
    pub fn fire_args(&mut self, trigger: T, args: Args) -> Result<FireOutcome<S, T>, FireError> {
        let _span = debug_span!("fire", trigger = ?trigger).entered();

        if let Some(spec) = self.parameters.get(&trigger) {
            spec.validate(&args);
        }

        let source = self.storage.load();
        let destination = match self.graph.try_find_handler(&source, &trigger) {
            None => {
                (self.unhandled)(&source, &trigger);
                return Ok(FireOutcome::Unhandled);
            }
            Some(behaviour) => match behaviour.destination(&args) {
                Some(destination) => destination,
                None => {
                    debug!(state = ?source, "trigger ignored");
                    return Ok(FireOutcome::Ignored);
                }
            },
        };

        let transition = Transition::new(source, destination, trigger);

        self.exit(&transition)?;
        self.storage.store(transition.destination().clone());
        self.notify(&transition)?;
        self.enter(&transition, &args)?;

        debug!(
            source = ?transition.source(),
            destination = ?transition.destination(),
            reentry = transition.is_reentry(),
            "transition complete"
        );
        Ok(FireOutcome::Transitioned(transition))
    }

    fn exit(&self, transition: &Transition<S, T>) -> Result<(), FireError> {
        for state in self.graph.exit_path(transition) {
            trace!(state = ?state, "exiting");
            if let Some(node) = self.graph.node(&state) {
                node.execute_exit_actions(transition)
                    .map_err(|source| FireError::ExitAction {
                        state: format!("{state:?}"),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    fn notify(&self, transition: &Transition<S, T>) -> Result<(), FireError> {
        for observer in &self.observers {
            observer(transition).map_err(|source| FireError::Observer {
                from: format!("{:?}", transition.source()),
                to: format!("{:?}", transition.destination()),
                source,
            })?;
        }
        Ok(())
    }

    fn enter(&self, transition: &Transition<S, T>, args: &Args) -> Result<(), FireError> {
        for state in self.graph.entry_path(transition) {
            trace!(state = ?state, "entering");
            if let Some(node) = self.graph.node(&state) {
                node.execute_entry_actions(transition, args)
                    .map_err(|source| FireError::EntryAction {
                        state: format!("{state:?}"),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Check the configuration for cycles and guaranteed misconfigurations,
    /// collecting every issue found.
    pub fn audit(&self) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        audit::audit(&self.graph)
    }
}

impl<S: State, T: Trigger> fmt::Display for StateMachine<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let permitted: Vec<String> = self
            .permitted_triggers()
            .iter()
            .map(|trigger| format!("{trigger:?}"))
            .collect();
        write!(
            f,
            "StateMachine {{ State = {:?}, PermittedTriggers = {{ {} }} }}",
            self.state(),
            permitted.join(", ")
        )
    }
}

impl<S: State, T: Trigger> fmt::Debug for StateMachine<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &self.state())
            .field("observers", &self.observers.len())
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
