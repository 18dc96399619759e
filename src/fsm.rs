use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::FsmError;

/// Longest chain of transitions a single `enter` cascade may produce before
/// the machine gives up and reports a loop.
const MAX_TRANSITION_CHAIN: usize = 8;

/// What a lifecycle hook asks the machine to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<K> {
    /// Stay in the current state.
    Stay,
    /// Exit the current state and enter `K`.
    Go(K),
    /// Terminal: stop dispatching to this machine for good.
    Halt,
}

/// A behavior unit bound to one key of a [`StateMachine`].
///
/// `C` is the data the state manipulates (the owning entity). Every hook has a
/// no-op default so a state overrides only what it needs. Hooks never touch the
/// machine directly; they return a [`Transition`] and the machine applies it
/// after the hook returns.
pub trait State<K, C>: Send + Sync {
    fn id(&self) -> K;

    fn enter(&mut self, _ctx: &mut C) -> Transition<K> {
        Transition::Stay
    }

    fn exit(&mut self, _ctx: &mut C) {}

    /// Once per rendered frame.
    fn update(&mut self, _ctx: &mut C, _dt: f32) -> Transition<K> {
        Transition::Stay
    }

    /// Once per fixed physics step.
    fn fixed_update(&mut self, _ctx: &mut C, _dt: f32) -> Transition<K> {
        Transition::Stay
    }
}

/// Keyed finite-state-machine container.
///
/// Owns one boxed state per key and tracks which one is current, the previous
/// key, and how long the machine has been in its current state.
///
/// # Usage
/// ```ignore
/// let mut fsm = StateMachine::new();
/// fsm.add(Box::new(Idle))?;
/// fsm.add(Box::new(Walk))?;
/// fsm.set_current_state(Key::Idle, &mut ctx)?;
/// // Each frame:
/// fsm.update(&mut ctx, dt)?;
/// ```
pub struct StateMachine<K, C> {
    states: HashMap<K, Box<dyn State<K, C>>>,
    current: Option<K>,
    previous: Option<K>,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    elapsed: f32,
    entered_this_frame: bool,
    halted: bool,
}

impl<K, C> StateMachine<K, C>
where
    K: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            previous: None,
            elapsed: 0.0,
            entered_this_frame: false,
            halted: false,
        }
    }

    /// Register `state` under its own id. A key may only be registered once.
    pub fn add(&mut self, state: Box<dyn State<K, C>>) -> Result<(), FsmError> {
        let key = state.id();
        if self.states.contains_key(&key) {
            return Err(FsmError::DuplicateStateKey {
                key: format!("{:?}", key),
            });
        }
        self.states.insert(key, state);
        Ok(())
    }

    #[allow(dead_code)]
    pub fn get_state(&self, key: K) -> Option<&dyn State<K, C>> {
        self.states.get(&key).map(|s| s.as_ref())
    }

    pub fn contains(&self, key: K) -> bool {
        self.states.contains_key(&key)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    #[allow(dead_code)]
    pub fn previous(&self) -> Option<K> {
        self.previous
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// `true` from a transition until the next `update` call.
    #[allow(dead_code)]
    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Exit the current state (if any) and enter `key`.
    ///
    /// Transitions requested by `enter` are followed in the same call. An
    /// unregistered key leaves the machine untouched.
    pub fn set_current_state(&mut self, key: K, ctx: &mut C) -> Result<(), FsmError> {
        if self.halted {
            return Err(FsmError::Halted);
        }
        if !self.states.contains_key(&key) {
            log::warn!(target: "fsm", "no state registered for {:?}", key);
            return Err(FsmError::StateNotFound {
                key: format!("{:?}", key),
            });
        }

        let mut next = key;
        for _ in 0..MAX_TRANSITION_CHAIN {
            if let Some(outgoing) = self.current {
                if let Some(state) = self.states.get_mut(&outgoing) {
                    state.exit(ctx);
                }
            }
            self.previous = self.current.replace(next);
            self.elapsed = 0.0;
            self.entered_this_frame = true;
            log::debug!(target: "fsm", "{:?} -> {:?}", self.previous, next);

            let requested = match self.states.get_mut(&next) {
                Some(state) => state.enter(ctx),
                None => Transition::Stay,
            };
            match requested {
                Transition::Stay => return Ok(()),
                Transition::Halt => {
                    self.halted = true;
                    return Ok(());
                }
                Transition::Go(k) => {
                    if !self.states.contains_key(&k) {
                        log::warn!(target: "fsm", "{:?} requested unregistered {:?}", next, k);
                        return Err(FsmError::StateNotFound {
                            key: format!("{:?}", k),
                        });
                    }
                    next = k;
                }
            }
        }

        Err(FsmError::TransitionLoop {
            key: format!("{:?}", next),
        })
    }

    /// Per-frame dispatch. Advances the elapsed timer and clears `just_entered`
    /// before calling into the current state.
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError> {
        if self.halted {
            return Ok(());
        }
        let Some(key) = self.current else {
            return Ok(());
        };
        self.elapsed += dt;
        self.entered_this_frame = false;

        let requested = match self.states.get_mut(&key) {
            Some(state) => state.update(ctx, dt),
            None => Transition::Stay,
        };
        self.apply(requested, ctx)
    }

    /// Per-physics-step dispatch.
    pub fn fixed_update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError> {
        if self.halted {
            return Ok(());
        }
        let Some(key) = self.current else {
            return Ok(());
        };

        let requested = match self.states.get_mut(&key) {
            Some(state) => state.fixed_update(ctx, dt),
            None => Transition::Stay,
        };
        self.apply(requested, ctx)
    }

    fn apply(&mut self, requested: Transition<K>, ctx: &mut C) -> Result<(), FsmError> {
        match requested {
            Transition::Stay => Ok(()),
            Transition::Go(next) => self.set_current_state(next, ctx),
            Transition::Halt => {
                self.halted = true;
                Ok(())
            }
        }
    }
}

impl<K, C> Default for StateMachine<K, C>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
