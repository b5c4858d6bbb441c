//! State manager.
//!
//! Holds the ordered state collection and fans the host's lifecycle and
//! per-frame calls out to it. Insertion order is update and draw order.
//!
//! The collection must not be mutated while a frame is being dispatched.
//! States cannot reach the manager from inside a hook, and re-borrowing a
//! handle that is currently being dispatched panics.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;

use super::base::State;
use super::content::{ContentError, ContentManager};
use super::frame::{GameTime, RenderSurface};
use super::StateHandle;

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a manager, stored by its states as a back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ManagerId(u64);

impl ManagerId {
    fn next() -> Self {
        Self(NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "manager-{}", self.0)
    }
}

/// State errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Positional access past the end of the collection
    IndexOutOfRange { index: usize, len: usize },

    /// Asset loading failed
    Content(ContentError),

    /// A state's own hook failed
    Hook { state: String, reason: String },
}

impl StateError {
    pub fn hook(state: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Hook {
            state: state.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "State index {} out of range for {} states", index, len)
            }
            Self::Content(err) => write!(f, "Content error: {}", err),
            Self::Hook { state, reason } => write!(f, "State {} failed: {}", state, reason),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Content(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContentError> for StateError {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

/// Debug view of one managed state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub index: usize,
    pub name: String,
    pub active: bool,
    pub visible: bool,
    pub initialized: bool,
    pub asset_loaded: bool,
    pub added_at: DateTime<Utc>,
}

struct Entry {
    state: StateHandle,

    /// When the manager took the state
    added_at: DateTime<Utc>,
}

impl Entry {
    fn new(state: StateHandle) -> Self {
        Self {
            state,
            added_at: Utc::now(),
        }
    }

    fn name_is(&self, name: &str) -> bool {
        self.state.borrow().name() == name
    }
}

/// Ordered collection of game states driven by the host frame loop.
pub struct StateManager {
    id: ManagerId,
    entries: Vec<Entry>,
    initialized: bool,
    asset_loaded: bool,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .entries
            .iter()
            .map(|e| e.state.borrow().name().to_string())
            .collect();
        f.debug_struct("StateManager")
            .field("id", &self.id)
            .field("states", &names)
            .field("initialized", &self.initialized)
            .field("asset_loaded", &self.asset_loaded)
            .finish()
    }
}

impl StateManager {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: ManagerId::next(),
            entries: Vec::with_capacity(capacity),
            initialized: false,
            asset_loaded: false,
        }
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_asset_loaded(&self) -> bool {
        self.asset_loaded
    }

    /// Initialize every held state, once.
    ///
    /// A failing state aborts the pass. The manager stays uninitialized so
    /// the call can be retried; states that already succeeded are skipped.
    pub fn initialize(&mut self) -> Result<(), StateError> {
        if self.initialized {
            return Ok(());
        }

        debug!("{}: initializing {} states", self.id, self.entries.len());
        for entry in &self.entries {
            let mut state = entry.state.borrow_mut();
            if !state.is_initialized() {
                initialize_state(&mut *state)?;
            }
        }

        self.initialized = true;
        Ok(())
    }

    /// Load content for every held state, once.
    pub fn load_content(&mut self, content: &mut dyn ContentManager) -> Result<(), StateError> {
        if self.asset_loaded {
            return Ok(());
        }

        debug!("{}: loading content for {} states", self.id, self.entries.len());
        for entry in &self.entries {
            let mut state = entry.state.borrow_mut();
            if !state.is_asset_loaded() {
                load_state_content(&mut *state, content)?;
            }
        }

        self.asset_loaded = true;
        Ok(())
    }

    /// Update every active state in insertion order.
    pub fn update(&mut self, time: &GameTime) -> Result<(), StateError> {
        for entry in &self.entries {
            let mut state = entry.state.borrow_mut();
            if state.is_active() {
                state.update(time)?;
            }
        }
        Ok(())
    }

    /// Draw every visible state in insertion order.
    pub fn draw(&mut self, surface: &mut dyn RenderSurface) -> Result<(), StateError> {
        for entry in &self.entries {
            let mut state = entry.state.borrow_mut();
            if state.is_visible() {
                state.draw(surface)?;
            }
        }
        Ok(())
    }

    /// Activate every state named `name`, optionally deactivating the rest.
    ///
    /// Returns how many states matched.
    pub fn set_state_active(&mut self, name: &str, deactivate_others: bool) -> usize {
        let mut matched = 0;
        for entry in &self.entries {
            let mut state = entry.state.borrow_mut();
            if state.name() == name {
                state.set_active(true);
                matched += 1;
            } else if deactivate_others {
                state.set_active(false);
            }
        }
        matched
    }

    /// Activate the state at `index`, optionally deactivating the rest first.
    pub fn set_state_active_at(
        &mut self,
        index: usize,
        deactivate_others: bool,
    ) -> Result<(), StateError> {
        self.check_index(index)?;

        if deactivate_others {
            self.disable_states();
        }
        self.entries[index].state.borrow_mut().set_active(true);
        Ok(())
    }

    /// Deactivate every state. Visibility is untouched.
    pub fn disable_states(&mut self) {
        for entry in &self.entries {
            entry.state.borrow_mut().set_active(false);
        }
    }

    /// Replace the whole collection with a single state.
    ///
    /// No lifecycle hooks run on either side. The discarded states are
    /// returned for the caller to clean up.
    pub fn switch_state(&mut self, state: StateHandle) -> Vec<StateHandle> {
        let discarded: Vec<StateHandle> = self
            .entries
            .drain(..)
            .map(|e| e.state)
            .filter(|old| !Rc::ptr_eq(old, &state))
            .collect();
        for old in &discarded {
            old.borrow_mut().base_mut().detach(self.id);
        }

        debug!(
            "{}: switched to {} ({} discarded)",
            self.id,
            state.borrow().name(),
            discarded.len()
        );
        state.borrow_mut().base_mut().attach(self.id);
        self.entries.push(Entry::new(state));
        discarded
    }

    /// Add a state at the end of the collection.
    ///
    /// When the manager is already initialized the state loads its content
    /// and then initializes before it is appended. If either hook fails the
    /// state is not added.
    pub fn add(
        &mut self,
        state: StateHandle,
        is_active: bool,
        deactivate_others: bool,
        content: &mut dyn ContentManager,
    ) -> Result<(), StateError> {
        if deactivate_others {
            self.disable_states();
        }

        {
            let mut inner = state.borrow_mut();
            let previous = inner.manager();
            inner.base_mut().attach(self.id);
            inner.set_active(is_active);

            if self.initialized {
                if let Err(err) = prepare_late_state(&mut *inner, content) {
                    inner.base_mut().restore_manager(previous);
                    return Err(err);
                }
            }

            debug!(
                "{}: added {} at {} (active: {})",
                self.id,
                inner.name(),
                self.entries.len(),
                is_active
            );
        }

        self.entries.push(Entry::new(state));
        Ok(())
    }

    /// Remove the first entry that is `state` itself.
    pub fn remove(&mut self, state: &StateHandle) -> Option<StateHandle> {
        let index = self
            .entries
            .iter()
            .position(|e| Rc::ptr_eq(&e.state, state))?;
        Some(self.remove_index(index))
    }

    /// Remove the first state named `name`. No match is a no-op.
    pub fn remove_by_name(&mut self, name: &str) -> Option<StateHandle> {
        let index = self.position(name)?;
        Some(self.remove_index(index))
    }

    /// First state named `name`.
    pub fn get(&self, name: &str) -> Option<StateHandle> {
        self.entries
            .iter()
            .find(|e| e.name_is(name))
            .map(|e| Rc::clone(&e.state))
    }

    /// State at `index`.
    pub fn get_at(&self, index: usize) -> Result<StateHandle, StateError> {
        self.check_index(index)?;
        Ok(Rc::clone(&self.entries[index].state))
    }

    /// Index of the first state named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name_is(name))
    }

    /// Check whether `state` itself is held.
    pub fn contains(&self, state: &StateHandle) -> bool {
        self.entries.iter().any(|e| Rc::ptr_eq(&e.state, state))
    }

    /// Handles in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &StateHandle> {
        self.entries.iter().map(|e| &e.state)
    }

    /// Names of the active states, in order.
    pub fn active_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| {
                let state = e.state.borrow();
                if state.is_active() {
                    Some(state.name().to_string())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Per-state debug view.
    pub fn snapshot(&self) -> Vec<StateSnapshot> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| {
                let state = e.state.borrow();
                StateSnapshot {
                    index,
                    name: state.name().to_string(),
                    active: state.is_active(),
                    visible: state.is_visible(),
                    initialized: state.is_initialized(),
                    asset_loaded: state.is_asset_loaded(),
                    added_at: e.added_at,
                }
            })
            .collect()
    }

    /// Convert to JSON for debug overlays and logs.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "manager_id": self.id.get(),
            "initialized": self.initialized,
            "asset_loaded": self.asset_loaded,
            "states": self.snapshot()
        })
    }

    fn check_index(&self, index: usize) -> Result<(), StateError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(StateError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    fn remove_index(&mut self, index: usize) -> StateHandle {
        let entry = self.entries.remove(index);
        if !self.contains(&entry.state) {
            entry.state.borrow_mut().base_mut().detach(self.id);
        }
        debug!("{}: removed {}", self.id, entry.state.borrow().name());
        entry.state
    }
}

fn initialize_state(state: &mut dyn State) -> Result<(), StateError> {
    if let Err(err) = state.initialize() {
        warn!("state {} failed to initialize: {}", state.name(), err);
        return Err(err);
    }
    state.base_mut().mark_initialized();
    Ok(())
}

fn load_state_content(
    state: &mut dyn State,
    content: &mut dyn ContentManager,
) -> Result<(), StateError> {
    if let Err(err) = state.load_content(content) {
        warn!("state {} failed to load content: {}", state.name(), err);
        return Err(err);
    }
    state.base_mut().mark_asset_loaded();
    Ok(())
}

/// Content first, then initialization.
fn prepare_late_state(
    state: &mut dyn State,
    content: &mut dyn ContentManager,
) -> Result<(), StateError> {
    if !state.is_asset_loaded() {
        load_state_content(state, content)?;
    }
    if !state.is_initialized() {
        initialize_state(state)?;
    }
    Ok(())
}
