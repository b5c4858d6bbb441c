//! The state contract.
//!
//! Concrete states embed a [`BaseState`] flag block and implement [`State`]
//! over it. Flags are independent toggles:
//!
//! ```text
//!             active          visible
//!           ┌────────┐      ┌────────┐
//!  update ◀─┤ on/off │      │ on/off ├─▶ draw
//!           └────────┘      └────────┘
//! ```
//!
//! Any combination is legal. A paused gameplay screen, for instance, stays
//! visible behind the pause menu while inactive.

use super::content::ContentManager;
use super::frame::{GameTime, RenderSurface};
use super::manager::{ManagerId, StateError};

/// States are drawn unless hidden explicitly.
pub const DEFAULT_VISIBLE: bool = true;

/// Flags and identity shared by every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseState {
    name: String,
    active: bool,
    visible: bool,
    initialized: bool,
    asset_loaded: bool,

    /// Owning manager, set on insertion
    manager: Option<ManagerId>,
}

impl BaseState {
    /// Create an inactive, visible, unloaded state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
            visible: DEFAULT_VISIBLE,
            initialized: false,
            asset_loaded: false,
            manager: None,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_asset_loaded(&self) -> bool {
        self.asset_loaded
    }

    pub fn manager(&self) -> Option<ManagerId> {
        self.manager
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub(crate) fn mark_asset_loaded(&mut self) {
        self.asset_loaded = true;
    }

    pub(crate) fn attach(&mut self, manager: ManagerId) {
        self.manager = Some(manager);
    }

    /// Clear the back-reference if it still points at `manager`.
    pub(crate) fn detach(&mut self, manager: ManagerId) {
        if self.manager == Some(manager) {
            self.manager = None;
        }
    }

    pub(crate) fn restore_manager(&mut self, previous: Option<ManagerId>) {
        self.manager = previous;
    }
}

/// A game mode or screen driven by a [`StateManager`](super::StateManager).
///
/// Only `update` and `draw` are required. The lifecycle hooks default to
/// doing nothing, and the flag accessors forward to [`BaseState`].
pub trait State {
    fn base(&self) -> &BaseState;

    fn base_mut(&mut self) -> &mut BaseState;

    /// One-time setup. Runs after `load_content` when the state joins an
    /// already initialized manager.
    fn initialize(&mut self) -> Result<(), StateError> {
        Ok(())
    }

    /// Acquire assets.
    fn load_content(&mut self, _content: &mut dyn ContentManager) -> Result<(), StateError> {
        Ok(())
    }

    /// Advance one frame. Only called while active.
    fn update(&mut self, time: &GameTime) -> Result<(), StateError>;

    /// Render one frame. Only called while visible.
    fn draw(&mut self, surface: &mut dyn RenderSurface) -> Result<(), StateError>;

    fn name(&self) -> &str {
        self.base().name()
    }

    fn is_active(&self) -> bool {
        self.base().is_active()
    }

    fn set_active(&mut self, active: bool) {
        self.base_mut().set_active(active);
    }

    fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().set_visible(visible);
    }

    fn is_initialized(&self) -> bool {
        self.base().is_initialized()
    }

    fn is_asset_loaded(&self) -> bool {
        self.base().is_asset_loaded()
    }

    fn manager(&self) -> Option<ManagerId> {
        self.base().manager()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle {
        base: BaseState,
    }

    impl State for Idle {
        fn base(&self) -> &BaseState {
            &self.base
        }

        fn base_mut(&mut self) -> &mut BaseState {
            &mut self.base
        }

        fn update(&mut self, _time: &GameTime) -> Result<(), StateError> {
            Ok(())
        }

        fn draw(&mut self, _surface: &mut dyn RenderSurface) -> Result<(), StateError> {
            Ok(())
        }
    }

    #[test]
    fn test_base_state_defaults() {
        let base = BaseState::new("menu");
        assert_eq!(base.name(), "menu");
        assert!(!base.is_active());
        assert!(base.is_visible());
        assert!(!base.is_initialized());
        assert!(!base.is_asset_loaded());
        assert!(base.manager().is_none());
    }

    #[test]
    fn test_flags_are_independent() {
        let mut state = Idle {
            base: BaseState::new("pause").with_visible(false),
        };

        state.set_active(true);
        assert!(state.is_active());
        assert!(!state.is_visible());

        state.set_visible(true);
        state.set_active(false);
        assert!(!state.is_active());
        assert!(state.is_visible());
    }
}
