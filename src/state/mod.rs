//! Game state management.
//!
//! - `base` - The `State` trait and the flag block states embed
//! - `manager` - Ordered state collection and frame dispatch
//! - `frame` - Frame timing and the render surface
//! - `content` - Asset loading service
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ host frame loop                                               │
//! │   initialize() ─▶ load_content() ─▶ { update() ─▶ draw() }*  │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ StateManager                                                  │
//! │                                                               │
//! │   [ menu ]──[ game ]──[ pause ]      insertion order          │
//! │      │          │         │                                   │
//! │   active?  ─▶ update(GameTime)                                │
//! │   visible? ─▶ draw(RenderSurface)                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! States are shared through [`StateHandle`]s. The caller keeps its own
//! handle to a state and the manager holds another for dispatch; the state
//! only records its manager's [`ManagerId`].

use std::cell::RefCell;
use std::rc::Rc;

pub mod base;
pub mod content;
pub mod frame;
pub mod manager;

// Re-export commonly used types
pub use base::{BaseState, State, DEFAULT_VISIBLE};
pub use content::{Asset, ContentError, ContentManager, MemoryContent};
pub use frame::{Color, CommandBuffer, DrawCommand, GameTime, Rect, RenderSurface};
pub use manager::{ManagerId, StateError, StateManager, StateSnapshot};

/// Shared handle to a state.
pub type StateHandle = Rc<RefCell<dyn State>>;

/// Wrap a state into a [`StateHandle`].
pub fn share<S: State + 'static>(state: S) -> StateHandle {
    Rc::new(RefCell::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Splash {
        base: BaseState,
        frames: u64,
    }

    impl State for Splash {
        fn base(&self) -> &BaseState {
            &self.base
        }

        fn base_mut(&mut self) -> &mut BaseState {
            &mut self.base
        }

        fn update(&mut self, time: &GameTime) -> Result<(), StateError> {
            self.frames = time.frame;
            Ok(())
        }

        fn draw(&mut self, surface: &mut dyn RenderSurface) -> Result<(), StateError> {
            surface.clear(Color::BLACK);
            Ok(())
        }
    }

    #[test]
    fn test_frame_loop() {
        let splash = Rc::new(RefCell::new(Splash {
            base: BaseState::new("splash"),
            frames: 0,
        }));
        let mut manager = StateManager::new();
        let mut content = MemoryContent::new();
        let mut surface = CommandBuffer::new();
        let mut time = GameTime::new();

        manager
            .add(splash.clone(), true, false, &mut content)
            .unwrap();
        manager.initialize().unwrap();
        manager.load_content(&mut content).unwrap();

        for _ in 0..3 {
            time.advance(std::time::Duration::from_millis(16));
            manager.update(&time).unwrap();
            manager.draw(&mut surface).unwrap();
        }

        assert_eq!(splash.borrow().frames, 3);
        assert_eq!(surface.drain(), vec![DrawCommand::Clear(Color::BLACK); 3]);
        assert!(splash.borrow().is_initialized());
    }
}
