//! Game States Library
//!
//! This crate manages the screens of a game (menu, gameplay, pause, ...)
//! inside a host frame loop.
//!
//! # Overview
//!
//! - **States** - Game modes implementing the [`State`] trait, each with
//!   independent `active` (receives `update`) and `visible` (receives `draw`)
//!   flags.
//!
//! - **State Manager** - An ordered collection of states. Fans lifecycle
//!   and per-frame calls out in insertion order and handles activation,
//!   switching and lookup.
//!
//! - **Frame Collaborators** - [`GameTime`], [`RenderSurface`] and
//!   [`ContentManager`], the narrow surface the host provides.
//!
//! # Design Principles
//!
//! 1. **Lifecycle runs once** - `initialize` and `load_content` reach each
//!    state exactly once, content first for states added late.
//!
//! 2. **Flags, not transitions** - Activation is a boolean per state. Any
//!    combination of `active` and `visible` is legal.
//!
//! 3. **No rendering, no I/O** - The host owns the clock, the renderer and
//!    the asset store.
//!
//! 4. **Single-threaded** - Handles are `Rc<RefCell<_>>`; the manager is
//!    driven from one frame loop.
//!
//! # Example
//!
//! ```rust
//! use game_states::{
//!     share, BaseState, CommandBuffer, GameTime, MemoryContent, RenderSurface, State,
//!     StateError, StateManager,
//! };
//!
//! struct Menu {
//!     base: BaseState,
//! }
//!
//! impl State for Menu {
//!     fn base(&self) -> &BaseState {
//!         &self.base
//!     }
//!
//!     fn base_mut(&mut self) -> &mut BaseState {
//!         &mut self.base
//!     }
//!
//!     fn update(&mut self, _time: &GameTime) -> Result<(), StateError> {
//!         Ok(())
//!     }
//!
//!     fn draw(&mut self, surface: &mut dyn RenderSurface) -> Result<(), StateError> {
//!         surface.draw_text("Press start", 10.0, 10.0, game_states::Color::WHITE);
//!         Ok(())
//!     }
//! }
//!
//! let mut content = MemoryContent::new();
//! let mut manager = StateManager::new();
//!
//! let menu = share(Menu { base: BaseState::new("menu") });
//! manager.add(menu, true, false, &mut content).unwrap();
//!
//! manager.initialize().unwrap();
//! manager.load_content(&mut content).unwrap();
//!
//! let mut surface = CommandBuffer::new();
//! manager.update(&GameTime::new()).unwrap();
//! manager.draw(&mut surface).unwrap();
//! assert_eq!(surface.len(), 1);
//!
//! manager.set_state_active("menu", true);
//! assert_eq!(manager.active_names(), vec!["menu".to_string()]);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
