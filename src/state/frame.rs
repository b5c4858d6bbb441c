//! Frame collaborators.
//!
//! Timing handed to `update` and the render surface handed to `draw`.
//! The real clock and rendering backend live in the host; these types are
//! the narrow surface the state layer sees.

use std::time::Duration;

/// Frame timing passed to every `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameTime {
    /// Time since the previous frame
    pub elapsed: Duration,

    /// Time since the loop started
    pub total: Duration,

    /// Number of frames advanced so far
    pub frame: u64,
}

impl GameTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = delta;
        self.total += delta;
        self.frame += 1;
    }

    /// Frame delta in seconds.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Drawing target handed to `draw`.
pub trait RenderSurface {
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { rect: Rect, color: Color },
    Text { text: String, x: f32, y: f32, color: Color },
}

/// Surface that records draw calls instead of rasterizing them.
///
/// Used by headless hosts, and by tests to assert what a frame drew.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the buffer empty for the next frame.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderSurface for CommandBuffer {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time_advance() {
        let mut time = GameTime::new();
        time.advance(Duration::from_millis(16));
        time.advance(Duration::from_millis(20));

        assert_eq!(time.frame, 2);
        assert_eq!(time.elapsed, Duration::from_millis(20));
        assert_eq!(time.total, Duration::from_millis(36));
        assert!((time.elapsed_secs() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_command_buffer_records() {
        let mut buffer = CommandBuffer::new();
        buffer.clear(Color::BLACK);
        buffer.draw_text("Paused", 10.0, 20.0, Color::WHITE);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.commands()[0], DrawCommand::Clear(Color::BLACK));

        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert!(buffer.is_empty());
    }
}
