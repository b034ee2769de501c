use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::grid::Direction;
use crate::session::GameMode;

/// High-level input events consumed by the frame loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Steer { player: usize, direction: Direction },
    Hop { player: usize },
    Pause,
    SelectMode(GameMode),
    Confirm,
    Quit,
}

/// Maps one key press to a game input.
///
/// Player one steers with the arrow keys and hops with `J`; player two
/// uses `WASD` and `K`. The arena hands both sets to a lone human.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let steer = |player, direction| Some(GameInput::Steer { player, direction });
    match key.code {
        KeyCode::Up => steer(0, Direction::Up),
        KeyCode::Down => steer(0, Direction::Down),
        KeyCode::Left => steer(0, Direction::Left),
        KeyCode::Right => steer(0, Direction::Right),
        KeyCode::Enter => Some(GameInput::Confirm),
        KeyCode::Esc => Some(GameInput::Pause),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => steer(1, Direction::Up),
            's' => steer(1, Direction::Down),
            'a' => steer(1, Direction::Left),
            'd' => steer(1, Direction::Right),
            'j' => Some(GameInput::Hop { player: 0 }),
            'k' => Some(GameInput::Hop { player: 1 }),
            'p' | ' ' => Some(GameInput::Pause),
            'q' => Some(GameInput::Quit),
            digit @ '1'..='5' => {
                let index = digit as usize - '1' as usize;
                GameMode::ALL.get(index).copied().map(GameInput::SelectMode)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Non-blocking keyboard reader.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event and maps it.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}
