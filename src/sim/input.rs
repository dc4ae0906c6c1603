//! Polled input
//!
//! The platform layer records raw presses and button clicks as they arrive;
//! the simulation samples them exactly once per tick.

use serde::{Deserialize, Serialize};

/// Edge and level state of the single "activate" trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    /// Went down since the previous tick
    pub pressed: bool,
    /// Currently down
    pub held: bool,
    /// Went up since the previous tick
    pub released: bool,
}

/// One-shot requests from the external button widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Main menu "play"
    Play,
    /// End panel "play again"
    Replay,
    /// End panel "menu"
    BackToMenu,
    NextSkin,
    PreviousSkin,
}

impl Command {
    /// Parse a widget's button name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "play" => Some(Command::Play),
            "replay" => Some(Command::Replay),
            "menu" => Some(Command::BackToMenu),
            "next" => Some(Command::NextSkin),
            "previous" => Some(Command::PreviousSkin),
            _ => None,
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Pointer press or space bar
    pub activate: ButtonState,
    pub commands: Vec<Command>,
}

impl TickInput {
    /// Input with a fresh activate press and nothing else
    pub fn press() -> Self {
        Self {
            activate: ButtonState {
                pressed: true,
                held: true,
                released: false,
            },
            commands: Vec::new(),
        }
    }

    pub fn command(command: Command) -> Self {
        Self {
            commands: vec![command],
            ..Default::default()
        }
    }
}

/// Collects platform events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputPoll {
    down: bool,
    pressed: bool,
    released: bool,
    commands: Vec<Command>,
}

impl InputPoll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger went down; auto-repeat while already down is ignored
    pub fn press(&mut self) {
        if !self.down {
            self.pressed = true;
        }
        self.down = true;
    }

    pub fn release(&mut self) {
        if self.down {
            self.released = true;
        }
        self.down = false;
    }

    pub fn command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Sample and clear the edges
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            activate: ButtonState {
                pressed: self.pressed,
                held: self.down,
                released: self.released,
            },
            commands: std::mem::take(&mut self.commands),
        };
        self.pressed = false;
        self.released = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_cleared_after_take() {
        let mut poll = InputPoll::new();
        poll.press();
        let first = poll.take();
        assert!(first.activate.pressed);
        assert!(first.activate.held);

        let second = poll.take();
        assert!(!second.activate.pressed);
        assert!(second.activate.held);

        poll.release();
        let third = poll.take();
        assert!(third.activate.released);
        assert!(!third.activate.held);
    }

    #[test]
    fn test_key_repeat_is_not_a_new_press() {
        let mut poll = InputPoll::new();
        poll.press();
        poll.take();
        poll.press();
        assert!(!poll.take().activate.pressed);
    }

    #[test]
    fn test_tap_within_one_tick_still_registers() {
        let mut poll = InputPoll::new();
        poll.press();
        poll.release();
        let input = poll.take();
        assert!(input.activate.pressed);
        assert!(input.activate.released);
        assert!(!input.activate.held);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::from_name("menu"), Some(Command::BackToMenu));
        assert_eq!(Command::from_name("Play"), None);
    }

    #[test]
    fn test_commands_drained_in_order() {
        let mut poll = InputPoll::new();
        poll.command(Command::NextSkin);
        poll.command(Command::Play);
        assert_eq!(poll.take().commands, vec![Command::NextSkin, Command::Play]);
        assert!(poll.take().commands.is_empty());
    }
}
