// Copyright (c) 2026 rezky_nightky

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptAction {
    None,
    Submit(String),
    ToggleHelp,
    Quit,
}

/// In-progress command line typed at the bottom of the screen.
#[derive(Clone, Debug, Default)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        if key.kind != KeyEventKind::Press {
            return PromptAction::None;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => PromptAction::Quit,
            (KeyCode::Enter, _) => PromptAction::Submit(std::mem::take(&mut self.text)),
            (KeyCode::Backspace, _) | (KeyCode::Delete, _) => {
                self.text.pop();
                PromptAction::None
            }
            (KeyCode::Esc, _) => PromptAction::ToggleHelp,
            (KeyCode::Char(c), m)
                if (' '..='~').contains(&c) && !m.contains(KeyModifiers::CONTROL) =>
            {
                self.text.push(c);
                PromptAction::None
            }
            _ => PromptAction::None,
        }
    }
}
