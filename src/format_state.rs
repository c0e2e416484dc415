// WHY: Keyboard-driven format selection while typing, expressed as lookup tables
// Pure (format, key) -> format; no knowledge of the text being edited

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::format::FormatKind;

/// Keys that change the format of the current or next line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKey {
    Tab,
    ShiftTab,
    Enter,
    /// Ctrl+digit shortcut
    Shortcut(char),
}

pub struct FormatStateMachine {
    tab_cycle: Vec<FormatKind>,
    enter_successors: HashMap<FormatKind, FormatKind>,
    shortcuts: HashMap<char, FormatKind>,
}

impl Default for FormatStateMachine {
    fn default() -> Self {
        let tab_cycle = vec![
            FormatKind::SceneHeaderFull,
            FormatKind::Character,
            FormatKind::Parenthetical,
            FormatKind::Dialogue,
            FormatKind::Action,
            FormatKind::Transition,
        ];

        let enter_successors = HashMap::from([
            (FormatKind::SceneHeaderFull, FormatKind::Action),
            (FormatKind::SceneHeaderSolo, FormatKind::Action),
            (FormatKind::SceneHeaderAlt, FormatKind::Action),
            (FormatKind::Character, FormatKind::Dialogue),
            (FormatKind::Dialogue, FormatKind::Character),
            (FormatKind::Parenthetical, FormatKind::Dialogue),
            (FormatKind::Action, FormatKind::Action),
            (FormatKind::Transition, FormatKind::SceneHeaderFull),
            (FormatKind::Basmala, FormatKind::SceneHeaderFull),
        ]);

        let shortcuts = HashMap::from([
            ('1', FormatKind::SceneHeaderFull),
            ('2', FormatKind::Character),
            ('3', FormatKind::Dialogue),
            ('4', FormatKind::Action),
            ('6', FormatKind::Transition),
        ]);

        Self {
            tab_cycle,
            enter_successors,
            shortcuts,
        }
    }
}

impl FormatStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_cycle(&self) -> &[FormatKind] {
        &self.tab_cycle
    }

    /// Cycle forward (or backward with Shift) through the cyclable formats.
    /// Scene-header variants cycle from scene-header-full; basmala from action.
    pub fn next_on_tab(&self, current: FormatKind, shift: bool) -> FormatKind {
        let len = self.tab_cycle.len();
        if len == 0 {
            return current;
        }

        let anchor = match current {
            FormatKind::SceneHeaderSolo | FormatKind::SceneHeaderAlt => FormatKind::SceneHeaderFull,
            FormatKind::Basmala => FormatKind::Action,
            other => other,
        };
        let index = self.tab_cycle.iter().position(|&kind| kind == anchor).unwrap_or(0);

        let next = if shift { (index + len - 1) % len } else { (index + 1) % len };
        self.tab_cycle[next]
    }

    /// Default format for the new line opened by Enter
    pub fn next_on_enter(&self, current: FormatKind) -> FormatKind {
        self.enter_successors.get(&current).copied().unwrap_or(FormatKind::Action)
    }

    /// Format selected by a Ctrl+digit shortcut, if the digit is bound
    pub fn shortcut(&self, key: char) -> Option<FormatKind> {
        self.shortcuts.get(&key).copied()
    }

    /// Single entry point for key handling; unbound shortcuts keep the current format
    pub fn next(&self, current: FormatKind, key: FormatKey) -> FormatKind {
        match key {
            FormatKey::Tab => self.next_on_tab(current, false),
            FormatKey::ShiftTab => self.next_on_tab(current, true),
            FormatKey::Enter => self.next_on_enter(current),
            FormatKey::Shortcut(digit) => self.shortcut(digit).unwrap_or(current),
        }
    }
}

static SHARED_MACHINE: OnceLock<FormatStateMachine> = OnceLock::new();

fn shared_machine() -> &'static FormatStateMachine {
    SHARED_MACHINE.get_or_init(FormatStateMachine::default)
}

pub fn next_format_on_tab(current: FormatKind, shift_held: bool) -> FormatKind {
    shared_machine().next_on_tab(current, shift_held)
}

pub fn next_format_on_enter(current: FormatKind) -> FormatKind {
    shared_machine().next_on_enter(current)
}

pub fn format_for_shortcut(key: char) -> Option<FormatKind> {
    shared_machine().shortcut(key)
}
