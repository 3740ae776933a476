use gpui::{Keystroke, SharedString};
use gpui_mini_editor_core::Editor;
use tracing::debug;

use crate::commands::{toggle_code_block, toggle_strong_mark};

/// A key-down as the shortcut table sees it: the produced key and whether
/// Ctrl was held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: SharedString,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<SharedString>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// Shift is folded into the key, so `shift-b` reports `B` and `` shift-` ``
    /// reports `~`.
    pub fn from_keystroke(keystroke: &Keystroke) -> Self {
        let key = if keystroke.modifiers.shift {
            shifted_key(&keystroke.key)
        } else {
            keystroke.key.clone().into()
        };
        Self::new(key, keystroke.modifiers.control)
    }
}

fn shifted_key(key: &str) -> SharedString {
    let mut chars = key.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return key.to_string().into();
    };

    let shifted = match ch {
        'a'..='z' => ch.to_ascii_uppercase(),
        '`' => '~',
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        other => other,
    };
    shifted.to_string().into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleCodeBlock,
    ToggleStrongMark,
}

impl Shortcut {
    /// Ctrl+`` ` `` toggles a code block, Ctrl+`b` toggles strong.
    pub fn for_key(key: &str) -> Option<Self> {
        match key {
            "`" => Some(Shortcut::ToggleCodeBlock),
            "b" => Some(Shortcut::ToggleStrongMark),
            _ => None,
        }
    }

    pub fn run(self, editor: &mut Editor) {
        match self {
            Shortcut::ToggleCodeBlock => toggle_code_block(editor),
            Shortcut::ToggleStrongMark => toggle_strong_mark(editor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Not ours; the host's default handling proceeds.
    PassThrough,
    /// The default is suppressed, and the shortcut, if any, has run.
    Suppressed(Option<Shortcut>),
}

impl KeyDisposition {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, KeyDisposition::Suppressed(_))
    }
}

/// Every Ctrl chord is claimed, including ones with no shortcut behind them.
pub fn dispatch_key_down(editor: &mut Editor, key: &KeyPress) -> KeyDisposition {
    if !key.ctrl {
        return KeyDisposition::PassThrough;
    }

    let shortcut = Shortcut::for_key(&key.key);
    match shortcut {
        Some(shortcut) => {
            debug!(?shortcut, "run shortcut");
            shortcut.run(editor);
        }
        None => debug!(key = %key.key, "absorb ctrl key"),
    }
    KeyDisposition::Suppressed(shortcut)
}
