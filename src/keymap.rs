//! Keyboard shortcut resolution
//!
//! Resolution is separate from execution: the frontend turns its raw key
//! event into a [`KeyChord`], this module maps it to an [`EditorAction`],
//! and the session executes the action. Unrecognized chords resolve to
//! `None` and are simply ignored.

use crate::format::Format;

/// A modifier+key combination as reported by the frontend.
///
/// `command` is the platform's primary modifier (Ctrl, or Cmd on macOS).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyChord {
    pub command: bool,
    pub shift: bool,
    pub key: char,
}

impl KeyChord {
    pub fn command(key: char) -> Self {
        Self {
            command: true,
            shift: false,
            key,
        }
    }
}

/// An executable editor command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    Format(Format),
    Undo,
    Redo,
    Save,
}

/// Map a chord to its action.
///
/// All bindings require the command modifier. `shift+z` is deliberately
/// unbound (reserved by convention for redo variants this editor does not
/// implement); letters match case-insensitively.
pub fn resolve(chord: KeyChord) -> Option<EditorAction> {
    if !chord.command {
        return None;
    }
    match chord.key.to_ascii_lowercase() {
        'b' => Some(EditorAction::Format(Format::Bold)),
        'i' => Some(EditorAction::Format(Format::Italic)),
        'u' => Some(EditorAction::Format(Format::Underline)),
        'z' if !chord.shift => Some(EditorAction::Undo),
        'y' => Some(EditorAction::Redo),
        's' => Some(EditorAction::Save),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_shortcuts() {
        assert_eq!(
            resolve(KeyChord::command('b')),
            Some(EditorAction::Format(Format::Bold))
        );
        assert_eq!(
            resolve(KeyChord::command('i')),
            Some(EditorAction::Format(Format::Italic))
        );
        assert_eq!(
            resolve(KeyChord::command('u')),
            Some(EditorAction::Format(Format::Underline))
        );
    }

    #[test]
    fn test_history_and_save_shortcuts() {
        assert_eq!(resolve(KeyChord::command('z')), Some(EditorAction::Undo));
        assert_eq!(resolve(KeyChord::command('y')), Some(EditorAction::Redo));
        assert_eq!(resolve(KeyChord::command('s')), Some(EditorAction::Save));
    }

    #[test]
    fn test_uppercase_letters_match() {
        assert_eq!(
            resolve(KeyChord::command('B')),
            Some(EditorAction::Format(Format::Bold))
        );
    }

    #[test]
    fn test_shift_z_is_unbound() {
        let chord = KeyChord {
            command: true,
            shift: true,
            key: 'z',
        };
        assert_eq!(resolve(chord), None);
    }

    #[test]
    fn test_unmodified_and_unknown_keys_ignored() {
        let plain = KeyChord {
            command: false,
            shift: false,
            key: 'b',
        };
        assert_eq!(resolve(plain), None);
        assert_eq!(resolve(KeyChord::command('q')), None);
    }
}
