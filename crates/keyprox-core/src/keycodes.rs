use crate::consts::CODE_SPACE;
use crate::geometry::KeyNode;
use strum_macros::{Display, EnumIter, FromRepr};

/// Non-character key codes. Anything at or below zero is a command, never a
/// proximity character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[strum(serialize_all = "camelCase")]
#[repr(i32)]
pub enum CommandCode {
    #[strum(serialize = "unspec")]
    Unspecified = 0,
    Ctrl = -1,
    CtrlLock = -2,
    Alt = -3,
    AltLock = -4,
    Delete = -7,
    DeleteWord = -8,
    ForwardDelete = -9,
    ForwardDeleteWord = -10,
    Shift = -11,
    CapsLock = -13,
    ArrowLeft = -21,
    ArrowRight = -22,
    ArrowUp = -23,
    ArrowDown = -24,
    ClipboardCopy = -31,
    ClipboardCut = -32,
    ClipboardPaste = -33,
    Undo = -131,
    Redo = -132,
    Alpha = -201,
    Symbol = -202,
    Numpad = -205,
    Emoji = -212,
    Clipboard = -213,
    LanguageSwitch = -227,
    #[strum(serialize = "shortcut")]
    VoiceInput = -233,
    Settings = -301,
}

impl CommandCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A code the decoder may suggest from: strictly above space.
#[inline(always)]
pub fn is_real_character(code: i32) -> bool {
    code > CODE_SPACE
}

/// Whether `key` is flattened into the decoder arrays. Spacers and command
/// keys are skipped; the space key itself is kept.
#[inline(always)]
pub fn needs_proximity_info(key: &KeyNode) -> bool {
    !key.is_spacer && key.code >= CODE_SPACE
}

/// Human-readable code for logs.
pub fn printable_code(code: i32) -> String {
    match code {
        c if c == CODE_SPACE => "space".to_string(),
        9 => "tab".to_string(),
        10 => "enter".to_string(),
        c if c <= 0 => match CommandCode::from_repr(c) {
            Some(cmd) => cmd.to_string(),
            None => format!("[#{}]", c),
        },
        c => match u32::try_from(c).ok().and_then(char::from_u32) {
            Some(ch) if !ch.is_control() => ch.to_string(),
            _ => format!("U+{:04X}", c),
        },
    }
}
