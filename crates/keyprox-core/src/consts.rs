/// Code of the space key. Codes above it are real characters.
pub const CODE_SPACE: i32 = ' ' as i32;

/// Sentinel for an unused slot in any code array handed to the decoder.
pub const NOT_A_CODE: i32 = -1;

/// Sentinel coordinate for a code with no key on the keyboard.
pub const NOT_A_COORDINATE: i32 = -1;

/// Revision of the flattened layout shared with the native decoder.
pub const CONTRACT_VERSION: u32 = 1;

/// Largest pixel magnitude a key edge, or a key edge pushed out by the search
/// threshold, may have. Keeps grid arithmetic inside `i32`.
pub const MAX_COORDINATE: i32 = 1 << 24;
