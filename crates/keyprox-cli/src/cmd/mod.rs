pub mod export;
pub mod inspect;
pub mod query;

/// Parses a key code given as a single character (`a`) or a number (`-11`).
pub fn parse_code(s: &str) -> Result<i32, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as i32),
        _ => s
            .parse::<i32>()
            .map_err(|_| format!("'{}' is neither a single character nor a code", s)),
    }
}
