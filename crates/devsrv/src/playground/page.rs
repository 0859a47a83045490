//! The playground page served on `*.playground` requests.

/// The complete, self-contained playground page: markup, style, and the
/// script that exposes `code`, `preview`, `logs`, `log`, `test` and `sleep`
/// to user scripts.
pub const PLAYGROUND_PAGE: &str = include_str!("../../assets/playground.html");
