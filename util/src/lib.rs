pub mod repl;

use anyhow::anyhow;

/// Turns errors that cannot cross threads (anything holding an `Rc`) into `anyhow::Error` by
/// rendering them.
pub trait ResultExt<T> {
    fn staticalize(self) -> anyhow::Result<T>;
}
impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn staticalize(self) -> anyhow::Result<T> {
        self.map_err(|e| anyhow!("{e}"))
    }
}
