//! Checking context: the current lexical scope plus the two pieces of
//! "where am I" state the rules need — how deep inside loops the walk is and
//! which return type the enclosing function declared.

use super::{scope::Scope, types::Type};

#[derive(Debug, Clone)]
pub struct Context {
    pub scope: Scope,
    /// Number of `while` bodies currently open; `break`/`continue` need this
    /// to be non-zero.
    pub loop_depth: usize,
    /// Declared return type of the enclosing function, if the walk is inside
    /// one. `return` statements check against this.
    pub function_return: Option<Type>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            scope: Scope::new(),
            loop_depth: 0,
            function_return: None,
        }
    }
}
