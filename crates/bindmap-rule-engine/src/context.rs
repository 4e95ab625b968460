//! Scoped find context
//!
//! A mapping procedure opens a context naming the header modules its rules
//! apply to. The context is cleared when the guard drops, so it cannot leak
//! into the next procedure even when the current one returns early.

use crate::session::MappingSession;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Guard returned by [`MappingSession::find_context`]
///
/// Derefs to the session, so rules are registered through it directly.
pub struct ContextScope<'s> {
    session: &'s mut MappingSession,
}

impl<'s> ContextScope<'s> {
    pub(crate) fn enter(session: &'s mut MappingSession) -> Self {
        Self { session }
    }

    /// Add another header module to the active context
    pub fn add(&mut self, module: impl Into<String>) {
        self.session.context.insert(module);
    }

    /// Empty the context; subsequent rules see every module
    pub fn clear(&mut self) {
        self.session.context.clear();
    }
}

impl Deref for ContextScope<'_> {
    type Target = MappingSession;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl DerefMut for ContextScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        trace!("clearing find context");
        self.session.context.clear();
    }
}
