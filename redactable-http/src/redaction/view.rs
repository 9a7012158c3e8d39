//! The paired redacted/original view.

use std::fmt;

/// A redacted projection kept next to the original it was derived from.
///
/// `value` is what logs and messages show. `unredacted` is a copy of the input
/// taken before any policy ran; it is never computed from `value`. Every
/// formatting and logging path (`Debug`, `Display`, `ToRedactedOutput`) uses
/// `value` only. Reaching the original requires calling
/// [`Redacted::unredacted`] or [`Redacted::into_unredacted`].
#[derive(Clone, PartialEq, Eq)]
pub struct Redacted<T> {
    value: T,
    unredacted: T,
}

impl<T> Redacted<T> {
    pub(crate) fn new(value: T, unredacted: T) -> Self {
        Self { value, unredacted }
    }

    /// The redacted projection; safe to log.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The original input. Use with care.
    pub fn unredacted(&self) -> &T {
        &self.unredacted
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Consumes the view and returns the original input. Use with care.
    pub fn into_unredacted(self) -> T {
        self.unredacted
    }
}

impl<T: fmt::Debug> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Redacted").field(&self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_shows_original() {
        let view = Redacted::new("<REDACTED>".to_owned(), "hunter2".to_owned());
        let debug = format!("{view:?}");
        assert_eq!(debug, r#"Redacted("<REDACTED>")"#);
        assert_eq!(view.unredacted(), "hunter2");
        assert_eq!(view.into_unredacted(), "hunter2");
    }
}
