use std::{fmt::Debug, ops::Deref, sync::OnceLock};

use thiserror::Error;

/// A field slot filled by the post-processing pipeline
///
/// Components declare their field-injected dependencies and externally
/// configured values as `Late<T>`: the slot starts empty, the pipeline fills
/// it exactly once, and it is read-only afterwards.
///
/// ### Panics
///
/// Accessing the slot before the container finished booting panics. During
/// normal operation this cannot happen: the pipeline runs before any bean is
/// handed out.
pub struct Late<T>(OnceLock<T>);

impl<T> Late<T> {
    pub const fn unset() -> Self {
        Late(OnceLock::new())
    }

    /// Fills the slot; a slot is filled at most once
    pub fn fill(&self, value: T) -> Result<(), LateError> {
        self.0.set(value).map_err(|_| LateError::AlreadyFilled)
    }

    /// Accesses the slot
    ///
    /// # Panics
    /// - When accessed before the pipeline filled it
    pub fn get(&self) -> &T {
        self.try_get().expect("Late slot accessed before injection")
    }

    pub fn try_get(&self) -> Option<&T> {
        self.0.get()
    }
}

impl<T> Default for Late<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Deref for Late<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

impl<T: Debug> Debug for Late<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.try_get() {
            Some(value) => f.debug_tuple("Late").field(value).finish(),
            None => f.debug_tuple("Late").field(&"<unset>").finish(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LateError {
    #[error("the slot was already filled")]
    AlreadyFilled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_then_get() {
        let slot: Late<i32> = Late::unset();
        slot.fill(42).unwrap();
        assert_eq!(*slot.get(), 42);
    }

    #[test]
    fn double_fill_is_rejected() {
        let slot: Late<&str> = Late::unset();
        slot.fill("a").unwrap();
        assert_eq!(slot.fill("b"), Err(LateError::AlreadyFilled));
        assert_eq!(*slot.get(), "a");
    }

    #[test]
    #[should_panic(expected = "accessed before injection")]
    fn get_before_fill_panics() {
        let slot: Late<u8> = Late::unset();
        slot.get();
    }
}
