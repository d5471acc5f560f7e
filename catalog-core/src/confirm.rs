//! Confirmation capability for destructive operations.
//!
//! Deletion call sites ask an injected [`Confirmer`] instead of invoking an
//! ambient dialog, so non-interactive callers (flags, tests) can answer
//! deterministically.

/// Answers yes/no questions before a destructive operation proceeds.
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Fixed-answer confirmer, used for `--yes` flags and in tests.
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_confirm_returns_its_fixed_answer() {
        assert!(AutoConfirm(true).confirm("delete?"));
        assert!(!AutoConfirm(false).confirm("delete?"));
    }
}
