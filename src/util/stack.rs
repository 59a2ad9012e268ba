//! Dynamically grows the native stack when recursion runs deep.
//!
//! - **Native targets** use `stacker` to allocate more stack on demand.
//! - **WASM targets** call straight through.

/// If less than this much stack remains, grow before recursing (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each additional stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
///
/// # Example
/// ```
/// use mathly::util::stack::ensure_sufficient_stack;
///
/// fn depth(n: u64) -> u64 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
/// }
///
/// assert_eq!(depth(10), 10);
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_recursion_does_not_overflow() {
        fn count(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { count(n - 1) + 1 })
        }

        assert_eq!(count(100_000), 100_000);
    }
}
