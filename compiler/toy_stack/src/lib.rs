//! Stack growth for deep recursion.
//!
//! Expression lowering recurses once per nesting level, and generated
//! sources (long `a + b + c + ...` chains, deeply parenthesized constants)
//! nest far deeper than hand-written ones. Recursive entry points wrap their
//! body in [`ensure_sufficient_stack`], which moves to a freshly allocated
//! stack segment when the current one is nearly exhausted.
//!
//! On `wasm32` the call is a plain passthrough.

/// Remaining stack below which a new segment is allocated.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if less than the red
/// zone remains.
///
/// ```text
/// fn lower_expr(&mut self, id: ExprId) -> Result<Value, LowerError> {
///     ensure_sufficient_stack(|| self.lower_expr_inner(id))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
