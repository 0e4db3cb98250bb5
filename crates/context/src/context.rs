//! Immutable context chain

use crate::{ContextError, Result};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A typed slot that can be bound on a [`Context`].
///
/// Slots are usually uninhabited marker types; the marker's [`TypeId`] is the
/// private lookup key, so two slots never see each other's values even when
/// they share a value type.
pub trait Slot: 'static {
    /// Type of the value bound to this slot
    type Value: Send + Sync + 'static;

    /// Human-readable slot name used in errors and debug output
    const NAME: &'static str;
}

struct Frame {
    slot: TypeId,
    name: &'static str,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Frame>>,
}

impl Drop for Frame {
    // Unlink uniquely owned ancestors one by one so long chains do not recurse
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(frame) = parent {
            match Arc::into_inner(frame) {
                Some(mut frame) => parent = frame.parent.take(),
                None => break,
            }
        }
    }
}

/// Immutable per-request context.
///
/// Cloning is cheap (one `Arc` bump) and clones share all frames. Shadowed
/// bindings stay in the chain until the context is dropped, so a context is
/// meant to live for one request rather than be rebound in a long loop.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Frame>>,
}

impl Context {
    /// Create an empty root context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context answering `S` with `value`.
    ///
    /// Every other slot answers exactly as in `self`. A value already bound
    /// for `S` further up the chain is shadowed, not modified.
    #[must_use]
    pub fn with_value<S: Slot>(&self, value: S::Value) -> Self {
        Self {
            head: Some(Arc::new(Frame {
                slot: TypeId::of::<S>(),
                name: S::NAME,
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Borrow the value most recently bound for `S`, if any
    #[must_use]
    pub fn get<S: Slot>(&self) -> Option<&S::Value> {
        self.frames()
            .find(|frame| frame.slot == TypeId::of::<S>())
            .and_then(|frame| frame.value.downcast_ref::<S::Value>())
    }

    /// Borrow the value bound for `S`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingBinding`] if `S` was never bound in
    /// this chain.
    pub fn require<S: Slot>(&self) -> Result<&S::Value> {
        self.get::<S>()
            .ok_or(ContextError::MissingBinding { slot: S::NAME })
    }

    /// Clone out the value bound for `S`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingBinding`] if `S` was never bound in
    /// this chain.
    pub fn value<S: Slot>(&self) -> Result<S::Value>
    where
        S::Value: Clone,
    {
        self.require::<S>().cloned()
    }

    /// Check whether `S` is bound in this chain
    #[must_use]
    pub fn contains<S: Slot>(&self) -> bool {
        self.get::<S>().is_some()
    }

    /// Number of frames in the chain, shadowed ones included
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    fn frames(&self) -> impl Iterator<Item = &Frame> {
        std::iter::successors(self.head.as_deref(), |frame| frame.parent.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values may hold resolver closures or tenant data; only slot names are shown
        f.debug_struct("Context")
            .field(
                "slots",
                &self.frames().map(|frame| frame.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Name {}
    impl Slot for Name {
        type Value = String;
        const NAME: &'static str = "name";
    }

    enum Alias {}
    impl Slot for Alias {
        type Value = String;
        const NAME: &'static str = "alias";
    }

    enum Count {}
    impl Slot for Count {
        type Value = u32;
        const NAME: &'static str = "count";
    }

    #[test]
    fn test_empty_context() {
        let ctx = Context::new();
        assert_eq!(ctx.depth(), 0);
        assert!(!ctx.contains::<Name>());
        assert_eq!(
            ctx.value::<Name>(),
            Err(ContextError::MissingBinding { slot: "name" })
        );
    }

    #[test]
    fn test_with_value_then_value() {
        let ctx = Context::new().with_value::<Name>("tenant-a".to_string());
        assert_eq!(ctx.value::<Name>().unwrap(), "tenant-a");
        assert_eq!(ctx.get::<Name>().map(String::as_str), Some("tenant-a"));
    }

    #[test]
    fn test_slots_with_same_value_type_do_not_collide() {
        let ctx = Context::new()
            .with_value::<Name>("name".to_string())
            .with_value::<Alias>("alias".to_string());

        assert_eq!(ctx.value::<Name>().unwrap(), "name");
        assert_eq!(ctx.value::<Alias>().unwrap(), "alias");
    }

    #[test]
    fn test_rebinding_shadows_without_mutating_parent() {
        let parent = Context::new().with_value::<Count>(1);
        let child = parent.with_value::<Count>(2);

        assert_eq!(parent.value::<Count>().unwrap(), 1);
        assert_eq!(child.value::<Count>().unwrap(), 2);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_parent_does_not_see_child_bindings() {
        let parent = Context::new().with_value::<Count>(7);
        let child = parent.with_value::<Name>("child".to_string());

        assert!(child.contains::<Name>());
        assert!(!parent.contains::<Name>());
        assert_eq!(child.value::<Count>().unwrap(), 7);
    }

    #[test]
    fn test_require_borrows() {
        let ctx = Context::new().with_value::<Name>("borrowed".to_string());
        let name: &String = ctx.require::<Name>().unwrap();
        assert_eq!(name, "borrowed");

        let err = Context::new().require::<Alias>().unwrap_err();
        assert!(err.to_string().contains("alias"));
    }

    #[test]
    fn test_debug_lists_slot_names_only() {
        let ctx = Context::new()
            .with_value::<Name>("do-not-print".to_string())
            .with_value::<Count>(3);

        let debug = format!("{ctx:?}");
        assert!(debug.contains("count"));
        assert!(debug.contains("name"));
        assert!(!debug.contains("do-not-print"));
    }

    #[test]
    fn test_dropping_long_chain_does_not_overflow() {
        let mut ctx = Context::new();
        for i in 0..200_000 {
            ctx = ctx.with_value::<Count>(i);
        }
        assert_eq!(ctx.depth(), 200_000);
        assert_eq!(ctx.value::<Count>().unwrap(), 199_999);
        drop(ctx);
    }

    #[test]
    fn test_dropping_child_keeps_shared_parent() {
        let parent = Context::new()
            .with_value::<Name>("kept".to_string())
            .with_value::<Count>(1);
        let child = parent.with_value::<Count>(2);
        drop(child);

        assert_eq!(parent.depth(), 2);
        assert_eq!(parent.value::<Name>().unwrap(), "kept");
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();

        let ctx = Context::new().with_value::<Count>(42);
        let handle = std::thread::spawn(move || ctx.value::<Count>().unwrap());
        assert_eq!(handle.join().unwrap(), 42);
    }
}
