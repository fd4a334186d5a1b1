//! The caching dispatch chain.
//!
//! A call site starts out as a bare fallback. The first time a concrete type
//! is seen, the fallback resolves it against the registry and publishes a
//! guard node for it; later values of the same type hit that guard and invoke
//! the cached handler directly, with no lookup and no allocation. Values of
//! other types walk past the guard to the next link, so a site that has seen
//! `k` distinct types costs at most `k` type-id comparisons, ordered by first
//! sight.

use std::any::Any;
use std::any::TypeId;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use log::trace;

use crate::error::VisitError;
use crate::registry::ErasedHandler;
use crate::visitor::Visitor;

/// One link of the dispatch chain.
///
/// The `ArcSwapOption` cell is the only mutable shared state in the whole
/// crate: `None` is the fallback state, `Some` holds an immutable, fully
/// constructed guard node. The cell transitions `None -> Some` at most once
/// (guarded by a compare-and-swap) and never back.
pub(crate) struct DispatchSite<Ctx, R> {
  strategy: ArcSwapOption<GuardNode<Ctx, R>>,
}

/// A resolved (type, handler) pair plus the link to consult on mismatch.
///
/// Immutable once published; the chain always terminates in a fresh fallback
/// cell carried in `next`.
struct GuardNode<Ctx, R> {
  type_id: TypeId,
  handler: ErasedHandler<Ctx, R>,
  next:    DispatchSite<Ctx, R>,
}

impl<Ctx: 'static, R: 'static> DispatchSite<Ctx, R> {
  pub(crate) fn new() -> Self {
    Self {
      strategy: ArcSwapOption::empty(),
    }
  }

  /// Route `value` to the handler for `type_id`.
  ///
  /// The load below is the only synchronization on the read side; the guard
  /// it returns keeps the node alive for the duration of the call, including
  /// the recursive walk.
  pub(crate) fn dispatch(
    &self,
    visitor: &Visitor<Ctx, R>,
    type_id: TypeId,
    value: &dyn Any,
    ctx: &mut Ctx,
  ) -> Result<R, VisitError> {
    let strategy = self.strategy.load();
    match strategy.as_ref() {
      // Fast path: the cached guard matches the exact runtime type.
      Some(guard) if guard.type_id == type_id => (guard.handler.as_ref())(visitor, value, ctx),
      // Mismatch: walk to the next link.
      Some(guard) => guard.next.dispatch(visitor, type_id, value, ctx),
      // Fallback: resolve against the registry, then publish a guard.
      None => {
        let Some(handler) = visitor.registry().lookup(type_id) else {
          // Not cached as a negative result: the registry is static, so the
          // next call with this type repeats the lookup and fails identically.
          return Err(VisitError::UnregisteredType(type_id));
        };
        let handler = Arc::clone(handler);

        // Publish-after-construct: the node is complete before the swap, so
        // any thread that observes it sees it fully initialized. Losing the
        // race is benign; the handler we resolved is invoked either way and
        // the guard for this type gets installed by a later call reaching
        // the new tail.
        let node = Arc::new(GuardNode {
          type_id,
          handler: Arc::clone(&handler),
          next: DispatchSite::new(),
        });
        let previous = self.strategy.compare_and_swap(&strategy, Some(node));
        if previous.is_none() {
          trace!(
            "cached handler for {} at this call site",
            visitor.registry().type_name(type_id).unwrap_or("<unknown>"),
          );
        }

        (handler.as_ref())(visitor, value, ctx)
      },
    }
  }

  /// Snapshot of the resolved guard types, in first-sight order.
  pub(crate) fn cached_types(&self) -> Vec<TypeId> {
    let mut types = Vec::new();
    let mut current = self.strategy.load_full();
    while let Some(node) = current {
      types.push(node.type_id);
      current = node.next.strategy.load_full();
    }
    types
  }
}
