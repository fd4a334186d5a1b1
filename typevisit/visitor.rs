use std::any::Any;
use std::any::TypeId;
use std::any::type_name;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::error::BuildError;
use crate::error::VisitError;
use crate::registry::ErasedHandler;
use crate::registry::HandlerRegistry;
use crate::registry::RegisteredHandler;
use crate::site::DispatchSite;

/// Routes values to type-specific handlers by their exact runtime type.
///
/// Built once via [`Visitor::builder`]; the handler mapping is immutable
/// afterward. The visitor itself is `Send + Sync` (given `Send + Sync`
/// handlers, which registration enforces), so a single instance can be
/// shared across threads and visited concurrently without external locking.
pub struct Visitor<Ctx, R> {
  registry: Arc<HandlerRegistry<Ctx, R>>,
  root:     DispatchSite<Ctx, R>,
}

impl<Ctx: 'static, R: 'static> Visitor<Ctx, R> {
  /// Start assembling the type -> handler mapping.
  pub fn builder() -> VisitorBuilder<Ctx, R> {
    VisitorBuilder::new()
  }

  /// Dispatch `value` to the handler registered for its exact concrete type.
  ///
  /// Matching is exact, never subtype-based: the type consulted is the
  /// concrete type behind the `&dyn Any` reference, so pass a reference to
  /// the value itself (`&*boxed`, not `&boxed`).
  ///
  /// The result is always identical to invoking the registered handler
  /// directly, independent of call history; the cache changes cost, never
  /// the answer.
  ///
  /// # Errors
  ///
  /// [`VisitError::UnregisteredType`] if no handler was registered for the
  /// value's exact type, on this call and every later call with that type.
  pub fn visit(&self, value: &dyn Any, ctx: &mut Ctx) -> Result<R, VisitError> {
    self.root.dispatch(self, value.type_id(), value, ctx)
  }

  /// The types this visitor has resolved so far, in first-sight order.
  ///
  /// Diagnostic view of the dispatch chain: one entry per distinct concrete
  /// type observed, at most [`handler_count`](Self::handler_count) entries.
  pub fn cached_types(&self) -> Vec<TypeId> {
    self.root.cached_types()
  }

  /// Number of registered handlers.
  pub fn handler_count(&self) -> usize {
    self.registry.len()
  }

  pub(crate) fn registry(&self) -> &HandlerRegistry<Ctx, R> {
    &self.registry
  }
}

/// Fluent builder for a [`Visitor`].
///
/// Each distinct concrete type gets exactly one handler; duplicates are
/// collected and reported by [`build`](Self::build) rather than failing
/// mid-chain.
pub struct VisitorBuilder<Ctx, R> {
  handlers:   HashMap<TypeId, RegisteredHandler<Ctx, R>>,
  duplicates: Vec<&'static str>,
}

impl<Ctx: 'static, R: 'static> VisitorBuilder<Ctx, R> {
  pub fn new() -> Self {
    Self {
      handlers:   HashMap::new(),
      duplicates: Vec::new(),
    }
  }

  /// Register `handler` for values of exact type `T`.
  ///
  /// The handler receives the visitor itself as its first argument so it can
  /// recurse into [`Visitor::visit`] for child values, the matched value,
  /// and the caller's context. Errors from recursive visits compose with
  /// `?`.
  pub fn register<T, H>(mut self, handler: H) -> Self
  where
    T: Any,
    H: Fn(&Visitor<Ctx, R>, &T, &mut Ctx) -> Result<R, VisitError> + Send + Sync + 'static,
  {
    let erased: ErasedHandler<Ctx, R> = Arc::new(move |visitor, value, ctx| {
      let Some(value) = value.downcast_ref::<T>() else {
        // Guards compare exact type ids before invoking, so the erased value
        // is always a T here.
        unreachable!("handler for {} invoked with a value of another type", type_name::<T>());
      };
      handler(visitor, value, ctx)
    });

    match self.handlers.entry(TypeId::of::<T>()) {
      Entry::Occupied(_) => self.duplicates.push(type_name::<T>()),
      Entry::Vacant(slot) => {
        slot.insert(RegisteredHandler {
          type_name: type_name::<T>(),
          handler:   erased,
        });
      },
    }
    self
  }

  /// Finish construction.
  ///
  /// # Errors
  ///
  /// [`BuildError::DuplicateRegistration`] naming every type that was
  /// registered more than once.
  pub fn build(self) -> Result<Visitor<Ctx, R>, BuildError> {
    if !self.duplicates.is_empty() {
      return Err(BuildError::DuplicateRegistration {
        type_names: self.duplicates,
      });
    }

    Ok(Visitor {
      registry: Arc::new(HandlerRegistry::new(self.handlers)),
      root:     DispatchSite::new(),
    })
  }
}

impl<Ctx: 'static, R: 'static> Default for VisitorBuilder<Ctx, R> {
  fn default() -> Self {
    Self::new()
  }
}
