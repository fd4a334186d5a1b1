use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::VisitError;
use crate::visitor::Visitor;

/// A type-erased handler as stored in the registry and in guard nodes.
///
/// The typed closure supplied to
/// [`VisitorBuilder::register`](crate::VisitorBuilder::register) is wrapped in
/// a downcast adapter at registration time; dispatch only ever deals in this
/// erased shape.
pub(crate) type ErasedHandler<Ctx, R> =
  Arc<dyn Fn(&Visitor<Ctx, R>, &dyn Any, &mut Ctx) -> Result<R, VisitError> + Send + Sync>;

pub(crate) struct RegisteredHandler<Ctx, R> {
  /// Human-readable name of the registered type, kept for diagnostics.
  pub(crate) type_name: &'static str,
  pub(crate) handler:   ErasedHandler<Ctx, R>,
}

/// Immutable mapping from exact concrete type to handler.
///
/// Built once by the builder before any dispatch happens and shared by
/// reference for the lifetime of the owning [`Visitor`]. Never mutated
/// afterward, which is what makes lock-free reads from the dispatch chain
/// sound.
pub(crate) struct HandlerRegistry<Ctx, R> {
  handlers: HashMap<TypeId, RegisteredHandler<Ctx, R>>,
}

impl<Ctx, R> HandlerRegistry<Ctx, R> {
  pub(crate) fn new(handlers: HashMap<TypeId, RegisteredHandler<Ctx, R>>) -> Self {
    Self { handlers }
  }

  /// O(1) exact-type lookup. Returns `None` for types that were never
  /// registered; the caller decides how to surface that.
  pub(crate) fn lookup(&self, type_id: TypeId) -> Option<&ErasedHandler<Ctx, R>> {
    self.handlers.get(&type_id).map(|entry| &entry.handler)
  }

  pub(crate) fn type_name(&self, type_id: TypeId) -> Option<&'static str> {
    self.handlers.get(&type_id).map(|entry| entry.type_name)
  }

  pub(crate) fn len(&self) -> usize {
    self.handlers.len()
  }
}
