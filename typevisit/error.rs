use std::any::TypeId;

use thiserror::Error;

/// Raised by [`VisitorBuilder::build`](crate::VisitorBuilder::build) when the
/// registration set is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// The same concrete type was registered more than once. Registration is
  /// first-wins up to this point, but a duplicate is always a configuration
  /// mistake, so the whole build fails.
  #[error("duplicate handler registration for {}", .type_names.join(", "))]
  DuplicateRegistration { type_names: Vec<&'static str> },
}

/// Raised by [`Visitor::visit`](crate::Visitor::visit).
///
/// Dispatch failures are deterministic: the registry is immutable after
/// construction, so visiting a value of an unregistered type fails the same
/// way on every call. Failures are never cached and never leave the dispatch
/// chain partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitError {
  /// The value's exact concrete type has no registered handler.
  #[error("no handler registered for type {0:?}")]
  UnregisteredType(TypeId),
}
