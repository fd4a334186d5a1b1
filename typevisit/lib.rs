//! # typevisit
//!
//! Exact-type visitor dispatch with a self-optimizing inline cache.
//!
//! A closed set of handlers is registered against concrete types; callers
//! invoke a single entry point [`Visitor::visit`] that routes each value to
//! the handler for its exact runtime type. The first dispatch of a type pays
//! for a registry lookup; every later dispatch of that type hits a cached
//! guard and approaches the cost of a direct call.
//!
//! ## Core Concepts
//!
//! - **Registry**: immutable type -> handler mapping, assembled by the
//!   builder before any dispatch occurs
//! - **Dispatch chain**: per-visitor chain of type guards, grown lazily, one
//!   guard per distinct concrete type seen, in first-sight order
//! - **Exact matching**: a guard matches on type identity
//!   ([`std::any::TypeId`]), never on subtyping; two types sharing handler
//!   code still occupy two cache slots
//! - **Lock-free**: readers take one atomic load per chain link; installs
//!   publish fully built guard nodes with a compare-and-swap
//!
//! ## Basic Usage
//!
//! ```rust
//! use typevisit::Visitor;
//!
//! let visitor = Visitor::<(), i64>::builder()
//!   .register(|_, value: &i32, _: &mut ()| Ok(i64::from(*value) * 2))
//!   .register(|_, value: &String, _: &mut ()| Ok(value.len() as i64))
//!   .build()
//!   .unwrap();
//!
//! let mut ctx = ();
//! assert_eq!(visitor.visit(&5, &mut ctx), Ok(10));
//! assert_eq!(visitor.visit(&"abc".to_string(), &mut ctx), Ok(3));
//!
//! // f64 was never registered; this fails now and on every later call.
//! assert!(visitor.visit(&3.14, &mut ctx).is_err());
//! ```
//!
//! ## Recursive Handlers
//!
//! Handlers receive the visitor as their first argument, so heterogeneous
//! structures can be traversed by re-entering `visit` for child values:
//!
//! ```rust
//! use std::any::Any;
//!
//! use typevisit::Visitor;
//!
//! struct Lit(i64);
//! struct Add(Box<dyn Any>, Box<dyn Any>);
//!
//! let eval = Visitor::<(), i64>::builder()
//!   .register(|_, lit: &Lit, _: &mut ()| Ok(lit.0))
//!   .register(|visitor: &Visitor<(), i64>, add: &Add, ctx: &mut ()| {
//!     Ok(visitor.visit(add.0.as_ref(), ctx)? + visitor.visit(add.1.as_ref(), ctx)?)
//!   })
//!   .build()
//!   .unwrap();
//!
//! let expr = Add(Box::new(Lit(2)), Box::new(Add(Box::new(Lit(3)), Box::new(Lit(4)))));
//! assert_eq!(eval.visit(&expr, &mut ()), Ok(9));
//! ```
//!
//! ## Concurrency
//!
//! A `Visitor` can be shared across threads and visited concurrently without
//! external locking. Racing first-time dispatches of the same type all return
//! the correct result and leave exactly one guard in the chain; a lost
//! publish race only costs one discarded allocation, never an observable
//! inconsistency.
//!
//! ## Limits
//!
//! The chain grows monotonically and without bound: a call site that sees
//! many distinct types degrades toward a linear scan over its guards (see
//! [`Visitor::cached_types`] to observe the chain). There is no handler
//! unregistration and no re-resolution after [`VisitorBuilder::build`].

mod error;
mod registry;
mod site;
mod visitor;

pub use error::BuildError;
pub use error::VisitError;
pub use visitor::Visitor;
pub use visitor::VisitorBuilder;
