use std::any::TypeId;

use typevisit::{BuildError, VisitError, Visitor};

// Results are heterogeneous in the scenarios below, so tests dispatch into a
// small sum type rather than fixing R to one primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Out {
  Int(i64),
  Str(String),
}

struct TestCtx {
  visits: usize,
}

impl TestCtx {
  fn new() -> Self {
    Self { visits: 0 }
  }
}

fn build_visitor() -> Visitor<TestCtx, Out> {
  Visitor::<TestCtx, Out>::builder()
    .register(|_, value: &i32, ctx: &mut TestCtx| {
      ctx.visits += 1;
      Ok(Out::Int(i64::from(*value) * 2))
    })
    .register(|_, value: &String, ctx: &mut TestCtx| {
      ctx.visits += 1;
      Ok(Out::Str(value.to_uppercase()))
    })
    .build()
    .expect("valid registration set")
}

#[test]
fn test_routes_to_exact_type_handler() {
  let visitor = build_visitor();
  let mut ctx = TestCtx::new();

  assert_eq!(visitor.visit(&5, &mut ctx), Ok(Out::Int(10)));
  assert_eq!(visitor.visit(&"ab".to_string(), &mut ctx), Ok(Out::Str("AB".to_string())));
  assert_eq!(ctx.visits, 2);
}

#[test]
fn test_warm_path_is_idempotent() {
  let visitor = build_visitor();
  let mut ctx = TestCtx::new();

  // Second call of each type goes through the cached guard; results must be
  // indistinguishable from two independent direct handler invocations.
  assert_eq!(visitor.visit(&21, &mut ctx), Ok(Out::Int(42)));
  assert_eq!(visitor.visit(&21, &mut ctx), Ok(Out::Int(42)));
  assert_eq!(visitor.visit(&"x".to_string(), &mut ctx), Ok(Out::Str("X".to_string())));
  assert_eq!(visitor.visit(&"x".to_string(), &mut ctx), Ok(Out::Str("X".to_string())));
}

#[test]
fn test_unregistered_type_fails_on_every_call() {
  let visitor = build_visitor();
  let mut ctx = TestCtx::new();

  let expected = Err(VisitError::UnregisteredType(TypeId::of::<f64>()));
  assert_eq!(visitor.visit(&3.14, &mut ctx), expected);
  // Not cached as a negative result; the second call fails identically.
  assert_eq!(visitor.visit(&2.71, &mut ctx), expected);
}

#[test]
fn test_failed_dispatch_installs_no_guard() {
  let visitor = build_visitor();
  let mut ctx = TestCtx::new();

  visitor.visit(&5, &mut ctx).unwrap();
  let before = visitor.cached_types();

  assert!(visitor.visit(&3.14, &mut ctx).is_err());
  assert_eq!(visitor.cached_types(), before);
}

#[test]
fn test_matching_is_exact_not_widening() {
  // i32 is registered; numerically compatible types are not.
  let visitor = build_visitor();
  let mut ctx = TestCtx::new();

  assert_eq!(
    visitor.visit(&5u8, &mut ctx),
    Err(VisitError::UnregisteredType(TypeId::of::<u8>()))
  );
  assert_eq!(
    visitor.visit(&5i64, &mut ctx),
    Err(VisitError::UnregisteredType(TypeId::of::<i64>()))
  );
}

#[test]
fn test_result_is_independent_of_call_history() {
  let visitor = build_visitor();
  let mut ctx = TestCtx::new();

  // Interleave types and failures, then confirm both handlers still produce
  // exactly what a direct invocation would.
  visitor.visit(&"warm".to_string(), &mut ctx).unwrap();
  let _ = visitor.visit(&1.0f64, &mut ctx);
  visitor.visit(&7, &mut ctx).unwrap();

  assert_eq!(visitor.visit(&9, &mut ctx), Ok(Out::Int(18)));
  assert_eq!(visitor.visit(&"ok".to_string(), &mut ctx), Ok(Out::Str("OK".to_string())));
}

#[test]
fn test_duplicate_registration_fails_build() {
  let result = Visitor::<(), i64>::builder()
    .register(|_, value: &i32, _: &mut ()| Ok(i64::from(*value)))
    .register(|_, value: &i32, _: &mut ()| Ok(i64::from(*value) + 1))
    .build();

  match result {
    Err(BuildError::DuplicateRegistration { type_names }) => {
      assert_eq!(type_names, vec!["i32"]);
    },
    Ok(_) => panic!("duplicate registration must fail the build"),
  }
}

#[test]
fn test_empty_visitor_rejects_everything() {
  let visitor = Visitor::<(), i64>::builder().build().unwrap();
  let mut ctx = ();

  assert_eq!(visitor.handler_count(), 0);
  assert_eq!(
    visitor.visit(&1, &mut ctx),
    Err(VisitError::UnregisteredType(TypeId::of::<i32>()))
  );
  assert!(visitor.cached_types().is_empty());
}

#[test]
fn test_handlers_mutate_context() {
  let visitor = build_visitor();
  let mut ctx = TestCtx::new();

  for i in 0..5 {
    visitor.visit(&i, &mut ctx).unwrap();
  }

  assert_eq!(ctx.visits, 5);
}
