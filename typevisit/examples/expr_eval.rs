//! Evaluates a small heterogeneous expression tree with a recursive visitor.
//!
//! Run with `RUST_LOG=trace` to watch guards being installed on first sight
//! of each node type.

use std::any::Any;

use typevisit::Visitor;

struct Lit(i64);
struct Add(Box<dyn Any>, Box<dyn Any>);
struct Mul(Box<dyn Any>, Box<dyn Any>);

#[derive(Default)]
struct EvalCtx {
  reductions: usize,
}

type Eval = Visitor<EvalCtx, i64>;

fn build_eval() -> Eval {
  Visitor::builder()
    .register(|_, lit: &Lit, _: &mut EvalCtx| Ok(lit.0))
    .register(|visitor: &Eval, add: &Add, ctx: &mut EvalCtx| {
      ctx.reductions += 1;
      Ok(visitor.visit(add.0.as_ref(), ctx)? + visitor.visit(add.1.as_ref(), ctx)?)
    })
    .register(|visitor: &Eval, mul: &Mul, ctx: &mut EvalCtx| {
      ctx.reductions += 1;
      Ok(visitor.visit(mul.0.as_ref(), ctx)? * visitor.visit(mul.1.as_ref(), ctx)?)
    })
    .build()
    .expect("no duplicate registrations")
}

fn main() {
  env_logger::init();

  let eval = build_eval();

  // (1 + 2) * (3 + 4)
  let expr = Mul(
    Box::new(Add(Box::new(Lit(1)), Box::new(Lit(2)))),
    Box::new(Add(Box::new(Lit(3)), Box::new(Lit(4)))),
  );

  let mut ctx = EvalCtx::default();
  match eval.visit(&expr, &mut ctx) {
    Ok(value) => println!("(1 + 2) * (3 + 4) = {value}"),
    Err(err) => println!("evaluation failed: {err}"),
  }

  println!("reductions: {}", ctx.reductions);
  println!("guards after one pass: {}", eval.cached_types().len());

  // Second pass runs entirely on the warm chain.
  let mut ctx = EvalCtx::default();
  let value = eval.visit(&expr, &mut ctx).expect("same tree, same answer");
  println!("warm pass: {value}");
}
