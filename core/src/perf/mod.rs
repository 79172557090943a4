//! Shared benchmarking scaffolding used by the CLI harness and the Criterion
//! benches.
//!
//! Both front-ends build their grid through [`fixture::BenchFixture`] so the
//! ground truth always comes from the same generator run the reducers are
//! checked against.

pub mod fixture;
pub mod harness;
