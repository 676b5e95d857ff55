//! Locally computed visiting orders for roundtrip.
//!
//! This crate provides [`LocalSolver`], the default implementation of the
//! [`RouteSolver`](roundtrip_core::RouteSolver) trait. It orders stops purely
//! from the distance matrix, with no I/O:
//!
//! - one stop needs no search;
//! - up to [`DEFAULT_EXACT_LIMIT`] stops are ordered by exhaustive
//!   permutation search, keeping the first cheapest tour in lexicographic
//!   order;
//! - larger inputs use a greedy nearest-neighbour pass whose ties go to the
//!   lowest index.
//!
//! Unreachable legs are charged [`UNREACHABLE_COST`](roundtrip_core::UNREACHABLE_COST)
//! so infeasible tours are ranked last but still produced.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod exact;
mod nearest;
mod solver;

pub use solver::{DEFAULT_EXACT_LIMIT, LocalSolver, LocalSolverConfig};
