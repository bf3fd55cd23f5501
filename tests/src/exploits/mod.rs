//! Attack simulations against sealed ledgers
//!
//! Every scenario mutates or rebuilds records outside the append path and
//! asserts which record and which check validation reports first.

pub mod tamper;
