//! Tests for the rules engine: the distribution table, role dealing,
//! asymmetric knowledge and the investigation action.

#![cfg(test)]
#![allow(clippy::bool_assert_comparison)]

pub mod eligibility;
pub mod test_utils;
pub mod visibility;
