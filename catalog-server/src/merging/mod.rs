//! Product merge engine
//!
//! Merges several products of one brand into a parent product, reconciling
//! the option (global field) assignments of their variants.
//!
//! # Flow
//!
//! ```text
//! extract → apply changes → validate → plan → commit
//! ```
//!
//! Everything before the commit is read-only; the commit is a single
//! storage transaction.

mod applier;
mod candidate;
mod consistency;
mod error;
mod executor;
mod extractor;
mod lock;
mod option_value;
mod service;
mod validators;

#[cfg(test)]
mod test_support;

pub use applier::apply_option_changes;
pub use candidate::MergeCandidate;
pub use consistency::{ConsistencyLaw, ConsistencyViolation, is_consistent, validate_consistency};
pub use error::{EntityKind, MergeError, MergeResult};
pub use executor::{MergeInput, MergePlan, VariantMutation, plan_merge};
pub use extractor::extract_option_values;
pub use lock::BrandLocks;
pub use option_value::{OptionAssignment, OptionChange, OptionValue};
pub use service::{MergeOutcome, MergePreview, MergeRequest, MergeService, PreviewRequest};
pub use validators::{validate_brand_match, validate_merge_state};
