//! Staged questionnaire-to-specification pipeline.
//!
//! `formulas` and `questionnaire` are leaves; `assessment`, `specification`
//! and `validation` build on them; `transformation` orchestrates the rest.

pub mod assessment;
pub mod formulas;
pub mod questionnaire;
pub mod specification;
pub mod transformation;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
