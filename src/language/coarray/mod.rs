//! Semantic constraints on coarray statements and constructs: teams,
//! synchronization, locks, events, notifications and image selectors.

pub mod body;
mod checker;
pub mod evaluate;
pub mod expr;
pub mod labels;
pub mod lists;
pub mod message;
pub mod oracle;
pub mod statements;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_support;

pub use checker::check_program_unit;
pub use message::{Diagnostic, Message, Note, Severity};
pub use oracle::{SemanticModel, SemanticsOracle};
