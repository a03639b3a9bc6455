pub mod ast;
pub mod coarray;
pub mod span;
