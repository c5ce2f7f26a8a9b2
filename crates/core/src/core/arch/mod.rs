//! Architectural state: the general-purpose register file.

pub mod gpr;

pub use gpr::Gpr;
