//! Synthesis of MTNCL threshold-gate circuits from boolean equations.
//!
//! [`generate`] maps an operator tree onto threshold gates, producing several structurally
//! distinct circuits. Dual-mode designs are served two ways: [`generate_polymorphic`] pairs up
//! single-function circuits of identical shape and merges them into polymorphic gates, while
//! [`enumerate_polymorphic`] searches the polymorphic gates of a library for one whose two truth
//! tables match both functions exactly.

mod config;
mod generate;
mod polymorphic;
mod enumerate;

pub use config::{OptimizationTarget, OptimizationWeights, SynthConfig};
pub use generate::{generate, is_realizable};
pub use polymorphic::{generate_polymorphic, wire_isomorphic};
pub use enumerate::{PolymorphicEnumerator, PolymorphicMatch, TruthTable, enumerate_polymorphic};
