//! This library provides the in-memory form of MTNCL threshold-gate netlists.
//!
//! A boolean equation is parsed into an [`Expr`] tree. Gates available to synthesis are described
//! by a [`Catalog`] of [`GateDescriptor`]s, including polymorphic gates whose function depends on
//! the supply [`Mode`]. A synthesized [`Circuit`] is a list of [`GateInstance`]s connected by named
//! [`Wire`]s; a [`PolymorphicCircuit`] additionally records what each gate does in each mode.

mod expr;
mod catalog;
mod circuit;
mod validate;
mod equivalent;

pub use expr::{BinaryOp, Expr, ParseError, ParseErrorKind, parse, variables};
pub use catalog::{
    Catalog, GateDescriptor, GateFunction, Mode, base_gate, operator_candidates, polymorphic_pair,
};
pub use circuit::{Circuit, CircuitBuilder, GateInstance, GateModes, PolymorphicCircuit, Wire};
pub use validate::{Limits, Violation};
pub use equivalent::{equivalent, NotEquivalent};
