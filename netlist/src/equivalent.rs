use std::fmt::Display;

use crate::{Circuit, GateInstance};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotEquivalent {
    GateCount(usize, usize),
    Inputs,
    Outputs,
    Gate(String, String),
}

impl Display for NotEquivalent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotEquivalent::GateCount(left, right) => write!(f, "gate count {left} != {right}"),
            NotEquivalent::Inputs => write!(f, "primary inputs differ"),
            NotEquivalent::Outputs => write!(f, "primary outputs differ"),
            NotEquivalent::Gate(left, right) => write!(f, "gate {left} has no counterpart (closest: {right})"),
        }
    }
}

impl std::error::Error for NotEquivalent {}

type Signature<'a> = (&'a str, Vec<&'a str>, Vec<&'a str>);

fn signature(gate: &GateInstance) -> Signature<'_> {
    let mut inputs: Vec<&str> = gate.input_wires().collect();
    let mut outputs: Vec<&str> = gate.output_wires().collect();
    inputs.sort();
    outputs.sort();
    (gate.gate_type.as_str(), inputs, outputs)
}

/// Checks whether two circuits contain the same multiset of gates, each described by its type
/// and the sorted wire names on its inputs and outputs. Gate instance names and port names are
/// ignored.
pub fn equivalent(left: &Circuit, right: &Circuit) -> Result<(), NotEquivalent> {
    if left.gate_count() != right.gate_count() {
        return Err(NotEquivalent::GateCount(left.gate_count(), right.gate_count()));
    }
    if left.inputs() != right.inputs() {
        return Err(NotEquivalent::Inputs);
    }
    if left.outputs() != right.outputs() {
        return Err(NotEquivalent::Outputs);
    }
    let mut left_gates: Vec<(Signature, &str)> = left.gates().iter().map(|gate| (signature(gate), &gate.name[..])).collect();
    let mut right_gates: Vec<(Signature, &str)> =
        right.gates().iter().map(|gate| (signature(gate), &gate.name[..])).collect();
    left_gates.sort();
    right_gates.sort();
    for ((left_sig, left_name), (right_sig, right_name)) in left_gates.iter().zip(right_gates.iter()) {
        if left_sig != right_sig {
            return Err(NotEquivalent::Gate(left_name.to_string(), right_name.to_string()));
        }
    }
    Ok(())
}

impl Circuit {
    pub fn is_equivalent(&self, other: &Circuit) -> bool {
        equivalent(self, other).is_ok()
    }
}

#[macro_export]
macro_rules! assert_equivalent {
    ( $lhs:expr, $rhs:expr $( , $( $assertarg:tt)+ )? ) => {
        {
            let (lhs, rhs) = (&$lhs, &$rhs);
            if let Err(error) = $crate::equivalent(lhs, rhs) {
                eprintln!("left:\n{lhs}\nright:\n{rhs}\n{error}");
                assert!(false $( , $( $assertarg )+ )?);
            }
        }
    };
}
