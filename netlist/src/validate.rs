use std::fmt::Display;

use crate::{Catalog, Circuit};

/// Structural bounds a circuit must satisfy. `None` leaves a bound open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub min_gates: usize,
    pub max_gates: Option<usize>,
    pub max_fanout: Option<usize>,
    pub max_depth: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { min_gates: 1, max_gates: None, max_fanout: Some(4), max_depth: Some(10) }
    }
}

impl Limits {
    pub fn unbounded() -> Self {
        Limits { min_gates: 0, max_gates: None, max_fanout: None, max_depth: None }
    }

    pub fn with_min_gates(mut self, min_gates: usize) -> Self {
        self.min_gates = min_gates;
        self
    }

    pub fn with_max_gates(mut self, max_gates: Option<usize>) -> Self {
        self.max_gates = max_gates;
        self
    }

    pub fn with_max_fanout(mut self, max_fanout: Option<usize>) -> Self {
        self.max_fanout = max_fanout;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// The first rule a circuit was found to break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    TooFewGates { count: usize, min: usize },
    TooManyGates { count: usize, max: usize },
    MissingWire { gate: String, wire: String },
    MultipleDrivers(String),
    DrivenInput(String),
    UndrivenWire(String),
    DanglingWire(String),
    UnknownGate { gate: String, gate_type: String },
    Cycle,
    FanoutExceeded { wire: String, fanout: usize, max: usize },
    DepthExceeded { depth: usize, max: usize },
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::TooFewGates { count, min } => write!(f, "{count} gates, at least {min} required"),
            Violation::TooManyGates { count, max } => write!(f, "{count} gates, at most {max} allowed"),
            Violation::MissingWire { gate, wire } => write!(f, "gate {gate} refers to unknown wire {wire}"),
            Violation::MultipleDrivers(wire) => write!(f, "wire {wire} has more than one driver"),
            Violation::DrivenInput(wire) => write!(f, "primary input {wire} is driven by a gate"),
            Violation::UndrivenWire(wire) => write!(f, "wire {wire} has no driver"),
            Violation::DanglingWire(wire) => write!(f, "wire {wire} is not read by anything"),
            Violation::UnknownGate { gate, gate_type } => write!(f, "gate {gate} has type {gate_type} not in library"),
            Violation::Cycle => write!(f, "gate graph contains a cycle"),
            Violation::FanoutExceeded { wire, fanout, max } => {
                write!(f, "wire {wire} has fanout {fanout}, at most {max} allowed")
            }
            Violation::DepthExceeded { depth, max } => write!(f, "depth {depth}, at most {max} allowed"),
        }
    }
}

impl std::error::Error for Violation {}

impl Circuit {
    /// Checks the circuit against the gate library and `limits`.
    pub fn validate(&self, catalog: &Catalog, limits: &Limits) -> Result<(), Violation> {
        let count = self.gate_count();
        if count < limits.min_gates {
            return Err(Violation::TooFewGates { count, min: limits.min_gates });
        }
        if let Some(max) = limits.max_gates
            && count > max
        {
            return Err(Violation::TooManyGates { count, max });
        }
        for gate in self.gates() {
            for wire in gate.input_wires().chain(gate.output_wires()) {
                if self.wire(wire).is_none() {
                    return Err(Violation::MissingWire { gate: gate.name.clone(), wire: wire.to_owned() });
                }
            }
        }
        if let Some(wire) = self.contested_wires().next() {
            return Err(Violation::MultipleDrivers(wire.to_owned()));
        }
        for wire in self.wires().values() {
            if wire.source.is_some() && self.inputs().contains(&wire.name) {
                return Err(Violation::DrivenInput(wire.name.clone()));
            }
            if wire.source.is_none() && !self.inputs().contains(&wire.name) {
                return Err(Violation::UndrivenWire(wire.name.clone()));
            }
            if wire.destinations.is_empty() && !self.outputs().contains(&wire.name) {
                return Err(Violation::DanglingWire(wire.name.clone()));
            }
        }
        for gate in self.gates() {
            if !catalog.has(&gate.gate_type) {
                return Err(Violation::UnknownGate { gate: gate.name.clone(), gate_type: gate.gate_type.clone() });
            }
        }
        if self.gate_levels().is_none() {
            return Err(Violation::Cycle);
        }
        if let Some(max) = limits.max_fanout {
            for wire in self.wires().values() {
                if wire.fanout() > max {
                    return Err(Violation::FanoutExceeded { wire: wire.name.clone(), fanout: wire.fanout(), max });
                }
            }
        }
        if let Some(max) = limits.max_depth
            && self.depth() > max
        {
            return Err(Violation::DepthExceeded { depth: self.depth(), max });
        }
        Ok(())
    }

    pub fn is_valid(&self, catalog: &Catalog, limits: &Limits) -> bool {
        self.validate(catalog, limits).is_ok()
    }
}
