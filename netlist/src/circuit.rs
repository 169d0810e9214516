use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt::Display,
};

use indexmap::IndexMap;

use crate::{Catalog, GateDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    pub name: String,
    /// Name of the driving gate; `None` for primary inputs.
    pub source: Option<String>,
    /// Names of the gates reading this wire.
    pub destinations: BTreeSet<String>,
}

impl Wire {
    fn new(name: &str) -> Self {
        Wire { name: name.to_owned(), source: None, destinations: BTreeSet::new() }
    }

    pub fn fanout(&self) -> usize {
        self.destinations.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateInstance {
    pub gate_type: String,
    pub name: String,
    /// Port name to wire name.
    pub inputs: IndexMap<String, String>,
    /// Port name to wire name.
    pub outputs: IndexMap<String, String>,
}

impl GateInstance {
    pub fn new(
        gate_type: impl Into<String>,
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = (String, String)>,
        outputs: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        GateInstance {
            gate_type: gate_type.into(),
            name: name.into(),
            inputs: inputs.into_iter().collect(),
            outputs: outputs.into_iter().collect(),
        }
    }

    pub fn input_wires(&self) -> impl Iterator<Item = &str> {
        self.inputs.values().map(String::as_str)
    }

    pub fn output_wires(&self) -> impl Iterator<Item = &str> {
        self.outputs.values().map(String::as_str)
    }
}

/// A gate-level netlist.
///
/// The wire table is derived from the gate list whenever a circuit is created, so every wire
/// named by a gate port or listed as a primary input or output is present, and `depth` and
/// `gate_count` always describe the gate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    inputs: BTreeSet<String>,
    outputs: BTreeSet<String>,
    gates: Vec<GateInstance>,
    wires: IndexMap<String, Wire>,
    /// Wires driven by more than one gate output; `Wire::source` keeps the first driver.
    contested: BTreeSet<String>,
    depth: usize,
}

impl Circuit {
    pub fn from_parts(inputs: BTreeSet<String>, outputs: BTreeSet<String>, gates: Vec<GateInstance>) -> Self {
        let mut wires: IndexMap<String, Wire> = IndexMap::new();
        let mut contested = BTreeSet::new();
        for name in &inputs {
            wires.entry(name.clone()).or_insert_with(|| Wire::new(name));
        }
        for gate in &gates {
            for wire in gate.input_wires() {
                wires.entry(wire.to_owned()).or_insert_with(|| Wire::new(wire)).destinations.insert(gate.name.clone());
            }
            for wire in gate.output_wires() {
                let entry = wires.entry(wire.to_owned()).or_insert_with(|| Wire::new(wire));
                if entry.source.is_some() {
                    contested.insert(wire.to_owned());
                } else {
                    entry.source = Some(gate.name.clone());
                }
            }
        }
        for name in &outputs {
            wires.entry(name.clone()).or_insert_with(|| Wire::new(name));
        }
        let mut circuit = Circuit { inputs, outputs, gates, wires, contested, depth: 0 };
        match circuit.gate_levels() {
            Some(levels) => circuit.depth = levels.into_iter().max().unwrap_or(0),
            None => tracing::debug!("circuit contains a combinational cycle"),
        }
        circuit
    }

    pub fn inputs(&self) -> &BTreeSet<String> {
        &self.inputs
    }

    pub fn outputs(&self) -> &BTreeSet<String> {
        &self.outputs
    }

    pub fn gates(&self) -> &[GateInstance] {
        &self.gates
    }

    pub fn wires(&self) -> &IndexMap<String, Wire> {
        &self.wires
    }

    pub fn wire(&self, name: &str) -> Option<&Wire> {
        self.wires.get(name)
    }

    pub fn gate(&self, name: &str) -> Option<&GateInstance> {
        self.gates.iter().find(|gate| gate.name == name)
    }

    /// Number of gates on the longest path from a primary input to any gate output.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Wires with more than one driving gate output.
    pub fn contested_wires(&self) -> impl Iterator<Item = &str> {
        self.contested.iter().map(String::as_str)
    }

    /// Wires neither primary inputs nor primary outputs.
    pub fn internal_wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values().filter(|wire| !self.inputs.contains(&wire.name) && !self.outputs.contains(&wire.name))
    }

    pub fn fanout(&self, wire: &str) -> Option<usize> {
        self.wire(wire).map(Wire::fanout)
    }

    /// Largest number of gates reading any single wire.
    pub fn max_fanout(&self) -> usize {
        self.wires.values().map(Wire::fanout).max().unwrap_or(0)
    }

    pub fn histogram(&self) -> BTreeMap<String, usize> {
        let mut histogram = BTreeMap::new();
        for gate in &self.gates {
            *histogram.entry(gate.gate_type.clone()).or_insert(0) += 1;
        }
        histogram
    }

    /// Sum of per-gate transistor counts; `None` if any gate's count is not known.
    pub fn transistor_count(&self, catalog: &Catalog) -> Option<u32> {
        self.gates.iter().map(|gate| catalog.describe(&gate.gate_type)?.transistors()).sum()
    }

    /// Level of each gate: 1 for gates reading only primary inputs, otherwise one more than the
    /// deepest gate driving any of its inputs. Returns `None` if the gate graph has a cycle.
    pub(crate) fn gate_levels(&self) -> Option<Vec<usize>> {
        let mut drivers: HashMap<&str, usize> = HashMap::new();
        for (index, gate) in self.gates.iter().enumerate() {
            for wire in gate.output_wires() {
                drivers.insert(wire, index);
            }
        }
        let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); self.gates.len()];
        let mut pending: Vec<usize> = vec![0; self.gates.len()];
        for (index, gate) in self.gates.iter().enumerate() {
            for wire in gate.input_wires() {
                if let Some(&driver) = drivers.get(wire) {
                    consumers[driver].push(index);
                    pending[index] += 1;
                }
            }
        }
        let mut levels = vec![1; self.gates.len()];
        let mut ready: Vec<usize> = (0..self.gates.len()).filter(|&index| pending[index] == 0).collect();
        let mut visited = 0;
        while let Some(index) = ready.pop() {
            visited += 1;
            for &consumer in &consumers[index] {
                levels[consumer] = levels[consumer].max(levels[index] + 1);
                pending[consumer] -= 1;
                if pending[consumer] == 0 {
                    ready.push(consumer);
                }
            }
        }
        if visited == self.gates.len() { Some(levels) } else { None }
    }

    /// Rebuilds the circuit with every gate passed through `f`.
    pub fn map_gates(&self, f: impl FnMut(&GateInstance) -> GateInstance) -> Circuit {
        Circuit::from_parts(self.inputs.clone(), self.outputs.clone(), self.gates.iter().map(f).collect())
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |names: &BTreeSet<String>| names.iter().cloned().collect::<Vec<_>>().join(", ");
        writeln!(f, "circuit ({}) -> ({}) {{", join(&self.inputs), join(&self.outputs))?;
        for gate in &self.gates {
            let ports = |ports: &IndexMap<String, String>| {
                ports.iter().map(|(port, wire)| format!("{port}={wire}")).collect::<Vec<_>>().join(" ")
            };
            writeln!(f, "  {} {}: {} -> {}", gate.gate_type, gate.name, ports(&gate.inputs), ports(&gate.outputs))?;
        }
        write!(f, "}}")
    }
}

/// Assembles a circuit gate by gate, naming wires `w0, w1, ...` and gates `<type>_0, <type>_1, ...`.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    inputs: BTreeSet<String>,
    gates: Vec<GateInstance>,
    used_names: BTreeSet<String>,
    next_wire: usize,
    next_gate: usize,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, name: &str) -> String {
        if self.inputs.insert(name.to_owned()) {
            self.used_names.insert(name.to_owned());
        }
        name.to_owned()
    }

    fn fresh_wire(&mut self) -> String {
        loop {
            let name = format!("w{}", self.next_wire);
            self.next_wire += 1;
            if self.used_names.insert(name.clone()) {
                return name;
            }
        }
    }

    /// Instantiates `gate` with `wires[i]` on its `i`-th input port and returns the output wire.
    pub fn add_gate(&mut self, gate: &GateDescriptor, wires: &[String]) -> String {
        debug_assert_eq!(gate.arity(), wires.len());
        let output = self.fresh_wire();
        let name = format!("{}_{}", gate.name().to_lowercase(), self.next_gate);
        self.next_gate += 1;
        tracing::trace!(gate = %name, inputs = ?wires, %output, "adding gate");
        self.gates.push(GateInstance::new(
            gate.name(),
            name,
            gate.inputs().iter().cloned().zip(wires.iter().cloned()),
            [(gate.output().to_owned(), output.clone())],
        ));
        output
    }

    pub fn finish(self, output: String) -> Circuit {
        Circuit::from_parts(self.inputs, BTreeSet::from([output]), self.gates)
    }
}

/// What a polymorphic gate instance does in each supply mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateModes {
    pub hvdd: String,
    pub lvdd: String,
}

/// A circuit computing one function under HVDD and another under LVDD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolymorphicCircuit {
    circuit: Circuit,
    modes: Vec<GateModes>,
    hvdd_function: String,
    lvdd_function: String,
}

impl PolymorphicCircuit {
    /// `modes[i]` describes `circuit.gates()[i]`.
    pub fn new(
        circuit: Circuit,
        modes: Vec<GateModes>,
        hvdd_function: impl Into<String>,
        lvdd_function: impl Into<String>,
    ) -> Self {
        debug_assert_eq!(circuit.gate_count(), modes.len());
        PolymorphicCircuit { circuit, modes, hvdd_function: hvdd_function.into(), lvdd_function: lvdd_function.into() }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn modes(&self) -> &[GateModes] {
        &self.modes
    }

    pub fn gates(&self) -> impl Iterator<Item = (&GateInstance, &GateModes)> {
        self.circuit.gates().iter().zip(self.modes.iter())
    }

    pub fn hvdd_function(&self) -> &str {
        &self.hvdd_function
    }

    pub fn lvdd_function(&self) -> &str {
        &self.lvdd_function
    }
}
