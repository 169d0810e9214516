use std::fmt::Display;

use indexmap::IndexMap;

use crate::{BinaryOp, Expr, ParseError};

/// Supply mode of a polymorphic gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Hvdd,
    Lvdd,
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Hvdd => write!(f, "HVDD"),
            Mode::Lvdd => write!(f, "LVDD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateFunction {
    /// The library declares ports but no behavior.
    Opaque,
    Single(Expr),
    Polymorphic { hvdd: Expr, lvdd: Expr },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDescriptor {
    name: String,
    inputs: Vec<String>,
    output: String,
    function: GateFunction,
    transistors: Option<u32>,
}

impl GateDescriptor {
    pub fn new(name: impl Into<String>, inputs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        GateDescriptor {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: "Z".to_owned(),
            function: GateFunction::Opaque,
            transistors: None,
        }
    }

    /// Creates a gate whose ports are exactly the variables of `function`, in sorted order.
    pub fn from_function(name: impl Into<String>, function: &str) -> Result<Self, ParseError> {
        let function: Expr = function.parse()?;
        Ok(GateDescriptor::new(name, function.variables()).with_function(GateFunction::Single(function)))
    }

    pub fn polymorphic(
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = impl Into<String>>,
        hvdd: &str,
        lvdd: &str,
    ) -> Result<Self, ParseError> {
        Ok(GateDescriptor::new(name, inputs)
            .with_function(GateFunction::Polymorphic { hvdd: hvdd.parse()?, lvdd: lvdd.parse()? }))
    }

    pub fn with_function(mut self, function: GateFunction) -> Self {
        self.function = function;
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_transistors(mut self, transistors: u32) -> Self {
        self.transistors = Some(transistors);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn function(&self) -> &GateFunction {
        &self.function
    }

    pub fn transistors(&self) -> Option<u32> {
        self.transistors
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(self.function, GateFunction::Polymorphic { .. })
    }

    /// The function the gate computes under `mode`. Single-function gates ignore the mode.
    pub fn mode_function(&self, mode: Mode) -> Option<&Expr> {
        match (&self.function, mode) {
            (GateFunction::Opaque, _) => None,
            (GateFunction::Single(function), _) => Some(function),
            (GateFunction::Polymorphic { hvdd, .. }, Mode::Hvdd) => Some(hvdd),
            (GateFunction::Polymorphic { lvdd, .. }, Mode::Lvdd) => Some(lvdd),
        }
    }

    /// Evaluates the gate with `values[i]` driving `self.inputs()[i]`.
    pub fn evaluate(&self, mode: Mode, values: &[bool]) -> Option<bool> {
        let function = self.mode_function(mode)?;
        let value = |port: &str| {
            self.inputs.iter().position(|input| input == port).and_then(|index| values.get(index)).copied().unwrap_or(false)
        };
        Some(function.eval(&value))
    }
}

const STANDARD_GATES: &[(&str, &str)] = &[
    ("TH12", "A | B"),
    ("TH22", "A & B"),
    ("TH12m", "A | B"),
    ("TH22m", "A & B"),
    ("THXOR", "A ^ B"),
    ("TH13", "A | B | C"),
    ("TH23", "(A & B) | (A & C) | (B & C)"),
    ("TH33", "A & B & C"),
    ("TH23w2", "A | (B & C)"),
    ("TH33w2", "(A & B) | (A & C)"),
    ("TH14", "A | B | C | D"),
    ("TH24", "(A & B) | (A & C) | (A & D) | (B & C) | (B & D) | (C & D)"),
    ("TH34", "(A & B & C) | (A & B & D) | (A & C & D) | (B & C & D)"),
    ("TH44", "A & B & C & D"),
    ("TH24w2", "A | (B & C) | (B & D) | (C & D)"),
    ("TH34w2", "(A & B) | (A & C) | (A & D) | (B & C & D)"),
    ("TH44w2", "(A & B & C) | (A & B & D) | (A & C & D)"),
    ("TH34w3", "A | (B & C & D)"),
    ("TH44w3", "(A & B) | (A & C) | (A & D)"),
    ("TH24w22", "A | B | (C & D)"),
    ("TH34w22", "(A & B) | (A & C) | (A & D) | (B & C) | (B & D)"),
    ("TH44w22", "(A & B & C) | (A & B & D) | (A & C & D) | (B & C)"),
    ("TH54w22", "A & B & C | A & B & D"),
    ("TH34w32", "A | B | (C & D)"),
    ("TH54w32", "A & B | A & C & D | B & C & D"),
    ("TH44w322", "A & B | A & C | A & D | B & C"),
    ("TH54w322", "A & B & C | A & B & D | C & D"),
    ("THxor0", "A & B | C & D"),
    ("THand0", "A & B | B & C | A & D"),
    ("TH24comp", "A & C | B & C | A & D | B & D"),
];

// name, ports, hvdd function, lvdd function, transistors
const POLYMORPHIC_GATES: &[(&str, &[&str], &str, &str, u32)] = &[
    ("th12m_th22m", &["a", "b"], "a | b", "a & b", 14),
    ("th13m_th23m", &["a", "b", "c"], "a | b | c", "(a & b) | (b & c) | (c & a)", 16),
    ("th13m_th33m", &["a", "b", "c"], "a | b | c", "a & b & c", 16),
    ("th33w2m_th33m", &["a", "b", "c"], "(a & b) | (a & c)", "a & b & c", 16),
    ("th23m_th33m", &["a", "b", "c"], "(a & b) | (b & c) | (c & a)", "a & b & c", 16),
    ("th34m_th44m", &["a", "b", "c", "d"], "(a & b & c) | (a & c & d) | (a & b & d) | (b & c & d)", "a & b & c & d", 18),
    ("th24w22m_th24w2m", &["a", "b", "c", "d"], "a | b | (c & d)", "a | (b & c) | (b & d) | (c & d)", 18),
];

// base gate in HVDD mode, base gate in LVDD mode, polymorphic gate
const POLYMORPHIC_PAIRS: &[(&str, &str, &str)] = &[
    ("th12", "th22", "th12m_th22m"),
    ("th13", "th23", "th13m_th23m"),
    ("th13", "th33", "th13m_th33m"),
    ("th23", "th33", "th23m_th33m"),
    ("th34", "th44", "th34m_th44m"),
    ("th33w2", "th33", "th33w2m_th33m"),
    ("thxor0", "th34w3", "thxor0m_th34w3m"),
    ("th24w22", "th24w2", "th24w22m_th24w2m"),
    ("th54w322", "th44w22", "th54w322m_th44w22m"),
];

fn base_name(gate_type: &str) -> String {
    gate_type.to_ascii_lowercase().trim_end_matches('m').to_owned()
}

/// Looks up the polymorphic gate that subsumes `first` and `second`, in either order.
///
/// Names are compared case-insensitively with any trailing `m` marker removed, so `TH12m` pairs
/// the same way `TH12` does.
pub fn polymorphic_pair(first: &str, second: &str) -> Option<&'static str> {
    let (first, second) = (base_name(first), base_name(second));
    POLYMORPHIC_PAIRS
        .iter()
        .find(|(hvdd, lvdd, _)| (*hvdd == first && *lvdd == second) || (*hvdd == second && *lvdd == first))
        .map(|(_, _, polymorphic)| *polymorphic)
}

/// Gate types able to implement a binary operator, most preferred first.
pub fn operator_candidates(op: BinaryOp) -> &'static [&'static str] {
    match op {
        BinaryOp::And => &["TH22", "TH22m", "TH33"],
        BinaryOp::Or => &["TH12", "TH12m", "TH13"],
        BinaryOp::Xor => &["THXOR"],
    }
}

/// The gate type every occurrence of `op` maps to unless overridden.
pub fn base_gate(op: BinaryOp) -> &'static str {
    operator_candidates(op)[0]
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    gates: IndexMap<String, GateDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All standard threshold gates, the XOR gate, and the built-in polymorphic gates.
    pub fn standard() -> Self {
        let mut catalog = Catalog::new();
        for &(name, function) in STANDARD_GATES {
            let gate = GateDescriptor::from_function(name, function).expect("malformed built-in gate function");
            catalog.insert(gate);
        }
        for &(name, ports, hvdd, lvdd, transistors) in POLYMORPHIC_GATES {
            let gate = GateDescriptor::polymorphic(name, ports.iter().copied(), hvdd, lvdd)
                .expect("malformed built-in gate function")
                .with_transistors(transistors);
            catalog.insert(gate);
        }
        catalog
    }

    /// Adds a gate, replacing any gate of the same name.
    pub fn insert(&mut self, gate: GateDescriptor) {
        self.gates.insert(gate.name.clone(), gate);
    }

    pub fn remove(&mut self, name: &str) -> Option<GateDescriptor> {
        self.gates.shift_remove(name)
    }

    /// Keeps only the gates named in `names`.
    pub fn retain(&mut self, names: &[&str]) {
        self.gates.retain(|name, _| names.contains(&name.as_str()));
    }

    pub fn has(&self, name: &str) -> bool {
        self.gates.contains_key(name)
    }

    pub fn describe(&self, name: &str) -> Option<&GateDescriptor> {
        self.gates.get(name)
    }

    pub fn find_ignore_case(&self, name: &str) -> Option<&GateDescriptor> {
        self.describe(name).or_else(|| self.gates.values().find(|gate| gate.name.eq_ignore_ascii_case(name)))
    }

    /// The catalog entry for the polymorphic gate that subsumes `first` and `second`.
    pub fn polymorphic_for(&self, first: &str, second: &str) -> Option<&GateDescriptor> {
        self.find_ignore_case(polymorphic_pair(first, second)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GateDescriptor> {
        self.gates.values()
    }

    pub fn polymorphic_gates(&self) -> impl Iterator<Item = &GateDescriptor> {
        self.iter().filter(|gate| gate.is_polymorphic())
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl FromIterator<GateDescriptor> for Catalog {
    fn from_iter<T: IntoIterator<Item = GateDescriptor>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for gate in iter {
            catalog.insert(gate);
        }
        catalog
    }
}
