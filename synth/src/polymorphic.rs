use mtncl_netlist::{Catalog, Circuit, Expr, GateInstance, GateModes, ParseError, PolymorphicCircuit};
use tracing::{debug, debug_span, trace, warn};

use crate::{SynthConfig, generate};

/// Whether two circuits differ only in the gate type at each position.
pub fn wire_isomorphic(hvdd: &Circuit, lvdd: &Circuit) -> bool {
    hvdd.gate_count() == lvdd.gate_count()
        && hvdd.inputs() == lvdd.inputs()
        && hvdd.outputs() == lvdd.outputs()
        && hvdd.gates().iter().zip(lvdd.gates()).all(|(hvdd_gate, lvdd_gate)| {
            hvdd_gate.input_wires().eq(lvdd_gate.input_wires()) && hvdd_gate.output_wires().eq(lvdd_gate.output_wires())
        })
}

/// Merges two wire-isomorphic circuits into one built from polymorphic gates. Fails if any
/// aligned pair of gate types has no polymorphic counterpart in `catalog`.
fn merge(catalog: &Catalog, hvdd: &Circuit, lvdd: &Circuit) -> Option<(Circuit, Vec<GateModes>)> {
    let mut gates = Vec::new();
    let mut modes = Vec::new();
    for (index, (hvdd_gate, lvdd_gate)) in hvdd.gates().iter().zip(lvdd.gates()).enumerate() {
        let Some(gate) = catalog.polymorphic_for(&hvdd_gate.gate_type, &lvdd_gate.gate_type) else {
            trace!(hvdd = %hvdd_gate.gate_type, lvdd = %lvdd_gate.gate_type, "no polymorphic gate for pair");
            return None;
        };
        if gate.arity() != hvdd_gate.inputs.len() {
            trace!(gate = gate.name(), "polymorphic gate arity mismatch");
            return None;
        }
        gates.push(GateInstance::new(
            gate.name(),
            format!("{}_{index}", gate.name().to_lowercase()),
            gate.inputs().iter().cloned().zip(hvdd_gate.inputs.values().cloned()),
            hvdd_gate.outputs.values().map(|wire| (gate.output().to_owned(), wire.clone())),
        ));
        modes.push(GateModes { hvdd: hvdd_gate.gate_type.clone(), lvdd: lvdd_gate.gate_type.clone() });
    }
    let circuit = Circuit::from_parts(hvdd.inputs().clone(), hvdd.outputs().clone(), gates);
    Some((circuit, modes))
}

/// Finds circuits computing `hvdd` under HVDD and `lvdd` under LVDD by pairing up single-function
/// circuits of identical structure and swapping each aligned gate pair for a polymorphic gate.
///
/// Returns up to `count` circuits; an empty list means no pairing worked out.
pub fn generate_polymorphic(
    hvdd: &str,
    lvdd: &str,
    catalog: &Catalog,
    config: &SynthConfig,
    count: usize,
) -> Result<Vec<PolymorphicCircuit>, ParseError> {
    let hvdd_expr: Expr = hvdd.parse()?;
    let lvdd_expr: Expr = lvdd.parse()?;
    let _span = debug_span!("generate_polymorphic", hvdd, lvdd, count).entered();
    if count == 0 {
        return Ok(Vec::new());
    }

    let samples = config.oversample.max(count);
    let hvdd_circuits = generate(&hvdd_expr, catalog, config, samples);
    let lvdd_circuits = generate(&lvdd_expr, catalog, config, samples);
    debug!(hvdd = hvdd_circuits.len(), lvdd = lvdd_circuits.len(), "single-function candidates");

    let mut results: Vec<PolymorphicCircuit> = Vec::new();
    'pairs: for hvdd_circuit in &hvdd_circuits {
        for lvdd_circuit in &lvdd_circuits {
            if results.len() >= count {
                break 'pairs;
            }
            if !wire_isomorphic(hvdd_circuit, lvdd_circuit) {
                continue;
            }
            let Some((circuit, modes)) = merge(catalog, hvdd_circuit, lvdd_circuit) else {
                continue;
            };
            if let Err(violation) = circuit.validate(catalog, &config.limits) {
                debug!(%violation, "rejected polymorphic candidate");
                continue;
            }
            if results.iter().any(|accepted| accepted.circuit().is_equivalent(&circuit)) {
                trace!("duplicate polymorphic candidate");
                continue;
            }
            debug!(gates = circuit.gate_count(), "accepted polymorphic candidate");
            results.push(PolymorphicCircuit::new(circuit, modes, hvdd, lvdd));
        }
    }
    if results.is_empty() {
        warn!("no pair of single-function circuits merges into a polymorphic circuit");
    }
    Ok(results)
}
