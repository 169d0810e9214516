use mtncl_netlist::{BinaryOp, Catalog, Circuit, CircuitBuilder, Expr, GateDescriptor, base_gate};
use tracing::{debug, debug_span, trace, warn};

use crate::SynthConfig;

/// Checks that `expr` has no NOT node and that every operator's base gate is in the catalog.
pub fn is_realizable(expr: &Expr, catalog: &Catalog) -> bool {
    match expr {
        Expr::Var(_) => true,
        Expr::Not(_) => false,
        Expr::Binary(op, lhs, rhs) => {
            catalog.has(base_gate(*op)) && is_realizable(lhs, catalog) && is_realizable(rhs, catalog)
        }
    }
}

struct Generator<'a> {
    catalog: &'a Catalog,
    config: &'a SynthConfig,
}

impl<'a> Generator<'a> {
    fn candidates(&self, op: BinaryOp) -> impl Iterator<Item = &'a GateDescriptor> + use<'a> {
        let catalog = self.catalog;
        self.config.candidates(op).into_iter().filter_map(move |name| catalog.describe(name))
    }

    fn primary_gate(&self, op: BinaryOp) -> Option<&'a GateDescriptor> {
        self.candidates(op).next()
    }

    /// Lowers `expr` into `builder`, returning the wire carrying its value. `root_gate` replaces
    /// the gate chosen for the topmost operator only.
    fn lower(
        &self,
        builder: &mut CircuitBuilder,
        expr: &Expr,
        root_gate: Option<&GateDescriptor>,
    ) -> Option<String> {
        match expr {
            Expr::Var(name) => Some(builder.add_input(name)),
            Expr::Not(_) => None,
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.lower(builder, lhs, None)?;
                let rhs = self.lower(builder, rhs, None)?;
                let gate = match root_gate {
                    Some(gate) => gate,
                    None => self.primary_gate(*op)?,
                };
                let wires = spread(&[lhs, rhs], gate.arity())?;
                Some(builder.add_gate(gate, &wires))
            }
        }
    }

    fn build(&self, expr: &Expr, root_gate: Option<&GateDescriptor>) -> Option<Circuit> {
        let mut builder = CircuitBuilder::new();
        // Gate outputs must not take the name of a variable that is only reached later.
        for name in expr.variables() {
            builder.add_input(&name);
        }
        let output = self.lower(&mut builder, expr, root_gate)?;
        Some(builder.finish(output))
    }

    /// Gates that may stand in for the root operator's primary choice.
    fn root_alternatives(&self, expr: &Expr) -> Vec<&'a GateDescriptor> {
        let Expr::Binary(op, _, _) = expr else {
            return Vec::new();
        };
        let primary = self.primary_gate(*op).map(GateDescriptor::name);
        self.candidates(*op).filter(|gate| Some(gate.name()) != primary).collect()
    }

    fn generate(&self, expr: &Expr, count: usize) -> Vec<Circuit> {
        let _span = debug_span!("generate", %expr, count).entered();
        if count == 0 {
            return Vec::new();
        }
        if !is_realizable(expr, self.catalog) {
            warn!("expression contains NOT or needs a gate missing from the library");
            return Vec::new();
        }

        let mut plans: Vec<Option<&GateDescriptor>> = vec![None];
        plans.extend(self.root_alternatives(expr).into_iter().map(Some));

        let mut circuits: Vec<Circuit> = Vec::new();
        for (attempt, root_gate) in plans.into_iter().take(self.config.attempt_budget.max(1)).enumerate() {
            if circuits.len() >= count {
                break;
            }
            let Some(circuit) = self.build(expr, root_gate) else {
                trace!(attempt, root = ?root_gate.map(GateDescriptor::name), "root gate does not fit");
                continue;
            };
            if let Err(violation) = circuit.validate(self.catalog, &self.config.limits) {
                debug!(attempt, %violation, "rejected candidate");
                continue;
            }
            if circuits.iter().any(|accepted| accepted.is_equivalent(&circuit)) {
                trace!(attempt, "duplicate candidate");
                continue;
            }
            debug!(attempt, gates = circuit.gate_count(), depth = circuit.depth(), "accepted candidate");
            circuits.push(circuit);
        }
        if circuits.is_empty() {
            warn!("no circuit satisfies the constraints");
        } else {
            debug!(found = circuits.len(), "generation done");
        }
        circuits
    }
}

/// Repeats `operands` in order until `arity` wires are available.
fn spread(operands: &[String], arity: usize) -> Option<Vec<String>> {
    if arity < operands.len() {
        return None;
    }
    Some(operands.iter().cycle().take(arity).cloned().collect())
}

/// Produces up to `count` structurally distinct circuits for `expr`.
///
/// The first circuit maps every operator onto its most preferred gate. Further circuits swap in
/// the other candidates for the root operator, repeating input wires where a wider gate needs
/// them. Candidates failing validation and duplicates of earlier results are skipped.
pub fn generate(expr: &Expr, catalog: &Catalog, config: &SynthConfig, count: usize) -> Vec<Circuit> {
    Generator { catalog, config }.generate(expr, count)
}
