use std::io;

use mtncl_netlist::{Catalog, Circuit, PolymorphicCircuit};
use mtncl_synth::SynthConfig;

fn write_summary(writer: &mut impl io::Write, circuits: &[&Circuit], catalog: &Catalog) -> io::Result<()> {
    writeln!(writer, "| Circuit | Gates | Depth | Max fanout | Transistors |")?;
    writeln!(writer, "|---|---|---|---|---|")?;
    for (index, circuit) in circuits.iter().enumerate() {
        let transistors = match circuit.transistor_count(catalog) {
            Some(count) => count.to_string(),
            None => "unknown".to_owned(),
        };
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} |",
            index + 1,
            circuit.gate_count(),
            circuit.depth(),
            circuit.max_fanout(),
            transistors
        )?;
    }
    writeln!(writer)
}

fn write_details(writer: &mut impl io::Write, index: usize, circuit: &Circuit, heading: &str) -> io::Result<()> {
    writeln!(writer, "### Circuit {}", index + 1)?;
    writeln!(writer)?;
    writeln!(writer, "Gate Count: {}", circuit.gate_count())?;
    writeln!(writer, "Circuit Depth: {}", circuit.depth())?;
    writeln!(writer, "Inputs: {}", circuit.inputs().iter().cloned().collect::<Vec<_>>().join(", "))?;
    writeln!(writer, "Outputs: {}", circuit.outputs().iter().cloned().collect::<Vec<_>>().join(", "))?;
    writeln!(writer)?;
    writeln!(writer, "{heading}:")?;
    for (gate_type, count) in circuit.histogram() {
        writeln!(writer, "- {gate_type}: {count}")?;
    }
    writeln!(writer)
}

fn write_configuration(writer: &mut impl io::Write, config: &SynthConfig) -> io::Result<()> {
    let bound = |limit: Option<usize>| limit.map_or("unbounded".to_owned(), |limit| limit.to_string());
    writeln!(writer, "Gates: {} to {}", config.limits.min_gates, bound(config.limits.max_gates))?;
    writeln!(writer, "Maximum Depth: {}", bound(config.limits.max_depth))?;
    writeln!(writer, "Maximum Fanout: {}", bound(config.limits.max_fanout))?;
    writeln!(writer, "Optimization Target: {}", config.optimization_target)?;
    writeln!(writer)
}

/// Writes the markdown report for single-function synthesis.
pub fn write_report(
    writer: &mut impl io::Write,
    equation: &str,
    circuits: &[Circuit],
    catalog: &Catalog,
    config: &SynthConfig,
) -> io::Result<()> {
    writeln!(writer, "# MTNCL Circuit Generation Results")?;
    writeln!(writer)?;
    writeln!(writer, "## Configuration")?;
    writeln!(writer)?;
    writeln!(writer, "Boolean Equation: {equation}")?;
    writeln!(writer)?;
    write_configuration(writer, config)?;
    writeln!(writer, "## Generated Circuits")?;
    writeln!(writer)?;
    write_summary(writer, &circuits.iter().collect::<Vec<_>>(), catalog)?;
    for (index, circuit) in circuits.iter().enumerate() {
        write_details(writer, index, circuit, "Gates Used")?;
    }
    Ok(())
}

/// Writes the markdown report for dual-mode synthesis.
pub fn write_polymorphic_report(
    writer: &mut impl io::Write,
    circuits: &[PolymorphicCircuit],
    hvdd: &str,
    lvdd: &str,
    catalog: &Catalog,
    config: &SynthConfig,
) -> io::Result<()> {
    writeln!(writer, "# Polymorphic MTNCL Circuit Generation Results")?;
    writeln!(writer)?;
    writeln!(writer, "## Configuration")?;
    writeln!(writer)?;
    writeln!(writer, "HVDD Function: {hvdd}")?;
    writeln!(writer, "LVDD Function: {lvdd}")?;
    writeln!(writer)?;
    write_configuration(writer, config)?;
    writeln!(writer, "## Generated Circuits")?;
    writeln!(writer)?;
    write_summary(writer, &circuits.iter().map(PolymorphicCircuit::circuit).collect::<Vec<_>>(), catalog)?;
    for (index, polymorphic) in circuits.iter().enumerate() {
        write_details(writer, index, polymorphic.circuit(), "Polymorphic Gates Used")?;
        writeln!(writer, "Gate Modes:")?;
        for (gate, modes) in polymorphic.gates() {
            writeln!(writer, "- {} ({}): HVDD {}, LVDD {}", gate.name, gate.gate_type, modes.hvdd, modes.lvdd)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
