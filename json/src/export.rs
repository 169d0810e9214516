use std::io;

use indexmap::IndexMap;
use jzon::JsonValue;
use mtncl_netlist::{Catalog, Circuit, GateModes, PolymorphicCircuit};

fn strings<'a>(items: impl IntoIterator<Item = &'a String>) -> JsonValue {
    JsonValue::Array(items.into_iter().map(|item| item.as_str().into()).collect())
}

fn port_map(ports: &IndexMap<String, String>) -> JsonValue {
    let mut value = JsonValue::new_object();
    for (port, wire) in ports {
        value[port.as_str()] = wire.as_str().into();
    }
    value
}

fn export_circuit(circuit: &Circuit, catalog: &Catalog, modes: Option<&[GateModes]>) -> JsonValue {
    let mut gates = Vec::new();
    for (index, gate) in circuit.gates().iter().enumerate() {
        let mut value = JsonValue::new_object();
        value["type"] = gate.gate_type.as_str().into();
        value["name"] = gate.name.as_str().into();
        value["inputs"] = port_map(&gate.inputs);
        value["outputs"] = port_map(&gate.outputs);
        if let Some(modes) = modes.and_then(|modes| modes.get(index)) {
            let mut mode = JsonValue::new_object();
            mode["hvdd"] = modes.hvdd.as_str().into();
            mode["lvdd"] = modes.lvdd.as_str().into();
            value["modes"] = mode;
        }
        gates.push(value);
    }

    let mut wires = JsonValue::new_object();
    for wire in circuit.wires().values() {
        let mut value = JsonValue::new_object();
        value["source"] = match &wire.source {
            Some(source) => source.as_str().into(),
            None => JsonValue::Null,
        };
        value["destinations"] = strings(&wire.destinations);
        wires[wire.name.as_str()] = value;
    }

    let mut histogram = JsonValue::new_object();
    for (gate_type, count) in circuit.histogram() {
        histogram[gate_type.as_str()] = count.into();
    }

    let mut value = JsonValue::new_object();
    value["inputs"] = strings(circuit.inputs());
    value["outputs"] = strings(circuit.outputs());
    value["gates"] = JsonValue::Array(gates);
    value["wires"] = wires;
    value["depth"] = circuit.depth().into();
    value["gate_count"] = circuit.gate_count().into();
    value["histogram"] = histogram;
    value["transistors"] = match circuit.transistor_count(catalog) {
        Some(count) => count.into(),
        None => JsonValue::Null,
    };
    value
}

/// Writes circuits as a JSON document `{"circuits": [...]}`.
pub fn export_circuits(writer: &mut impl io::Write, circuits: &[Circuit], catalog: &Catalog) -> io::Result<()> {
    let mut root = JsonValue::new_object();
    root["circuits"] = JsonValue::Array(circuits.iter().map(|circuit| export_circuit(circuit, catalog, None)).collect());
    writeln!(writer, "{}", root.pretty(2))
}

/// Like [`export_circuits`], additionally recording both target functions and the per-gate modes.
pub fn export_polymorphic(
    writer: &mut impl io::Write,
    circuits: &[PolymorphicCircuit],
    catalog: &Catalog,
) -> io::Result<()> {
    let mut exported = Vec::new();
    for polymorphic in circuits {
        let mut value = export_circuit(polymorphic.circuit(), catalog, Some(polymorphic.modes()));
        value["hvdd_function"] = polymorphic.hvdd_function().into();
        value["lvdd_function"] = polymorphic.lvdd_function().into();
        exported.push(value);
    }
    let mut root = JsonValue::new_object();
    root["circuits"] = JsonValue::Array(exported);
    writeln!(writer, "{}", root.pretty(2))
}
