//! Verilog netlists and testbenches for synthesized MTNCL circuits.

use std::io;

use mtncl_netlist::{Circuit, GateInstance, PolymorphicCircuit};

const CONTROLS: &[&str] = &["sleep", "rst"];
const POLYMORPHIC_CONTROLS: &[&str] = &["vdd_sel", "sleep"];

struct Instance {
    cell: String,
    name: String,
    comment: Option<String>,
    connections: Vec<(String, String)>,
}

impl Instance {
    fn from_gate(gate: &GateInstance) -> Self {
        let connections = gate.inputs.iter().chain(gate.outputs.iter()).map(|(port, wire)| (port.clone(), wire.clone()));
        Instance { cell: gate.gate_type.clone(), name: gate.name.clone(), comment: None, connections: connections.collect() }
    }
}

struct Module<'a> {
    name: &'a str,
    comments: Vec<String>,
    /// Control inputs placed ahead of the data ports.
    controls: &'static [&'static str],
    inputs: Vec<&'a str>,
    outputs: Vec<&'a str>,
    wires: Vec<&'a str>,
    instances: Vec<Instance>,
}

impl<'a> Module<'a> {
    fn new(circuit: &'a Circuit, name: &'a str, controls: &'static [&'static str]) -> Self {
        let mut wires: Vec<&str> = circuit.internal_wires().map(|wire| wire.name.as_str()).collect();
        wires.sort();
        Module {
            name,
            comments: Vec::new(),
            controls,
            inputs: data_inputs(circuit, controls),
            outputs: circuit.outputs().iter().map(String::as_str).collect(),
            wires,
            instances: circuit.gates().iter().map(Instance::from_gate).collect(),
        }
    }

    fn print(&self, writer: &mut impl io::Write) -> io::Result<()> {
        writeln!(writer, "`timescale 1ns/1ps")?;
        writeln!(writer)?;
        for comment in &self.comments {
            writeln!(writer, "// {comment}")?;
        }
        writeln!(writer, "module {} (", self.name)?;
        let mut ports: Vec<String> = Vec::new();
        ports.extend(self.controls.iter().map(|name| format!("    input wire {name}")));
        ports.extend(self.inputs.iter().map(|name| format!("    input wire {name}")));
        ports.extend(self.outputs.iter().map(|name| format!("    output wire {name}")));
        writeln!(writer, "{}", ports.join(",\n"))?;
        writeln!(writer, ");")?;

        if !self.wires.is_empty() {
            writeln!(writer)?;
            for wire in &self.wires {
                writeln!(writer, "    wire {wire};")?;
            }
        }

        for instance in &self.instances {
            writeln!(writer)?;
            if let Some(comment) = &instance.comment {
                writeln!(writer, "    // {comment}")?;
            }
            writeln!(writer, "    {} {} (", instance.cell, instance.name)?;
            let connections: Vec<String> =
                instance.connections.iter().map(|(port, wire)| format!("        .{port}({wire})")).collect();
            writeln!(writer, "{}", connections.join(",\n"))?;
            writeln!(writer, "    );")?;
        }
        writeln!(writer)?;
        writeln!(writer, "endmodule")
    }
}

/// Primary inputs other than the module's control ports, which they are merged into.
fn data_inputs<'a>(circuit: &'a Circuit, controls: &[&str]) -> Vec<&'a str> {
    circuit.inputs().iter().map(String::as_str).filter(|name| !controls.contains(name)).collect()
}

/// Writes `circuit` as a Verilog module with `sleep` and `rst` control inputs.
pub fn write_circuit(writer: &mut impl io::Write, circuit: &Circuit, module_name: &str) -> io::Result<()> {
    let mut module = Module::new(circuit, module_name, CONTROLS);
    module.comments.push(format!("{} gates, depth {}", circuit.gate_count(), circuit.depth()));
    module.print(writer)
}

/// Writes a polymorphic circuit as a Verilog module. The `vdd_sel` input selects the HVDD
/// function when high; every gate also receives `sleep` on its `s` port.
pub fn write_polymorphic_circuit(
    writer: &mut impl io::Write,
    circuit: &PolymorphicCircuit,
    module_name: &str,
) -> io::Result<()> {
    let mut module = Module::new(circuit.circuit(), module_name, POLYMORPHIC_CONTROLS);
    module.comments.push(format!("HVDD function: {}", circuit.hvdd_function()));
    module.comments.push(format!("LVDD function: {}", circuit.lvdd_function()));
    module.comments.push(format!("{} gates, depth {}", circuit.circuit().gate_count(), circuit.circuit().depth()));
    for (instance, modes) in module.instances.iter_mut().zip(circuit.modes()) {
        instance.comment = Some(format!("HVDD {}, LVDD {}", modes.hvdd, modes.lvdd));
        let mut connections = vec![("vdd_sel".to_owned(), "vdd_sel".to_owned()), ("s".to_owned(), "sleep".to_owned())];
        connections.append(&mut instance.connections);
        instance.connections = connections;
    }
    module.print(writer)
}

/// Writes a testbench driving every input of the `module_name` module through reset, an
/// all-ones and an all-zeros phase, and a sleep cycle.
pub fn write_testbench(writer: &mut impl io::Write, circuit: &Circuit, module_name: &str) -> io::Result<()> {
    let inputs = data_inputs(circuit, CONTROLS);
    let outputs: Vec<&str> = circuit.outputs().iter().map(String::as_str).collect();

    writeln!(writer, "`timescale 1ns/1ps")?;
    writeln!(writer)?;
    writeln!(writer, "module {module_name}_tb;")?;
    writeln!(writer, "    reg sleep;")?;
    writeln!(writer, "    reg rst;")?;
    for input in &inputs {
        writeln!(writer, "    reg {input};")?;
    }
    for output in &outputs {
        writeln!(writer, "    wire {output};")?;
    }
    writeln!(writer)?;

    let connections: Vec<String> = CONTROLS
        .iter()
        .chain(inputs.iter())
        .chain(outputs.iter())
        .map(|name| format!("        .{name}({name})"))
        .collect();
    writeln!(writer, "    {module_name} uut (")?;
    writeln!(writer, "{}", connections.join(",\n"))?;
    writeln!(writer, "    );")?;
    writeln!(writer)?;

    let set_inputs = |writer: &mut dyn io::Write, value: u8| -> io::Result<()> {
        for input in &inputs {
            writeln!(writer, "        {input} = {value};")?;
        }
        Ok(())
    };
    writeln!(writer, "    initial begin")?;
    writeln!(writer, "        sleep = 1;")?;
    writeln!(writer, "        rst = 1;")?;
    set_inputs(writer, 0)?;
    writeln!(writer, "        #100;")?;
    writeln!(writer, "        rst = 0;")?;
    writeln!(writer, "        sleep = 0;")?;
    if !inputs.is_empty() {
        writeln!(writer, "        #50;")?;
        set_inputs(writer, 1)?;
        writeln!(writer, "        #50;")?;
        set_inputs(writer, 0)?;
    }
    writeln!(writer, "        #50;")?;
    writeln!(writer, "        sleep = 1;")?;
    writeln!(writer, "        #50;")?;
    writeln!(writer, "        sleep = 0;")?;
    writeln!(writer, "        #100;")?;
    writeln!(writer, "        $finish;")?;
    writeln!(writer, "    end")?;
    writeln!(writer)?;

    let signals: Vec<&str> = CONTROLS.iter().copied().chain(inputs.iter().copied()).chain(outputs.iter().copied()).collect();
    let format: Vec<String> = signals.iter().map(|name| format!("{name}=%b")).collect();
    writeln!(writer, "    initial begin")?;
    writeln!(writer, "        $monitor($time, \" {}\", {});", format.join(" "), signals.join(", "))?;
    writeln!(writer, "    end")?;
    writeln!(writer)?;
    writeln!(writer, "endmodule")
}
