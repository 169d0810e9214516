use std::io;

use jzon::JsonValue;
use mtncl_netlist::{Catalog, GateDescriptor, GateFunction, Limits};
use mtncl_synth::{OptimizationTarget, SynthConfig};

use crate::Error;

fn read_json(reader: &mut impl io::Read) -> Result<JsonValue, Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(jzon::parse(&text)?)
}

fn port_names(arity: usize) -> Vec<String> {
    (0..arity).map(|index| char::from(b'A' + (index % 26) as u8).to_string()).collect()
}

fn import_gate(name: &str, value: &JsonValue) -> Result<GateDescriptor, Error> {
    if !value.is_object() {
        return Err(Error::Format(format!("gate {name:?} is not an object")));
    }
    let inputs: Vec<String> = if value["inputs"].is_array() {
        value["inputs"]
            .members()
            .map(|port| {
                port.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| Error::Format(format!("gate {name:?} has a non-string port name")))
            })
            .collect::<Result<_, _>>()?
    } else if let Some(arity) = value["arity"].as_usize() {
        port_names(arity)
    } else {
        return Err(Error::Format(format!("gate {name:?} declares neither inputs nor arity")));
    };
    if let Some(arity) = value["arity"].as_usize()
        && arity != inputs.len()
    {
        return Err(Error::Format(format!("gate {name:?} has arity {arity} but {} inputs", inputs.len())));
    }

    let parse = |key: &str| -> Result<Option<mtncl_netlist::Expr>, Error> {
        match value[key].as_str() {
            None => Ok(None),
            Some(text) => text
                .parse()
                .map(Some)
                .map_err(|error| Error::Format(format!("gate {name:?} {key} function: {error}"))),
        }
    };
    let function = match (parse("function")?, parse("hvdd")?, parse("lvdd")?) {
        (_, Some(hvdd), Some(lvdd)) => GateFunction::Polymorphic { hvdd, lvdd },
        (Some(function), None, None) => GateFunction::Single(function),
        (None, None, None) => GateFunction::Opaque,
        _ => return Err(Error::Format(format!("gate {name:?} must give both hvdd and lvdd functions"))),
    };

    let mut gate = GateDescriptor::new(name, inputs).with_function(function);
    if let Some(output) = value["output"].as_str() {
        gate = gate.with_output(output);
    }
    if let Some(transistors) = value["transistors"].as_u32() {
        gate = gate.with_transistors(transistors);
    }
    Ok(gate)
}

/// Reads a gate library.
///
/// The document is an object mapping gate names to gate objects, either at the top level or
/// under a `"gates"` key. Each gate lists its `"inputs"` port names (or just an `"arity"`, naming
/// ports `A`, `B`, ...), and may give an `"output"` port name, a `"function"`, a pair of
/// `"hvdd"`/`"lvdd"` functions for polymorphic gates, and a `"transistors"` count. Setting
/// `"standard": true` starts from the built-in catalog.
pub fn import_library(reader: &mut impl io::Read) -> Result<Catalog, Error> {
    let root = read_json(reader)?;
    if !root.is_object() {
        return Err(Error::Format("gate library must be an object".to_owned()));
    }
    let mut catalog = if root["standard"].as_bool() == Some(true) { Catalog::standard() } else { Catalog::new() };
    let gates = if root.has_key("gates") { &root["gates"] } else { &root };
    for (name, value) in gates.entries() {
        if value.is_boolean() {
            continue;
        }
        catalog.insert(import_gate(name, value)?);
    }
    Ok(catalog)
}

fn import_bound(options: &JsonValue, key: &str, bound: &mut Option<usize>) -> Result<(), Error> {
    if !options.has_key(key) {
        return Ok(());
    }
    let value = &options[key];
    *bound = if value.is_null() {
        None
    } else {
        Some(value.as_usize().ok_or_else(|| Error::Format(format!("{key} must be a non-negative integer")))?)
    };
    Ok(())
}

fn import_names(value: &JsonValue, key: &str, names: &mut Vec<String>) -> Result<(), Error> {
    if value.is_null() {
        return Ok(());
    }
    if !value.is_array() {
        return Err(Error::Format(format!("{key} must be a list of gate names")));
    }
    *names = value
        .members()
        .map(|name| name.as_str().map(str::to_owned).ok_or_else(|| Error::Format(format!("{key} must hold strings"))))
        .collect::<Result<_, _>>()?;
    Ok(())
}

fn import_options(options: &JsonValue, config: &mut SynthConfig) -> Result<(), Error> {
    let limits: &mut Limits = &mut config.limits;
    if options.has_key("min_gates") {
        limits.min_gates =
            options["min_gates"].as_usize().ok_or_else(|| Error::Format("min_gates must be a non-negative integer".to_owned()))?;
    }
    import_bound(options, "max_gates", &mut limits.max_gates)?;
    import_bound(options, "max_depth", &mut limits.max_depth)?;
    import_bound(options, "max_fanout", &mut limits.max_fanout)?;

    import_names(&options["preferred_gates"], "preferred_gates", &mut config.preferred_gates)?;
    import_names(&options["avoid_gates"], "avoid_gates", &mut config.avoid_gates)?;
    import_names(&options["gates"]["preferred"], "gates.preferred", &mut config.preferred_gates)?;
    import_names(&options["gates"]["avoid"], "gates.avoid", &mut config.avoid_gates)?;

    if let Some(target) = options["optimization_target"].as_str() {
        config.optimization_target = target.parse::<OptimizationTarget>().map_err(Error::Format)?;
    }
    let weights = &options["optimization_weights"];
    for (key, weight) in [
        ("area", &mut config.optimization_weights.area),
        ("delay", &mut config.optimization_weights.delay),
        ("power", &mut config.optimization_weights.power),
    ] {
        if let Some(value) = weights[key].as_f64() {
            *weight = value;
        }
    }

    if let Some(oversample) = options["oversample"].as_usize() {
        config.oversample = oversample;
    }
    if let Some(attempt_budget) = options["attempt_budget"].as_usize() {
        config.attempt_budget = attempt_budget;
    }
    Ok(())
}

/// Reads synthesis options from a JSON object. Options may appear at the top level or inside a
/// `"constraints"` object; top-level keys take precedence. Unknown keys are ignored.
pub fn import_config(reader: &mut impl io::Read) -> Result<SynthConfig, Error> {
    let root = read_json(reader)?;
    if !root.is_object() {
        return Err(Error::Format("configuration must be an object".to_owned()));
    }
    let mut config = SynthConfig::default();
    if root["constraints"].is_object() {
        import_options(&root["constraints"], &mut config)?;
    }
    import_options(&root, &mut config)?;
    Ok(config)
}
