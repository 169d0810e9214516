use std::io;

use mtncl_json::{Error, import_config, import_library};
use mtncl_netlist::{GateFunction, Mode};
use mtncl_synth::OptimizationTarget;

fn library(text: &str) -> Result<mtncl_netlist::Catalog, Error> {
    import_library(&mut io::Cursor::new(text))
}

fn config(text: &str) -> Result<mtncl_synth::SynthConfig, Error> {
    import_config(&mut io::Cursor::new(text))
}

#[test]
fn test_library_gates() {
    let catalog = library(
        r#"{
            "gates": {
                "TH12": { "inputs": ["A", "B"], "output": "Z", "function": "A | B", "transistors": 12 },
                "th12m_th22m": { "inputs": ["a", "b"], "hvdd": "a | b", "lvdd": "a & b" },
                "TH99": { "arity": 3 }
            }
        }"#,
    )
    .unwrap();
    assert_eq!(catalog.len(), 3);

    let th12 = catalog.describe("TH12").unwrap();
    assert_eq!(th12.inputs(), ["A", "B"]);
    assert_eq!(th12.transistors(), Some(12));
    assert_eq!(th12.evaluate(Mode::Hvdd, &[false, true]), Some(true));

    let polymorphic = catalog.describe("th12m_th22m").unwrap();
    assert!(polymorphic.is_polymorphic());
    assert_eq!(polymorphic.evaluate(Mode::Lvdd, &[false, true]), Some(false));

    let opaque = catalog.describe("TH99").unwrap();
    assert_eq!(opaque.inputs(), ["A", "B", "C"]);
    assert_eq!(opaque.function(), &GateFunction::Opaque);
}

#[test]
fn test_library_top_level_gates() {
    let catalog = library(r#"{ "TH22": { "inputs": ["A", "B"] } }"#).unwrap();
    assert!(catalog.has("TH22"));
    assert_eq!(catalog.describe("TH22").unwrap().output(), "Z");
}

#[test]
fn test_library_extends_standard() {
    let catalog = library(r#"{ "standard": true, "gates": { "TH12": { "arity": 2 } } }"#).unwrap();
    assert!(catalog.has("TH33"));
    assert_eq!(catalog.describe("TH12").unwrap().function(), &GateFunction::Opaque);
}

#[test]
fn test_library_errors() {
    assert!(matches!(library("{"), Err(Error::Json(_))));
    assert!(matches!(library("[]"), Err(Error::Format(_))));
    assert!(matches!(library(r#"{ "TH12": {} }"#), Err(Error::Format(_))));
    assert!(matches!(library(r#"{ "TH12": { "inputs": ["A", "B"], "function": "A |" } }"#), Err(Error::Format(_))));
    assert!(matches!(library(r#"{ "P": { "inputs": ["a"], "hvdd": "a" } }"#), Err(Error::Format(_))));
    assert!(matches!(library(r#"{ "TH12": { "inputs": ["A", "B"], "arity": 3 } }"#), Err(Error::Format(_))));
}

#[test]
fn test_config_defaults() {
    let config = config("{}").unwrap();
    assert_eq!(config.limits.min_gates, 1);
    assert_eq!(config.limits.max_gates, None);
    assert_eq!(config.limits.max_fanout, Some(4));
    assert_eq!(config.limits.max_depth, Some(10));
    assert_eq!(config.optimization_target, OptimizationTarget::Area);
    assert_eq!(config.optimization_weights.area, 1.0);
}

#[test]
fn test_config_options() {
    let config = config(
        r#"{
            "max_depth": 3,
            "max_fanout": null,
            "max_gates": 8,
            "preferred_gates": ["TH13"],
            "avoid_gates": ["TH12m"],
            "optimization_target": "delay",
            "optimization_weights": { "delay": 2.0 },
            "unknown": [1, 2, 3]
        }"#,
    )
    .unwrap();
    assert_eq!(config.limits.max_depth, Some(3));
    assert_eq!(config.limits.max_fanout, None);
    assert_eq!(config.limits.max_gates, Some(8));
    assert_eq!(config.preferred_gates, ["TH13"]);
    assert_eq!(config.avoid_gates, ["TH12m"]);
    assert_eq!(config.optimization_target, OptimizationTarget::Delay);
    assert_eq!(config.optimization_weights.delay, 2.0);
    assert_eq!(config.optimization_weights.power, 0.5);
}

#[test]
fn test_config_constraints_section() {
    let config = config(
        r#"{
            "constraints": { "min_gates": 2, "max_depth": 5, "max_fanout": 2 },
            "gates": { "preferred": ["TH22m"], "avoid": ["TH33"] },
            "max_fanout": 3
        }"#,
    )
    .unwrap();
    assert_eq!(config.limits.min_gates, 2);
    assert_eq!(config.limits.max_depth, Some(5));
    assert_eq!(config.limits.max_fanout, Some(3));
    assert_eq!(config.preferred_gates, ["TH22m"]);
    assert_eq!(config.avoid_gates, ["TH33"]);
}

#[test]
fn test_config_errors() {
    assert!(matches!(config(r#"{ "max_depth": "deep" }"#), Err(Error::Format(_))));
    assert!(matches!(config(r#"{ "optimization_target": "speed" }"#), Err(Error::Format(_))));
    assert!(matches!(config(r#"{ "preferred_gates": "TH12" }"#), Err(Error::Format(_))));
    assert!(matches!(config("1"), Err(Error::Format(_))));
}
