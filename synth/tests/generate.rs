use std::collections::BTreeSet;

use mtncl_netlist::{Catalog, Expr, Limits, assert_equivalent};
use mtncl_synth::{SynthConfig, generate, is_realizable};

fn expr(text: &str) -> Expr {
    text.parse().unwrap()
}

fn catalog_of(names: &[&str]) -> Catalog {
    let mut catalog = Catalog::standard();
    catalog.retain(names);
    catalog
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_single_or() {
    let circuits = generate(&expr("A + B"), &catalog_of(&["TH12"]), &SynthConfig::default(), 5);
    assert_eq!(circuits.len(), 1);
    let circuit = &circuits[0];
    assert_eq!(circuit.gate_count(), 1);
    assert_eq!(circuit.gates()[0].gate_type, "TH12");
    assert_eq!(circuit.inputs(), &set(&["A", "B"]));
    assert_eq!(circuit.outputs().len(), 1);
    assert_eq!(circuit.depth(), 1);
}

#[test]
fn test_and_of_ors() {
    let circuits = generate(&expr("(A + B) & (C + D)"), &catalog_of(&["TH12", "TH22"]), &SynthConfig::default(), 1);
    assert_eq!(circuits.len(), 1);
    let circuit = &circuits[0];
    assert_eq!(circuit.gate_count(), 3);
    assert_eq!(circuit.histogram().get("TH12"), Some(&2));
    assert_eq!(circuit.histogram().get("TH22"), Some(&1));
    assert_eq!(circuit.inputs().len(), 4);
    assert_eq!(circuit.depth(), 2);
    // The root gate drives the only output.
    let root = circuit.gates().last().unwrap();
    assert_eq!(root.output_wires().collect::<Vec<_>>(), circuit.outputs().iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_not_rejected() {
    let catalog = Catalog::standard();
    for text in ["!A", "A + !B", "!(A & B) ^ C"] {
        assert!(!is_realizable(&expr(text), &catalog));
        assert!(generate(&expr(text), &catalog, &SynthConfig::default(), 3).is_empty(), "{text}");
    }
}

#[test]
fn test_missing_gate() {
    let mut catalog = Catalog::standard();
    for name in ["TH12", "TH12m", "TH13"] {
        catalog.remove(name);
    }
    assert!(generate(&expr("A + B"), &catalog, &SynthConfig::default(), 3).is_empty());
    assert!(!generate(&expr("A & B"), &catalog, &SynthConfig::default(), 3).is_empty());
}

#[test]
fn test_root_alternatives() {
    let circuits = generate(&expr("A + B"), &Catalog::standard(), &SynthConfig::default(), 5);
    let types: Vec<&str> = circuits.iter().map(|circuit| circuit.gates()[0].gate_type.as_str()).collect();
    assert_eq!(types, ["TH12", "TH12m", "TH13"]);
    let th13 = &circuits[2].gates()[0];
    assert_eq!(th13.input_wires().collect::<Vec<_>>(), ["A", "B", "A"]);
    for (index, circuit) in circuits.iter().enumerate() {
        assert!(circuit.is_valid(&Catalog::standard(), &Limits::default()));
        for other in &circuits[index + 1..] {
            assert!(!circuit.is_equivalent(other));
        }
    }
}

#[test]
fn test_alternatives_only_at_root() {
    let circuits = generate(&expr("(A & B) + C"), &Catalog::standard(), &SynthConfig::default(), 5);
    assert_eq!(circuits.len(), 3);
    for circuit in &circuits {
        assert_eq!(circuit.gates()[0].gate_type, "TH22");
    }
    assert_eq!(circuits[2].gates()[1].gate_type, "TH13");
    assert_eq!(circuits[2].depth(), 2);
}

#[test]
fn test_count_bounds_results() {
    let catalog = Catalog::standard();
    let config = SynthConfig::default();
    assert!(generate(&expr("A + B"), &catalog, &config, 0).is_empty());
    assert_eq!(generate(&expr("A + B"), &catalog, &config, 2).len(), 2);
    assert_eq!(generate(&expr("A ^ B"), &catalog, &config, 5).len(), 1);
}

#[test]
fn test_attempt_budget() {
    let config = SynthConfig::default().with_attempt_budget(1);
    assert_eq!(generate(&expr("A + B"), &Catalog::standard(), &config, 5).len(), 1);
}

#[test]
fn test_depth_equals_height() {
    let catalog = Catalog::standard();
    let config = SynthConfig::default();
    for text in ["A + B", "A + B + C + D", "(A + B) & (C + D)", "((A & B) + C) ^ (D & (E + F))"] {
        let tree = expr(text);
        let circuits = generate(&tree, &catalog, &config, 1);
        assert_eq!(circuits[0].depth(), tree.height(), "{text}");
        assert_eq!(circuits[0].gate_count(), tree.operator_count(), "{text}");
    }
}

#[test]
fn test_preferred_gates() {
    let config = SynthConfig::default().with_preferred_gates(["TH13"]);
    let circuits = generate(&expr("A + B + C"), &Catalog::standard(), &config, 1);
    let circuit = &circuits[0];
    assert!(circuit.gates().iter().all(|gate| gate.gate_type == "TH13"));
    assert_eq!(circuit.gates()[1].input_wires().collect::<Vec<_>>(), ["w0", "C", "w0"]);
}

#[test]
fn test_avoid_gates() {
    let config = SynthConfig::default().with_avoid_gates(["TH12"]);
    let circuits = generate(&expr("A + B"), &Catalog::standard(), &config, 5);
    let types: Vec<&str> = circuits.iter().map(|circuit| circuit.gates()[0].gate_type.as_str()).collect();
    assert_eq!(types, ["TH12m", "TH13", "TH12"]);
}

#[test]
fn test_limits_reject() {
    let catalog = Catalog::standard();
    let config = SynthConfig::default().with_limits(Limits::default().with_max_gates(Some(1)));
    assert!(generate(&expr("(A + B) & C"), &catalog, &config, 3).is_empty());

    let config = SynthConfig::default().with_limits(Limits::default().with_max_depth(Some(1)));
    assert!(generate(&expr("(A + B) & C"), &catalog, &config, 3).is_empty());
    assert_eq!(generate(&expr("A & C"), &catalog, &config, 3).len(), 3);
}

#[test]
fn test_lone_variable() {
    assert!(generate(&expr("A"), &Catalog::standard(), &SynthConfig::default(), 1).is_empty());
}

#[test]
fn test_deterministic() {
    let catalog = Catalog::standard();
    let config = SynthConfig::default();
    let first = generate(&expr("(A + B) & C"), &catalog, &config, 3);
    let second = generate(&expr("(A + B) & C"), &catalog, &config, 3);
    assert_eq!(first.len(), second.len());
    for (lhs, rhs) in first.iter().zip(second.iter()) {
        assert_equivalent!(lhs, rhs);
        assert_eq!(lhs, rhs);
    }
}

#[test]
fn test_variable_named_like_wire() {
    let circuits = generate(&expr("(A & B) | w0"), &Catalog::standard(), &SynthConfig::default(), 1);
    assert_eq!(circuits.len(), 1);
    let circuit = &circuits[0];
    assert_eq!(circuit.inputs(), &set(&["A", "B", "w0"]));
    for gate in circuit.gates() {
        for wire in gate.output_wires() {
            assert!(!circuit.inputs().contains(wire), "{wire} is both an input and a gate output");
        }
    }
    let and = &circuit.gates()[0];
    let or = &circuit.gates()[1];
    assert_eq!(and.outputs["Z"], "w1");
    assert_eq!(or.inputs["A"], "w1");
    assert_eq!(or.inputs["B"], "w0");
    assert_eq!(circuit.outputs(), &set(&["w2"]));
    assert_eq!(circuit.validate(&Catalog::standard(), &Limits::default()), Ok(()));
}

#[test]
fn test_equivalence_over_candidates() {
    let circuits = generate(&expr("(A + B) & C"), &Catalog::standard(), &SynthConfig::default(), 3);
    assert_eq!(circuits.len(), 3);
    for (index, left) in circuits.iter().enumerate() {
        assert!(left.is_equivalent(left));
        for (other, right) in circuits.iter().enumerate() {
            assert_eq!(left.is_equivalent(right), right.is_equivalent(left));
            assert_eq!(left.is_equivalent(right), index == other);
        }
    }
}
