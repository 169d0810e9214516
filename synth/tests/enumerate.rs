use std::time::Instant;

use mtncl_netlist::{Catalog, Expr, Limits, Mode};
use mtncl_synth::{PolymorphicEnumerator, PolymorphicMatch, TruthTable, enumerate_polymorphic};

/// Recomputes both tables of a match from scratch and compares them with the targets.
fn check_exact(catalog: &Catalog, hvdd: &str, lvdd: &str, found: &PolymorphicMatch) {
    let hvdd: Expr = hvdd.parse().unwrap();
    let lvdd: Expr = lvdd.parse().unwrap();
    let variables: Vec<String> = hvdd.variables().union(&lvdd.variables()).cloned().collect();
    let gate = catalog.describe(&found.gate).unwrap();
    let n = variables.len();
    for row in 0..1usize << n {
        let value = |name: &str| {
            let index = variables.iter().position(|variable| variable == name).unwrap();
            (row >> (n - 1 - index)) & 1 == 1
        };
        let inputs: Vec<bool> = found.input_map.iter().map(|name| value(name.as_str())).collect();
        assert_eq!(gate.evaluate(Mode::Hvdd, &inputs), Some(hvdd.eval(&value)), "{found:?} row {row}");
        assert_eq!(gate.evaluate(Mode::Lvdd, &inputs), Some(lvdd.eval(&value)), "{found:?} row {row}");
    }
}

#[test]
fn test_or_and_first_match() {
    let catalog = Catalog::standard();
    let results = enumerate_polymorphic("a|b", "a&b", &catalog, 1).unwrap();
    assert_eq!(
        results,
        [PolymorphicMatch { gate: "th12m_th22m".to_owned(), input_map: vec!["a".to_owned(), "b".to_owned()] }]
    );
}

#[test]
fn test_or_and_all_matches() {
    let catalog = Catalog::standard();
    let results = enumerate_polymorphic("a|b", "a&b", &catalog, 100).unwrap();
    let gates: Vec<&str> = results.iter().map(|found| found.gate.as_str()).collect();
    assert_eq!(gates, ["th12m_th22m", "th12m_th22m", "th13m_th33m", "th13m_th33m", "th13m_th33m"]);
    assert_eq!(results[1].input_map, ["b", "a"]);
    assert_eq!(results[2].input_map, ["a", "b", "a"]);
    for found in &results {
        check_exact(&catalog, "a|b", "a&b", found);
    }
}

#[test]
fn test_three_variables() {
    let catalog = Catalog::standard();
    let results = enumerate_polymorphic("a|b|c", "a&b&c", &catalog, 100).unwrap();
    assert_eq!(results[0].gate, "th13m_th33m");
    assert_eq!(results[0].input_map, ["a", "b", "c"]);
    // Every ordering of three distinct variables works for a symmetric gate.
    assert_eq!(results.iter().filter(|found| found.gate == "th13m_th33m").count(), 6);
    for found in &results {
        check_exact(&catalog, "a|b|c", "a&b&c", found);
    }
}

#[test]
fn test_majority() {
    let catalog = Catalog::standard();
    let hvdd = "(a&b)|(b&c)|(c&a)";
    let results = enumerate_polymorphic(hvdd, "a&b&c", &catalog, 10).unwrap();
    assert!(results.iter().any(|found| found.gate == "th23m_th33m"));
    for found in &results {
        check_exact(&catalog, hvdd, "a&b&c", found);
    }
}

#[test]
fn test_weighted_gate_needs_permutation() {
    let catalog = Catalog::standard();
    // The weighted input of th33w2m_th33m must be driven by b.
    let results = enumerate_polymorphic("(b&a)|(b&c)", "a&b&c", &catalog, 10).unwrap();
    let weighted: Vec<&PolymorphicMatch> = results.iter().filter(|found| found.gate == "th33w2m_th33m").collect();
    assert_eq!(weighted.len(), 2);
    assert!(weighted.iter().all(|found| found.input_map[0] == "b"));
}

#[test]
fn test_no_match() {
    let catalog = Catalog::standard();
    assert!(enumerate_polymorphic("a^b", "a&b", &catalog, 10).unwrap().is_empty());
    assert!(enumerate_polymorphic("a|b", "a&b", &Catalog::new(), 10).unwrap().is_empty());
}

#[test]
fn test_zero_results_requested() {
    assert!(enumerate_polymorphic("a|b", "a&b", &Catalog::standard(), 0).unwrap().is_empty());
}

#[test]
fn test_syntax_error() {
    assert!(enumerate_polymorphic("a|", "a&b", &Catalog::standard(), 1).is_err());
}

#[test]
fn test_deadline() {
    let catalog = Catalog::standard();
    let results = PolymorphicEnumerator::new(&catalog).with_deadline(Instant::now()).enumerate("a|b", "a&b", 10).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_to_circuit() {
    let catalog = Catalog::standard();
    let results = enumerate_polymorphic("a|b", "a&b", &catalog, 1).unwrap();
    let polymorphic = results[0].to_circuit(&catalog, "a|b", "a&b").unwrap();
    let circuit = polymorphic.circuit();
    assert_eq!(circuit.gate_count(), 1);
    assert_eq!(circuit.gates()[0].gate_type, "th12m_th22m");
    assert_eq!(circuit.gates()[0].inputs["a"], "a");
    assert!(circuit.is_valid(&catalog, &Limits::default()));
    assert_eq!(polymorphic.hvdd_function(), "a|b");
    assert_eq!(polymorphic.modes()[0].hvdd, "(a | b)");
}

#[test]
fn test_truth_table_order() {
    let expr: Expr = "a & !b".parse().unwrap();
    let table = TruthTable::of_expr(&expr, &["a".to_owned(), "b".to_owned()]);
    // Rows 00, 01, 10, 11 with a as the high bit.
    assert_eq!(table.to_string(), "0010");
}
