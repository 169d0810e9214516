use std::collections::BTreeSet;

use mtncl_netlist::{Circuit, GateInstance, NotEquivalent, assert_equivalent, equivalent};

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn gate(gate_type: &str, name: &str, inputs: &[(&str, &str)], output: &str) -> GateInstance {
    GateInstance::new(
        gate_type,
        name,
        inputs.iter().map(|(port, wire)| (port.to_string(), wire.to_string())),
        [("Z".to_owned(), output.to_owned())],
    )
}

#[test]
fn test_ignores_names_and_order() {
    let left = Circuit::from_parts(
        set(&["A", "B", "C"]),
        set(&["w1"]),
        vec![
            gate("TH12", "th12_0", &[("A", "A"), ("B", "B")], "w0"),
            gate("TH22", "th22_1", &[("A", "w0"), ("B", "C")], "w1"),
        ],
    );
    let right = Circuit::from_parts(
        set(&["A", "B", "C"]),
        set(&["w1"]),
        vec![
            gate("TH22", "x", &[("A", "C"), ("B", "w0")], "w1"),
            gate("TH12", "y", &[("A", "B"), ("B", "A")], "w0"),
        ],
    );
    assert_equivalent!(left, right);
    assert!(left.is_equivalent(&right));
}

#[test]
fn test_detects_type_difference() {
    let left = Circuit::from_parts(set(&["A", "B"]), set(&["w0"]), vec![gate("TH12", "g", &[("A", "A"), ("B", "B")], "w0")]);
    let right = Circuit::from_parts(set(&["A", "B"]), set(&["w0"]), vec![gate("TH22", "g", &[("A", "A"), ("B", "B")], "w0")]);
    assert_eq!(equivalent(&left, &right), Err(NotEquivalent::Gate("g".to_owned(), "g".to_owned())));
}

#[test]
fn test_detects_count_difference() {
    let left = Circuit::from_parts(set(&["A", "B"]), set(&["w0"]), vec![gate("TH12", "g", &[("A", "A"), ("B", "B")], "w0")]);
    let right = Circuit::from_parts(set(&["A", "B"]), set(&["A"]), vec![]);
    assert_eq!(equivalent(&left, &right), Err(NotEquivalent::GateCount(1, 0)));
}

#[test]
fn test_detects_wiring_difference() {
    let left = Circuit::from_parts(
        set(&["A", "B"]),
        set(&["w0"]),
        vec![gate("TH13", "g", &[("A", "A"), ("B", "B"), ("C", "A")], "w0")],
    );
    let right = Circuit::from_parts(
        set(&["A", "B"]),
        set(&["w0"]),
        vec![gate("TH13", "g", &[("A", "A"), ("B", "B"), ("C", "B")], "w0")],
    );
    assert!(!left.is_equivalent(&right));
}

#[test]
fn test_reflexive_and_symmetric() {
    let circuits = vec![
        Circuit::from_parts(
            set(&["A", "B", "C"]),
            set(&["w1"]),
            vec![
                gate("TH12", "th12_0", &[("A", "A"), ("B", "B")], "w0"),
                gate("TH22", "th22_1", &[("A", "w0"), ("B", "C")], "w1"),
            ],
        ),
        Circuit::from_parts(
            set(&["A", "B", "C"]),
            set(&["w1"]),
            vec![
                gate("TH12", "th12_0", &[("A", "A"), ("B", "B")], "w0"),
                gate("TH33", "th33_1", &[("A", "w0"), ("B", "C"), ("C", "w0")], "w1"),
            ],
        ),
        Circuit::from_parts(
            set(&["A", "B", "C"]),
            set(&["w1"]),
            vec![
                gate("TH22", "x", &[("A", "C"), ("B", "w0")], "w1"),
                gate("TH12", "y", &[("A", "B"), ("B", "A")], "w0"),
            ],
        ),
        Circuit::from_parts(set(&["A", "B"]), set(&["w0"]), vec![gate("TH12", "g", &[("A", "A"), ("B", "B")], "w0")]),
        Circuit::from_parts(set(&["A", "B"]), set(&["A"]), vec![]),
    ];
    for left in &circuits {
        assert_equivalent!(left, left);
        for right in &circuits {
            assert_eq!(left.is_equivalent(right), right.is_equivalent(left), "{left}\n{right}");
        }
    }
    assert!(circuits[0].is_equivalent(&circuits[2]));
    assert!(!circuits[0].is_equivalent(&circuits[1]));
}
