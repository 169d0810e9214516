use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt::Display,
    time::Instant,
};

use mtncl_netlist::{
    Catalog, CircuitBuilder, Expr, GateDescriptor, GateModes, Mode, ParseError, PolymorphicCircuit,
};
use tracing::{debug, debug_span, trace, warn};

/// Output column of a function over an ordered variable list. Row `i` assigns variable `j` the
/// bit `(i >> (n - 1 - j)) & 1`, so the first variable is the most significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TruthTable(Vec<bool>);

impl TruthTable {
    pub fn from_fn(variable_count: usize, mut f: impl FnMut(&[bool]) -> bool) -> Self {
        let mut assignment = vec![false; variable_count];
        let rows = (0..1usize << variable_count)
            .map(|row| {
                for (index, value) in assignment.iter_mut().enumerate() {
                    *value = (row >> (variable_count - 1 - index)) & 1 != 0;
                }
                f(&assignment)
            })
            .collect();
        TruthTable(rows)
    }

    pub fn of_expr(expr: &Expr, variables: &[String]) -> Self {
        TruthTable::from_fn(variables.len(), |assignment| {
            expr.eval(&|name: &str| {
                variables.iter().position(|variable| variable == name).map(|index| assignment[index]).unwrap_or(false)
            })
        })
    }

    /// Table of `function`, a function over `ports`, with `ports[k]` driven by variable `mapping[k]`.
    pub fn of_binding(function: &Expr, ports: &[String], mapping: &[String], variables: &[String]) -> Self {
        let sources: Vec<Option<usize>> =
            mapping.iter().map(|name| variables.iter().position(|variable| variable == name)).collect();
        TruthTable::from_fn(variables.len(), |assignment| {
            function.eval(&|port: &str| {
                ports
                    .iter()
                    .position(|candidate| candidate == port)
                    .and_then(|index| sources.get(index).copied().flatten())
                    .map(|source| assignment[source])
                    .unwrap_or(false)
            })
        })
    }

    pub fn rows(&self) -> &[bool] {
        &self.0
    }
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &value in &self.0 {
            write!(f, "{}", if value { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    function: String,
    ports: Vec<String>,
    mapping: Vec<String>,
}

/// Truth tables computed during one search. The variable order is fixed for the lifetime of
/// the cache, so it is not part of the key.
#[derive(Debug, Default)]
struct TruthTableCache {
    tables: HashMap<CacheKey, TruthTable>,
    hits: usize,
}

impl TruthTableCache {
    fn table(&mut self, function: &Expr, ports: &[String], mapping: &[String], variables: &[String]) -> &TruthTable {
        let key = CacheKey { function: function.to_string(), ports: ports.to_vec(), mapping: mapping.to_vec() };
        if self.tables.contains_key(&key) {
            self.hits += 1;
        }
        self.tables.entry(key).or_insert_with(|| TruthTable::of_binding(function, ports, mapping, variables))
    }
}

/// Permutations of `0..n` in lexicographic order.
struct Permutations {
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Permutations {
    fn new(n: usize) -> Self {
        Permutations { indices: (0..n).collect(), started: false, done: false }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }
        let n = self.indices.len();
        let mut pivot = n;
        for index in (1..n).rev() {
            if self.indices[index - 1] < self.indices[index] {
                pivot = index - 1;
                break;
            }
        }
        if pivot == n {
            self.done = true;
            return None;
        }
        let mut successor = n - 1;
        while self.indices[successor] <= self.indices[pivot] {
            successor -= 1;
        }
        self.indices.swap(pivot, successor);
        self.indices[pivot + 1..].reverse();
        Some(self.indices.clone())
    }
}

/// Distinct orderings of `items`, in order of first appearance among all index permutations.
fn distinct_permutations(items: &[String]) -> impl Iterator<Item = Vec<String>> + '_ {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    Permutations::new(items.len()).filter_map(move |order| {
        let candidate: Vec<String> = order.into_iter().map(|index| items[index].clone()).collect();
        if seen.insert(candidate.clone()) { Some(candidate) } else { None }
    })
}

/// A polymorphic gate that realizes both target functions when input port `k` is driven by
/// variable `input_map[k]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolymorphicMatch {
    pub gate: String,
    pub input_map: Vec<String>,
}

impl PolymorphicMatch {
    /// A one-gate circuit wiring the matched gate as described by the mapping.
    pub fn to_circuit(&self, catalog: &Catalog, hvdd: &str, lvdd: &str) -> Option<PolymorphicCircuit> {
        let gate = catalog.describe(&self.gate)?;
        if gate.arity() != self.input_map.len() {
            return None;
        }
        let mut builder = CircuitBuilder::new();
        let wires: Vec<String> = self.input_map.iter().map(|name| builder.add_input(name)).collect();
        let output = builder.add_gate(gate, &wires);
        let modes = GateModes {
            hvdd: gate.mode_function(Mode::Hvdd)?.to_string(),
            lvdd: gate.mode_function(Mode::Lvdd)?.to_string(),
        };
        Some(PolymorphicCircuit::new(builder.finish(output), vec![modes], hvdd, lvdd))
    }
}

/// Exhaustive search for single polymorphic gates matching a pair of functions.
#[derive(Debug, Clone)]
pub struct PolymorphicEnumerator<'a> {
    catalog: &'a Catalog,
    deadline: Option<Instant>,
}

impl<'a> PolymorphicEnumerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        PolymorphicEnumerator { catalog, deadline: None }
    }

    /// Stops the search once `deadline` passes, keeping the matches found so far.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn enumerate(&self, hvdd: &str, lvdd: &str, max_results: usize) -> Result<Vec<PolymorphicMatch>, ParseError> {
        let hvdd_expr: Expr = hvdd.parse()?;
        let lvdd_expr: Expr = lvdd.parse()?;
        let _span = debug_span!("enumerate_polymorphic", hvdd, lvdd, max_results).entered();

        let mut results = Vec::new();
        if max_results == 0 {
            return Ok(results);
        }

        let hvdd_vars = hvdd_expr.variables();
        let lvdd_vars = lvdd_expr.variables();
        let variables: Vec<String> = hvdd_vars.union(&lvdd_vars).cloned().collect();
        let padding = pick_padding(&hvdd_vars, &lvdd_vars);
        let hvdd_target = TruthTable::of_expr(&hvdd_expr, &variables);
        let lvdd_target = TruthTable::of_expr(&lvdd_expr, &variables);
        debug!(?variables, %hvdd_target, %lvdd_target, "target tables");

        let mut gates: Vec<&GateDescriptor> = self.catalog.polymorphic_gates().collect();
        gates.sort_by_key(|gate| gate.arity());

        let mut cache = TruthTableCache::default();
        let mut tried = 0usize;
        for gate in gates {
            if gate.arity() < variables.len() || gate.arity() > 2 * variables.len() {
                trace!(gate = gate.name(), arity = gate.arity(), "arity out of range");
                continue;
            }
            let (Some(hvdd_function), Some(lvdd_function)) =
                (gate.mode_function(Mode::Hvdd), gate.mode_function(Mode::Lvdd))
            else {
                continue;
            };
            let mut base = variables.clone();
            while base.len() < gate.arity() {
                base.extend(padding.iter().cloned());
            }
            for mapping in distinct_permutations(&base) {
                if self.expired() {
                    debug!(tried, found = results.len(), "deadline passed");
                    return Ok(results);
                }
                tried += 1;
                if cache.table(hvdd_function, gate.inputs(), &mapping, &variables) != &hvdd_target {
                    continue;
                }
                if cache.table(lvdd_function, gate.inputs(), &mapping, &variables) != &lvdd_target {
                    continue;
                }
                debug!(gate = gate.name(), ?mapping, "match");
                results.push(PolymorphicMatch { gate: gate.name().to_owned(), input_map: mapping });
                if results.len() >= max_results {
                    debug!(tried, cache_hits = cache.hits, "result limit reached");
                    return Ok(results);
                }
            }
        }
        if results.is_empty() {
            warn!(tried, "no polymorphic gate matches both functions");
        } else {
            debug!(tried, cache_hits = cache.hits, found = results.len(), "search exhausted");
        }
        Ok(results)
    }
}

/// The variable repeated to fill surplus gate inputs: the first variable of whichever function
/// uses more distinct variables (the LVDD function on a tie).
fn pick_padding(hvdd_vars: &BTreeSet<String>, lvdd_vars: &BTreeSet<String>) -> Option<String> {
    let source = if hvdd_vars.len() > lvdd_vars.len() { hvdd_vars } else { lvdd_vars };
    source.first().cloned()
}

/// Finds polymorphic gates, with the input mapping for each, whose HVDD and LVDD functions
/// reproduce `hvdd` and `lvdd` exactly over every input assignment.
pub fn enumerate_polymorphic(
    hvdd: &str,
    lvdd: &str,
    catalog: &Catalog,
    max_results: usize,
) -> Result<Vec<PolymorphicMatch>, ParseError> {
    PolymorphicEnumerator::new(catalog).enumerate(hvdd, lvdd, max_results)
}
