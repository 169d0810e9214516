use std::{fmt::Display, str::FromStr};

use mtncl_netlist::{BinaryOp, Limits, operator_candidates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizationTarget {
    #[default]
    Area,
    Delay,
    Power,
}

impl FromStr for OptimizationTarget {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "area" => Ok(OptimizationTarget::Area),
            "delay" => Ok(OptimizationTarget::Delay),
            "power" => Ok(OptimizationTarget::Power),
            _ => Err(format!("unknown optimization target {text:?}")),
        }
    }
}

impl Display for OptimizationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizationTarget::Area => write!(f, "area"),
            OptimizationTarget::Delay => write!(f, "delay"),
            OptimizationTarget::Power => write!(f, "power"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationWeights {
    pub area: f64,
    pub delay: f64,
    pub power: f64,
}

impl Default for OptimizationWeights {
    fn default() -> Self {
        OptimizationWeights { area: 1.0, delay: 0.5, power: 0.5 }
    }
}

/// Options steering circuit generation.
///
/// Only `limits` and the gate preference lists change which circuits are produced; the
/// optimization target and weights are carried through to reports.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub limits: Limits,
    pub preferred_gates: Vec<String>,
    pub avoid_gates: Vec<String>,
    pub optimization_target: OptimizationTarget,
    pub optimization_weights: OptimizationWeights,
    /// Circuits requested per function when looking for polymorphic pairs.
    pub oversample: usize,
    /// Upper bound on candidate circuits built per generation call.
    pub attempt_budget: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            limits: Limits::default(),
            preferred_gates: Vec::new(),
            avoid_gates: Vec::new(),
            optimization_target: OptimizationTarget::default(),
            optimization_weights: OptimizationWeights::default(),
            oversample: 4,
            attempt_budget: 100,
        }
    }
}

impl SynthConfig {
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_preferred_gates(mut self, gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.preferred_gates = gates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_avoid_gates(mut self, gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.avoid_gates = gates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_optimization_target(mut self, target: OptimizationTarget) -> Self {
        self.optimization_target = target;
        self
    }

    pub fn with_oversample(mut self, oversample: usize) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn with_attempt_budget(mut self, attempt_budget: usize) -> Self {
        self.attempt_budget = attempt_budget;
        self
    }

    /// Candidate gate types for `op`: preferred gates first in the order listed, avoided gates
    /// last, the rest in their default order.
    pub fn candidates(&self, op: BinaryOp) -> Vec<&'static str> {
        let position = |list: &[String], gate: &str| list.iter().position(|name| name.eq_ignore_ascii_case(gate));
        let mut candidates: Vec<&'static str> = operator_candidates(op).to_vec();
        candidates.sort_by_key(|gate| match (position(&self.preferred_gates, gate), position(&self.avoid_gates, gate)) {
            (Some(index), _) => (0, index),
            (None, None) => (1, 0),
            (None, Some(index)) => (2, index),
        });
        candidates
    }
}
