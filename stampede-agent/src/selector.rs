//! Weighted action selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stampede_core::{ActionKind, WeightTable};

/// Selection weight multiplier for a persona's favoured action
pub const BIAS_MULTIPLIER: u64 = 2;

/// Agent-observed condition that rules actions out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// No item ids learned yet
    NoKnownItems,
    /// Reference caches are empty, so no valid payload can be built
    NoReferenceData,
    /// Persona may not view aggregate dashboards
    StandardRole,
}

impl Constraint {
    pub fn disables(&self, action: ActionKind) -> bool {
        match self {
            Constraint::NoKnownItems => matches!(action, ActionKind::ViewItem | ActionKind::UpdateItem),
            Constraint::NoReferenceData => action == ActionKind::CreateItem,
            Constraint::StandardRole => action == ActionKind::ViewDashboard,
        }
    }
}

/// Cumulative-weight selector with an injected random source
#[derive(Debug, Clone)]
pub struct ActionSelector {
    weights: WeightTable,
    bias: ActionKind,
    rng: StdRng,
}

impl ActionSelector {
    pub fn new(weights: WeightTable, bias: ActionKind, rng: StdRng) -> Self {
        Self { weights, bias, rng }
    }

    /// Deterministic selector for a given seed
    pub fn seeded(weights: WeightTable, bias: ActionKind, seed: u64) -> Self {
        Self::new(weights, bias, StdRng::seed_from_u64(seed))
    }

    /// Bias applied, then constrained actions zeroed, in table order
    pub fn effective_weights(&self, constraints: &[Constraint]) -> Vec<(ActionKind, u64)> {
        self.weights
            .iter()
            .map(|(action, weight)| {
                let mut weight = weight as u64;
                if action == self.bias {
                    weight *= BIAS_MULTIPLIER;
                }
                if constraints.iter().any(|c| c.disables(action)) {
                    weight = 0;
                }
                (action, weight)
            })
            .collect()
    }

    /// Draw the next action.
    ///
    /// Falls back to the baseline action when every weight is zero or the
    /// walk runs off the end of the table.
    pub fn select(&mut self, constraints: &[Constraint]) -> ActionKind {
        let effective = self.effective_weights(constraints);
        let total: u64 = effective.iter().map(|(_, weight)| weight).sum();
        if total == 0 {
            return ActionKind::baseline();
        }

        let mut remaining = self.rng.gen::<f64>() * total as f64;
        for (action, weight) in effective {
            if weight == 0 {
                continue;
            }
            remaining -= weight as f64;
            if remaining <= 0.0 {
                return action;
            }
        }
        ActionKind::baseline()
    }
}
