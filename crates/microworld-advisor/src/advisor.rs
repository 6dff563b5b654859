//! The per-turn advisor.
//!
//! Each turn the world hands the advisor the full event batch
//! ([`Advisor::observe`]) and then asks for a tuning action
//! ([`Advisor::adjust`]). `adjust` is total: a failing signal source or
//! planner is logged and replaced by a safe substitute, and the returned
//! multiplier is always finite and non-negative.

use std::collections::BTreeMap;

use microworld_types::{AdvisorAction, BehaviorEvent, Signals};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SignalError;
use crate::parse::Plan;
use crate::planner::{NullPlanner, Planner};

/// Anything that can report the world's resource signals.
pub trait SignalSource {
    /// Current resource signals.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] if the status cannot be computed.
    fn resource_signals(&self) -> Result<Signals, SignalError>;
}

/// Running counters kept by an [`Advisor`].
///
/// Reset only when a new advisor is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorStats {
    /// Events observed over the advisor's lifetime.
    pub event_total: u64,
    /// Events observed, by action name.
    pub event_by_name: BTreeMap<String, u64>,
    /// Number of completed `adjust` calls.
    pub adjust_count: u64,
    /// Multiplier returned by the latest `adjust`.
    pub last_regen: f64,
}

impl Default for AdvisorStats {
    fn default() -> Self {
        Self {
            event_total: 0,
            event_by_name: BTreeMap::new(),
            adjust_count: 0,
            last_regen: AdvisorAction::BASELINE_MULTIPLIER,
        }
    }
}

/// Observes turns and proposes the regeneration multiplier.
pub struct Advisor {
    planner: Box<dyn Planner>,
    stats: AdvisorStats,
}

impl Advisor {
    /// Advisor driven by `planner`.
    pub fn new(planner: Box<dyn Planner>) -> Self {
        Self {
            planner,
            stats: AdvisorStats::default(),
        }
    }

    /// Advisor with the offline [`NullPlanner`].
    pub fn with_null_planner() -> Self {
        Self::new(Box::new(NullPlanner))
    }

    /// Counters so far.
    pub const fn stats(&self) -> &AdvisorStats {
        &self.stats
    }

    /// Name of the planner in use.
    pub fn planner_name(&self) -> &str {
        self.planner.name()
    }

    /// Record a batch of events. Purely additive.
    pub fn observe(&mut self, events: &[BehaviorEvent]) {
        for event in events {
            self.stats.event_total = self.stats.event_total.saturating_add(1);
            let slot = self.stats.event_by_name.entry(event.name.clone()).or_insert(0);
            *slot = slot.saturating_add(1);
        }
    }

    /// Produce this turn's tuning action. Never fails.
    pub fn adjust(&mut self, source: &dyn SignalSource) -> AdvisorAction {
        let signals = match source.resource_signals() {
            Ok(signals) => signals,
            Err(e) => {
                warn!(
                    error = %e,
                    event_total = self.stats.event_total,
                    "signal fallback: using event total"
                );
                self.fallback_signals()
            }
        };

        let plan = match self.planner.plan(&signals) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(
                    planner = self.planner.name(),
                    error = %e,
                    "plan fallback: using baseline plan"
                );
                Plan::baseline()
            }
        };

        let multiplier = sanitize_regen(plan.regen);
        let action = AdvisorAction {
            resource_regen_multiplier: multiplier,
            terrain_adjustments: plan.terrain,
            skill_updates: plan.skills,
        };

        self.stats.adjust_count = self.stats.adjust_count.saturating_add(1);
        self.stats.last_regen = multiplier;

        info!(
            planner = self.planner.name(),
            multiplier,
            adjust_count = self.stats.adjust_count,
            event_total = self.stats.event_total,
            has_terrain = action.terrain_adjustments.is_some(),
            has_skills = action.skill_updates.is_some(),
            "advisor adjusted"
        );

        action
    }

    #[allow(clippy::cast_precision_loss)]
    fn fallback_signals(&self) -> Signals {
        Signals::from([(String::from("events"), self.stats.event_total as f64)])
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::with_null_planner()
    }
}

/// Missing means baseline; negative or non-finite is replaced by baseline.
fn sanitize_regen(regen: Option<f64>) -> f64 {
    match regen {
        None => AdvisorAction::BASELINE_MULTIPLIER,
        Some(value) if value.is_finite() && value >= 0.0 => value,
        Some(value) => {
            warn!(regen = value, "plan regen out of range, using baseline");
            AdvisorAction::BASELINE_MULTIPLIER
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};

    use microworld_types::{Action, AgentId, Position};

    use super::*;
    use crate::error::PlannerError;

    struct FixedSignals(Signals);

    impl SignalSource for FixedSignals {
        fn resource_signals(&self) -> Result<Signals, SignalError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSignals;

    impl SignalSource for BrokenSignals {
        fn resource_signals(&self) -> Result<Signals, SignalError> {
            Err(SignalError::new("grid unavailable"))
        }
    }

    /// Returns a canned result and records what it was asked.
    struct ScriptedPlanner {
        reply: fn() -> Result<Plan, PlannerError>,
        seen: Arc<Mutex<Vec<Signals>>>,
    }

    impl Planner for ScriptedPlanner {
        fn plan(&self, signals: &Signals) -> Result<Plan, PlannerError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(signals.clone());
            }
            (self.reply)()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn scripted(
        reply: fn() -> Result<Plan, PlannerError>,
    ) -> (Advisor, Arc<Mutex<Vec<Signals>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let planner = ScriptedPlanner {
            reply,
            seen: Arc::clone(&seen),
        };
        (Advisor::new(Box::new(planner)), seen)
    }

    fn event(action: Action) -> BehaviorEvent {
        BehaviorEvent::new(AgentId::new(0), 1, action)
    }

    fn signals() -> FixedSignals {
        FixedSignals(Signals::from([("wood".to_owned(), 3.0)]))
    }

    #[test]
    fn observe_accumulates_across_batches() {
        let mut advisor = Advisor::default();
        advisor.observe(&[
            event(Action::Forage { amount: 1 }),
            event(Action::Move {
                to: Position::new(1, 0),
            }),
        ]);
        advisor.observe(&[event(Action::Forage { amount: 1 })]);

        let stats = advisor.stats();
        assert_eq!(stats.event_total, 3);
        assert_eq!(stats.event_by_name.get("forage"), Some(&2));
        assert_eq!(stats.event_by_name.get("move"), Some(&1));
        assert_eq!(stats.adjust_count, 0);
    }

    #[test]
    fn null_planner_yields_baseline() {
        let mut advisor = Advisor::default();
        let action = advisor.adjust(&signals());
        assert_eq!(action, AdvisorAction::baseline());
        assert_eq!(advisor.stats().adjust_count, 1);
        assert_eq!(advisor.stats().last_regen, 1.0);
    }

    #[test]
    fn plan_fields_flow_into_action() {
        let (mut advisor, _) = scripted(|| {
            Ok(Plan {
                regen: Some(0.5),
                terrain: Some(serde_json::json!({"river": true})),
                skills: None,
            })
        });
        let action = advisor.adjust(&signals());
        assert_eq!(action.resource_regen_multiplier, 0.5);
        assert_eq!(
            action.terrain_adjustments,
            Some(serde_json::json!({"river": true}))
        );
        assert!(action.skill_updates.is_none());
        assert_eq!(advisor.stats().last_regen, 0.5);
    }

    #[test]
    fn missing_regen_means_baseline() {
        let (mut advisor, _) = scripted(|| Ok(Plan::default()));
        assert_eq!(advisor.adjust(&signals()).resource_regen_multiplier, 1.0);
    }

    #[test]
    fn broken_signal_source_uses_event_total() {
        let (mut advisor, seen) = scripted(|| Ok(Plan::baseline()));
        advisor.observe(&[event(Action::Forage { amount: 1 })]);
        let action = advisor.adjust(&BrokenSignals);

        assert_eq!(action.resource_regen_multiplier, 1.0);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("events"), Some(&1.0));
    }

    #[test]
    fn failing_planner_yields_baseline() {
        let (mut advisor, _) = scripted(|| Err(PlannerError::Parse("bad".to_owned())));
        let action = advisor.adjust(&BrokenSignals);
        assert_eq!(action, AdvisorAction::baseline());
        assert_eq!(advisor.stats().adjust_count, 1);
    }

    fn regen_reply(value: f64) -> Result<Plan, PlannerError> {
        Ok(Plan {
            regen: Some(value),
            ..Plan::default()
        })
    }

    #[test]
    fn negative_and_non_finite_regen_are_sanitized() {
        let replies: [fn() -> Result<Plan, PlannerError>; 3] = [
            || regen_reply(-2.0),
            || regen_reply(f64::NAN),
            || regen_reply(f64::INFINITY),
        ];
        for reply in replies {
            let (mut advisor, _) = scripted(reply);
            let multiplier = advisor.adjust(&signals()).resource_regen_multiplier;
            assert_eq!(multiplier, 1.0);
        }
    }

    #[test]
    fn zero_regen_is_kept() {
        let (mut advisor, _) = scripted(|| regen_reply(0.0));
        assert_eq!(advisor.adjust(&signals()).resource_regen_multiplier, 0.0);
    }
}
