// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for submission simulations.

use contact_gate::session::SubmitOutcome;
use contact_gate::validator::Field;
use std::collections::HashMap;

/// Possible outcomes for a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Sent,
    Discarded,
    Busy,
    CoolingDown,
    Invalid,
    Failed,
}

impl From<&SubmitOutcome> for Outcome {
    fn from(outcome: &SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Sent(_) => Outcome::Sent,
            SubmitOutcome::Discarded => Outcome::Discarded,
            SubmitOutcome::Busy => Outcome::Busy,
            SubmitOutcome::CoolingDown { .. } => Outcome::CoolingDown,
            SubmitOutcome::Invalid(_) => Outcome::Invalid,
            SubmitOutcome::Failed => Outcome::Failed,
        }
    }
}

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    outcomes: HashMap<Outcome, usize>,
    /// Which fields caused validation failures
    field_failures: HashMap<Field, usize>,
    /// Attempts that showed the submitter a message
    surfaced_messages: usize,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submit outcome.
    pub fn record(&mut self, outcome: &SubmitOutcome) {
        *self.outcomes.entry(outcome.into()).or_insert(0) += 1;
        if let SubmitOutcome::Invalid(errors) = outcome {
            for (field, _) in errors.iter() {
                *self.field_failures.entry(field).or_insert(0) += 1;
            }
        }
        if outcome.message().is_some() {
            self.surfaced_messages += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn field_failures(&self, field: Field) -> usize {
        self.field_failures.get(&field).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of attempts that were not sent).
    pub fn block_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Sent)) as f64 / total as f64
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total: self.total(),
            sent: self.count(Outcome::Sent),
            discarded: self.count(Outcome::Discarded),
            cooling_down: self.count(Outcome::CoolingDown),
            invalid: self.count(Outcome::Invalid),
            failed: self.count(Outcome::Failed),
            surfaced_messages: self.surfaced_messages,
            block_rate: self.block_rate(),
        }
    }
}

/// Summary report of a simulation.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total: usize,
    pub sent: usize,
    pub discarded: usize,
    pub cooling_down: usize,
    pub invalid: usize,
    pub failed: usize,
    pub surfaced_messages: usize,
    pub block_rate: f64,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Submission Metrics Report ===")?;
        writeln!(f, "Total Attempts:    {}", self.total)?;
        writeln!(f, "Sent:              {}", self.sent)?;
        writeln!(f, "Discarded:         {}", self.discarded)?;
        writeln!(f, "Cooling Down:      {}", self.cooling_down)?;
        writeln!(f, "Invalid:           {}", self.invalid)?;
        writeln!(f, "Failed:            {}", self.failed)?;
        writeln!(f, "Surfaced Messages: {}", self.surfaced_messages)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_gate::transport::Ack;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.record(&SubmitOutcome::Sent(Ack::now(200)));
        metrics.record(&SubmitOutcome::Discarded);
        metrics.record(&SubmitOutcome::CoolingDown { retry_after_secs: 12 });

        assert_eq!(metrics.total(), 3);
        assert_eq!(metrics.count(Outcome::Sent), 1);
        // discarded submissions never surface a message
        assert_eq!(metrics.report().surfaced_messages, 2);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(&SubmitOutcome::Sent(Ack::now(200)));
        }
        for _ in 0..7 {
            metrics.record(&SubmitOutcome::Failed);
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
