use crate::last_seen::LastSeenOutcome;
use metrics::{counter, histogram};
use site_core::{AccessDecision, DenialReason, PresenceEventKind};
use std::time::Instant;

pub struct Telemetry;

impl Telemetry {
    pub fn record_decision(decision: &AccessDecision) {
        counter!("site_access_decisions_total", "outcome" => outcome_label(decision))
            .increment(1);
    }

    pub fn record_registration(kind: PresenceEventKind, result: &'static str) {
        counter!(
            "site_presence_registrations_total",
            "kind" => kind.to_string(),
            "result" => result
        )
        .increment(1);
    }

    pub fn record_last_seen(outcome: LastSeenOutcome) {
        counter!("site_last_seen_updates_total", "result" => outcome.to_string()).increment(1);
    }

    pub fn record_evaluation_latency(duration_ms: f64) {
        histogram!("site_access_evaluation_duration_ms").record(duration_ms);
    }
}

fn outcome_label(decision: &AccessDecision) -> &'static str {
    match decision.error {
        None if decision.valid => "valid",
        None => "invalid",
        Some(DenialReason::InvalidSite) => "invalid_site",
        Some(DenialReason::ClosedCase) => "closed_case",
        Some(DenialReason::NotResident) => "not_resident",
        Some(DenialReason::NeitherResidentNorStaff) => "neither_resident_nor_staff"
    }
}

pub struct EvaluationTimer {
    start: Instant
}

impl EvaluationTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now()
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed().as_secs_f64() * 1000.0;
        Telemetry::record_evaluation_latency(duration);
    }
}
