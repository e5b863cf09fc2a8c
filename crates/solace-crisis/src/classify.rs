use std::collections::BTreeSet;
use std::time::Instant;

use solace_core::models::{CrisisReason, CrisisVerdict, InstrumentScore, Severity, VerdictStatus};
use solace_instruments::{Instrument, InstrumentKind};

use crate::assessment::{Assessment, RiskSignals};
use crate::error::ClassifyError;

const SEVERE_DEPRESSION: u32 = 20;
const MODERATELY_SEVERE_DEPRESSION: u32 = 15;
const SEVERE_ANXIETY: u32 = 15;
const MODERATE_ANXIETY: u32 = 10;
/// Self-harm answers at or above this add `frequent_suicidal_thoughts`.
const FREQUENT_SELF_HARM: u8 = 2;

/// Accumulates rule outcomes. Severity only ever rises.
#[derive(Default)]
struct Findings {
    severity: Severity,
    reasons: BTreeSet<CrisisReason>,
    requires_intervention: bool,
}

impl Findings {
    fn raise(&mut self, severity: Severity, reason: CrisisReason) {
        self.severity = self.severity.escalate(severity);
        self.reasons.insert(reason);
    }

    fn intervene(&mut self, severity: Severity, reason: CrisisReason) {
        self.raise(severity, reason);
        self.requires_intervention = true;
    }

    fn note(&mut self, reason: CrisisReason) {
        self.reasons.insert(reason);
    }
}

/// Classify an assessment.
///
/// Malformed input (wrong answer count, out-of-range values) is an error.
/// Blank answers are tolerated: every rule evaluates the sum of the answered
/// items, and the verdict is marked [`VerdictStatus::Incomplete`].
pub fn classify(assessment: &Assessment) -> Result<CrisisVerdict, ClassifyError> {
    let started = Instant::now();

    let expected = assessment.kind.expected_len();
    if assessment.answers.len() != expected {
        return Err(ClassifyError::InvalidAssessmentInput {
            message: format!(
                "{} assessment expects {} answers, got {}",
                assessment.kind,
                expected,
                assessment.answers.len()
            ),
            source: None,
        });
    }

    let mut findings = Findings::default();
    let mut scores = Vec::new();
    let mut unanswered = Vec::new();
    let mut offset = 0;

    for kind in assessment.kind.sections() {
        let instrument = kind.instrument();
        let answers = &assessment.answers[offset..offset + instrument.item_count()];
        let partial = instrument.score_partial(answers)?;

        check_self_harm(instrument, answers, &mut findings);
        let signals = assessment.signals;
        match kind {
            InstrumentKind::Phq9 => depression_rules(partial.score, signals, &mut findings),
            InstrumentKind::Gad7 => anxiety_rules(partial.score, signals, &mut findings),
        }

        unanswered.extend(partial.missing.iter().map(|i| i + offset));
        scores.push(InstrumentScore {
            instrument_id: instrument.id().to_string(),
            score: partial.score,
            answered: partial.answered,
            item_count: instrument.item_count(),
            band: partial.is_complete().then(|| instrument.band(partial.score)),
        });
        offset += instrument.item_count();
    }

    let status = if unanswered.is_empty() {
        VerdictStatus::Complete
    } else {
        VerdictStatus::Incomplete
    };

    Ok(CrisisVerdict {
        assessment_id: assessment.id,
        requires_intervention: findings.requires_intervention,
        severity: findings.severity,
        intervention_type: findings.severity.intervention(),
        reasons: findings.reasons,
        response_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        status,
        unanswered,
        scores,
        classified_at: jiff::Timestamp::now(),
    })
}

/// Runs first and independently of the score. A blank self-harm item is
/// flagged, never read as zero.
fn check_self_harm(instrument: &dyn Instrument, answers: &[Option<u8>], findings: &mut Findings) {
    let Some(index) = instrument.self_harm_index() else {
        return;
    };
    match answers.get(index).copied().flatten() {
        Some(value) if value > 0 => {
            findings.intervene(Severity::Critical, CrisisReason::SuicidalIdeationDetected);
            if value >= FREQUENT_SELF_HARM {
                findings.note(CrisisReason::FrequentSuicidalThoughts);
            }
        }
        Some(_) => {}
        None => findings.note(CrisisReason::SelfHarmItemUnanswered),
    }
}

fn depression_rules(score: u32, signals: RiskSignals, findings: &mut Findings) {
    if score >= SEVERE_DEPRESSION {
        findings.intervene(Severity::High, CrisisReason::SevereDepressionScore);
    } else if score >= MODERATELY_SEVERE_DEPRESSION && signals.auxiliary_risk {
        findings.raise(Severity::Moderate, CrisisReason::ModeratelySevereWithRiskFactors);
    }
}

fn anxiety_rules(score: u32, signals: RiskSignals, findings: &mut Findings) {
    if score >= SEVERE_ANXIETY {
        findings.intervene(Severity::High, CrisisReason::SevereAnxietyScore);
    }
    if score >= MODERATE_ANXIETY && signals.panic_indicators {
        findings.raise(Severity::Moderate, CrisisReason::ModerateAnxietyWithPanicIndicators);
    }
}
