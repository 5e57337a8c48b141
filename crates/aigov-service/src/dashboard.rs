//! # Dashboard Summary
//!
//! Plain data for whatever renders the governance dashboard. Levels are
//! counted from each system's latest assessment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use aigov_assess::AssessmentResult;
use aigov_core::{GovernanceLevel, SystemId, Timestamp};
use aigov_registry::SystemRecord;
use aigov_workflow::WorkflowState;

/// How many recent assessments the summary carries.
pub const RECENT_ASSESSMENTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub system_id: SystemId,
    pub system_name: String,
    pub overall_score: f64,
    pub level: GovernanceLevel,
    pub assessed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_systems: usize,
    pub active_systems: usize,
    /// Systems with at least one assessment.
    pub assessed_systems: usize,
    pub level_distribution: BTreeMap<GovernanceLevel, usize>,
    pub workflow_states: BTreeMap<WorkflowState, usize>,
    /// Newest first.
    pub recent_assessments: Vec<AssessmentSummary>,
}

impl DashboardSummary {
    pub(crate) fn build(
        records: &[SystemRecord],
        workflow_states: BTreeMap<WorkflowState, usize>,
    ) -> Self {
        let mut level_distribution: BTreeMap<GovernanceLevel, usize> =
            GovernanceLevel::all().iter().map(|l| (*l, 0)).collect();
        let mut recent: Vec<AssessmentSummary> = Vec::new();

        for record in records {
            if let Some(latest) = record.assessments.last() {
                *level_distribution.entry(latest.level).or_default() += 1;
            }
            recent.extend(
                record
                    .assessments
                    .iter()
                    .map(|a| summarize(&record.system.metadata.name, a)),
            );
        }
        recent.sort_by(|a, b| b.assessed_at.cmp(&a.assessed_at));
        recent.truncate(RECENT_ASSESSMENTS);

        Self {
            total_systems: records.len(),
            active_systems: records.iter().filter(|r| r.system.active).count(),
            assessed_systems: records.iter().filter(|r| !r.assessments.is_empty()).count(),
            level_distribution,
            workflow_states,
            recent_assessments: recent,
        }
    }
}

fn summarize(name: &str, a: &AssessmentResult) -> AssessmentSummary {
    AssessmentSummary {
        system_id: a.system_id,
        system_name: name.to_string(),
        overall_score: a.overall_score,
        level: a.level,
        assessed_at: a.assessed_at,
    }
}
