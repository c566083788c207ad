use std::collections::HashMap;

use tracing::debug;
use wayfare_domain::{FieldSpec, ResolvedStep, StepSpec};

/// Resolves declared steps against the filtered field set.
pub struct StepPlanner;

impl StepPlanner {
    /// Keeps each step's surviving fields in declared order and drops steps left empty.
    pub fn plan(steps: &[StepSpec], fields: &[FieldSpec]) -> Vec<ResolvedStep> {
        let by_name: HashMap<&str, &FieldSpec> =
            fields.iter().map(|field| (field.name, field)).collect();

        let plan: Vec<ResolvedStep> = steps
            .iter()
            .filter_map(|step| {
                let resolved: Vec<FieldSpec> = step
                    .field_names
                    .iter()
                    .filter_map(|name| by_name.get(name).map(|field| (*field).clone()))
                    .collect();
                (!resolved.is_empty()).then(|| ResolvedStep {
                    label: step.label,
                    fields: resolved,
                })
            })
            .collect();

        debug!(
            declared = steps.len(),
            active = plan.len(),
            "planned wizard steps"
        );
        plan
    }
}
