use wayfare_domain::{FieldKind, FieldSpec, FieldValue, ResolvedStep};

use crate::form_state::FormState;

/// Step-local completeness checks gating Next and Submit.
pub struct StepValidator;

impl StepValidator {
    pub fn is_field_satisfied(field: &FieldSpec, state: &FormState) -> bool {
        if !field.required {
            return true;
        }
        if field.identity {
            return !state.identity_name().trim().is_empty();
        }
        match field.kind {
            FieldKind::File => state
                .value(field.name)
                .and_then(FieldValue::as_file)
                .is_some(),
            FieldKind::Boolean => true,
            _ => state
                .value(field.name)
                .map(|value| !value.stringify().trim().is_empty())
                .unwrap_or(false),
        }
    }

    pub fn is_step_valid(step: &ResolvedStep, state: &FormState) -> bool {
        step.fields
            .iter()
            .all(|field| Self::is_field_satisfied(field, state))
    }

    /// Required fields of `step` that still need input, in display order.
    pub fn missing_fields(step: &ResolvedStep, state: &FormState) -> Vec<&'static str> {
        step.fields
            .iter()
            .filter(|field| !Self::is_field_satisfied(field, state))
            .map(|field| field.name)
            .collect()
    }

    /// Index of the first incomplete step, if any.
    pub fn first_invalid_step(steps: &[ResolvedStep], state: &FormState) -> Option<usize> {
        steps
            .iter()
            .position(|step| !Self::is_step_valid(step, state))
    }
}
