//! Converts form state into the multipart payload sent to the backend.

use tracing::debug;
use wayfare_domain::{FieldKind, FieldSpec, FieldValue, Payload};

use crate::{form_state::FormState, CoreError};

pub struct PayloadSerializer;

impl PayloadSerializer {
    /// Emits exactly one entry per filtered field (the identity field excepted, the
    /// backend derives it) followed by the offer-linking key.
    pub fn serialize(
        state: &FormState,
        fields: &[FieldSpec],
        offer_key: &str,
        offer_id: &str,
    ) -> Result<Payload, CoreError> {
        let mut payload = Payload::new();
        for field in fields.iter().filter(|field| !field.identity) {
            let value = state.value(field.name).unwrap_or(&FieldValue::Null);
            match (field.kind, value) {
                (FieldKind::File, FieldValue::File(Some(file))) => {
                    payload.push_file(field.name, file.clone());
                }
                (FieldKind::File, FieldValue::File(None) | FieldValue::Null) => {
                    payload.push_text(field.name, "");
                }
                (FieldKind::Boolean, FieldValue::Bool(flag)) => {
                    payload.push_text(field.name, bool_token(*flag));
                }
                (FieldKind::Boolean, FieldValue::Null) => {
                    payload.push_text(field.name, bool_token(false));
                }
                (kind, FieldValue::Text(text)) if kind.is_scalar() => {
                    let encoded = if field.numeric {
                        numeric_string(text)
                    } else {
                        text.clone()
                    };
                    payload.push_text(field.name, encoded);
                }
                (kind, FieldValue::Null) if kind.is_scalar() => {
                    payload.push_text(field.name, "");
                }
                (kind, other) => {
                    return Err(CoreError::Serialization(format!(
                        "field `{}` of kind {} holds unexpected value {:?}",
                        field.name, kind, other
                    )));
                }
            }
        }
        payload.push_text(offer_key, offer_id);
        debug!(parts = payload.len(), "serialized application payload");
        Ok(payload)
    }
}

fn bool_token(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

/// Canonical numeric rendering, or an empty string when the input is not a number.
pub fn numeric_string(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(whole) = trimmed.parse::<i64>() {
        return whole.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                format!("{:.0}", value)
            } else {
                value.to_string()
            }
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_state::{IdentityDefaults, InputEvent};
    use wayfare_domain::{FileHandle, PartValue};

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("applicant", "Applicant", FieldKind::Text).identity(),
            FieldSpec::new("passport_number", "Passport number", FieldKind::Text),
            FieldSpec::new("passport_copy", "Passport copy", FieldKind::File),
            FieldSpec::new("cv", "CV", FieldKind::File).optional(),
            FieldSpec::new("has_job_offer", "Job offer", FieldKind::Boolean),
            FieldSpec::new("years_of_experience", "Experience", FieldKind::Text).numeric(),
            FieldSpec::new("travel_date", "Travel date", FieldKind::Date),
        ]
    }

    fn state() -> FormState {
        FormState::new(
            &fields(),
            &IdentityDefaults {
                display_name: "Amina Okafor".into(),
            },
        )
    }

    #[test]
    fn payload_has_one_entry_per_field_and_offer_last() {
        let mut form = state();
        let passport = FileHandle::new("passport.pdf", "application/pdf", vec![9]);
        form.set_field("passport_number", InputEvent::text("A1234567"))
            .unwrap();
        form.set_field("passport_copy", InputEvent::files(vec![passport.clone()]))
            .unwrap();
        form.set_field("years_of_experience", InputEvent::text(" 05 "))
            .unwrap();

        let payload = PayloadSerializer::serialize(&form, &fields(), "offer", "7").unwrap();

        assert_eq!(
            payload.names(),
            vec![
                "passport_number",
                "passport_copy",
                "cv",
                "has_job_offer",
                "years_of_experience",
                "travel_date",
                "offer"
            ]
        );
        assert_eq!(payload.text("passport_number"), Some("A1234567"));
        assert_eq!(payload.file("passport_copy"), Some(&passport));
        assert_eq!(payload.text("cv"), Some(""));
        assert_eq!(payload.text("has_job_offer"), Some("false"));
        assert_eq!(payload.text("years_of_experience"), Some("5"));
        assert_eq!(payload.text("travel_date"), Some(""));
        assert_eq!(
            payload.parts().last().map(|part| &part.value),
            Some(&PartValue::Text("7".into()))
        );
    }

    #[test]
    fn identity_field_is_not_sent() {
        let payload = PayloadSerializer::serialize(&state(), &fields(), "offer", "7").unwrap();
        assert!(payload.get("applicant").is_none());
    }

    #[test]
    fn booleans_serialize_as_tokens() {
        let mut form = state();
        form.set_field("has_job_offer", InputEvent::checked(true))
            .unwrap();
        let payload = PayloadSerializer::serialize(&form, &fields(), "offer", "7").unwrap();
        assert_eq!(payload.text("has_job_offer"), Some("true"));
    }

    #[test]
    fn null_scalars_serialize_as_empty_strings() {
        let mut form = state();
        form.set_value("travel_date", FieldValue::Null).unwrap();
        let payload = PayloadSerializer::serialize(&form, &fields(), "offer", "7").unwrap();
        assert_eq!(payload.text("travel_date"), Some(""));
    }

    #[test]
    fn mismatched_value_shape_fails_without_payload() {
        let mut form = state();
        form.set_value("passport_copy", FieldValue::Text("passport.pdf".into()))
            .unwrap();
        let err = PayloadSerializer::serialize(&form, &fields(), "offer", "7")
            .expect_err("text in a file field must fail");
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn numeric_strings_are_canonical() {
        assert_eq!(numeric_string("7"), "7");
        assert_eq!(numeric_string(" 3.50 "), "3.5");
        assert_eq!(numeric_string("4.0"), "4");
        assert_eq!(numeric_string("-2"), "-2");
        assert_eq!(numeric_string("ten"), "");
        assert_eq!(numeric_string(""), "");
        assert_eq!(numeric_string("NaN"), "");
    }
}
