//! Built-in field catalogs and step layouts for the five offer types.

use wayfare_domain::{FieldKind, FieldSpec, OfferKind, StepSpec};

use crate::profile::{OfferLookup, OfferProfile};

/// Name of the read-only field mirroring the authenticated applicant.
pub const APPLICANT_FIELD: &str = "applicant";

fn applicant() -> FieldSpec {
    FieldSpec::new(APPLICANT_FIELD, "Applicant", FieldKind::Text).identity()
}

fn passport_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("passport_number", "Passport number", FieldKind::Text),
        FieldSpec::new("passport_expiry", "Passport expiry date", FieldKind::Date),
        FieldSpec::new("passport_copy", "Passport copy", FieldKind::File),
    ]
}

impl OfferProfile {
    pub fn study_visa() -> Self {
        let mut catalog = vec![
            applicant(),
            FieldSpec::new("date_of_birth", "Date of birth", FieldKind::Date),
            FieldSpec::new("nationality", "Nationality", FieldKind::Text),
            FieldSpec::new("phone_number", "Phone number", FieldKind::Text),
        ];
        catalog.extend(passport_fields());
        catalog.extend([
            FieldSpec::new("destination_country", "Destination country", FieldKind::Text),
            FieldSpec::new("institution", "Institution", FieldKind::Text),
            FieldSpec::new("program", "Program", FieldKind::Text),
            FieldSpec::new("study_level", "Study level", FieldKind::Select)
                .with_options("study-level"),
            FieldSpec::new("intake", "Preferred intake", FieldKind::Text).optional(),
            FieldSpec::new(
                "highest_qualification",
                "Highest qualification",
                FieldKind::Text,
            ),
            FieldSpec::new("gpa", "GPA", FieldKind::Text)
                .numeric()
                .optional(),
            FieldSpec::new("english_test", "English test", FieldKind::Select)
                .with_options("english-test")
                .optional(),
            FieldSpec::new("transcript", "Academic transcript", FieldKind::File),
            FieldSpec::new(
                "has_previous_refusal",
                "Previously refused a visa",
                FieldKind::Boolean,
            ),
            FieldSpec::new(
                "statement_of_purpose",
                "Statement of purpose",
                FieldKind::TextArea,
            )
            .optional(),
            FieldSpec::new("cv", "Curriculum vitae", FieldKind::File).optional(),
        ]);

        let steps = vec![
            StepSpec::new(
                "Personal details",
                &[APPLICANT_FIELD, "date_of_birth", "nationality", "phone_number"],
            ),
            StepSpec::new(
                "Passport",
                &["passport_number", "passport_expiry", "passport_copy"],
            ),
            StepSpec::new(
                "Study plan",
                &[
                    "destination_country",
                    "institution",
                    "program",
                    "study_level",
                    "intake",
                ],
            ),
            StepSpec::new(
                "Academic background",
                &["highest_qualification", "gpa", "english_test", "transcript"],
            ),
            StepSpec::new(
                "Additional information",
                &["has_previous_refusal", "statement_of_purpose", "cv"],
            ),
        ];

        let lookup = OfferLookup::new()
            .nested("university")
            .alias("institution", &["university", "name"])
            .alias("destination_country", &["university", "country"])
            .alias("program", &["course", "name"]);

        OfferProfile::new(OfferKind::StudyVisa, catalog, steps).with_lookup(lookup)
    }

    pub fn work_visa() -> Self {
        let mut catalog = vec![
            applicant(),
            FieldSpec::new("date_of_birth", "Date of birth", FieldKind::Date),
            FieldSpec::new("nationality", "Nationality", FieldKind::Text),
            FieldSpec::new("phone_number", "Phone number", FieldKind::Text),
        ];
        catalog.extend(passport_fields());
        catalog.extend([
            FieldSpec::new("destination_country", "Destination country", FieldKind::Text),
            FieldSpec::new("employer", "Employer", FieldKind::Text),
            FieldSpec::new("job_title", "Job title", FieldKind::Text),
            FieldSpec::new("visa_type", "Visa type", FieldKind::Select).with_options("visa-type"),
            FieldSpec::new("sponsorship_type", "Sponsorship", FieldKind::Select)
                .with_options("sponsorship-type")
                .optional(),
            FieldSpec::new("current_occupation", "Current occupation", FieldKind::Text),
            FieldSpec::new(
                "years_of_experience",
                "Years of experience",
                FieldKind::Text,
            )
            .numeric(),
            FieldSpec::new("has_job_offer", "Holds a job offer", FieldKind::Boolean),
            FieldSpec::new("cv", "Curriculum vitae", FieldKind::File),
            FieldSpec::new("experience_letter", "Experience letter", FieldKind::File).optional(),
            FieldSpec::new("cover_letter", "Cover letter", FieldKind::TextArea).optional(),
        ]);

        let steps = vec![
            StepSpec::new(
                "Personal details",
                &[APPLICANT_FIELD, "date_of_birth", "nationality", "phone_number"],
            ),
            StepSpec::new(
                "Passport",
                &["passport_number", "passport_expiry", "passport_copy"],
            ),
            StepSpec::new(
                "Position",
                &[
                    "destination_country",
                    "employer",
                    "job_title",
                    "visa_type",
                    "sponsorship_type",
                ],
            ),
            StepSpec::new(
                "Experience",
                &[
                    "current_occupation",
                    "years_of_experience",
                    "has_job_offer",
                    "cv",
                    "experience_letter",
                    "cover_letter",
                ],
            ),
        ];

        let lookup = OfferLookup::new()
            .nested("employer")
            .alias("employer", &["employer", "name"])
            .alias("destination_country", &["employer", "country"])
            .alias("job_title", &["position", "title"]);

        OfferProfile::new(OfferKind::WorkVisa, catalog, steps).with_lookup(lookup)
    }

    pub fn pilgrimage() -> Self {
        let mut catalog = vec![
            applicant(),
            FieldSpec::new("date_of_birth", "Date of birth", FieldKind::Date),
            FieldSpec::new("gender", "Gender", FieldKind::Select).with_options("gender"),
            FieldSpec::new("nationality", "Nationality", FieldKind::Text),
            FieldSpec::new("phone_number", "Phone number", FieldKind::Text),
        ];
        catalog.extend(passport_fields());
        catalog.extend([
            FieldSpec::new("package_type", "Package", FieldKind::Select)
                .with_options("pilgrimage-package"),
            FieldSpec::new("departure_city", "Departure city", FieldKind::Text),
            FieldSpec::new("travel_date", "Travel date", FieldKind::Date),
            FieldSpec::new("companions", "Number of companions", FieldKind::Text)
                .numeric()
                .optional(),
            FieldSpec::new("mahram_name", "Mahram name", FieldKind::Text).optional(),
            FieldSpec::new(
                "vaccination_certificate",
                "Vaccination certificate",
                FieldKind::File,
            ),
            FieldSpec::new(
                "has_previous_pilgrimage",
                "Performed pilgrimage before",
                FieldKind::Boolean,
            ),
            FieldSpec::new(
                "special_requirements",
                "Special requirements",
                FieldKind::TextArea,
            )
            .optional(),
        ]);

        let steps = vec![
            StepSpec::new(
                "Pilgrim details",
                &[
                    APPLICANT_FIELD,
                    "date_of_birth",
                    "gender",
                    "nationality",
                    "phone_number",
                ],
            ),
            StepSpec::new(
                "Passport",
                &["passport_number", "passport_expiry", "passport_copy"],
            ),
            StepSpec::new(
                "Journey",
                &[
                    "package_type",
                    "departure_city",
                    "travel_date",
                    "companions",
                    "mahram_name",
                ],
            ),
            StepSpec::new(
                "Health and history",
                &[
                    "vaccination_certificate",
                    "has_previous_pilgrimage",
                    "special_requirements",
                ],
            ),
        ];

        let lookup = OfferLookup::new()
            .nested("package")
            .alias("travel_date", &["package", "departure_date"])
            .alias("package_type", &["package", "type"]);

        OfferProfile::new(OfferKind::Pilgrimage, catalog, steps).with_lookup(lookup)
    }

    pub fn vacation() -> Self {
        let catalog = vec![
            applicant(),
            FieldSpec::new("phone_number", "Phone number", FieldKind::Text),
            FieldSpec::new("nationality", "Nationality", FieldKind::Text),
            FieldSpec::new("passport_number", "Passport number", FieldKind::Text),
            FieldSpec::new("passport_copy", "Passport copy", FieldKind::File).optional(),
            FieldSpec::new("destination", "Destination", FieldKind::Text),
            FieldSpec::new("departure_date", "Departure date", FieldKind::Date),
            FieldSpec::new("return_date", "Return date", FieldKind::Date),
            FieldSpec::new("travellers", "Number of travellers", FieldKind::Text).numeric(),
            FieldSpec::new("budget", "Budget", FieldKind::Text)
                .numeric()
                .optional(),
            FieldSpec::new(
                "accommodation_preference",
                "Accommodation",
                FieldKind::Select,
            )
            .with_options("accommodation-type")
            .optional(),
            FieldSpec::new(
                "needs_visa_assistance",
                "Needs visa assistance",
                FieldKind::Boolean,
            ),
            FieldSpec::new("special_requests", "Special requests", FieldKind::TextArea)
                .optional(),
        ];

        let steps = vec![
            StepSpec::new(
                "Traveller",
                &[
                    APPLICANT_FIELD,
                    "phone_number",
                    "nationality",
                    "passport_number",
                    "passport_copy",
                ],
            ),
            StepSpec::new(
                "Trip",
                &["destination", "departure_date", "return_date", "travellers"],
            ),
            StepSpec::new(
                "Preferences",
                &[
                    "budget",
                    "accommodation_preference",
                    "needs_visa_assistance",
                    "special_requests",
                ],
            ),
        ];

        let lookup = OfferLookup::new()
            .nested("package")
            .alias("destination", &["package", "destination"]);

        OfferProfile::new(OfferKind::Vacation, catalog, steps).with_lookup(lookup)
    }

    pub fn hotel() -> Self {
        let catalog = vec![
            applicant(),
            FieldSpec::new("phone_number", "Phone number", FieldKind::Text),
            FieldSpec::new("hotel_name", "Hotel", FieldKind::Text),
            FieldSpec::new("city", "City", FieldKind::Text),
            FieldSpec::new("check_in", "Check-in date", FieldKind::Date),
            FieldSpec::new("check_out", "Check-out date", FieldKind::Date),
            FieldSpec::new("guests", "Guests", FieldKind::Text).numeric(),
            FieldSpec::new("rooms", "Rooms", FieldKind::Text).numeric(),
            FieldSpec::new("room_type", "Room type", FieldKind::Select).with_options("room-type"),
            FieldSpec::new(
                "breakfast_included",
                "Include breakfast",
                FieldKind::Boolean,
            ),
            FieldSpec::new("id_document", "ID document", FieldKind::File).optional(),
            FieldSpec::new("special_requests", "Special requests", FieldKind::TextArea)
                .optional(),
        ];

        let steps = vec![
            StepSpec::new("Guest", &[APPLICANT_FIELD, "phone_number", "id_document"]),
            StepSpec::new("Hotel", &["hotel_name", "city"]),
            StepSpec::new(
                "Stay",
                &[
                    "check_in",
                    "check_out",
                    "guests",
                    "rooms",
                    "room_type",
                    "breakfast_included",
                    "special_requests",
                ],
            ),
        ];

        let lookup = OfferLookup::new()
            .nested("hotel")
            .alias("hotel_name", &["hotel", "name"]);

        OfferProfile::new(OfferKind::Hotel, catalog, steps).with_lookup(lookup)
    }
}
