//! Field validation for the application record.
//!
//! Rules are declared once and enforced identically at two granularities:
//! step-scoped (gates forward navigation) and whole-record (gates final
//! submission). Validation never panics and never mutates the record; the
//! result is a map of error messages keyed by field path, consumed by the
//! active step view for inline display.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use regex::Regex;

use super::models::{ApplicationRecord, FormStep, HearAboutUs, FileMeta};

pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const ACCEPTED_DOCUMENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const ACCEPTED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid phone pattern"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username pattern"));
static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip pattern"));

/// Per-field error messages keyed by field path, e.g.
/// `personalInfo.firstName` or `professionalInfo.experiences.0.company`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(path.into(), message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }
}

/// Validates the fields belonging to one step. `today` is injected so the
/// age rule has a testable reference point.
pub fn validate_step(
    record: &ApplicationRecord,
    step: FormStep,
    today: NaiveDate,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match step {
        FormStep::PersonalInfo => validate_personal_info(record, today, &mut errors),
        FormStep::ProfessionalInfo => validate_professional_info(record, &mut errors),
        FormStep::Documents => validate_documents(record, &mut errors),
        FormStep::AdditionalInfo => validate_additional_info(record, &mut errors),
        FormStep::TermsAndReview => validate_terms(record, &mut errors),
    }
    errors
}

/// Validates every section. Used only at final submission.
pub fn validate_record(record: &ApplicationRecord, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for step in FormStep::ALL {
        errors.merge(validate_step(record, step, today));
    }
    errors
}

fn validate_personal_info(
    record: &ApplicationRecord,
    today: NaiveDate,
    errors: &mut ValidationErrors,
) {
    let p = &record.personal_info;

    if p.first_name.chars().count() < 2 {
        errors.insert(
            "personalInfo.firstName",
            "First name must have at least 2 characters",
        );
    }
    if p.last_name.chars().count() < 2 {
        errors.insert(
            "personalInfo.lastName",
            "Last name must have at least 2 characters",
        );
    }
    if !EMAIL_RE.is_match(&p.email) {
        errors.insert("personalInfo.email", "Please enter a valid email address");
    }
    if !PHONE_RE.is_match(&p.phone) {
        errors.insert("personalInfo.phone", "Please enter a valid phone number");
    }
    if p.username.chars().count() < 3 {
        errors.insert(
            "personalInfo.username",
            "Username must be at least 3 characters",
        );
    } else if !USERNAME_RE.is_match(&p.username) {
        errors.insert(
            "personalInfo.username",
            "Username can only contain letters, numbers, and underscores",
        );
    }

    // Applicant must be at least 18 years old as of `today`.
    let eighteen_years_ago = today
        .checked_sub_months(Months::new(18 * 12))
        .unwrap_or(today);
    if p.date_of_birth > eighteen_years_ago {
        errors.insert(
            "personalInfo.dateOfBirth",
            "You must be at least 18 years old",
        );
    }

    if p.address.street.is_empty() {
        errors.insert("personalInfo.address.street", "Street address is required");
    }
    if p.address.city.is_empty() {
        errors.insert("personalInfo.address.city", "City is required");
    }
    if p.address.state.is_empty() {
        errors.insert("personalInfo.address.state", "State is required");
    }
    if !ZIP_RE.is_match(&p.address.zip) {
        errors.insert("personalInfo.address.zip", "Please enter a valid ZIP code");
    }
    if p.address.country.is_empty() {
        errors.insert("personalInfo.address.country", "Country is required");
    }
}

fn validate_professional_info(record: &ApplicationRecord, errors: &mut ValidationErrors) {
    let p = &record.professional_info;

    if p.experiences.is_empty() {
        errors.insert(
            "professionalInfo.experiences",
            "Please add at least one work experience",
        );
    }
    for (i, exp) in p.experiences.iter().enumerate() {
        if exp.company.is_empty() {
            errors.insert(
                format!("professionalInfo.experiences.{}.company", i),
                "Company name is required",
            );
        }
        if exp.position.is_empty() {
            errors.insert(
                format!("professionalInfo.experiences.{}.position", i),
                "Position is required",
            );
        }
        if !exp.current && exp.end_date.is_none() {
            errors.insert(
                format!("professionalInfo.experiences.{}.endDate", i),
                "End date is required unless this is your current position",
            );
        }
        if exp.description.is_empty() {
            errors.insert(
                format!("professionalInfo.experiences.{}.description", i),
                "Please describe your responsibilities",
            );
        }
    }

    if p.skills.is_empty() {
        errors.insert("professionalInfo.skills", "Please add at least one skill");
    }
    for (i, skill) in p.skills.iter().enumerate() {
        if skill.is_empty() {
            errors.insert(
                format!("professionalInfo.skills.{}", i),
                "Skill name cannot be empty",
            );
        }
    }

    if p.years_of_experience < 0.0 {
        errors.insert(
            "professionalInfo.yearsOfExperience",
            "Years cannot be negative",
        );
    } else if p.years_of_experience > 50.0 {
        errors.insert(
            "professionalInfo.yearsOfExperience",
            "Please enter a valid number of years",
        );
    }
    if p.salary_expectation < 0.0 {
        errors.insert(
            "professionalInfo.salaryExpectation",
            "Salary expectation cannot be negative",
        );
    }
}

fn check_file(
    file: &FileMeta,
    accepted_types: &[&str],
    type_message: &str,
) -> Option<String> {
    if file.size > MAX_FILE_SIZE {
        return Some("File size must be less than 5MB".to_string());
    }
    if !accepted_types.contains(&file.mime.as_str()) {
        return Some(type_message.to_string());
    }
    None
}

fn validate_documents(record: &ApplicationRecord, errors: &mut ValidationErrors) {
    let d = &record.documents;

    match &d.resume {
        None => errors.insert("documents.resume", "A resume is required"),
        Some(file) => {
            if let Some(msg) = check_file(
                file,
                &ACCEPTED_DOCUMENT_TYPES,
                "Only PDF, DOC, or DOCX files are accepted",
            ) {
                errors.insert("documents.resume", msg);
            }
        }
    }

    if let Some(file) = &d.profile_picture {
        if let Some(msg) = check_file(
            file,
            &ACCEPTED_IMAGE_TYPES,
            "Only JPEG, JPG, PNG, or WebP images are accepted",
        ) {
            errors.insert("documents.profilePicture", msg);
        }
    }

    if let Some(file) = &d.cover_letter {
        if let Some(msg) = check_file(
            file,
            &ACCEPTED_DOCUMENT_TYPES,
            "Only PDF, DOC, or DOCX files are accepted",
        ) {
            errors.insert("documents.coverLetter", msg);
        }
    }
}

fn validate_additional_info(record: &ApplicationRecord, errors: &mut ValidationErrors) {
    let a = &record.additional_info;

    // otherSource is required only when the source is Other.
    if a.how_did_you_hear == HearAboutUs::Other && a.other_source.is_empty() {
        errors.insert(
            "additionalInfo.otherSource",
            "Please tell us how you heard about us",
        );
    }

    let reason_len = a.reason_for_applying.chars().count();
    if reason_len < 50 {
        errors.insert(
            "additionalInfo.reasonForApplying",
            "Please provide at least 50 characters",
        );
    } else if reason_len > 500 {
        errors.insert(
            "additionalInfo.reasonForApplying",
            "Please keep your response under 500 characters",
        );
    }
}

fn validate_terms(record: &ApplicationRecord, errors: &mut ValidationErrors) {
    let t = &record.terms_and_review;

    if !t.agree_to_terms {
        errors.insert(
            "termsAndReview.agreeToTerms",
            "You must agree to the terms and conditions",
        );
    }
    if !t.agree_to_background_check {
        errors.insert(
            "termsAndReview.agreeToBackgroundCheck",
            "You must consent to a background check",
        );
    }
    if !t.confirm_information_accurate {
        errors.insert(
            "termsAndReview.confirmInformationAccurate",
            "You must confirm all information is accurate",
        );
    }
}
