//! Typed field accessors for the step views.
//!
//! Every editable field is a variant here, mapping step identity to a
//! typed getter/setter pair over the record. The step views read and
//! write exclusively through this table; there is no lookup of record
//! sections by string key anywhere.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{ApplicationRecord, DomainError, DomainResult, FileMeta, FormStep};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a field is edited and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text edited through the input buffer
    Text,
    /// ISO date (YYYY-MM-DD) edited through the input buffer
    Date,
    /// Number edited through the input buffer
    Number,
    /// Boolean flipped in place
    Toggle,
    /// Enum cycled in place
    Choice,
    /// File attached by entering a filesystem path
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Username,
    DateOfBirth,
    Street,
    City,
    State,
    Zip,
    Country,
    ExperienceCompany(usize),
    ExperiencePosition(usize),
    ExperienceCurrent(usize),
    ExperienceStart(usize),
    ExperienceEnd(usize),
    ExperienceDescription(usize),
    Skill(usize),
    YearsOfExperience,
    SalaryExpectation,
    Resume,
    ProfilePicture,
    CoverLetter,
    HowDidYouHear,
    OtherSource,
    AvailableStartDate,
    WillingToRelocate,
    ReasonForApplying,
    AdditionalComments,
    AgreeToTerms,
    AgreeToBackgroundCheck,
    ConfirmInformationAccurate,
}

/// The editable fields of a step, in display order. Experience and skill
/// entries expand to one field group per list element, and `otherSource`
/// appears only while "Other" is selected.
pub fn step_fields(step: FormStep, record: &ApplicationRecord) -> Vec<Field> {
    match step {
        FormStep::PersonalInfo => vec![
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Phone,
            Field::Username,
            Field::DateOfBirth,
            Field::Street,
            Field::City,
            Field::State,
            Field::Zip,
            Field::Country,
        ],
        FormStep::ProfessionalInfo => {
            let mut fields = Vec::new();
            for i in 0..record.professional_info.experiences.len() {
                fields.push(Field::ExperienceCompany(i));
                fields.push(Field::ExperiencePosition(i));
                fields.push(Field::ExperienceCurrent(i));
                fields.push(Field::ExperienceStart(i));
                if !record.professional_info.experiences[i].current {
                    fields.push(Field::ExperienceEnd(i));
                }
                fields.push(Field::ExperienceDescription(i));
            }
            for i in 0..record.professional_info.skills.len() {
                fields.push(Field::Skill(i));
            }
            fields.push(Field::YearsOfExperience);
            fields.push(Field::SalaryExpectation);
            fields
        }
        FormStep::Documents => vec![Field::Resume, Field::ProfilePicture, Field::CoverLetter],
        FormStep::AdditionalInfo => {
            let mut fields = vec![Field::HowDidYouHear];
            if record.additional_info.how_did_you_hear == crate::domain::HearAboutUs::Other {
                fields.push(Field::OtherSource);
            }
            fields.push(Field::AvailableStartDate);
            fields.push(Field::WillingToRelocate);
            fields.push(Field::ReasonForApplying);
            fields.push(Field::AdditionalComments);
            fields
        }
        FormStep::TermsAndReview => vec![
            Field::AgreeToTerms,
            Field::AgreeToBackgroundCheck,
            Field::ConfirmInformationAccurate,
        ],
    }
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::DateOfBirth
            | Field::ExperienceStart(_)
            | Field::ExperienceEnd(_)
            | Field::AvailableStartDate => FieldKind::Date,
            Field::YearsOfExperience | Field::SalaryExpectation => FieldKind::Number,
            Field::ExperienceCurrent(_)
            | Field::WillingToRelocate
            | Field::AgreeToTerms
            | Field::AgreeToBackgroundCheck
            | Field::ConfirmInformationAccurate => FieldKind::Toggle,
            Field::HowDidYouHear => FieldKind::Choice,
            Field::Resume | Field::ProfilePicture | Field::CoverLetter => FieldKind::File,
            _ => FieldKind::Text,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Field::FirstName => "First Name".to_string(),
            Field::LastName => "Last Name".to_string(),
            Field::Email => "Email".to_string(),
            Field::Phone => "Phone".to_string(),
            Field::Username => "Username".to_string(),
            Field::DateOfBirth => "Date of Birth".to_string(),
            Field::Street => "Street Address".to_string(),
            Field::City => "City".to_string(),
            Field::State => "State".to_string(),
            Field::Zip => "ZIP Code".to_string(),
            Field::Country => "Country".to_string(),
            Field::ExperienceCompany(i) => format!("Experience {} - Company", i + 1),
            Field::ExperiencePosition(i) => format!("Experience {} - Position", i + 1),
            Field::ExperienceCurrent(i) => format!("Experience {} - Current Job", i + 1),
            Field::ExperienceStart(i) => format!("Experience {} - Start Date", i + 1),
            Field::ExperienceEnd(i) => format!("Experience {} - End Date", i + 1),
            Field::ExperienceDescription(i) => format!("Experience {} - Description", i + 1),
            Field::Skill(i) => format!("Skill {}", i + 1),
            Field::YearsOfExperience => "Years of Experience".to_string(),
            Field::SalaryExpectation => "Salary Expectation".to_string(),
            Field::Resume => "Resume/CV (path)".to_string(),
            Field::ProfilePicture => "Profile Picture (path)".to_string(),
            Field::CoverLetter => "Cover Letter (path)".to_string(),
            Field::HowDidYouHear => "How did you hear about us?".to_string(),
            Field::OtherSource => "Other Source".to_string(),
            Field::AvailableStartDate => "Available Start Date".to_string(),
            Field::WillingToRelocate => "Willing to Relocate".to_string(),
            Field::ReasonForApplying => "Reason for Applying".to_string(),
            Field::AdditionalComments => "Additional Comments".to_string(),
            Field::AgreeToTerms => "I agree to the terms and conditions".to_string(),
            Field::AgreeToBackgroundCheck => "I consent to a background check".to_string(),
            Field::ConfirmInformationAccurate => {
                "I confirm all information is accurate".to_string()
            }
        }
    }

    /// Error-map path of this field, matching the validation engine's keys.
    pub fn path(&self) -> String {
        match self {
            Field::FirstName => "personalInfo.firstName".to_string(),
            Field::LastName => "personalInfo.lastName".to_string(),
            Field::Email => "personalInfo.email".to_string(),
            Field::Phone => "personalInfo.phone".to_string(),
            Field::Username => "personalInfo.username".to_string(),
            Field::DateOfBirth => "personalInfo.dateOfBirth".to_string(),
            Field::Street => "personalInfo.address.street".to_string(),
            Field::City => "personalInfo.address.city".to_string(),
            Field::State => "personalInfo.address.state".to_string(),
            Field::Zip => "personalInfo.address.zip".to_string(),
            Field::Country => "personalInfo.address.country".to_string(),
            Field::ExperienceCompany(i) => {
                format!("professionalInfo.experiences.{}.company", i)
            }
            Field::ExperiencePosition(i) => {
                format!("professionalInfo.experiences.{}.position", i)
            }
            Field::ExperienceCurrent(i) => {
                format!("professionalInfo.experiences.{}.current", i)
            }
            Field::ExperienceStart(i) => {
                format!("professionalInfo.experiences.{}.startDate", i)
            }
            Field::ExperienceEnd(i) => format!("professionalInfo.experiences.{}.endDate", i),
            Field::ExperienceDescription(i) => {
                format!("professionalInfo.experiences.{}.description", i)
            }
            Field::Skill(i) => format!("professionalInfo.skills.{}", i),
            Field::YearsOfExperience => "professionalInfo.yearsOfExperience".to_string(),
            Field::SalaryExpectation => "professionalInfo.salaryExpectation".to_string(),
            Field::Resume => "documents.resume".to_string(),
            Field::ProfilePicture => "documents.profilePicture".to_string(),
            Field::CoverLetter => "documents.coverLetter".to_string(),
            Field::HowDidYouHear => "additionalInfo.howDidYouHear".to_string(),
            Field::OtherSource => "additionalInfo.otherSource".to_string(),
            Field::AvailableStartDate => "additionalInfo.availableStartDate".to_string(),
            Field::WillingToRelocate => "additionalInfo.willingToRelocate".to_string(),
            Field::ReasonForApplying => "additionalInfo.reasonForApplying".to_string(),
            Field::AdditionalComments => "additionalInfo.additionalComments".to_string(),
            Field::AgreeToTerms => "termsAndReview.agreeToTerms".to_string(),
            Field::AgreeToBackgroundCheck => "termsAndReview.agreeToBackgroundCheck".to_string(),
            Field::ConfirmInformationAccurate => {
                "termsAndReview.confirmInformationAccurate".to_string()
            }
        }
    }

    /// The field's current value as editable/display text.
    pub fn get(&self, record: &ApplicationRecord) -> String {
        let p = &record.personal_info;
        let pro = &record.professional_info;
        let a = &record.additional_info;
        let t = &record.terms_and_review;
        match self {
            Field::FirstName => p.first_name.clone(),
            Field::LastName => p.last_name.clone(),
            Field::Email => p.email.clone(),
            Field::Phone => p.phone.clone(),
            Field::Username => p.username.clone(),
            Field::DateOfBirth => p.date_of_birth.format(DATE_FORMAT).to_string(),
            Field::Street => p.address.street.clone(),
            Field::City => p.address.city.clone(),
            Field::State => p.address.state.clone(),
            Field::Zip => p.address.zip.clone(),
            Field::Country => p.address.country.clone(),
            Field::ExperienceCompany(i) => {
                pro.experiences.get(*i).map(|e| e.company.clone()).unwrap_or_default()
            }
            Field::ExperiencePosition(i) => {
                pro.experiences.get(*i).map(|e| e.position.clone()).unwrap_or_default()
            }
            Field::ExperienceCurrent(i) => {
                let current = pro.experiences.get(*i).map(|e| e.current).unwrap_or(false);
                if current { "yes" } else { "no" }.to_string()
            }
            Field::ExperienceStart(i) => pro
                .experiences
                .get(*i)
                .map(|e| e.start_date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Field::ExperienceEnd(i) => pro
                .experiences
                .get(*i)
                .and_then(|e| e.end_date)
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Field::ExperienceDescription(i) => pro
                .experiences
                .get(*i)
                .map(|e| e.description.clone())
                .unwrap_or_default(),
            Field::Skill(i) => pro.skills.get(*i).cloned().unwrap_or_default(),
            Field::YearsOfExperience => format!("{}", pro.years_of_experience),
            Field::SalaryExpectation => format!("{}", pro.salary_expectation),
            Field::Resume => file_display(&record.documents.resume),
            Field::ProfilePicture => file_display(&record.documents.profile_picture),
            Field::CoverLetter => file_display(&record.documents.cover_letter),
            Field::HowDidYouHear => a.how_did_you_hear.label().to_string(),
            Field::OtherSource => a.other_source.clone(),
            Field::AvailableStartDate => {
                a.available_start_date.format(DATE_FORMAT).to_string()
            }
            Field::WillingToRelocate => {
                if a.willing_to_relocate { "yes" } else { "no" }.to_string()
            }
            Field::ReasonForApplying => a.reason_for_applying.clone(),
            Field::AdditionalComments => a.additional_comments.clone(),
            Field::AgreeToTerms => if t.agree_to_terms { "yes" } else { "no" }.to_string(),
            Field::AgreeToBackgroundCheck => {
                if t.agree_to_background_check { "yes" } else { "no" }.to_string()
            }
            Field::ConfirmInformationAccurate => {
                if t.confirm_information_accurate { "yes" } else { "no" }.to_string()
            }
        }
    }

    /// Commits an edited buffer into the record. Toggle and choice fields
    /// are flipped through [`Field::toggle`] instead.
    pub fn set(&self, record: &mut ApplicationRecord, value: &str) -> DomainResult<()> {
        let value = value.trim();
        match self {
            Field::FirstName => record.personal_info.first_name = value.to_string(),
            Field::LastName => record.personal_info.last_name = value.to_string(),
            Field::Email => record.personal_info.email = value.to_string(),
            Field::Phone => record.personal_info.phone = value.to_string(),
            Field::Username => record.personal_info.username = value.to_string(),
            Field::DateOfBirth => record.personal_info.date_of_birth = parse_date(value)?,
            Field::Street => record.personal_info.address.street = value.to_string(),
            Field::City => record.personal_info.address.city = value.to_string(),
            Field::State => record.personal_info.address.state = value.to_string(),
            Field::Zip => record.personal_info.address.zip = value.to_string(),
            Field::Country => record.personal_info.address.country = value.to_string(),
            Field::ExperienceCompany(i) => experience_mut(record, *i)?.company = value.to_string(),
            Field::ExperiencePosition(i) => {
                experience_mut(record, *i)?.position = value.to_string()
            }
            Field::ExperienceCurrent(i) => {
                record.set_experience_current(*i, value == "yes")?;
            }
            Field::ExperienceStart(i) => experience_mut(record, *i)?.start_date = parse_date(value)?,
            Field::ExperienceEnd(i) => {
                // Clearing the end date falls back to today, matching the
                // current-flag coupling.
                let parsed = if value.is_empty() {
                    Some(chrono::Local::now().date_naive())
                } else {
                    Some(parse_date(value)?)
                };
                experience_mut(record, *i)?.end_date = parsed;
            }
            Field::ExperienceDescription(i) => {
                experience_mut(record, *i)?.description = value.to_string()
            }
            Field::Skill(i) => {
                let skills = &mut record.professional_info.skills;
                let slot = skills
                    .get_mut(*i)
                    .ok_or(DomainError::SkillIndexOutOfRange(*i))?;
                *slot = value.to_string();
            }
            Field::YearsOfExperience => {
                record.professional_info.years_of_experience = parse_number(value)?
            }
            Field::SalaryExpectation => {
                record.professional_info.salary_expectation = parse_number(value)?
            }
            Field::Resume => record.documents.resume = attach_file(value)?,
            Field::ProfilePicture => record.documents.profile_picture = attach_file(value)?,
            Field::CoverLetter => record.documents.cover_letter = attach_file(value)?,
            Field::OtherSource => record.additional_info.other_source = value.to_string(),
            Field::AvailableStartDate => {
                record.additional_info.available_start_date = parse_date(value)?
            }
            Field::ReasonForApplying => {
                record.additional_info.reason_for_applying = value.to_string()
            }
            Field::AdditionalComments => {
                record.additional_info.additional_comments = value.to_string()
            }
            Field::HowDidYouHear
            | Field::WillingToRelocate
            | Field::AgreeToTerms
            | Field::AgreeToBackgroundCheck
            | Field::ConfirmInformationAccurate => {
                return Err(DomainError::InvalidFieldValue(
                    "field is toggled, not typed".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Flips a toggle field or cycles a choice field in place.
    pub fn toggle(&self, record: &mut ApplicationRecord) -> DomainResult<()> {
        match self {
            Field::ExperienceCurrent(i) => {
                let current = record
                    .professional_info
                    .experiences
                    .get(*i)
                    .ok_or(DomainError::ExperienceIndexOutOfRange(*i))?
                    .current;
                record.set_experience_current(*i, !current)
            }
            Field::WillingToRelocate => {
                let a = &mut record.additional_info;
                a.willing_to_relocate = !a.willing_to_relocate;
                Ok(())
            }
            Field::HowDidYouHear => {
                let a = &mut record.additional_info;
                a.how_did_you_hear = a.how_did_you_hear.next();
                Ok(())
            }
            Field::AgreeToTerms => {
                let t = &mut record.terms_and_review;
                t.agree_to_terms = !t.agree_to_terms;
                Ok(())
            }
            Field::AgreeToBackgroundCheck => {
                let t = &mut record.terms_and_review;
                t.agree_to_background_check = !t.agree_to_background_check;
                Ok(())
            }
            Field::ConfirmInformationAccurate => {
                let t = &mut record.terms_and_review;
                t.confirm_information_accurate = !t.confirm_information_accurate;
                Ok(())
            }
            _ => Err(DomainError::InvalidFieldValue(
                "field is typed, not toggled".to_string(),
            )),
        }
    }

    /// Index of the experience entry this field edits, if any. Used by
    /// the remove-entry key binding.
    pub fn experience_index(&self) -> Option<usize> {
        match self {
            Field::ExperienceCompany(i)
            | Field::ExperiencePosition(i)
            | Field::ExperienceCurrent(i)
            | Field::ExperienceStart(i)
            | Field::ExperienceEnd(i)
            | Field::ExperienceDescription(i) => Some(*i),
            _ => None,
        }
    }

    pub fn skill_index(&self) -> Option<usize> {
        match self {
            Field::Skill(i) => Some(*i),
            _ => None,
        }
    }
}

fn file_display(file: &Option<FileMeta>) -> String {
    file.as_ref().map(|f| f.name.clone()).unwrap_or_default()
}

fn parse_date(value: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| DomainError::InvalidFieldValue(format!("expected YYYY-MM-DD, got {value:?}")))
}

fn parse_number(value: &str) -> DomainResult<f64> {
    value
        .parse::<f64>()
        .map_err(|_| DomainError::InvalidFieldValue(format!("expected a number, got {value:?}")))
}

fn experience_mut(
    record: &mut ApplicationRecord,
    index: usize,
) -> DomainResult<&mut crate::domain::Experience> {
    record
        .professional_info
        .experiences
        .get_mut(index)
        .ok_or(DomainError::ExperienceIndexOutOfRange(index))
}

/// Builds file metadata from a filesystem path. The file's bytes stay on
/// disk; only name, size, and guessed mime type enter the record. An
/// empty path detaches the file.
fn attach_file(path: &str) -> DomainResult<Option<FileMeta>> {
    if path.is_empty() {
        return Ok(None);
    }
    let path = Path::new(path);
    let meta = fs::metadata(path)
        .map_err(|e| DomainError::InvalidFieldValue(format!("{}: {}", path.display(), e)))?;
    if !meta.is_file() {
        return Err(DomainError::InvalidFieldValue(format!(
            "{} is not a file",
            path.display()
        )));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();
    Ok(Some(FileMeta {
        name,
        size: meta.len(),
        mime,
    }))
}
