use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Ordered list of wizard steps. Step identity is section identity:
/// each variant owns exactly one section of [`ApplicationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    PersonalInfo,
    ProfessionalInfo,
    Documents,
    AdditionalInfo,
    TermsAndReview,
}

impl FormStep {
    pub const ALL: [FormStep; 5] = [
        FormStep::PersonalInfo,
        FormStep::ProfessionalInfo,
        FormStep::Documents,
        FormStep::AdditionalInfo,
        FormStep::TermsAndReview,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Section key, used as the error-map path prefix and the storage key.
    pub fn id(&self) -> &'static str {
        match self {
            FormStep::PersonalInfo => "personalInfo",
            FormStep::ProfessionalInfo => "professionalInfo",
            FormStep::Documents => "documents",
            FormStep::AdditionalInfo => "additionalInfo",
            FormStep::TermsAndReview => "termsAndReview",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormStep::PersonalInfo => "Personal Information",
            FormStep::ProfessionalInfo => "Professional Background",
            FormStep::Documents => "Upload Documents",
            FormStep::AdditionalInfo => "Additional Questions",
            FormStep::TermsAndReview => "Review & Submit",
        }
    }

    pub fn from_index(index: usize) -> Option<FormStep> {
        Self::ALL.get(index).copied()
    }

    /// Whether the step's section has been touched beyond its defaults.
    /// Drives the stepper's completed/incomplete display for past steps;
    /// actual gating is done by the validation engine.
    pub fn section_filled(&self, record: &ApplicationRecord) -> bool {
        match self {
            FormStep::PersonalInfo => {
                let p = &record.personal_info;
                !p.first_name.is_empty() || !p.last_name.is_empty() || !p.email.is_empty()
            }
            FormStep::ProfessionalInfo => {
                let p = &record.professional_info;
                p.experiences.iter().any(|e| !e.company.is_empty())
                    || p.skills.iter().any(|s| !s.is_empty())
            }
            FormStep::Documents => record.documents.resume.is_some(),
            FormStep::AdditionalInfo => !record.additional_info.reason_for_applying.is_empty(),
            FormStep::TermsAndReview => {
                let t = &record.terms_and_review;
                t.agree_to_terms && t.agree_to_background_check && t.confirm_information_accurate
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub date_of_birth: NaiveDate,
    pub address: Address,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            username: String::new(),
            date_of_birth: Local::now().date_naive(),
            address: Address::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub description: String,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            company: String::new(),
            position: String::new(),
            start_date: Local::now().date_naive(),
            end_date: None,
            current: false,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalInfo {
    pub experiences: Vec<Experience>,
    pub skills: Vec<String>,
    pub years_of_experience: f64,
    pub salary_expectation: f64,
}

impl Default for ProfessionalInfo {
    fn default() -> Self {
        Self {
            experiences: vec![Experience::default()],
            skills: vec![String::new()],
            years_of_experience: 0.0,
            salary_expectation: 0.0,
        }
    }
}

/// Metadata of an attached file. Binary content is never stored here and
/// never survives serialization; attachments must be re-made after a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documents {
    pub resume: Option<FileMeta>,
    pub profile_picture: Option<FileMeta>,
    pub cover_letter: Option<FileMeta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HearAboutUs {
    JobBoard,
    SocialMedia,
    Referral,
    Other,
}

impl HearAboutUs {
    pub fn label(&self) -> &'static str {
        match self {
            HearAboutUs::JobBoard => "Job Board",
            HearAboutUs::SocialMedia => "Social Media",
            HearAboutUs::Referral => "Referral",
            HearAboutUs::Other => "Other",
        }
    }

    /// Next variant in display order, wrapping. Used by the picker widget.
    pub fn next(&self) -> HearAboutUs {
        match self {
            HearAboutUs::JobBoard => HearAboutUs::SocialMedia,
            HearAboutUs::SocialMedia => HearAboutUs::Referral,
            HearAboutUs::Referral => HearAboutUs::Other,
            HearAboutUs::Other => HearAboutUs::JobBoard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub how_did_you_hear: HearAboutUs,
    pub other_source: String,
    pub available_start_date: NaiveDate,
    pub willing_to_relocate: bool,
    pub reason_for_applying: String,
    pub additional_comments: String,
}

impl Default for AdditionalInfo {
    fn default() -> Self {
        Self {
            how_did_you_hear: HearAboutUs::JobBoard,
            other_source: String::new(),
            available_start_date: Local::now().date_naive(),
            willing_to_relocate: false,
            reason_for_applying: String::new(),
            additional_comments: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsAndReview {
    pub agree_to_terms: bool,
    pub agree_to_background_check: bool,
    pub confirm_information_accurate: bool,
}

/// The single source of truth for the wizard. One section per step,
/// mutated in place by the active step view through typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub personal_info: PersonalInfo,
    pub professional_info: ProfessionalInfo,
    pub documents: Documents,
    pub additional_info: AdditionalInfo,
    pub terms_and_review: TermsAndReview,
}

impl ApplicationRecord {
    pub fn add_experience(&mut self) {
        self.professional_info.experiences.push(Experience::default());
    }

    /// Removes an experience entry. The list never drops below one entry.
    pub fn remove_experience(&mut self, index: usize) -> DomainResult<()> {
        let experiences = &mut self.professional_info.experiences;
        if index >= experiences.len() {
            return Err(DomainError::ExperienceIndexOutOfRange(index));
        }
        if experiences.len() <= 1 {
            return Err(DomainError::LastExperienceEntry);
        }
        experiences.remove(index);
        Ok(())
    }

    pub fn add_skill(&mut self) {
        self.professional_info.skills.push(String::new());
    }

    /// Removes a skill entry. The list never drops below one entry.
    pub fn remove_skill(&mut self, index: usize) -> DomainResult<()> {
        let skills = &mut self.professional_info.skills;
        if index >= skills.len() {
            return Err(DomainError::SkillIndexOutOfRange(index));
        }
        if skills.len() <= 1 {
            return Err(DomainError::LastSkillEntry);
        }
        skills.remove(index);
        Ok(())
    }

    /// Toggles the "I currently work here" flag, keeping the end date
    /// consistent in the same update: current implies no end date, not
    /// current implies an end date (today when none was set).
    pub fn set_experience_current(&mut self, index: usize, current: bool) -> DomainResult<()> {
        let experience = self
            .professional_info
            .experiences
            .get_mut(index)
            .ok_or(DomainError::ExperienceIndexOutOfRange(index))?;
        experience.current = current;
        if current {
            experience.end_date = None;
        } else if experience.end_date.is_none() {
            experience.end_date = Some(Local::now().date_naive());
        }
        Ok(())
    }
}
