#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    LastExperienceEntry,
    LastSkillEntry,
    ExperienceIndexOutOfRange(usize),
    SkillIndexOutOfRange(usize),
    InvalidFieldValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::LastExperienceEntry => {
                write!(f, "At least one work experience is required")
            }
            DomainError::LastSkillEntry => {
                write!(f, "At least one skill is required")
            }
            DomainError::ExperienceIndexOutOfRange(index) => {
                write!(f, "No experience entry at index {}", index)
            }
            DomainError::SkillIndexOutOfRange(index) => {
                write!(f, "No skill entry at index {}", index)
            }
            DomainError::InvalidFieldValue(msg) => {
                write!(f, "Invalid value: {}", msg)
            }
        }
    }
}

impl std::error::Error for DomainError {}

pub type DomainResult<T> = Result<T, DomainError>;
