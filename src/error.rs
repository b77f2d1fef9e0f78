use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrekError {
    #[error("Skill not found: {name}")]
    SkillNotFound { name: String },

    #[error("Duplicate skill: {name}")]
    DuplicateSkill { name: String },

    #[error("Unknown skill category: {0}")]
    UnknownCategory(String),

    #[error("Invalid parameter: skill={skill_name}, {message}")]
    InvalidParameter { skill_name: String, message: String },

    #[error("Skill execution error: skill={skill_name}, {message}")]
    SkillExecution { skill_name: String, message: String },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Completion service not configured")]
    CompletionNotConfigured,

    #[error("Backend error: status={status}, {message}")]
    Backend { status: u16, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type TrekResult<T> = Result<T, TrekError>;
