pub mod aggregate;
pub mod questionnaire;
