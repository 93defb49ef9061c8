use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub text: String,
    /// Points awarded when the submitted option is valid.
    pub points: i32,
    pub tags: Option<String>,
    pub image_url: Option<String>,
}

/// One answer choice. A question may carry any number of valid options;
/// scoring only inspects the validity of the option that was submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: Uuid,
    pub question_id: Uuid,
    pub text: String,
    pub valid: bool,
}
