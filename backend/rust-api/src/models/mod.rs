pub mod quiz;
pub mod question;
pub mod rank;
pub mod submission;
pub mod user;

pub use quiz::{CreateOptionRequest, CreateQuestionRequest, CreateQuizRequest, Quiz, QuizMode, QuizStatus, UpdateQuizStatusRequest};
pub use question::{Question, QuestionOption};
pub use rank::{CreateRankRequest, Rank};
pub use submission::{AnswerSubmission, ContestParticipation, QuizSubmissionRequest, Submission};
pub use user::{RegisterUserRequest, User};
