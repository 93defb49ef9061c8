use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    pub static ref SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "submissions_total",
        "Total number of answer submissions recorded",
        &["correct"]
    )
    .unwrap();

    pub static ref QUIZ_TRANSITIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quiz_transitions_total",
        "Total number of scheduler-driven quiz status transitions",
        &["status"]
    )
    .unwrap();
}

pub fn record_submission(correct: bool) {
    let label = if correct { "true" } else { "false" };
    SUBMISSIONS_TOTAL.with_label_values(&[label]).inc();
}

pub fn record_quiz_transition(status: &str) {
    QUIZ_TRANSITIONS_TOTAL.with_label_values(&[status]).inc();
}
