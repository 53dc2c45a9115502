pub mod submission;

pub use submission::{
    decode_submission_list, ServiceInfo, Submission, SubmissionRequest, SubmitResponse,
    SubmitStatus, MAX_RATING, MAX_REVIEW_CHARS, MIN_RATING,
};
