pub mod controller;
pub mod state;

pub use controller::FeedbackForm;
pub use state::{FormError, FormPhase, FormState, CONNECTION_ERROR_MESSAGE};
