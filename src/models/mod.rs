pub mod exam;
pub mod question;
pub mod request;

pub use exam::ExamMetadata;
pub use question::{OptionLabel, QuestionOption, QuestionRecord};
pub use request::{GenerationRequest, MAX_QUESTIONS};
