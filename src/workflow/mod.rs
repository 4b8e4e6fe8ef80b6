pub mod generation_flow;
pub mod session;

pub use generation_flow::GenerationFlow;
pub use session::{Action, SelectedQuestion, Session};
