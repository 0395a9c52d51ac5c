pub mod controller;
pub mod guidance;
pub mod pending;

pub use controller::SelectionSession;
pub use guidance::Guidance;
