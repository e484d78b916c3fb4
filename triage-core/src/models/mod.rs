pub mod session;
pub mod tab;

pub use session::{Session, SessionEnvelope, SessionStatus, ShapeError};
pub use tab::Tab;
