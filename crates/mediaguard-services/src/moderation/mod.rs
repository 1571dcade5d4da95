//! Moderate-then-remediate workflow for uploaded media

pub mod dispatcher;
pub mod pass_through;
pub mod remediation;
pub mod workflow;

pub use dispatcher::{EventDispatcher, Outcome};
pub use pass_through::PassThrough;
pub use remediation::Remediator;
pub use workflow::MediaProfile;
