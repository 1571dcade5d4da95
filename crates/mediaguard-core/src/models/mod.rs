//! Domain models shared across crates.

pub mod event;
pub mod likelihood;
pub mod moderation;

pub use event::{Rejection, UploadEvent, ValidatedUpload};
pub use likelihood::Likelihood;
pub use moderation::{Annotation, ImageAnnotation, MediaKind, Verdict, VideoAnnotation};
