pub mod content_item;
pub mod library;
pub mod manifest;
pub mod question;

pub use content_item::ContentItem;
pub use library::LibraryRef;
pub use manifest::PackageManifest;
pub use question::{NormalizedQuestion, QuestionBody, QuestionKind, RejectReason, RejectedRecord};
