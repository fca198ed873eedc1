pub mod analytics;
pub mod anchoring;
pub mod annotations;
pub mod io;
pub mod models;
pub mod overlay;
pub mod records;
pub mod sidebar;
pub mod text;
pub mod toolbar;
pub mod workshop;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use anchoring::{SelectionAnchor, SelectionRange, TextTree, compute_selection_anchor};
pub use annotations::{Annotation, AnnotationId, AnnotationKind};
pub use io::*;
pub use models::ManuscriptFile;
pub use overlay::{Presentation, Segment, SegmentTarget, render_html, render_segments};
pub use records::{Comment, CommentRecord, NewComment};
pub use text::CharSpan;
pub use workshop::{Participation, WorkshopState};
