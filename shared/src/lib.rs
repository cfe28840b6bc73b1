pub mod annotation;
pub mod api;
pub mod editor;
pub mod error;
pub mod overlay;
pub mod render_gate;
pub mod store;
pub mod theme;
pub mod toast;
pub mod upload;
pub mod viewport;

pub use annotation::{Annotation, AnnotationBody, AnnotationDraft, AnnotationId, Point, Rect};
pub use editor::{Editor, Redraw};
pub use error::{ApiError, ApiResult};
pub use overlay::OverlayItem;
pub use render_gate::{RenderGate, RenderTicket};
pub use store::{AnnotationStore, EditAction, UndoEntry};
pub use theme::Theme;
pub use toast::{Severity, Toast, ToastHandle, Toaster};
pub use upload::{FileInfo, UploadError, UploadPolicy};
pub use viewport::Viewport;
