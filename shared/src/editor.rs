use log::warn;

use crate::annotation::{AnnotationDraft, AnnotationId, Point};
use crate::overlay::{overlay_for_page, OverlayItem};
use crate::render_gate::{RenderGate, RenderTicket};
use crate::store::{Applied, AnnotationStore};
use crate::viewport::Viewport;

/// What the view has to repaint after an edit or navigation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
    Nothing,
    /// Replay the annotation overlay of the current page.
    Overlay,
    /// Re-render the page image, then the overlay.
    Page,
}

/// Owns the annotation store, the viewport and the render gate of one open
/// document. The UI routes every mutation through here.
#[derive(Debug, Default)]
pub struct Editor {
    store: AnnotationStore,
    viewport: Viewport,
    renders: RenderGate,
}

impl Editor {
    pub fn new(total_pages: u32) -> Self {
        Self {
            store: AnnotationStore::new(),
            viewport: Viewport::new(total_pages),
            renders: RenderGate::new(),
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn page(&self) -> u32 {
        self.viewport.page()
    }

    pub fn scale(&self) -> f64 {
        self.viewport.scale()
    }

    pub fn set_total_pages(&mut self, total_pages: u32) -> Redraw {
        let page = self.viewport.page();
        self.viewport.set_total_pages(total_pages);
        if self.viewport.page() != page {
            Redraw::Page
        } else {
            Redraw::Nothing
        }
    }

    /// Stores `draft` unless it targets a page the document does not have.
    pub fn add(&mut self, draft: AnnotationDraft) -> Option<(AnnotationId, Redraw)> {
        if draft.page == 0 || draft.page > self.viewport.total_pages() {
            warn!(
                "annotation for page {} dropped: document has {} pages",
                draft.page,
                self.viewport.total_pages()
            );
            return None;
        }
        let redraw = self.redraw_if_visible(draft.page);
        Some((self.store.add(draft), redraw))
    }

    pub fn move_annotation(&mut self, id: AnnotationId, target: Point) -> Redraw {
        match self.store.move_to(id, target) {
            Some(page) => self.redraw_if_visible(page),
            None => Redraw::Nothing,
        }
    }

    pub fn delete(&mut self, id: AnnotationId) -> Redraw {
        match self.store.delete(id) {
            Some(annotation) => self.redraw_if_visible(annotation.page),
            None => Redraw::Nothing,
        }
    }

    pub fn undo(&mut self) -> Redraw {
        Self::after_history(self.store.undo())
    }

    pub fn redo(&mut self) -> Redraw {
        Self::after_history(self.store.redo())
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Clears history if nothing changed since `revision` was taken.
    pub fn mark_saved(&mut self, revision: u64) -> bool {
        self.store.mark_saved(revision)
    }

    pub fn next_page(&mut self) -> Redraw {
        Self::after_view(self.viewport.next_page())
    }

    pub fn prev_page(&mut self) -> Redraw {
        Self::after_view(self.viewport.prev_page())
    }

    pub fn go_to(&mut self, page: u32) -> Redraw {
        Self::after_view(self.viewport.go_to(page))
    }

    pub fn zoom_in(&mut self) -> Redraw {
        Self::after_view(self.viewport.zoom_in())
    }

    pub fn zoom_out(&mut self) -> Redraw {
        Self::after_view(self.viewport.zoom_out())
    }

    /// Starts a page render for the current page and scale.
    pub fn begin_render(&mut self) -> RenderTicket {
        self.renders.begin(self.viewport.page(), self.viewport.scale())
    }

    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        self.renders.is_current(ticket)
    }

    /// The overlay of the displayed page at the current scale.
    pub fn overlay(&self) -> Vec<OverlayItem> {
        overlay_for_page(
            self.store.annotations(),
            self.viewport.page(),
            self.viewport.scale(),
        )
    }

    pub fn to_document(&self, screen: Point) -> Point {
        self.viewport.to_document(screen)
    }

    fn redraw_if_visible(&self, page: u32) -> Redraw {
        if page == self.viewport.page() {
            Redraw::Overlay
        } else {
            Redraw::Nothing
        }
    }

    fn after_history(applied: Option<Applied>) -> Redraw {
        match applied {
            Some(_) => Redraw::Overlay,
            None => Redraw::Nothing,
        }
    }

    fn after_view(changed: bool) -> Redraw {
        if changed {
            Redraw::Page
        } else {
            Redraw::Nothing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationBody;

    fn label_position(editor: &Editor) -> Point {
        match &editor.overlay()[0] {
            OverlayItem::Label { at, .. } => *at,
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn text_annotation_follows_zoom_and_survives_undo_redo() {
        let mut editor = Editor::new(3);
        let draft = AnnotationDraft::text(1, Point::new(100.0, 100.0), "Hello", 14.0, "#000".into());
        let (id, redraw) = editor.add(draft).unwrap();
        assert_eq!(redraw, Redraw::Overlay);
        assert_eq!(editor.store().len(), 1);
        let stored = editor.store().get(id).unwrap();
        assert_eq!(stored.page, 1);
        assert_eq!(stored.anchor(), Point::new(100.0, 100.0));

        for _ in 0..10 {
            editor.zoom_in();
        }
        assert_eq!(editor.scale(), 2.0);
        assert_eq!(label_position(&editor), Point::new(200.0, 200.0));

        assert_eq!(editor.undo(), Redraw::Overlay);
        assert!(editor.store().is_empty());
        assert!(editor.overlay().is_empty());

        assert_eq!(editor.redo(), Redraw::Overlay);
        assert_eq!(editor.store().len(), 1);
        match &editor.store().annotations()[0].body {
            AnnotationBody::Text { x, y, .. } => assert_eq!((*x, *y), (100.0, 100.0)),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn adding_to_a_hidden_page_does_not_repaint() {
        let mut editor = Editor::new(3);
        let draft = AnnotationDraft::text(2, Point::new(1.0, 1.0), "later", 14.0, "#000".into());
        let (_, redraw) = editor.add(draft).unwrap();
        assert_eq!(redraw, Redraw::Nothing);
        assert!(editor.overlay().is_empty());
        assert_eq!(editor.next_page(), Redraw::Page);
        assert_eq!(editor.overlay().len(), 1);
    }

    #[test]
    fn annotations_beyond_the_last_page_are_rejected() {
        let mut editor = Editor::new(3);
        let draft = AnnotationDraft::text(99, Point::new(1.0, 1.0), "lost", 14.0, "#000".into());
        assert_eq!(editor.add(draft), None);
        let draft = AnnotationDraft::text(0, Point::new(1.0, 1.0), "lost", 14.0, "#000".into());
        assert_eq!(editor.add(draft), None);
        assert!(editor.store().is_empty());
        assert!(!editor.store().can_undo());

        let draft = AnnotationDraft::text(3, Point::new(1.0, 1.0), "last", 14.0, "#000".into());
        assert!(editor.add(draft).is_some());
        assert_eq!(editor.store().len(), 1);
    }

    #[test]
    fn navigation_outside_bounds_requests_nothing() {
        let mut editor = Editor::new(2);
        assert_eq!(editor.prev_page(), Redraw::Nothing);
        assert_eq!(editor.go_to(2), Redraw::Page);
        assert_eq!(editor.next_page(), Redraw::Nothing);
        assert_eq!(editor.set_total_pages(1), Redraw::Page);
        assert_eq!(editor.page(), 1);
    }

    #[test]
    fn render_started_before_navigation_is_stale() {
        let mut editor = Editor::new(5);
        let first = editor.begin_render();
        editor.next_page();
        let second = editor.begin_render();
        assert_eq!(second.page, 2);
        assert!(!editor.is_current(&first));
        assert!(editor.is_current(&second));
    }

    #[test]
    fn drag_uses_document_coordinates() {
        let mut editor = Editor::new(1);
        editor.zoom_in();
        editor.zoom_in();
        let draft = AnnotationDraft::text(1, Point::new(10.0, 10.0), "drag", 14.0, "#000".into());
        let (id, _) = editor.add(draft).unwrap();
        let target = editor.to_document(Point::new(60.0, 120.0));
        assert_eq!(editor.move_annotation(id, target), Redraw::Overlay);
        assert_eq!(editor.store().get(id).unwrap().anchor(), target);
        assert_eq!(editor.undo(), Redraw::Overlay);
        assert_eq!(editor.store().get(id).unwrap().anchor(), Point::new(10.0, 10.0));
    }
}
