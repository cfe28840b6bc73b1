use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationDraft, AnnotationId, Point};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Add,
    Delete,
    Move,
}

/// One step of linear history.
///
/// A move keeps the record from before the drag as well as after it, so undo
/// can put the annotation back where it started and redo can replay the drag.
#[derive(Clone, Debug, PartialEq)]
pub enum UndoEntry {
    Add(Annotation),
    Delete { annotation: Annotation, index: usize },
    Move { before: Annotation, after: Annotation },
}

impl UndoEntry {
    pub fn action(&self) -> EditAction {
        match self {
            UndoEntry::Add(_) => EditAction::Add,
            UndoEntry::Delete { .. } => EditAction::Delete,
            UndoEntry::Move { .. } => EditAction::Move,
        }
    }

    /// The snapshot undo restores: the added record, the deleted record, or the
    /// pre-move record.
    pub fn annotation(&self) -> &Annotation {
        match self {
            UndoEntry::Add(annotation) => annotation,
            UndoEntry::Delete { annotation, .. } => annotation,
            UndoEntry::Move { before, .. } => before,
        }
    }
}

#[derive(Default, Debug)]
pub struct History {
    pub undo: Vec<UndoEntry>,
    pub redo: Vec<UndoEntry>,
}

impl History {
    fn record(&mut self, entry: UndoEntry) {
        self.undo.push(entry);
        self.redo.clear();
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// What an undo or redo changed, so callers know which page to repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied {
    pub action: EditAction,
    pub id: AnnotationId,
    pub page: u32,
}

/// In-memory list of annotations in insertion order, mutated only through
/// the methods below so every change lands in [`History`].
#[derive(Debug)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    history: History,
    next_id: u64,
    revision: u64,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
            history: History::default(),
            next_id: 1,
            revision: 0,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|annotation| annotation.id == id)
    }

    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &Annotation> + '_ {
        self.annotations
            .iter()
            .filter(move |annotation| annotation.page == page)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Bumped by every change to the list, including undo and redo.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.history.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.history.redo.is_empty()
    }

    pub fn add(&mut self, draft: AnnotationDraft) -> AnnotationId {
        let id = AnnotationId::new(self.next_id);
        self.next_id += 1;
        let annotation = Annotation {
            id,
            page: draft.page,
            timestamp: Utc::now(),
            body: draft.body,
        };
        debug!(
            "annotation added id={id} page={} kind={}",
            annotation.page,
            annotation.body.kind()
        );
        self.annotations.push(annotation.clone());
        self.history.record(UndoEntry::Add(annotation));
        self.revision += 1;
        id
    }

    /// Moves the annotation's anchor to `target` (document space). Returns the
    /// page of the moved annotation, or `None` if nothing changed.
    pub fn move_to(&mut self, id: AnnotationId, target: Point) -> Option<u32> {
        let index = self.index_of(id)?;
        let before = self.annotations[index].clone();
        if before.anchor() == target {
            return None;
        }
        let after = before.moved_to(target);
        self.annotations[index] = after.clone();
        let page = after.page;
        self.history.record(UndoEntry::Move { before, after });
        self.revision += 1;
        Some(page)
    }

    pub fn delete(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.index_of(id)?;
        let annotation = self.annotations.remove(index);
        debug!("annotation deleted id={id} page={}", annotation.page);
        self.history.record(UndoEntry::Delete {
            annotation: annotation.clone(),
            index,
        });
        self.revision += 1;
        Some(annotation)
    }

    pub fn undo(&mut self) -> Option<Applied> {
        let entry = self.history.undo.pop()?;
        let applied = match &entry {
            UndoEntry::Add(annotation) => self.remove(annotation.id).map(|_| ()),
            UndoEntry::Delete { annotation, index } => {
                self.insert_at(*index, annotation.clone());
                Some(())
            }
            UndoEntry::Move { before, .. } => self.replace(before.clone()),
        };
        self.finish(entry, applied, "undo", |history, entry| history.redo.push(entry))
    }

    pub fn redo(&mut self) -> Option<Applied> {
        let entry = self.history.redo.pop()?;
        let applied = match &entry {
            UndoEntry::Add(annotation) => {
                self.annotations.push(annotation.clone());
                Some(())
            }
            UndoEntry::Delete { annotation, .. } => self.remove(annotation.id).map(|_| ()),
            UndoEntry::Move { after, .. } => self.replace(after.clone()),
        };
        self.finish(entry, applied, "redo", |history, entry| history.undo.push(entry))
    }

    /// Drops all history once the backend has accepted the list as it was at
    /// `revision`. Returns false, keeping the history, if the list changed since.
    pub fn mark_saved(&mut self, revision: u64) -> bool {
        if revision != self.revision {
            debug!(
                "history kept: saved revision {revision}, current {}",
                self.revision
            );
            return false;
        }
        self.history.clear();
        true
    }

    fn finish(
        &mut self,
        entry: UndoEntry,
        applied: Option<()>,
        label: &str,
        push: impl FnOnce(&mut History, UndoEntry),
    ) -> Option<Applied> {
        let action = entry.action();
        let annotation = entry.annotation();
        if applied.is_none() {
            warn!(
                "{label} {action:?} skipped: annotation {} no longer present",
                annotation.id
            );
            return None;
        }
        let result = Applied {
            action,
            id: annotation.id,
            page: annotation.page,
        };
        debug!("{label} {action:?} id={} page={}", result.id, result.page);
        push(&mut self.history, entry);
        self.revision += 1;
        Some(result)
    }

    fn index_of(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|annotation| annotation.id == id)
    }

    fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.index_of(id)?;
        Some(self.annotations.remove(index))
    }

    fn insert_at(&mut self, index: usize, annotation: Annotation) {
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
    }

    fn replace(&mut self, annotation: Annotation) -> Option<()> {
        let index = self.index_of(annotation.id)?;
        self.annotations[index] = annotation;
        Some(())
    }
}
