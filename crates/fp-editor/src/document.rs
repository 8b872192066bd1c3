//! Floor-plan document and command log
//!
//! All mutation of the element collection goes through [`Command`]s so that
//! every change can be undone. After each change the junction resolver runs
//! over the walls to keep connection lists and corner fills current.

use fp_core::junction::{Junction, find_junctions, resolve_connections};
use fp_core::{SpaceElement, WallSegment};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Document errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("Element not found: {0}")]
    ElementNotFound(Uuid),

    #[error("Duplicate element: {0}")]
    DuplicateElement(Uuid),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A reversible edit to the floor plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Insert a new element
    AddElement { element: SpaceElement },
    /// Replace an element, remembering its previous state
    UpdateElement {
        element: SpaceElement,
        previous: SpaceElement,
    },
    /// Remove an element
    DeleteElement { element: SpaceElement },
    /// Remove several elements at once
    BatchDeleteElements { elements: Vec<SpaceElement> },
    /// Rotate an element
    RotateElement {
        element: SpaceElement,
        previous: SpaceElement,
        rotation: DVec3,
    },
}

impl Command {
    /// Human-readable description for history menus
    pub fn description(&self) -> String {
        match self {
            Command::AddElement { element } => format!("Add {}", element.kind.type_name()),
            Command::UpdateElement { element, .. } => {
                format!("Update {}", element.kind.type_name())
            }
            Command::DeleteElement { element } => {
                format!("Delete {}", element.kind.type_name())
            }
            Command::BatchDeleteElements { elements } => {
                format!("Delete {} elements", elements.len())
            }
            Command::RotateElement { element, .. } => {
                format!("Rotate {}", element.kind.type_name())
            }
        }
    }
}

/// Receiver of editing commands
pub trait CommandDispatcher {
    /// Apply or enqueue a command
    fn dispatch(&mut self, command: Command) -> DocumentResult<()>;
}

/// Commands collected for later application
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queued commands, oldest first
    pub fn pending(&self) -> &[Command] {
        &self.pending
    }

    /// Take all queued commands, leaving the queue empty
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    /// Apply every queued command to a document.
    ///
    /// Failed commands are logged and dropped. Returns how many were applied.
    pub fn flush(&mut self, plan: &mut FloorPlan) -> usize {
        let mut applied = 0;
        for command in self.take() {
            let description = command.description();
            match plan.execute(command) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!("Dropping queued command '{}': {}", description, e),
            }
        }
        applied
    }
}

impl CommandDispatcher for CommandQueue {
    fn dispatch(&mut self, command: Command) -> DocumentResult<()> {
        self.pending.push(command);
        Ok(())
    }
}

/// The editable floor plan
#[derive(Debug, Clone)]
pub struct FloorPlan {
    elements: Vec<SpaceElement>,
    junctions: Vec<Junction>,
    version: u64,
    /// Commands that can be undone
    undo_stack: Vec<Command>,
    /// Commands that can be redone
    redo_stack: Vec<Command>,
    /// Maximum number of history entries
    max_history: usize,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::with_history(Self::DEFAULT_HISTORY)
    }
}

impl FloorPlan {
    /// Default number of undoable commands kept
    pub const DEFAULT_HISTORY: usize = 100;

    /// Create an empty floor plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty floor plan with the given history limit
    pub fn with_history(max_history: usize) -> Self {
        Self {
            elements: Vec::new(),
            junctions: Vec::new(),
            version: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history,
        }
    }

    /// Apply a command and record it for undo
    pub fn execute(&mut self, command: Command) -> DocumentResult<()> {
        self.apply(&command)?;
        tracing::debug!("Executed '{}'", command.description());

        // Clear redo stack when a new action is performed
        self.redo_stack.clear();
        self.undo_stack.push(command);

        // Trim history if it exceeds the maximum
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }

        self.changed();
        Ok(())
    }

    /// Undo the most recent command, returning its description
    pub fn undo(&mut self) -> DocumentResult<Option<String>> {
        let Some(command) = self.undo_stack.pop() else {
            return Ok(None);
        };

        if let Err(e) = self.revert(&command) {
            self.undo_stack.push(command);
            return Err(e);
        }

        let description = command.description();
        tracing::debug!("Undid '{}'", description);
        self.redo_stack.push(command);
        self.changed();
        Ok(Some(description))
    }

    /// Redo the most recently undone command, returning its description
    pub fn redo(&mut self) -> DocumentResult<Option<String>> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(None);
        };

        if let Err(e) = self.apply(&command) {
            self.redo_stack.push(command);
            return Err(e);
        }

        let description = command.description();
        tracing::debug!("Redid '{}'", description);
        self.undo_stack.push(command);
        self.changed();
        Ok(Some(description))
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Incremented on every change, including undo and redo
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All elements in insertion order
    pub fn elements(&self) -> &[SpaceElement] {
        &self.elements
    }

    /// Look up an element by ID
    pub fn element(&self, id: Uuid) -> Option<&SpaceElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Iterate over the walls
    pub fn walls(&self) -> impl Iterator<Item = &WallSegment> {
        self.elements.iter().filter_map(SpaceElement::as_wall)
    }

    /// Owned copy of the walls, for handing to the drawing session
    pub fn wall_snapshot(&self) -> Vec<WallSegment> {
        self.walls().cloned().collect()
    }

    /// Junctions as of the last change
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn index_of(&self, id: Uuid) -> DocumentResult<usize> {
        self.elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(DocumentError::ElementNotFound(id))
    }

    fn insert(&mut self, element: &SpaceElement) -> DocumentResult<()> {
        if self.element(element.id).is_some() {
            return Err(DocumentError::DuplicateElement(element.id));
        }
        self.elements.push(element.clone());
        Ok(())
    }

    fn replace(&mut self, element: &SpaceElement) -> DocumentResult<()> {
        let index = self.index_of(element.id)?;
        self.elements[index] = element.clone();
        Ok(())
    }

    fn remove(&mut self, id: Uuid) -> DocumentResult<()> {
        let index = self.index_of(id)?;
        self.elements.remove(index);
        Ok(())
    }

    fn insert_all(&mut self, elements: &[SpaceElement]) -> DocumentResult<()> {
        for (i, element) in elements.iter().enumerate() {
            let repeated = elements[..i].iter().any(|e| e.id == element.id);
            if repeated || self.element(element.id).is_some() {
                return Err(DocumentError::DuplicateElement(element.id));
            }
        }
        self.elements.extend(elements.iter().cloned());
        Ok(())
    }

    fn remove_all(&mut self, elements: &[SpaceElement]) -> DocumentResult<()> {
        for element in elements {
            self.index_of(element.id)?;
        }
        self.elements
            .retain(|e| !elements.iter().any(|removed| removed.id == e.id));
        Ok(())
    }

    /// Forward application; leaves the document untouched on error
    fn apply(&mut self, command: &Command) -> DocumentResult<()> {
        match command {
            Command::AddElement { element } => self.insert(element),
            Command::UpdateElement { element, .. } => self.replace(element),
            Command::DeleteElement { element } => self.remove(element.id),
            Command::BatchDeleteElements { elements } => self.remove_all(elements),
            Command::RotateElement {
                element, rotation, ..
            } => {
                let mut rotated = element.clone();
                rotated.rotation = *rotation;
                self.replace(&rotated)
            }
        }
    }

    /// Inverse application; leaves the document untouched on error
    fn revert(&mut self, command: &Command) -> DocumentResult<()> {
        match command {
            Command::AddElement { element } => self.remove(element.id),
            Command::UpdateElement { previous, .. } | Command::RotateElement { previous, .. } => {
                self.replace(previous)
            }
            Command::DeleteElement { element } => self.insert(element),
            Command::BatchDeleteElements { elements } => self.insert_all(elements),
        }
    }

    fn changed(&mut self) {
        self.version += 1;
        self.refresh_junctions();
    }

    /// Re-run the junction resolver and write connections back onto the walls
    fn refresh_junctions(&mut self) {
        let (indices, walls): (Vec<usize>, Vec<WallSegment>) = self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_wall().map(|w| (i, w.clone())))
            .unzip();

        let resolved = resolve_connections(walls);
        for (index, wall) in indices.into_iter().zip(resolved) {
            if let Some(slot) = self.elements[index].as_wall_mut() {
                *slot = wall;
            }
        }

        let walls = self.wall_snapshot();
        self.junctions = find_junctions(&walls);
        tracing::debug!(
            "Resolved {} walls into {} junctions (version {})",
            walls.len(),
            self.junctions.len(),
            self.version
        );
    }
}

impl CommandDispatcher for FloorPlan {
    fn dispatch(&mut self, command: Command) -> DocumentResult<()> {
        self.execute(command)
    }
}
