use thiserror::Error;

/// Errors that can occur while building an `ObjectModelIndex`
///
/// These are raised only by `ModelTree` construction and
/// `ObjectModelIndex::build`; the index is never queried fallibly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectModelError {
    /// A class declaration carried an empty name
    #[error("Class declaration #{class_id} has no name")]
    MissingClassName { class_id: usize },

    /// A field declaration carried an empty name
    #[error("Class '{class}' declares a field with no name")]
    MissingFieldName { class: String },

    /// A class id did not refer to any declaration in the tree
    #[error("Class declaration #{class_id} does not exist in the model tree")]
    UnknownClass { class_id: usize },

    /// A class names a parent that is not in the tree
    #[error("Class '{class}' names parent #{parent_id}, which does not exist")]
    UnknownParent { class: String, parent_id: usize },

    /// A class names a parent of the other kind (interaction under object or vice versa)
    #[error("Class '{class}' names parent '{parent}' of a different class kind")]
    ParentKindMismatch { class: String, parent: String },

    /// A class could not be reached from any root, which means its parent links form a cycle
    #[error("Class '{class}' is not reachable from any root class (parent cycle)")]
    Unreachable { class: String },

    /// Two classes of the same kind resolve to the same fully-qualified path
    #[error("Fully-qualified class path '{path}' is declared more than once")]
    DuplicatePath { path: String },

    /// A sharing directive string was not recognized
    #[error("Unrecognized sharing directive '{value}'")]
    InvalidSharing { value: String },

    /// The model loader could not produce a tree from its source
    #[error("Failed to load object model from '{source_path}': {reason}")]
    Load { source_path: String, reason: String },
}
