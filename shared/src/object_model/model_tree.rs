use std::fmt;

use crate::{ObjectModelError, Sharing};

/// Index of a class declaration inside a `ModelTree`. The same id names the
/// resolved class in the `ObjectModelIndex` built from that tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Interaction,
    Object,
}

impl ClassKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::Interaction => "interaction",
            ClassKind::Object => "object",
        }
    }
}

/// A parameter (interaction) or attribute (object) declared on a class
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub data_type: String,
    /// Only meaningful for object attributes. Interaction parameters share
    /// their class's directive.
    pub sharing: Sharing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub kind: ClassKind,
    /// Local (unqualified) class name
    pub name: String,
    pub parent: Option<ClassId>,
    /// Class-level directive. Ignored for object classes, whose sharing is
    /// derived from their attributes.
    pub sharing: Sharing,
    pub fields: Vec<FieldDeclaration>,
}

/// Arena of class declarations as produced by an object model loader.
///
/// Nodes reference their parent by `ClassId`; nothing is resolved here.
/// `ObjectModelIndex::build` does the validation and flattening.
#[derive(Clone, Debug, Default)]
pub struct ModelTree {
    classes: Vec<ClassDeclaration>,
}

impl ModelTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDeclaration)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(index, class)| (ClassId(index), class))
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassDeclaration> {
        self.classes.get(id.0)
    }

    /// Appends a raw declaration. Parent links are checked at index build time.
    pub fn push(&mut self, declaration: ClassDeclaration) -> ClassId {
        self.classes.push(declaration);
        ClassId(self.classes.len() - 1)
    }

    pub fn add_interaction(
        &mut self,
        parent: Option<ClassId>,
        name: &str,
        sharing: Sharing,
    ) -> ClassId {
        self.push(ClassDeclaration {
            kind: ClassKind::Interaction,
            name: name.to_string(),
            parent,
            sharing,
            fields: Vec::new(),
        })
    }

    pub fn add_object(&mut self, parent: Option<ClassId>, name: &str) -> ClassId {
        self.push(ClassDeclaration {
            kind: ClassKind::Object,
            name: name.to_string(),
            parent,
            sharing: Sharing::Neither,
            fields: Vec::new(),
        })
    }

    pub fn add_parameter(
        &mut self,
        class: ClassId,
        name: &str,
        data_type: &str,
    ) -> Result<&mut Self, ObjectModelError> {
        self.push_field(class, name, data_type, Sharing::Neither)?;
        Ok(self)
    }

    pub fn add_attribute(
        &mut self,
        class: ClassId,
        name: &str,
        data_type: &str,
        sharing: Sharing,
    ) -> Result<&mut Self, ObjectModelError> {
        self.push_field(class, name, data_type, sharing)?;
        Ok(self)
    }

    fn push_field(
        &mut self,
        class: ClassId,
        name: &str,
        data_type: &str,
        sharing: Sharing,
    ) -> Result<(), ObjectModelError> {
        let Some(declaration) = self.classes.get_mut(class.0) else {
            return Err(ObjectModelError::UnknownClass { class_id: class.0 });
        };
        declaration.fields.push(FieldDeclaration {
            name: name.to_string(),
            data_type: data_type.to_string(),
            sharing,
        });
        Ok(())
    }
}
