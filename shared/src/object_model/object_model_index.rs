use std::{
    collections::{HashMap, HashSet, VecDeque},
    path::Path,
};

use log::debug;

use crate::{
    ClassDeclaration, ClassId, ClassKind, ModelTree, ObjectModelError, ObjectModelLoader, Sharing,
};

/// A field in a class's closure, either declared locally or inherited
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldType {
    name: String,
    data_type: String,
    sharing: Sharing,
    declared_in: ClassId,
}

impl FieldType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn sharing(&self) -> Sharing {
        self.sharing
    }

    pub fn is_published(&self) -> bool {
        self.sharing.is_published()
    }

    pub fn is_subscribed(&self) -> bool {
        self.sharing.is_subscribed()
    }

    /// The class whose declaration supplied this field
    pub fn declared_in(&self) -> ClassId {
        self.declared_in
    }
}

/// A resolved interaction or object class
#[derive(Clone, Debug)]
pub struct ClassType {
    id: ClassId,
    kind: ClassKind,
    name: String,
    full_path: String,
    parent: Option<ClassId>,
    sharing: Sharing,
    fields: Vec<FieldType>,
}

impl ClassType {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Local (unqualified) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dot-separated path from the root class, e.g. `InteractionRoot.SimEnd`
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    /// For interactions this is the declared directive. For objects it is the
    /// union of the directives of every field in the closure.
    pub fn sharing(&self) -> Sharing {
        self.sharing
    }

    pub fn is_published(&self) -> bool {
        self.sharing.is_published()
    }

    pub fn is_subscribed(&self) -> bool {
        self.sharing.is_subscribed()
    }

    /// Field closure: local declarations first, then inherited fields not
    /// shadowed by a local declaration of the same name.
    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    pub fn local_fields(&self) -> impl Iterator<Item = &FieldType> {
        self.fields
            .iter()
            .filter(move |field| field.declared_in == self.id)
    }

    pub fn published_fields(&self) -> impl Iterator<Item = &FieldType> {
        self.fields.iter().filter(|field| field.is_published())
    }

    pub fn subscribed_fields(&self) -> impl Iterator<Item = &FieldType> {
        self.fields.iter().filter(|field| field.is_subscribed())
    }

    pub fn field(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether this class is `ancestor_path` or inherits from it
    pub fn is_within(&self, ancestor_path: &str) -> bool {
        self.full_path == ancestor_path
            || (self.full_path.len() > ancestor_path.len()
                && self.full_path.starts_with(ancestor_path)
                && self.full_path.as_bytes()[ancestor_path.len()] == b'.')
    }
}

/// Flattened, immutable view of the federation object model.
///
/// Built once per session. Every query is infallible; lookups of names that
/// are not in the model return `None`.
#[derive(Clone, Debug)]
pub struct ObjectModelIndex {
    classes: Vec<ClassType>,
    interaction_order: Vec<ClassId>,
    object_order: Vec<ClassId>,
    interaction_paths: HashMap<String, ClassId>,
    object_paths: HashMap<String, ClassId>,
}

impl ObjectModelIndex {
    pub fn load(
        loader: &dyn ObjectModelLoader,
        source: &Path,
    ) -> Result<Self, ObjectModelError> {
        let tree = loader.load(source)?;
        Self::build(&tree)
    }

    pub fn build(tree: &ModelTree) -> Result<Self, ObjectModelError> {
        let mut children: Vec<Vec<ClassId>> = vec![Vec::new(); tree.len()];
        let mut queue = VecDeque::new();

        for (id, declaration) in tree.classes() {
            validate_names(id, declaration)?;
            match declaration.parent {
                None => queue.push_back(id),
                Some(parent_id) => {
                    let Some(parent) = tree.class(parent_id) else {
                        return Err(ObjectModelError::UnknownParent {
                            class: declaration.name.clone(),
                            parent_id: parent_id.index(),
                        });
                    };
                    if parent.kind != declaration.kind {
                        return Err(ObjectModelError::ParentKindMismatch {
                            class: declaration.name.clone(),
                            parent: parent.name.clone(),
                        });
                    }
                    children[parent_id.index()].push(id);
                }
            }
        }

        // Roots are queued first, so a parent is always resolved before its children
        let mut resolved: Vec<Option<ClassType>> = vec![None; tree.len()];
        let mut interaction_order = Vec::new();
        let mut object_order = Vec::new();
        let mut interaction_paths = HashMap::new();
        let mut object_paths = HashMap::new();

        while let Some(id) = queue.pop_front() {
            let Some(declaration) = tree.class(id) else {
                return Err(ObjectModelError::UnknownClass {
                    class_id: id.index(),
                });
            };
            let parent = declaration
                .parent
                .and_then(|parent_id| resolved[parent_id.index()].as_ref());

            let class = resolve_class(id, declaration, parent);

            let (paths, order) = match class.kind {
                ClassKind::Interaction => (&mut interaction_paths, &mut interaction_order),
                ClassKind::Object => (&mut object_paths, &mut object_order),
            };
            if paths.insert(class.full_path.clone(), id).is_some() {
                return Err(ObjectModelError::DuplicatePath {
                    path: class.full_path,
                });
            }
            order.push(id);

            debug!(
                "Indexed {} class {} with {} fields ({})",
                class.kind.name(),
                class.full_path,
                class.fields.len(),
                class.sharing
            );

            resolved[id.index()] = Some(class);
            queue.extend(children[id.index()].iter().copied());
        }

        let mut classes = Vec::with_capacity(resolved.len());
        for (id, class) in resolved.into_iter().enumerate() {
            match class {
                Some(class) => classes.push(class),
                None => {
                    let name = tree
                        .class(ClassId::new(id))
                        .map(|declaration| declaration.name.clone())
                        .unwrap_or_default();
                    return Err(ObjectModelError::Unreachable { class: name });
                }
            }
        }

        Ok(Self {
            classes,
            interaction_order,
            object_order,
            interaction_paths,
            object_paths,
        })
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassType> {
        self.classes.get(id.index())
    }

    pub fn full_path(&self, id: ClassId) -> Option<&str> {
        self.class(id).map(ClassType::full_path)
    }

    pub fn interaction_type(&self, full_path: &str) -> Option<&ClassType> {
        self.interaction_paths
            .get(full_path)
            .and_then(|id| self.class(*id))
    }

    pub fn object_type(&self, full_path: &str) -> Option<&ClassType> {
        self.object_paths.get(full_path).and_then(|id| self.class(*id))
    }

    /// Interaction classes in breadth-first order
    pub fn interaction_types(&self) -> impl Iterator<Item = &ClassType> {
        self.interaction_order
            .iter()
            .filter_map(move |id| self.class(*id))
    }

    /// Object classes in breadth-first order
    pub fn object_types(&self) -> impl Iterator<Item = &ClassType> {
        self.object_order.iter().filter_map(move |id| self.class(*id))
    }

    pub fn published_interactions(&self) -> impl Iterator<Item = &ClassType> {
        self.interaction_types().filter(|class| class.is_published())
    }

    pub fn subscribed_interactions(&self) -> impl Iterator<Item = &ClassType> {
        self.interaction_types().filter(|class| class.is_subscribed())
    }

    pub fn published_objects(&self) -> impl Iterator<Item = &ClassType> {
        self.object_types().filter(|class| class.is_published())
    }

    pub fn subscribed_objects(&self) -> impl Iterator<Item = &ClassType> {
        self.object_types().filter(|class| class.is_subscribed())
    }
}

fn validate_names(id: ClassId, declaration: &ClassDeclaration) -> Result<(), ObjectModelError> {
    if declaration.name.trim().is_empty() {
        return Err(ObjectModelError::MissingClassName {
            class_id: id.index(),
        });
    }
    if declaration
        .fields
        .iter()
        .any(|field| field.name.trim().is_empty())
    {
        return Err(ObjectModelError::MissingFieldName {
            class: declaration.name.clone(),
        });
    }
    Ok(())
}

fn resolve_class(
    id: ClassId,
    declaration: &ClassDeclaration,
    parent: Option<&ClassType>,
) -> ClassType {
    let full_path = match parent {
        Some(parent) => format!("{}.{}", parent.full_path, declaration.name),
        None => declaration.name.clone(),
    };

    let mut fields: Vec<FieldType> = Vec::new();
    let mut local_names = HashSet::new();
    for field in &declaration.fields {
        // a repeated local declaration keeps its first occurrence
        if !local_names.insert(field.name.as_str()) {
            continue;
        }
        let sharing = match declaration.kind {
            ClassKind::Interaction => declaration.sharing,
            ClassKind::Object => field.sharing,
        };
        fields.push(FieldType {
            name: field.name.clone(),
            data_type: field.data_type.clone(),
            sharing,
            declared_in: id,
        });
    }

    if let Some(parent) = parent {
        for inherited in &parent.fields {
            if local_names.contains(inherited.name.as_str()) {
                continue;
            }
            let mut inherited = inherited.clone();
            if declaration.kind == ClassKind::Interaction {
                inherited.sharing = declaration.sharing;
            }
            fields.push(inherited);
        }
    }

    let sharing = match declaration.kind {
        ClassKind::Interaction => declaration.sharing,
        ClassKind::Object => fields
            .iter()
            .fold(Sharing::Neither, |sharing, field| sharing.union(field.sharing)),
    };

    ClassType {
        id,
        kind: declaration.kind,
        name: declaration.name.clone(),
        full_path,
        parent: declaration.parent,
        sharing,
        fields,
    }
}
