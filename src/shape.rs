use std::{any::Any, collections::HashSet, sync::OnceLock};

use indexmap::IndexMap;

use crate::{
    error::{AssignError, BoxError},
    value::Value,
};

/// Static description of a decodable type.
#[derive(Debug)]
pub struct Shape {
    /// Name of the type, for messages.
    pub type_name: fn() -> &'static str,
    /// What kind of type this is.
    pub def: Def,
}

impl Shape {
    /// Name of the type.
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Strips any number of `Option` layers.
    pub fn unwrap_option(&'static self) -> &'static Shape {
        let mut shape = self;
        while let Def::Option(inner) = shape.def {
            shape = inner();
        }
        shape
    }

    /// The record layout, if this (after stripping `Option`) is a record.
    pub fn record(&'static self) -> Option<&'static RecordLayout> {
        match self.unwrap_option().def {
            Def::Record(layout) => Some(layout()),
            _ => None,
        }
    }
}

/// The definition part of a [`Shape`].
#[derive(Debug, Clone, Copy)]
pub enum Def {
    /// A primitive scalar.
    Scalar(ScalarType),
    /// `Option<T>`.
    Option(fn() -> &'static Shape),
    /// `Vec<T>`.
    List(fn() -> &'static Shape),
    /// A string-keyed generic map. Children are stored without field binding.
    Map,
    /// [`Value`] itself: accepts anything.
    Dynamic,
    /// A record declared with [`record!`](crate::record).
    Record(fn() -> &'static RecordLayout),
}

/// Primitive scalar types a field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
}

/// A type that can be the target of a decode.
///
/// Implemented for primitives, `String`, `Option<T>`, `Vec<T>`, [`Value`], the generic map types,
/// and every type declared with [`record!`](crate::record).
pub trait Decode: Sized + 'static {
    /// Static shape of the type.
    const SHAPE: &'static Shape;

    /// Converts an already decoded (and coerced) value into `Self`.
    fn from_value(value: Value) -> Result<Self, AssignError>;

    /// The language-default value of `Self`, used for fields no key covers.
    fn blank() -> Self;
}

/// Returns `T`'s shape. Usable as a `fn() -> &'static Shape` pointer.
pub fn shape_of<T: Decode>() -> &'static Shape {
    T::SHAPE
}

/// A decodable record: a type with a static field table.
///
/// Implement it with the [`record!`](crate::record) macro.
pub trait Record: Decode {
    /// The record's field table, built once per process.
    fn layout() -> &'static RecordLayout;
}

#[doc(hidden)]
pub type Setter = fn(&mut dyn Any, Value) -> Result<(), AssignError>;
#[doc(hidden)]
pub type Projection = fn(&mut dyn Any) -> Option<&mut dyn Any>;
#[doc(hidden)]
pub type Constructor = fn() -> Result<Box<dyn Any>, BoxError>;

/// The static field table of a record, as declared.
///
/// Use [`resolve`] to get the effective fields, including inherited ones.
pub struct RecordLayout {
    type_name: &'static str,
    pub(crate) construct: Option<Constructor>,
    pub(crate) blank: fn() -> Box<dyn Any>,
    fields: Vec<FieldDecl>,
    bases: Vec<BaseDecl>,
    descriptor: OnceLock<TypeDescriptor>,
}

impl RecordLayout {
    #[doc(hidden)]
    pub fn new(type_name: &'static str, blank: fn() -> Box<dyn Any>) -> Self {
        Self {
            type_name,
            construct: None,
            blank,
            fields: Vec::new(),
            bases: Vec::new(),
            descriptor: OnceLock::new(),
        }
    }

    #[doc(hidden)]
    pub fn constructor(mut self, construct: Constructor) -> Self {
        self.construct = Some(construct);
        self
    }

    #[doc(hidden)]
    pub fn field(
        mut self,
        name: &'static str,
        shape: fn() -> &'static Shape,
        set: Setter,
    ) -> Self {
        self.fields.push(FieldDecl {
            name,
            access: FieldAccess::Persistent { shape, set },
        });
        self
    }

    #[doc(hidden)]
    pub fn transient(mut self, name: &'static str) -> Self {
        self.fields.push(FieldDecl {
            name,
            access: FieldAccess::Transient,
        });
        self
    }

    #[doc(hidden)]
    pub fn base(
        mut self,
        name: &'static str,
        layout: fn() -> &'static RecordLayout,
        project: Projection,
    ) -> Self {
        self.bases.push(BaseDecl {
            name,
            layout,
            project,
        });
        self
    }

    /// Short name of the record type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the record declares its own constructor.
    pub fn has_constructor(&self) -> bool {
        self.construct.is_some()
    }
}

impl std::fmt::Debug for RecordLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLayout")
            .field("type_name", &self.type_name)
            .field(
                "fields",
                &self.fields.iter().map(|f| f.name).collect::<Vec<_>>(),
            )
            .field(
                "bases",
                &self.bases.iter().map(|b| b.name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

struct FieldDecl {
    name: &'static str,
    access: FieldAccess,
}

enum FieldAccess {
    Persistent {
        shape: fn() -> &'static Shape,
        set: Setter,
    },
    Transient,
}

struct BaseDecl {
    name: &'static str,
    layout: fn() -> &'static RecordLayout,
    project: Projection,
}

/// The effective decodable fields of a record, inherited ones included.
#[derive(Debug)]
pub struct TypeDescriptor {
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldDescriptor>,
    /// Transient names anywhere in the chain; they shadow same-named base fields.
    transient: Vec<&'static str>,
}

impl TypeDescriptor {
    /// Descriptor of `T`, computed on first use.
    pub fn of<T: Record>() -> &'static TypeDescriptor {
        resolve(T::layout())
    }

    /// Name of the described record.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in resolution order: own fields first, then each base's.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub(crate) fn field_full(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields
            .get_full(name)
            .map(|(index, _, field)| (index, field))
    }

    pub(crate) fn field_at(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get_index(index).map(|(_, field)| field)
    }

    /// Field names, in resolution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.keys().copied().collect()
    }

    /// Number of decodable fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no decodable fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One decodable field of a [`TypeDescriptor`].
pub struct FieldDescriptor {
    name: &'static str,
    shape: &'static Shape,
    declared_in: &'static str,
    pub(crate) route: Vec<Projection>,
    pub(crate) set: Setter,
}

impl FieldDescriptor {
    /// Field name, as matched against mapping keys.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type of the field.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// The record in the chain that declares the field.
    pub fn declared_in(&self) -> &'static str {
        self.declared_in
    }

    /// Returns `true` if the field comes from a base record.
    pub fn is_inherited(&self) -> bool {
        !self.route.is_empty()
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type", &self.shape.type_name())
            .field("declared_in", &self.declared_in)
            .finish()
    }
}

/// Returns the descriptor for `layout`, computing it on first use.
///
/// Walks the record's own fields, then each base's resolved fields in declaration order. The
/// first record to claim a name wins, and transient fields are left out.
pub fn resolve(layout: &'static RecordLayout) -> &'static TypeDescriptor {
    layout.descriptor.get_or_init(|| {
        log::trace!("Resolving descriptor for {}", layout.type_name);
        let mut claimed: HashSet<&'static str> = HashSet::new();
        let mut fields = IndexMap::new();
        let mut transient = Vec::new();

        for decl in &layout.fields {
            if !claimed.insert(decl.name) {
                continue;
            }
            match decl.access {
                FieldAccess::Persistent { shape, set } => {
                    fields.insert(
                        decl.name,
                        FieldDescriptor {
                            name: decl.name,
                            shape: shape(),
                            declared_in: layout.type_name,
                            route: Vec::new(),
                            set,
                        },
                    );
                }
                FieldAccess::Transient => {
                    log::trace!("Skipping transient field {}.{}", layout.type_name, decl.name);
                    transient.push(decl.name);
                }
            }
        }

        for base in &layout.bases {
            let inherited = resolve((base.layout)());
            for &name in &inherited.transient {
                if claimed.insert(name) {
                    transient.push(name);
                }
            }
            for field in inherited.fields() {
                if !claimed.insert(field.name) {
                    log::trace!(
                        "{}.{} is shadowed by {}",
                        field.declared_in,
                        field.name,
                        layout.type_name
                    );
                    continue;
                }
                let mut route = Vec::with_capacity(field.route.len() + 1);
                route.push(base.project);
                route.extend_from_slice(&field.route);
                fields.insert(
                    field.name,
                    FieldDescriptor {
                        name: field.name,
                        shape: field.shape,
                        declared_in: field.declared_in,
                        route,
                        set: field.set,
                    },
                );
            }
        }

        TypeDescriptor {
            type_name: layout.type_name,
            fields,
            transient,
        }
    })
}

#[doc(hidden)]
pub fn field_shape<R, F: Decode>(_field: impl Fn(&R) -> &F) -> &'static Shape {
    F::SHAPE
}
