use std::{
    error::Error,
    fmt::{self, Display},
};

use crate::value::{Value, ValueKind};

/// Boxed error returned by fallible record constructors.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Fatal error from a decode call.
#[derive(Debug)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: Vec<PathSegment>,
}

impl DecodeError {
    /// Returns a reference to the error kind for detailed error inspection.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Location of the failure, outermost segment first. Empty for the document root.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in self.path.iter().rev() {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(index) => {
                    out.push_str(&format!("[{index}]"));
                }
            }
        }
        out
    }

    /// Records that the error happened under `segment`. Called while unwinding, innermost first.
    pub(crate) fn at(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = &self.kind;
        if self.path.is_empty() {
            write!(f, "{kind}")
        } else {
            write!(f, "at `{}`: {kind}", self.path())
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            DecodeErrorKind::Instantiation { source, .. } => Some(source.as_ref()),
            DecodeErrorKind::FieldAssignment { source, .. } => Some(source),
            DecodeErrorKind::TargetMismatch { source, .. } => Some(source),
            #[cfg(feature = "kdl")]
            DecodeErrorKind::Parse(source) => Some(source),
            _ => None,
        }
    }
}

impl<K: Into<DecodeErrorKind>> From<K> for DecodeError {
    fn from(value: K) -> Self {
        let kind = value.into();
        DecodeError {
            kind,
            path: Vec::new(),
        }
    }
}

/// One step of a [`DecodeError`] path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathSegment {
    Key(String),
    Index(usize),
}

/// Detailed classification of decode failures.
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// A record's constructor failed.
    Instantiation {
        /// The record being built.
        type_name: &'static str,
        /// What the constructor returned.
        source: BoxError,
    },
    /// A decoded value could not be stored into a field.
    FieldAssignment {
        /// The record being decoded.
        type_name: &'static str,
        /// The field that rejected the value.
        field: &'static str,
        /// Why the value was rejected.
        source: AssignError,
    },
    /// A sequence mixed items of different kinds.
    HeterogeneousSequence {
        /// Position of the first item that disagrees.
        index: usize,
        /// Kind inferred from the first non-null item.
        expected: ValueKind,
        /// Kind of the disagreeing item.
        found: ValueKind,
    },
    /// A key matched no field, and the decoder was asked to deny unknown keys.
    UnknownKey {
        /// The record being decoded.
        type_name: &'static str,
        /// The unmatched key.
        key: String,
        /// Field names the record accepts.
        expected: Vec<&'static str>,
    },
    /// The decoded document root does not fit the requested type.
    TargetMismatch {
        /// The requested type.
        type_name: &'static str,
        /// Why the root value was rejected.
        source: AssignError,
    },
    /// The KDL text could not be parsed.
    #[cfg(feature = "kdl")]
    Parse(kdl::KdlError),
    /// The KDL document uses a construct with no node-tree equivalent.
    UnsupportedDocument(String),
}

impl Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Instantiation { type_name, source } => {
                write!(f, "failed to instantiate {type_name}: {source}")
            }
            DecodeErrorKind::FieldAssignment {
                type_name,
                field,
                source,
            } => write!(f, "failed to set field `{field}` in {type_name}: {source}"),
            DecodeErrorKind::HeterogeneousSequence {
                index,
                expected,
                found,
            } => write!(
                f,
                "sequence item {index} is {found}, but earlier items are {expected}"
            ),
            DecodeErrorKind::UnknownKey {
                type_name,
                key,
                expected,
            } => write!(
                f,
                "unknown key `{key}` for {type_name}, expected one of {expected:?}"
            ),
            DecodeErrorKind::TargetMismatch { type_name, source } => {
                write!(f, "document does not decode to {type_name}: {source}")
            }
            #[cfg(feature = "kdl")]
            DecodeErrorKind::Parse(kdl_error) => write!(f, "{kdl_error}"),
            DecodeErrorKind::UnsupportedDocument(msg) => write!(f, "unsupported document: {msg}"),
        }
    }
}

#[cfg(feature = "kdl")]
impl From<kdl::KdlError> for DecodeErrorKind {
    fn from(value: kdl::KdlError) -> Self {
        Self::Parse(value)
    }
}

/// Why a value could not be stored into a typed slot.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AssignError {
    /// The value has the wrong kind for the slot.
    Mismatch {
        /// The slot's type.
        expected: &'static str,
        /// The value's kind.
        found: ValueKind,
    },
    /// The value has the right kind but does not fit the slot's range.
    OutOfRange {
        /// The slot's type.
        expected: &'static str,
        /// The rejected value, formatted.
        value: String,
    },
    /// An array item was rejected.
    Element {
        /// Position of the item.
        index: usize,
        /// Why it was rejected.
        source: Box<AssignError>,
    },
    /// A setter was handed an instance of another record type.
    WrongTarget {
        /// The record type the setter belongs to.
        expected: &'static str,
    },
    /// Custom failure raised by a hand-written [`Decode`](crate::Decode) implementation.
    Custom(String),
}

impl AssignError {
    /// Custom failure with the given message.
    pub fn custom(msg: impl Display) -> Self {
        AssignError::Custom(msg.to_string())
    }

    /// `value` has the wrong kind for a slot of type `expected`.
    pub fn mismatch(expected: &'static str, value: &Value) -> Self {
        AssignError::Mismatch {
            expected,
            found: value.kind(),
        }
    }

    #[doc(hidden)]
    pub fn wrong_target(expected: &'static str) -> Self {
        AssignError::WrongTarget { expected }
    }
}

impl Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignError::Mismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            AssignError::OutOfRange { expected, value } => {
                write!(f, "{value} is out of range for {expected}")
            }
            AssignError::Element { index, source } => write!(f, "item {index}: {source}"),
            AssignError::WrongTarget { expected } => {
                write!(f, "setter for {expected} applied to another type")
            }
            AssignError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl Error for AssignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AssignError::Element { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
