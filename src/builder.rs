use std::any::Any;

use crate::{
    Result,
    error::{AssignError, DecodeErrorKind},
    shape::{FieldDescriptor, RecordLayout},
    value::Value,
};

/// How an instance came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Construction {
    /// The record's declared constructor ran.
    Constructor,
    /// The record has no constructor; every field holds its language default.
    Blank,
}

/// Builds a fresh instance of the record described by `layout`.
pub(crate) fn construct(layout: &RecordLayout) -> Result<(Box<dyn Any>, Construction)> {
    match layout.construct {
        Some(construct) => {
            log::trace!("Running constructor of {}", layout.type_name());
            let instance = construct().map_err(|source| {
                log::debug!("Constructor of {} failed: {source}", layout.type_name());
                DecodeErrorKind::Instantiation {
                    type_name: layout.type_name(),
                    source,
                }
            })?;
            Ok((instance, Construction::Constructor))
        }
        None => {
            log::trace!("No constructor for {}, using blank instance", layout.type_name());
            Ok(((layout.blank)(), Construction::Blank))
        }
    }
}

/// Stores `value` into `field` of `instance`, walking down through bases for inherited fields.
pub(crate) fn assign(
    instance: &mut dyn Any,
    layout: &RecordLayout,
    field: &FieldDescriptor,
    value: Value,
) -> Result<()> {
    let fail = |source: AssignError| {
        log::debug!(
            "Failed to set field {} in {}: {source}",
            field.name(),
            layout.type_name()
        );
        DecodeErrorKind::FieldAssignment {
            type_name: layout.type_name(),
            field: field.name(),
            source,
        }
    };

    let mut target = instance;
    for project in &field.route {
        target = project(target).ok_or_else(|| fail(AssignError::wrong_target(field.declared_in())))?;
    }
    (field.set)(target, value).map_err(fail)?;
    Ok(())
}
