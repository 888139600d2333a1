/// Declares the static field table of a struct, making it decodable.
///
/// Every field of the struct must be listed, either in `extends [...]` (bases, whose fields are
/// inherited) or in the body. Fields marked `#[transient]` are never decoded and only need
/// [`Default`].
///
/// An optional `#[construct = path]` (a `fn() -> Self`) or `#[try_construct = path]`
/// (a `fn() -> Result<Self, E>`) names the constructor. Without one, instances start from
/// [`Decode::blank`](crate::Decode::blank) for every field.
///
/// ```
/// use node_decode::{Node, record};
///
/// #[derive(Debug, Default)]
/// struct Named {
///     name: String,
/// }
///
/// record! {
///     #[construct = Named::default]
///     Named { name }
/// }
///
/// #[derive(Debug)]
/// struct Portal {
///     base: Named,
///     trigger: String,
///     cooldown: std::time::Duration,
/// }
///
/// record! {
///     Portal extends [base: Named] {
///         trigger,
///         #[transient] cooldown,
///     }
/// }
///
/// let node = Node::mapping([
///     ("name", Node::quoted("spawn")),
///     ("trigger", Node::plain("WATER")),
/// ]);
/// let portal: Portal = node_decode::decode(&node).unwrap();
/// assert_eq!(portal.base.name, "spawn");
/// assert_eq!(portal.trigger, "WATER");
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$mode:ident = $ctor:path])?
        $ty:ident $(extends [$($base:ident : $base_ty:ty),* $(,)?])? {
            $($(#[$flag:ident])? $field:ident),* $(,)?
        }
    ) => {
        impl $crate::Record for $ty {
            fn layout() -> &'static $crate::RecordLayout {
                static LAYOUT: ::std::sync::OnceLock<$crate::RecordLayout> =
                    ::std::sync::OnceLock::new();
                LAYOUT.get_or_init(|| {
                    let layout = $crate::RecordLayout::new(stringify!($ty), || {
                        ::std::boxed::Box::new(<$ty as $crate::Decode>::blank())
                    });
                    $(
                        let layout =
                            layout.constructor($crate::__record_constructor!($ty; $mode $ctor));
                    )?
                    $($(
                        let layout = layout.base(
                            stringify!($base),
                            <$base_ty as $crate::Record>::layout,
                            |target| {
                                target.downcast_mut::<$ty>().map(|record| {
                                    &mut record.$base as &mut dyn ::core::any::Any
                                })
                            },
                        );
                    )*)?
                    $(
                        let layout = $crate::__record_field!(layout, $ty, $field $(, $flag)?);
                    )*
                    layout
                })
            }
        }

        impl $crate::Decode for $ty {
            const SHAPE: &'static $crate::Shape = &$crate::Shape {
                type_name: {
                    fn type_name() -> &'static str {
                        stringify!($ty)
                    }
                    type_name
                },
                def: $crate::Def::Record(<$ty as $crate::Record>::layout),
            };

            fn from_value(
                value: $crate::Value,
            ) -> ::core::result::Result<Self, $crate::AssignError> {
                match value {
                    $crate::Value::Instance(instance) => {
                        instance.downcast::<$ty>().map_err(|instance| {
                            $crate::AssignError::Mismatch {
                                expected: stringify!($ty),
                                found: $crate::ValueKind::Instance(instance.type_name()),
                            }
                        })
                    }
                    other => ::core::result::Result::Err($crate::AssignError::mismatch(
                        stringify!($ty),
                        &other,
                    )),
                }
            }

            fn blank() -> Self {
                $ty {
                    $($($base: <$base_ty as $crate::Decode>::blank(),)*)?
                    $($field: $crate::__record_blank!($($flag)?),)*
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_constructor {
    ($ty:ident; construct $ctor:path) => {
        || {
            let record: $ty = $ctor();
            ::core::result::Result::Ok(
                ::std::boxed::Box::new(record) as ::std::boxed::Box<dyn ::core::any::Any>
            )
        }
    };
    ($ty:ident; try_construct $ctor:path) => {
        || match $ctor() {
            ::core::result::Result::Ok(record) => {
                let record: $ty = record;
                ::core::result::Result::Ok(
                    ::std::boxed::Box::new(record) as ::std::boxed::Box<dyn ::core::any::Any>
                )
            }
            ::core::result::Result::Err(error) => {
                ::core::result::Result::Err(::core::convert::Into::into(error))
            }
        }
    };
    ($ty:ident; $other:ident $ctor:path) => {
        ::core::compile_error!(concat!(
            "unknown constructor attribute `",
            stringify!($other),
            "`, expected `construct` or `try_construct`"
        ))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    ($layout:ident, $ty:ident, $field:ident) => {
        $layout.field(
            stringify!($field),
            || $crate::__private::field_shape(|record: &$ty| &record.$field),
            |target, value| {
                let record = target
                    .downcast_mut::<$ty>()
                    .ok_or_else(|| $crate::AssignError::wrong_target(stringify!($ty)))?;
                record.$field = $crate::Decode::from_value(value)?;
                ::core::result::Result::Ok(())
            },
        )
    };
    ($layout:ident, $ty:ident, $field:ident, transient) => {
        $layout.transient(stringify!($field))
    };
    ($layout:ident, $ty:ident, $field:ident, $other:ident) => {
        ::core::compile_error!(concat!(
            "unknown field flag `",
            stringify!($other),
            "`, expected `transient`"
        ))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_blank {
    () => {
        $crate::Decode::blank()
    };
    (transient) => {
        ::core::default::Default::default()
    };
    ($other:ident) => {
        ::core::default::Default::default()
    };
}
