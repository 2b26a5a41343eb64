//! Enumeration descriptors
//!
//! Enumerations travel through tables by symbolic name while the relational
//! form keeps their ordinal. An [`EnumDescriptor`] maps between the two.

/// Static description of an enumeration type
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EnumDescriptor {
    /// Type name, used in the `enum:<name>` identifier
    pub name: &'static str,
    /// Symbolic names with their ordinals
    pub variants: &'static [(&'static str, i64)],
}

impl EnumDescriptor {
    pub const fn new(name: &'static str, variants: &'static [(&'static str, i64)]) -> Self {
        Self { name, variants }
    }

    /// Symbolic name of an ordinal
    pub fn name_of(&self, ordinal: i64) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|(_, value)| *value == ordinal)
            .map(|(name, _)| *name)
    }

    /// Ordinal of a symbolic name (case-sensitive)
    pub fn ordinal_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(variant, _)| *variant == name)
            .map(|(_, ordinal)| *ordinal)
    }

    pub fn contains_ordinal(&self, ordinal: i64) -> bool {
        self.name_of(ordinal).is_some()
    }
}

/// Rust enums usable as enumeration values
///
/// Implemented by the [`enumeration!`](crate::enumeration) macro.
pub trait Enumeration: Copy + Send + Sync + 'static {
    fn descriptor() -> &'static EnumDescriptor;

    fn ordinal(self) -> i64;

    fn from_ordinal(ordinal: i64) -> Option<Self>;

    fn name(self) -> &'static str {
        Self::descriptor().name_of(self.ordinal()).unwrap_or_default()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::descriptor()
            .ordinal_of(name)
            .and_then(Self::from_ordinal)
    }
}

/// Declare an enumeration usable in records, parameters and cells.
///
/// ```
/// use api_reporting_sdk::enumeration;
/// use api_reporting_sdk::value::Enumeration;
///
/// enumeration! {
///     pub enum Gender {
///         Female = 0,
///         Male = 1,
///     }
/// }
///
/// assert_eq!(Gender::Male.name(), "Male");
/// assert_eq!(Gender::from_name("Female"), Some(Gender::Female));
/// ```
///
/// The generated enum derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and
/// `Hash`; further attributes are passed through.
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $ordinal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant = $ordinal),+
        }

        impl $crate::value::Enumeration for $name {
            fn descriptor() -> &'static $crate::value::EnumDescriptor {
                static DESCRIPTOR: $crate::value::EnumDescriptor = $crate::value::EnumDescriptor::new(
                    stringify!($name),
                    &[$((stringify!($variant), $ordinal)),+],
                );
                &DESCRIPTOR
            }

            fn ordinal(self) -> i64 {
                self as i64
            }

            fn from_ordinal(ordinal: i64) -> ::std::option::Option<Self> {
                $(
                    if ordinal == $ordinal {
                        return ::std::option::Option::Some($name::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }

        impl $crate::reflect::Field for $name {
            fn property_type() -> $crate::reflect::PropertyType {
                $crate::reflect::PropertyType::Value($crate::value::ValueType::Enum(
                    <$name as $crate::value::Enumeration>::descriptor(),
                ))
            }

            fn property_value(&self) -> $crate::reflect::PropertyValue<'_> {
                $crate::reflect::PropertyValue::Value($crate::value::Value::from_enum(*self))
            }
        }
    };
}
