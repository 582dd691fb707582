use std::fmt::Display;

/// Error converting an integer code into an enum variant. The integer is not assigned in the
/// UAF registry the enum mirrors.
#[derive(Debug, PartialEq, Eq)]
pub struct CodeOutOfRange<I>(pub I);

impl<I: Display> Display for CodeOutOfRange<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Value {} is not a registered code", self.0)
    }
}

/// Generate an enum mirroring one of the UAF registries. Each variant carries its numeric code
/// and the constant name used by the registry document, which is what `Display` prints.
macro_rules! repr_enum {
    ( $(#[$attr:meta])* $enum_name:ident: $repr:ident {$($(#[$fattr:meta])* $name:ident: $val:expr => $label:literal,)* } ) => {
        $(#[$attr])*
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
        #[non_exhaustive]
        #[repr($repr)]
        pub enum $enum_name {
            $($(#[$fattr])* $name = $val,)*
        }

        impl $enum_name {
            /// The registry constant name of this code.
            pub const fn registry_name(self) -> &'static str {
                match self {
                    $(Self::$name => $label,)*
                }
            }

            /// The numeric code, without having to name the target type.
            pub fn as_primitive(self) -> $repr {
                self.into()
            }
        }

        impl TryFrom<$repr> for $enum_name {
            type Error = $crate::utils::repr_enum::CodeOutOfRange<$repr>;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                Ok(match value {
                    $($val => Self::$name,)*
                    _ => return Err($crate::utils::repr_enum::CodeOutOfRange(value))
                })
            }
        }

        impl From<$enum_name> for $repr {
            #[allow(clippy::as_conversions)]
            fn from(src: $enum_name) -> Self {
                src as $repr
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} ({:#06x})", self.registry_name(), self.as_primitive())
            }
        }
    }
}
