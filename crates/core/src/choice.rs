//! String-valued choice enums.
//!
//! Every enumerated column in the schema is stored as TEXT holding the wire
//! value (e.g. `"in_progress"`, `"On Hold"`). [`define_choice_enum!`] generates
//! an enum whose variants map one-to-one onto those strings, with conversions
//! in both directions so the same type can be used by serde (JSON bodies) and
//! by sqlx (`#[sqlx(try_from = "String")]` on model fields).

/// Define a choice enum backed by fixed string values.
///
/// Generates `as_str`, `from_str_value`, `ALL`, `Display`, `TryFrom<String>`,
/// and serde support routed through those conversions.
#[macro_export]
macro_rules! define_choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// The stored / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse the stored / wire representation.
            pub fn from_str_value(s: &str) -> Result<Self, String> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    _ => Err(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        $label,
                        [$( $val ),+].join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_str_value(&value)
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }
    };
}
