//! Macros for reducing boilerplate in part declarations.
//!
//! Provides `parts!`, which takes a list of `Variant(Type)` pairs and
//! expands to the [`Kind`](crate::parts::Kind) tag enum, the
//! [`Part`](crate::parts::Part) tagged union and one
//! [`PartType`](crate::parts::PartType) impl per payload type. Retrieval
//! therefore matches on the variant instead of casting at runtime.
//!
//! ```rust,ignore
//! parts! {
//!     /// Combat attributes.
//!     Blob(Blob),
//!     /// Display name.
//!     Desc(Desc),
//! }
//! ```
macro_rules! parts {
    ($( $(#[$meta:meta])* $kind:ident($ty:ty) ),+ $(,)?) => {
        /// Discriminator selecting which part type is stored or retrieved.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub enum Kind {
            $( $(#[$meta])* $kind, )+
        }

        /// A typed data bundle attached to an entity under one [`Kind`].
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub enum Part {
            $( $(#[$meta])* $kind($ty), )+
        }

        impl Part {
            /// Kind tag this part is stored under.
            #[must_use]
            pub const fn kind(&self) -> Kind {
                match self {
                    $( Self::$kind(_) => Kind::$kind, )+
                }
            }
        }

        $(
            impl $crate::parts::PartType for $ty {
                const KIND: Kind = Kind::$kind;

                fn from_part(part: &Part) -> Option<&Self> {
                    match part {
                        Part::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_part_mut(part: &mut Part) -> Option<&mut Self> {
                    match part {
                        Part::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Part {
                fn from(part: $ty) -> Self {
                    Self::$kind(part)
                }
            }
        )+
    };
}

pub(crate) use parts;
