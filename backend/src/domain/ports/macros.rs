//! Helper macro for declaring port error enums.
//!
//! Every driven port exposes a small thiserror enum plus snake_case
//! constructor functions taking `impl Into<_>` arguments, so adapters can
//! write `TutorRepositoryError::query("...")` instead of spelling out struct
//! variants. The macro keeps those enums uniform across ports.

macro_rules! define_port_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Build the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant { $($field : $ty),* });
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    define_port_error! {
        /// Example error for the expansion test.
        pub enum ProbePortError {
            /// Something was not reachable.
            Connection { message: String } => "connection: {message}",
            /// Mixed-field variant.
            Collision { sequence: String, attempts: u32 } =>
                "sequence {sequence} collided after {attempts} attempts",
        }
    }

    #[test]
    fn constructors_accept_into_arguments() {
        let err = ProbePortError::connection("refused");
        assert_eq!(err.to_string(), "connection: refused");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ProbePortError::collision("41", 3_u32);
        assert_eq!(err.to_string(), "sequence 41 collided after 3 attempts");
    }
}
