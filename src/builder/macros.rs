//! Macros for declaring state and trigger enums.

/// Declare a fieldless enum usable as a state identity.
///
/// Generates the derives the engine needs (`Clone`, `Copy`, `PartialEq`,
/// `Eq`, `Hash`, `Debug`), a `name()` method, an `ALL` slice in declaration
/// order, and a `Display` impl. Do not repeat those derives in the
/// attributes you pass in.
///
/// # Example
///
/// ```
/// use hsm_engine::state_enum;
///
/// state_enum! {
///     pub enum Screen {
///         Title,
///         Options,
///         InGame,
///     }
/// }
///
/// assert_eq!(Screen::Options.name(), "Options");
/// assert_eq!(Screen::ALL.len(), 3);
/// assert_eq!(Screen::InGame.to_string(), "InGame");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            #[allow(dead_code)]
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// Declare a fieldless enum usable as a trigger identity.
///
/// Same expansion as [`state_enum!`].
///
/// ```
/// use hsm_engine::trigger_enum;
///
/// trigger_enum! {
///     enum Input {
///         Confirm,
///         Cancel,
///     }
/// }
///
/// assert_eq!(Input::Cancel.name(), "Cancel");
/// ```
#[macro_export]
macro_rules! trigger_enum {
    ($($body:tt)*) => {
        $crate::state_enum! { $($body)* }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{State, Trigger};

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    trigger_enum! {
        enum TestTrigger {
            Start,
            Finish,
        }
    }

    #[test]
    fn state_enum_generates_names() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Complete.to_string(), "Complete");
    }

    #[test]
    fn state_enum_lists_variants_in_order() {
        assert_eq!(
            TestState::ALL,
            &[TestState::Initial, TestState::Processing, TestState::Complete]
        );
    }

    #[test]
    fn generated_enums_meet_identity_bounds() {
        fn assert_state<S: State>(_: S) {}
        fn assert_trigger<T: Trigger>(_: T) {}

        assert_state(TestState::Processing);
        assert_trigger(TestTrigger::Start);
        assert_eq!(TestTrigger::Finish.name(), "Finish");
    }

    #[test]
    fn state_enum_supports_visibility_and_attributes() {
        state_enum! {
            /// Documented.
            #[allow(dead_code)]
            pub enum PublicState {
                A,
                #[allow(dead_code)]
                B,
            }
        }

        assert_eq!(PublicState::A.name(), "A");
    }
}
