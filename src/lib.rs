//! testutil: assertion helpers for tests that report failures instead of aborting.
//!
//! An [`Assert`] context is bound to a [`TestRun`] handle for the duration of one
//! test. Each check either passes silently or reports a [`Failure`] to the handle
//! and returns `false`; the test keeps running and is marked failed.
//!
//! ```rust
//! use testutil::{Assert, Recorder, TestRun};
//!
//! let mut run = Recorder::new("readme");
//! let mut assert = Assert::new(&mut run);
//! assert.ok("1+2=3", 1 + 2 == 3);
//! assert.eq("greeting", &"foo", &"foo".to_string());
//! assert.panic("lolcats?", || panic!("Oh no, a lolcat!"));
//! assert!(!run.failed());
//! ```

pub mod assert;
pub mod compare;
pub mod config;
pub mod failure;
pub mod output;
pub mod panic;
pub mod repr;
pub mod run;
pub mod value;

pub use crate::assert::{recover_as_fail, Assert};
pub use crate::compare::{compare, Comparison};
pub use crate::config::Config;
pub use crate::failure::Failure;
pub use crate::panic::{run_guarded, PanicCapture};
pub use crate::repr::repr;
pub use crate::run::{LibtestRun, Recorder, TestRun};
pub use crate::value::{FloatKind, IntKind, Opaque, Reflect, Value};

// ============================================================================
// MACROS
// ============================================================================

/// Boolean check with an interpolated description.
///
/// `check!(assert, cond)` uses the stringified condition as the description.
#[macro_export]
macro_rules! check {
    ($assert:expr, $cond:expr $(,)?) => {
        $assert.ok(stringify!($cond), $cond)
    };
    ($assert:expr, $cond:expr, $($arg:tt)+) => {
        $assert.ok(format_args!($($arg)+), $cond)
    };
}

/// Equality check with an interpolated description.
#[macro_export]
macro_rules! check_eq {
    ($assert:expr, $left:expr, $right:expr $(,)?) => {
        $assert.eq(
            concat!(stringify!($left), " == ", stringify!($right)),
            &$left,
            &$right,
        )
    };
    ($assert:expr, $left:expr, $right:expr, $($arg:tt)+) => {
        $assert.eq(format_args!($($arg)+), &$left, &$right)
    };
}

/// Implements [`Reflect`] for a struct with named fields.
///
/// The struct's identity is its full type path, so two structs that share a
/// name in different modules are different types. Generic structs list their
/// type parameters; each must implement [`Reflect`].
///
/// ```rust
/// use testutil::{reflect_struct, repr};
///
/// struct Point { x: i32, y: i32 }
/// reflect_struct!(Point { x, y });
///
/// struct Pair<T> { left: T, right: T }
/// reflect_struct!(Pair<T> { left, right });
///
/// assert_eq!(repr(&Point { x: 1, y: 2 }), "Point { x: 1, y: 2 }");
/// assert_eq!(repr(&Pair { left: 'a', right: 'b' }), "Pair { left: 'a', right: 'b' }");
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($ty:ident < $($param:ident),+ $(,)? > { $($field:ident),* $(,)? }) => {
        impl<$($param: $crate::Reflect),+> $crate::Reflect for $ty<$($param),+> {
            fn type_label() -> String {
                ::std::any::type_name::<Self>().to_string()
            }

            fn reflect(&self) -> $crate::Value {
                $crate::Value::Struct {
                    ty: <Self as $crate::Reflect>::type_label(),
                    name: stringify!($ty).to_string(),
                    fields: vec![
                        $((stringify!($field).to_string(), $crate::Reflect::reflect(&self.$field)),)*
                    ],
                }
            }
        }
    };
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn type_label() -> String {
                ::std::any::type_name::<Self>().to_string()
            }

            fn reflect(&self) -> $crate::Value {
                $crate::Value::Struct {
                    ty: <Self as $crate::Reflect>::type_label(),
                    name: stringify!($ty).to_string(),
                    fields: vec![
                        $((stringify!($field).to_string(), $crate::Reflect::reflect(&self.$field)),)*
                    ],
                }
            }
        }
    };
}
