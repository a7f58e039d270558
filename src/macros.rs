/// Spells a [`struct@Variant`] type from its alternatives.
///
/// # Examples
///
/// ```rust
/// use tvariant::{Indirect, Variant};
///
/// type Value = Variant![i32, String, Indirect<Vec<u8>>];
/// let v: Value = Variant::new(42i32);
/// ```
#[macro_export]
macro_rules! Variant {
    [$($t:ty),* $(,)?] => [$crate::Variant::<$crate::T![$($t),*]>];
}

/// Spells an alternative list: `T![A, B, C]` is `(A, (B, (C, ())))`.
///
/// ```rust
/// use tvariant::{T, Variant};
///
/// type Numbers = T![i32, u32, f64];
/// let v: Variant<Numbers> = Variant::new(0.5f64);
/// assert_eq!(v.which(), 2);
/// ```
#[macro_export]
macro_rules! T {
    [] => [()];
    [$first:ty $(, $rest:ty)* $(,)?] => [($first, $crate::T![$($rest),*])];
}

/// Builds a nested tuple value shaped like a [`T!`](crate::T) list.
///
/// ```rust
/// use tvariant::t;
///
/// let (a, (b, ())) = t![1u8, "two"];
/// assert_eq!((a, b), (1, "two"));
/// ```
#[macro_export]
macro_rules! t {
    [] => [()];
    [$first:expr $(, $rest:expr)* $(,)?] => [($first, $crate::t![$($rest),*])];
}

/// Asserts an invariant when the `debug-checks` feature is enabled.
macro_rules! strict_assert {
    ($($arg:tt)*) => {
        if cfg!(feature = "debug-checks") {
            assert!($($arg)*);
        }
    };
}
