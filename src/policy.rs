//! Compile-time facts about a whole alternative list.
//!
//! The facts are folded from the per-alternative constants of
//! [`Alternative`], after the `assume-*` features have been applied, and
//! decide which algorithm a variant uses for assignment.

use core::mem;

use crate::Alternative;

/// Set by the `assume-take-nothrow` feature.
pub const ASSUME_TAKE_NOTHROW: bool = cfg!(feature = "assume-take-nothrow");

/// Set by the `assume-clone-nothrow` feature.
pub const ASSUME_CLONE_NOTHROW: bool = cfg!(feature = "assume-clone-nothrow");

/// Whether [`Take::take`](crate::Take::take) of `E` is treated as non-panicking.
pub const fn take_nothrow<E: Alternative>() -> bool {
    ASSUME_TAKE_NOTHROW || E::NOTHROW_TAKE
}

/// Whether `Clone::clone` of `E` is treated as non-panicking.
pub const fn clone_nothrow<E: Alternative>() -> bool {
    ASSUME_CLONE_NOTHROW || E::NOTHROW_CLONE
}

/// The facts of a list, as seen by [`Variant`](crate::Variant).
pub trait Policy {
    /// Default construction, which builds the first alternative, never panics.
    const NOTHROW_DEFAULT: bool;

    /// Cloning any alternative never panics.
    const NOTHROW_CLONE: bool;

    /// Taking any alternative never panics.
    const NOTHROW_TAKE: bool;

    /// Every alternative can be taken without panicking or is held through a
    /// pointer. Type-changing assignment requires it.
    const ASSIGNABLE: bool;
}

impl Policy for () {
    const NOTHROW_DEFAULT: bool = false;
    const NOTHROW_CLONE: bool = true;
    const NOTHROW_TAKE: bool = true;
    const ASSIGNABLE: bool = true;
}

impl<Head, Tail> Policy for (Head, Tail)
where
    Head: Alternative,
    Tail: Policy,
{
    const NOTHROW_DEFAULT: bool = Head::NOTHROW_DEFAULT;
    const NOTHROW_CLONE: bool = clone_nothrow::<Head>() && Tail::NOTHROW_CLONE;
    const NOTHROW_TAKE: bool = take_nothrow::<Head>() && Tail::NOTHROW_TAKE;
    const ASSIGNABLE: bool = (take_nothrow::<Head>() || Head::INDIRECT) && Tail::ASSIGNABLE;
}

/// Aborts the process if dropped during unwinding.
///
/// Held across every section that destroys the live alternative before its
/// replacement is in place. A panic there would otherwise leave a variant with
/// no live alternative.
pub(crate) struct AbortOnUnwind;

impl AbortOnUnwind {
    #[inline]
    pub(crate) fn defuse(self) {
        mem::forget(self)
    }
}

impl Drop for AbortOnUnwind {
    fn drop(&mut self) {
        // Panicking while already unwinding aborts.
        panic!("panic while replacing the alternative of a variant")
    }
}

#[cfg(test)]
mod tests {
    use std::{boxed::Box, string::String};

    use super::*;
    use crate::{Indirect, T};

    struct Fragile;

    impl Alternative for Fragile {
        type Target = Self;

        fn wrap(value: Self) -> Self {
            value
        }

        fn unwrap(self) -> Self {
            self
        }

        fn pierce(&self) -> &Self {
            self
        }

        fn pierce_mut(&mut self) -> &mut Self {
            self
        }
    }

    #[test]
    fn folds() {
        type Plain = T![u32, String];
        assert!(Plain::NOTHROW_DEFAULT);
        assert!(Plain::NOTHROW_TAKE);
        assert_eq!(Plain::NOTHROW_CLONE, ASSUME_CLONE_NOTHROW);
        assert!(Plain::ASSIGNABLE);

        type Boxed = T![Indirect<String>, u8];
        assert!(!Boxed::NOTHROW_DEFAULT);
        assert!(Boxed::ASSIGNABLE);

        assert!(<T![Box<u8>]>::ASSIGNABLE);
    }

    #[test]
    fn fragile_is_not_assignable() {
        type L = T![u32, Fragile];
        assert_eq!(L::NOTHROW_TAKE, ASSUME_TAKE_NOTHROW);
        assert_eq!(L::ASSIGNABLE, ASSUME_TAKE_NOTHROW);
        assert!(<T![Indirect<Fragile>, u32]>::ASSIGNABLE);
    }

    #[test]
    fn empty() {
        assert!(!<() as Policy>::NOTHROW_DEFAULT);
        assert!(<() as Policy>::ASSIGNABLE);
    }
}
