//! The per-type facts a variant needs from each of its alternatives.

use alloc::{boxed::Box, rc::Rc, string::String, sync::Arc, vec::Vec};
use core::{marker::PhantomData, mem};

/// A type that can be listed as an alternative of a [`Variant`].
///
/// Besides piercing (reaching the value callers see through the stored
/// element), the trait records which constructions of the stored element can
/// never panic. The variant picks its assignment algorithm from these facts:
/// a construction known not to panic is performed directly in the variant's
/// storage, any other is staged in a temporary first so that a panic leaves
/// the variant untouched.
///
/// Every fact defaults to `false`. Claiming `true` for a construction that
/// does panic is not undefined behavior, but it turns that panic into a
/// process abort.
///
/// References never implement this trait, so they cannot be listed. Wrap
/// them in an owning type instead.
///
/// Use `#[derive(Alternative)]` for directly held types:
///
/// ```rust
/// use tvariant::{Alternative, Variant};
///
/// #[derive(Alternative, Clone, Default, Debug, PartialEq)]
/// #[alternative(nothrow_default)]
/// struct Celsius(f64);
///
/// let v: Variant![i32, Celsius] = Variant::new(Celsius(21.5));
/// assert_eq!(v.get::<Celsius, _>(), Some(&Celsius(21.5)));
/// ```
///
/// ```rust,compile_fail
/// use tvariant::Variant;
///
/// let s = 1u32;
/// let v: Variant![u32, &u32] = Variant::new(&s);
/// ```
///
/// [`Variant`]: crate::Variant
pub trait Alternative: Sized {
    /// The type callers see: `Self` for a directly held type, `T` for an
    /// [`Indirect<T>`](crate::Indirect).
    type Target;

    /// `Self` owns its value through a pointer, so relocating it only moves
    /// the pointer.
    const INDIRECT: bool = false;

    /// `Default::default` for `Self` never panics.
    const NOTHROW_DEFAULT: bool = false;

    /// `Clone::clone` for `Self` never panics.
    const NOTHROW_CLONE: bool = false;

    /// [`Take::take`] never panics.
    const NOTHROW_TAKE: bool = Self::NOTHROW_DEFAULT;

    fn wrap(value: Self::Target) -> Self;

    fn unwrap(self) -> Self::Target;

    fn pierce(&self) -> &Self::Target;

    fn pierce_mut(&mut self) -> &mut Self::Target;

    /// Whether the element gave its value away and only waits to be dropped
    /// or overwritten. Only a transferred [`Indirect`](crate::Indirect) is.
    #[inline]
    fn is_vacated(&self) -> bool {
        false
    }
}

/// An alternative that can be moved out of a slot that stays live.
///
/// The slot is left valid but unspecified: it can be dropped or assigned to.
/// A directly held type leaves its default value behind. An
/// [`Indirect`](crate::Indirect) hands its pointer over and is left emptied,
/// so reading the source afterwards panics.
///
/// `#[derive(Alternative)]` implements this trait through `Default` when the
/// type is marked `take`, `nothrow_default` or `nothrow_take`.
pub trait Take: Alternative {
    fn take(&mut self) -> Self;
}

macro_rules! direct {
    (@impl [$($g:tt)*] $t:ty, default: $default:expr, clone: $clone:expr $(, indirect: $indirect:expr)?) => {
        impl<$($g)*> Alternative for $t {
            type Target = Self;

            $(const INDIRECT: bool = $indirect;)?

            const NOTHROW_DEFAULT: bool = $default;
            const NOTHROW_CLONE: bool = $clone;

            #[inline]
            fn wrap(value: Self) -> Self {
                value
            }

            #[inline]
            fn unwrap(self) -> Self {
                self
            }

            #[inline]
            fn pierce(&self) -> &Self {
                self
            }

            #[inline]
            fn pierce_mut(&mut self) -> &mut Self {
                self
            }
        }

        impl<$($g)*> Take for $t
        where
            $t: Default,
        {
            #[inline]
            fn take(&mut self) -> Self {
                mem::take(self)
            }
        }
    };
    (trivial: $($t:ty),* $(,)?) => {
        $(direct!(@impl [] $t, default: true, clone: true);)*
    };
}

direct!(trivial: u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
direct!(trivial: f32, f64, bool, char, ());

direct!(@impl [] String, default: true, clone: false);
direct!(@impl [T] Vec<T>, default: true, clone: false);
direct!(@impl [T] Option<T>, default: true, clone: false);
direct!(@impl [T: ?Sized] Box<T>, default: false, clone: false, indirect: true);
direct!(@impl [T: ?Sized] Rc<T>, default: false, clone: true, indirect: true);
direct!(@impl [T: ?Sized] Arc<T>, default: false, clone: true, indirect: true);
direct!(@impl [T: ?Sized] PhantomData<T>, default: true, clone: true);

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use super::*;
    use crate::Alternative;

    #[test]
    fn facts() {
        assert!(u32::NOTHROW_DEFAULT && u32::NOTHROW_CLONE && u32::NOTHROW_TAKE);
        assert!(!u32::is_vacated(&1));
        assert!(String::NOTHROW_TAKE);
        assert!(!String::NOTHROW_CLONE);
        assert!(!<Box<u8>>::NOTHROW_TAKE);
        assert!(<Rc<str>>::NOTHROW_CLONE);
        assert!(!String::INDIRECT);
        assert!(<Box<[u8]>>::INDIRECT);
    }

    #[test]
    fn take_leaves_default() {
        let mut s = "moved".to_string();
        let taken = Take::take(&mut s);
        assert_eq!(taken, "moved");
        assert!(s.is_empty());

        let mut boxed = Box::new(3u8);
        assert_eq!(*Take::take(&mut boxed), 3);
        assert_eq!(*boxed, 0);
    }

    #[derive(Alternative, Debug, Default, PartialEq)]
    #[alternative(take)]
    struct Reading(u16);

    #[test]
    fn derived_in_crate() {
        assert!(!Reading::NOTHROW_TAKE);
        let mut r = Reading(4);
        assert_eq!(Take::take(&mut r), Reading(4));
        assert_eq!(r, Reading(0));
    }
}
