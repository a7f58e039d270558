//! Alternative lists and their storage layout.
//!
//! An alternative list is a nested tuple, `(A, (B, (C, ())))`, usually spelled
//! `T![A, B, C]`. [`SumList::Repr`] lays it out as a chain of unions, with
//! `T![A, B, C]` stored as `Cons<A, Cons<B, Cons<C, Nil>>>`. [`Nil`] is
//! uninhabited, so the empty list has no values.
//!
//! Every union is `#[repr(C)]`, so every element starts at offset 0 of the
//! region and the region is as large and as aligned as its largest element.
//! The storage, dispatch and conversion code all rely on that.
//!
//! Value lookups go through [`Split`], which plays the role of overload
//! resolution: given a type `T` and an index `U` (normally inferred), it
//! resolves the element that holds `T`. A type that is missing from the list,
//! or listed twice, does not resolve and fails to compile.

use core::{convert::Infallible, mem::ManuallyDrop};

use crate::{
    Alternative, NarrowRem, Rem,
    dispatch::{self, DropThunk, MAX_ALTERNATIVES, VacatedThunk},
    index::{Index, UInt, UTerm},
    policy::Policy,
};

/// The terminator of a list's union chain.
pub struct Nil(#[allow(dead_code)] pub(crate) Infallible);

/// One link of a list's union chain.
#[repr(C)]
pub union Cons<T, U> {
    pub(crate) data: ManuallyDrop<T>,
    pub(crate) next: ManuallyDrop<U>,
}

/// A list of alternatives.
///
/// # Safety
///
/// `Repr` must place every element at offset 0, and `DROP[i]` and
/// `VACATED[i]` must expect the element at index `i`. Only the tuple lists of
/// this crate implement it.
pub unsafe trait SumList: Policy {
    /// The union every element of the list is stored in.
    type Repr;

    /// The number of alternatives.
    const LEN: usize;

    #[doc(hidden)]
    const DROP: [DropThunk; MAX_ALTERNATIVES];

    #[doc(hidden)]
    const VACATED: [VacatedThunk; MAX_ALTERNATIVES];
}

unsafe impl SumList for () {
    type Repr = Nil;

    const LEN: usize = 0;

    const DROP: [DropThunk; MAX_ALTERNATIVES] =
        [dispatch::vacant_drop as DropThunk; MAX_ALTERNATIVES];

    const VACATED: [VacatedThunk; MAX_ALTERNATIVES] =
        [dispatch::vacant_vacated as VacatedThunk; MAX_ALTERNATIVES];
}

unsafe impl<Head, Tail> SumList for (Head, Tail)
where
    Head: Alternative,
    Tail: SumList,
{
    type Repr = Cons<Head, Tail::Repr>;

    const LEN: usize = 1 + Tail::LEN;

    const DROP: [DropThunk; MAX_ALTERNATIVES] =
        dispatch::prepend(dispatch::drop_slot::<Head> as DropThunk, Tail::DROP);

    const VACATED: [VacatedThunk; MAX_ALTERNATIVES] =
        dispatch::prepend(dispatch::slot_vacated::<Head> as VacatedThunk, Tail::VACATED);
}

/// Resolves the alternative holding `T` at index `U`.
///
/// # Safety
///
/// `Slot` must be the element at index `U::TAG`, and `Remainder` must list
/// the other elements in their original order.
pub unsafe trait Split<T, U: Index>: SumList {
    /// The stored element: `T` itself, or a wrapper whose target is `T`.
    type Slot: Alternative<Target = T>;

    /// The list without this alternative.
    type Remainder: SumList;

    /// Maps a discriminant of [`Split::Remainder`] back into `Self`.
    #[doc(hidden)]
    #[inline]
    fn outer_tag(tag: u8) -> u8 {
        tag + u8::from(tag >= U::TAG)
    }

    /// Maps a discriminant of `Self` into [`Split::Remainder`], or `None` for
    /// the split alternative itself.
    #[doc(hidden)]
    #[inline]
    fn inner_tag(tag: u8) -> Option<u8> {
        let at = U::TAG;
        (tag != at).then(|| tag - u8::from(tag > at))
    }
}

unsafe impl<Head, Tail> Split<Head::Target, UTerm> for (Head, Tail)
where
    Head: Alternative,
    Tail: SumList,
{
    type Slot = Head;
    type Remainder = Tail;
}

unsafe impl<Head, Tail, T, U: Index> Split<T, UInt<U>> for (Head, Tail)
where
    Head: Alternative,
    Tail: Split<T, U>,
{
    type Slot = Tail::Slot;
    type Remainder = (Head, <Tail as Split<T, U>>::Remainder);
}

/// Maps the list `TList` into `Self`, element by element.
///
/// `UList` is the list of indices at which the elements of `TList` sit in
/// `Self`, normally inferred. Each element must be stored identically in both
/// lists, so an element of a sub-list can move into the wider list as is.
///
/// # Safety
///
/// The tag mappings must send each element of `TList` to the index of the
/// same stored element in `Self`, and back.
pub unsafe trait SplitList<TList: SumList, UList>: SumList {
    /// `Self` without the elements of `TList`.
    type Remainder: SumList;

    #[doc(hidden)]
    fn broaden_tag(tag: u8) -> u8;

    #[doc(hidden)]
    fn narrow_tag(tag: u8) -> Result<u8, u8>;
}

unsafe impl<T: SumList> SplitList<(), ()> for T {
    type Remainder = Self;

    fn broaden_tag(tag: u8) -> u8 {
        unreachable!("mapping tag {tag} from an empty list")
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Err(tag)
    }
}

unsafe impl<SubHead, SubTail, SuperHead, SuperTail, HeadIndex: Index, TailIndex>
    SplitList<(SubHead, SubTail), (HeadIndex, TailIndex)> for (SuperHead, SuperTail)
where
    SubHead: Alternative,
    SubTail: SumList,
    SuperHead: Alternative,
    SuperTail: SumList,
    Self: Split<SubHead::Target, HeadIndex, Slot = SubHead>,
    Rem<Self, SubHead::Target, HeadIndex>: SplitList<SubTail, TailIndex>,
{
    type Remainder = NarrowRem<Rem<Self, SubHead::Target, HeadIndex>, SubTail, TailIndex>;

    fn broaden_tag(tag: u8) -> u8 {
        // The sub-list's head sits at `HeadIndex`; the rest of it maps into
        // the remainder of `Self` first.
        match tag.checked_sub(1) {
            None => HeadIndex::TAG,
            Some(rest) => {
                let inner = <Rem<Self, SubHead::Target, HeadIndex> as SplitList<
                    SubTail,
                    TailIndex,
                >>::broaden_tag(rest);
                <Self as Split<SubHead::Target, HeadIndex>>::outer_tag(inner)
            }
        }
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        match <Self as Split<SubHead::Target, HeadIndex>>::inner_tag(tag) {
            None => Ok(0),
            Some(rest) => <Rem<Self, SubHead::Target, HeadIndex> as SplitList<
                SubTail,
                TailIndex,
            >>::narrow_tag(rest)
            .map(|sub| sub + 1),
        }
    }
}
