//! The raw region a variant keeps its live alternative in.

use core::{
    cmp,
    mem::{MaybeUninit, size_of},
    ptr,
};

use crate::{
    Alternative,
    dispatch::MAX_ALTERNATIVES,
    repr::SumList,
};

/// Uninitialized memory sized and aligned for every element of `S`.
///
/// The region does not know whether, or which, element is live, and never
/// drops anything on its own. Every accessor is `unsafe`: the caller names the
/// element type and vouches that it is the live one (or, for
/// [`Storage::initialize`], that the region is vacant).
///
/// Elements are accessed in two ways. The `slot` accessors reach the stored
/// element itself, an [`Indirect`](crate::Indirect) included. The `value`
/// accessors reach the element's [`Alternative::Target`], looking through the
/// wrapper.
pub struct Storage<S: SumList> {
    raw: MaybeUninit<S::Repr>,
}

impl<S: SumList> Storage<S> {
    pub const fn uninit() -> Self {
        const { assert!(S::LEN <= MAX_ALTERNATIVES, "too many alternatives") };
        Storage {
            raw: MaybeUninit::uninit(),
        }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.raw.as_ptr().cast()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.raw.as_mut_ptr().cast()
    }

    /// # Safety
    ///
    /// `E` must be an element of `S`, and the region must be vacant.
    #[inline]
    pub unsafe fn initialize<E>(&mut self, slot: E) {
        debug_assert!(size_of::<E>() <= size_of::<S::Repr>());
        unsafe { self.as_mut_ptr().cast::<E>().write(slot) }
    }

    /// # Safety
    ///
    /// `E` must be the live element.
    #[inline]
    pub unsafe fn slot<E>(&self) -> &E {
        unsafe { &*self.as_ptr().cast::<E>() }
    }

    /// # Safety
    ///
    /// `E` must be the live element.
    #[inline]
    pub unsafe fn slot_mut<E>(&mut self) -> &mut E {
        unsafe { &mut *self.as_mut_ptr().cast::<E>() }
    }

    /// # Safety
    ///
    /// `E` must be the live element.
    #[inline]
    pub unsafe fn value<'a, E: Alternative + 'a>(&'a self) -> &'a E::Target {
        unsafe { self.slot::<E>() }.pierce()
    }

    /// # Safety
    ///
    /// `E` must be the live element.
    #[inline]
    pub unsafe fn value_mut<'a, E: Alternative + 'a>(&'a mut self) -> &'a mut E::Target {
        unsafe { self.slot_mut::<E>() }.pierce_mut()
    }

    /// Moves the live element out. The region must be treated as vacant
    /// afterwards.
    ///
    /// # Safety
    ///
    /// `E` must be the live element.
    #[inline]
    pub unsafe fn read<E>(&self) -> E {
        unsafe { self.as_ptr().cast::<E>().read() }
    }

    /// # Safety
    ///
    /// `E` must be the live element. The region is vacant afterwards.
    #[inline]
    pub unsafe fn drop_in_place<E>(&mut self) {
        unsafe { self.as_mut_ptr().cast::<E>().drop_in_place() }
    }

    /// Drops the live element through the destroyer table of `S`.
    ///
    /// # Safety
    ///
    /// The element at index `tag` must be live. The region is vacant
    /// afterwards.
    #[inline]
    pub unsafe fn drop_tag(&mut self, tag: u8) {
        let thunk = const { &S::DROP }[usize::from(tag)];
        unsafe { thunk(self.as_mut_ptr()) }
    }

    /// Whether the live element only waits to be dropped, as reported by
    /// [`Alternative::is_vacated`].
    ///
    /// # Safety
    ///
    /// The element at index `tag` must be live.
    #[inline]
    pub unsafe fn is_vacated(&self, tag: u8) -> bool {
        let thunk = const { &S::VACATED }[usize::from(tag)];
        unsafe { thunk(self.as_ptr()) }
    }

    /// Copies the live element into a region for another list.
    ///
    /// # Safety
    ///
    /// The live element must also be an element of `S2`, and `self` must be
    /// treated as vacant afterwards.
    pub unsafe fn relocate<S2: SumList>(&self) -> Storage<S2> {
        let mut target = Storage::<S2>::uninit();
        let len = cmp::min(size_of::<S::Repr>(), size_of::<S2::Repr>());
        unsafe { ptr::copy_nonoverlapping(self.as_ptr(), target.as_mut_ptr(), len) };
        target
    }
}

#[cfg(test)]
mod tests {
    use std::{rc::Rc, string::String};

    use super::*;
    use crate::{Indirect, T};

    type L = T![u8, String, Indirect<Rc<()>>];

    #[test]
    fn layout() {
        assert!(size_of::<Storage<L>>() >= size_of::<String>());
        assert_eq!(core::mem::align_of::<Storage<L>>(), core::mem::align_of::<String>());
    }

    #[test]
    fn slot_and_value() {
        let counter = Rc::new(());
        let mut storage = Storage::<L>::uninit();
        unsafe {
            storage.initialize(Indirect::new(counter.clone()));
            assert!(Rc::ptr_eq(storage.value::<Indirect<Rc<()>>>(), &counter));
            assert!(!storage.slot::<Indirect<Rc<()>>>().is_transferred());
            assert!(!storage.is_vacated(2));
            assert_eq!(Rc::strong_count(&counter), 2);

            let moved = crate::Take::take(storage.slot_mut::<Indirect<Rc<()>>>());
            assert!(storage.is_vacated(2));
            drop(moved);
            assert_eq!(Rc::strong_count(&counter), 1);

            storage.drop_tag(2);
        }
        assert_eq!(Rc::strong_count(&counter), 1);
    }

    #[test]
    fn relocate_keeps_value() {
        let mut storage = Storage::<L>::uninit();
        unsafe {
            storage.initialize(String::from("kept"));
            let mut narrow = storage.relocate::<T![String]>();
            assert_eq!(narrow.value::<String>(), "kept");
            narrow.drop_in_place::<String>();
        }
    }
}
