//! Visitors behind the variant's own algorithms.
//!
//! They are public only so that they can appear in the bounds of public
//! impls; none of them can be built outside this crate.

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    Alternative, Take, Variant,
    dispatch::{Visit, VisitMut, Visitor},
    policy::{AbortOnUnwind, clone_nothrow, take_nothrow},
    repr::SumList,
};

/// Clones the visited element into a vacant region.
pub struct CloneInto {
    dst: *mut u8,
}

impl CloneInto {
    /// # Safety
    ///
    /// `dst` must be a vacant region that fits the visited element.
    pub(crate) unsafe fn new(dst: *mut u8) -> Self {
        CloneInto { dst }
    }
}

impl Visitor for CloneInto {
    type Output = ();
}

impl<E: Clone> Visit<E> for CloneInto {
    fn visit(self, value: &E) {
        unsafe { self.dst.cast::<E>().write(value.clone()) }
    }
}

/// Takes the visited element into a vacant region.
pub struct TakeInto {
    dst: *mut u8,
}

impl TakeInto {
    /// # Safety
    ///
    /// `dst` must be a vacant region that fits the visited element.
    pub(crate) unsafe fn new(dst: *mut u8) -> Self {
        TakeInto { dst }
    }
}

impl Visitor for TakeInto {
    type Output = ();
}

impl<E: Take> VisitMut<E> for TakeInto {
    fn visit_mut(self, value: &mut E) {
        unsafe { self.dst.cast::<E>().write(value.take()) }
    }
}

/// Clone-assigns the visited element of a source variant into a target.
pub struct CloneAssign<S: SumList> {
    dst: *mut Variant<S>,
    tag: u8,
}

impl<S: SumList> CloneAssign<S> {
    /// # Safety
    ///
    /// The visited element must be the one at index `tag` in `S`, and must
    /// not live inside `dst`.
    pub(crate) unsafe fn new(dst: &mut Variant<S>, tag: u8) -> Self {
        CloneAssign { dst, tag }
    }
}

impl<S: SumList> Visitor for CloneAssign<S> {
    type Output = ();
}

impl<S: SumList, E: Clone + Alternative> Visit<E> for CloneAssign<S> {
    fn visit(self, value: &E) {
        let dst = unsafe { &mut *self.dst };
        if dst.tag == self.tag {
            unsafe { dst.storage.slot_mut::<E>() }.clone_from(value);
        } else if clone_nothrow::<E>() {
            let guard = AbortOnUnwind;
            unsafe {
                dst.storage.drop_tag(dst.tag);
                dst.storage.initialize(value.clone());
            }
            dst.tag = self.tag;
            guard.defuse();
        } else {
            let staged = value.clone();
            unsafe { dst.replace(self.tag, staged) };
        }
    }
}

/// Take-assigns the visited element of a source variant into a target.
pub struct TakeAssign<S: SumList> {
    dst: *mut Variant<S>,
    tag: u8,
}

impl<S: SumList> TakeAssign<S> {
    /// # Safety
    ///
    /// The visited element must be the one at index `tag` in `S`, and must
    /// not live inside `dst`.
    pub(crate) unsafe fn new(dst: &mut Variant<S>, tag: u8) -> Self {
        TakeAssign { dst, tag }
    }
}

impl<S: SumList> Visitor for TakeAssign<S> {
    type Output = ();
}

impl<S: SumList, E: Take> VisitMut<E> for TakeAssign<S> {
    fn visit_mut(self, value: &mut E) {
        let dst = unsafe { &mut *self.dst };
        if dst.tag == self.tag {
            // An `Indirect` target releases its allocation and adopts the
            // source's pointer.
            let taken = value.take();
            *unsafe { dst.storage.slot_mut::<E>() } = taken;
        } else if take_nothrow::<E>() {
            let guard = AbortOnUnwind;
            unsafe {
                dst.storage.drop_tag(dst.tag);
                dst.storage.initialize(value.take());
            }
            dst.tag = self.tag;
            guard.defuse();
        } else {
            let staged = value.take();
            unsafe { dst.replace(self.tag, staged) };
        }
    }
}

/// Compares the visited element with the element of the same type at `other`.
pub struct EqWith {
    other: *const u8,
}

impl EqWith {
    /// # Safety
    ///
    /// `other` must hold a live element of the visited type.
    pub(crate) unsafe fn new(other: *const u8) -> Self {
        EqWith { other }
    }
}

impl Visitor for EqWith {
    type Output = bool;
}

impl<E: PartialEq> Visit<E> for EqWith {
    fn visit(self, value: &E) -> bool {
        value == unsafe { &*self.other.cast::<E>() }
    }
}

pub struct PartialCmpWith {
    other: *const u8,
}

impl PartialCmpWith {
    /// # Safety
    ///
    /// `other` must hold a live element of the visited type.
    pub(crate) unsafe fn new(other: *const u8) -> Self {
        PartialCmpWith { other }
    }
}

impl Visitor for PartialCmpWith {
    type Output = Option<Ordering>;
}

impl<E: PartialOrd> Visit<E> for PartialCmpWith {
    fn visit(self, value: &E) -> Option<Ordering> {
        value.partial_cmp(unsafe { &*self.other.cast::<E>() })
    }
}

pub struct CmpWith {
    other: *const u8,
}

impl CmpWith {
    /// # Safety
    ///
    /// `other` must hold a live element of the visited type.
    pub(crate) unsafe fn new(other: *const u8) -> Self {
        CmpWith { other }
    }
}

impl Visitor for CmpWith {
    type Output = Ordering;
}

impl<E: Ord> Visit<E> for CmpWith {
    fn visit(self, value: &E) -> Ordering {
        value.cmp(unsafe { &*self.other.cast::<E>() })
    }
}

pub struct HashWith<'a> {
    state: &'a mut dyn Hasher,
}

impl<'a> HashWith<'a> {
    pub(crate) fn new(state: &'a mut dyn Hasher) -> Self {
        HashWith { state }
    }
}

impl Visitor for HashWith<'_> {
    type Output = ();
}

impl<E: Hash> Visit<E> for HashWith<'_> {
    fn visit(mut self, value: &E) {
        value.hash(&mut self.state)
    }
}

pub struct DebugWith<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl<'a, 'b> DebugWith<'a, 'b> {
    pub(crate) fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        DebugWith { f }
    }
}

impl Visitor for DebugWith<'_, '_> {
    type Output = fmt::Result;
}

impl<T: fmt::Debug> Visit<T> for DebugWith<'_, '_> {
    fn visit(self, value: &T) -> fmt::Result {
        fmt::Debug::fmt(value, self.f)
    }
}

pub struct DisplayWith<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl<'a, 'b> DisplayWith<'a, 'b> {
    pub(crate) fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        DisplayWith { f }
    }
}

impl Visitor for DisplayWith<'_, '_> {
    type Output = fmt::Result;
}

impl<T: fmt::Display> Visit<T> for DisplayWith<'_, '_> {
    fn visit(self, value: &T) -> fmt::Result {
        fmt::Display::fmt(value, self.f)
    }
}
