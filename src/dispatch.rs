//! Visitors and their jump tables.
//!
//! Every (list, visitor) pair gets one table of monomorphized thunks, built at
//! compile time. Dispatching on a discriminant is a single indexed load and a
//! single indirect call, independent of the number of alternatives.
//!
//! Tables come in two flavors. The pierced ones ([`Dispatch`],
//! [`DispatchMut`], [`DispatchOwned`]) hand the visitor the value callers see,
//! looking through [`Indirect`](crate::Indirect). The raw ones
//! ([`DispatchSlot`], [`DispatchSlotMut`]) hand it the stored element itself,
//! which is what the variant's own copy and move algorithms need.

use core::hint::unreachable_unchecked;

use crate::{Alternative, repr::SumList};

/// The maximum number of alternatives in one list.
pub const MAX_ALTERNATIVES: usize = 32;

/// A visitor: a value applied to exactly one alternative, producing `Output`
/// whichever alternative it is.
///
/// # Examples
///
/// ```rust
/// use core::fmt::Debug;
/// use tvariant::{Variant, Visit, Visitor};
///
/// struct Describe;
///
/// impl Visitor for Describe {
///     type Output = String;
/// }
///
/// impl<T: Debug> Visit<T> for Describe {
///     fn visit(self, value: &T) -> String {
///         format!("<{value:?}>")
///     }
/// }
///
/// let v: Variant![i32, String] = Variant::new(String::from("hi"));
/// assert_eq!(v.visit(Describe), "<\"hi\">");
/// ```
pub trait Visitor {
    type Output;
}

pub trait Visit<T>: Visitor {
    fn visit(self, value: &T) -> Self::Output;
}

pub trait VisitMut<T>: Visitor {
    fn visit_mut(self, value: &mut T) -> Self::Output;
}

pub trait VisitOwned<T>: Visitor {
    fn visit_owned(self, value: T) -> Self::Output;
}

/// One entry of a visitor table.
pub type Thunk<P, V> = unsafe fn(P, V) -> <V as Visitor>::Output;

/// One entry of a list's destroyer table.
pub type DropThunk = unsafe fn(*mut u8);

/// One entry of the table behind [`Alternative::is_vacated`] checks.
pub type VacatedThunk = unsafe fn(*const u8) -> bool;

/// Builds the table of `(Head, Tail)` from the table of `Tail`.
pub(crate) const fn prepend<F: Copy>(
    head: F,
    tail: [F; MAX_ALTERNATIVES],
) -> [F; MAX_ALTERNATIVES] {
    let mut table = [head; MAX_ALTERNATIVES];
    let mut index = 1;
    while index < MAX_ALTERNATIVES {
        table[index] = tail[index - 1];
        index += 1;
    }
    table
}

unsafe fn vacant<P, V: Visitor>(_: P, _: V) -> V::Output {
    // Every dispatch function requires the discriminant to be in range.
    unsafe { unreachable_unchecked() }
}

pub(crate) unsafe fn vacant_drop(_: *mut u8) {
    unsafe { unreachable_unchecked() }
}

pub(crate) unsafe fn drop_slot<E>(ptr: *mut u8) {
    unsafe { ptr.cast::<E>().drop_in_place() }
}

pub(crate) unsafe fn vacant_vacated(_: *const u8) -> bool {
    unsafe { unreachable_unchecked() }
}

pub(crate) unsafe fn slot_vacated<E: Alternative>(ptr: *const u8) -> bool {
    unsafe { &*ptr.cast::<E>() }.is_vacated()
}

unsafe fn visit_pierced<E, V>(ptr: *const u8, visitor: V) -> V::Output
where
    E: Alternative,
    V: Visit<E::Target>,
{
    visitor.visit(unsafe { &*ptr.cast::<E>() }.pierce())
}

unsafe fn visit_pierced_mut<E, V>(ptr: *mut u8, visitor: V) -> V::Output
where
    E: Alternative,
    V: VisitMut<E::Target>,
{
    visitor.visit_mut(unsafe { &mut *ptr.cast::<E>() }.pierce_mut())
}

unsafe fn visit_owned<E, V>(ptr: *mut u8, visitor: V) -> V::Output
where
    E: Alternative,
    V: VisitOwned<E::Target>,
{
    let slot = unsafe { ptr.cast::<E>().read() };
    visitor.visit_owned(E::unwrap(slot))
}

unsafe fn visit_slot<E, V: Visit<E>>(ptr: *const u8, visitor: V) -> V::Output {
    visitor.visit(unsafe { &*ptr.cast::<E>() })
}

unsafe fn visit_slot_mut<E, V: VisitMut<E>>(ptr: *mut u8, visitor: V) -> V::Output {
    visitor.visit_mut(unsafe { &mut *ptr.cast::<E>() })
}

macro_rules! dispatch_table {
    ($(#[$attr:meta])* $name:ident($ptr:ty) => $thunk:ident where V: $($bound:tt)+) => {
        $(#[$attr])*
        ///
        /// # Safety
        ///
        /// `TABLE[i]` must expect the element at index `i`. Only the tuple
        /// lists of this crate implement it.
        pub unsafe trait $name<V: Visitor>: SumList {
            #[doc(hidden)]
            const TABLE: [Thunk<$ptr, V>; MAX_ALTERNATIVES];
        }

        unsafe impl<V: Visitor> $name<V> for () {
            const TABLE: [Thunk<$ptr, V>; MAX_ALTERNATIVES] =
                [vacant::<$ptr, V> as Thunk<$ptr, V>; MAX_ALTERNATIVES];
        }

        unsafe impl<V, Head, Tail> $name<V> for (Head, Tail)
        where
            V: $($bound)+,
            Head: Alternative,
            Tail: $name<V>,
        {
            const TABLE: [Thunk<$ptr, V>; MAX_ALTERNATIVES] =
                prepend($thunk::<Head, V> as Thunk<$ptr, V>, Tail::TABLE);
        }
    };
}

dispatch_table! {
    /// Visits the pierced value by shared reference.
    Dispatch(*const u8) => visit_pierced where V: Visit<Head::Target>
}

dispatch_table! {
    /// Visits the pierced value by mutable reference.
    DispatchMut(*mut u8) => visit_pierced_mut where V: VisitMut<Head::Target>
}

dispatch_table! {
    /// Moves the pierced value into the visitor.
    DispatchOwned(*mut u8) => visit_owned where V: VisitOwned<Head::Target>
}

dispatch_table! {
    /// Visits the stored element by shared reference.
    DispatchSlot(*const u8) => visit_slot where V: Visit<Head>
}

dispatch_table! {
    /// Visits the stored element by mutable reference.
    DispatchSlotMut(*mut u8) => visit_slot_mut where V: VisitMut<Head>
}

/// # Safety
///
/// `ptr` must point to a live element of `S` at index `tag`.
#[inline]
pub unsafe fn dispatch<S: Dispatch<V>, V: Visitor>(
    tag: u8,
    ptr: *const u8,
    visitor: V,
) -> V::Output {
    let thunk = const { &S::TABLE }[usize::from(tag)];
    unsafe { thunk(ptr, visitor) }
}

/// # Safety
///
/// `ptr` must point to a live element of `S` at index `tag`.
#[inline]
pub unsafe fn dispatch_mut<S: DispatchMut<V>, V: Visitor>(
    tag: u8,
    ptr: *mut u8,
    visitor: V,
) -> V::Output {
    let thunk = const { &S::TABLE }[usize::from(tag)];
    unsafe { thunk(ptr, visitor) }
}

/// # Safety
///
/// `ptr` must point to a live element of `S` at index `tag`. The element is
/// moved out; the region is vacant afterwards, even if the visitor panics.
#[inline]
pub unsafe fn dispatch_owned<S: DispatchOwned<V>, V: Visitor>(
    tag: u8,
    ptr: *mut u8,
    visitor: V,
) -> V::Output {
    let thunk = const { &S::TABLE }[usize::from(tag)];
    unsafe { thunk(ptr, visitor) }
}

/// # Safety
///
/// `ptr` must point to a live element of `S` at index `tag`.
#[inline]
pub unsafe fn dispatch_slot<S: DispatchSlot<V>, V: Visitor>(
    tag: u8,
    ptr: *const u8,
    visitor: V,
) -> V::Output {
    let thunk = const { &S::TABLE }[usize::from(tag)];
    unsafe { thunk(ptr, visitor) }
}

/// # Safety
///
/// `ptr` must point to a live element of `S` at index `tag`.
#[inline]
pub unsafe fn dispatch_slot_mut<S: DispatchSlotMut<V>, V: Visitor>(
    tag: u8,
    ptr: *mut u8,
    visitor: V,
) -> V::Output {
    let thunk = const { &S::TABLE }[usize::from(tag)];
    unsafe { thunk(ptr, visitor) }
}
