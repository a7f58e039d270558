//! Heap indirection for alternatives.
//!
//! [`Indirect<T>`] stores `T` behind a single owned allocation. Inside a
//! variant it stands in for `T`: lookups, accessors and visitors see `T`, and
//! only the variant's own copy and move algorithms handle the wrapper itself.
//! Relocating a wrapper moves a pointer, which is what lets a variant stage a
//! replacement cheaply before it gives up its current value. It also makes
//! recursive alternative lists possible.

use alloc::boxed::Box;
use core::{
    borrow::{Borrow, BorrowMut},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Deref, DerefMut},
};

use crate::{Alternative, Take};

/// An exclusively owned heap value.
///
/// The allocation is only ever missing after [`Indirect::transfer`] moved it
/// into another wrapper. Reading an emptied wrapper panics; dropping it does
/// nothing.
///
/// # Examples
///
/// ```rust
/// use tvariant::Indirect;
///
/// let a = Indirect::new(vec![1, 2, 3]);
/// let mut b = a.clone();
/// b.push(4);
///
/// assert_eq!(*a, [1, 2, 3]);
/// assert_eq!(*b, [1, 2, 3, 4]);
/// ```
pub struct Indirect<T> {
    ptr: Option<Box<T>>,
}

#[cold]
#[track_caller]
fn emptied() -> ! {
    panic!("accessed an `Indirect` whose value was transferred out")
}

impl<T> Indirect<T> {
    pub fn new(value: T) -> Self {
        Indirect {
            ptr: Some(Box::new(value)),
        }
    }

    #[track_caller]
    pub fn get(&self) -> &T {
        match &self.ptr {
            Some(ptr) => &**ptr,
            None => emptied(),
        }
    }

    #[track_caller]
    pub fn get_mut(&mut self) -> &mut T {
        match &mut self.ptr {
            Some(ptr) => &mut **ptr,
            None => emptied(),
        }
    }

    /// Assigns into the current allocation, allocating only if the wrapper
    /// was emptied.
    pub fn set(&mut self, value: T) {
        match &mut self.ptr {
            Some(ptr) => **ptr = value,
            None => self.ptr = Some(Box::new(value)),
        }
    }

    /// Moves the allocation into a new wrapper and leaves `self` empty.
    /// Never allocates and never panics.
    pub fn transfer(&mut self) -> Self {
        Indirect {
            ptr: self.ptr.take(),
        }
    }

    /// Whether the allocation was moved out by [`Indirect::transfer`].
    pub fn is_transferred(&self) -> bool {
        self.ptr.is_none()
    }

    #[track_caller]
    pub fn into_inner(self) -> T {
        match self.ptr {
            Some(ptr) => *ptr,
            None => emptied(),
        }
    }
}

impl<T> From<T> for Indirect<T> {
    fn from(value: T) -> Self {
        Indirect::new(value)
    }
}

impl<T: Default> Default for Indirect<T> {
    fn default() -> Self {
        Indirect::new(T::default())
    }
}

impl<T: Clone> Clone for Indirect<T> {
    fn clone(&self) -> Self {
        Indirect::new(self.get().clone())
    }

    /// Copies `source` into a fresh allocation; the old one is released only
    /// once the copy exists.
    fn clone_from(&mut self, source: &Self) {
        *self = source.clone();
    }
}

impl<T> Deref for Indirect<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> DerefMut for Indirect<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T> AsRef<T> for Indirect<T> {
    fn as_ref(&self) -> &T {
        self.get()
    }
}

impl<T> AsMut<T> for Indirect<T> {
    fn as_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T> Borrow<T> for Indirect<T> {
    fn borrow(&self) -> &T {
        self.get()
    }
}

impl<T> BorrowMut<T> for Indirect<T> {
    fn borrow_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for Indirect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ptr {
            Some(ptr) => fmt::Debug::fmt(ptr, f),
            None => f.write_str("<transferred>"),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Indirect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.get(), f)
    }
}

impl<T: PartialEq> PartialEq for Indirect<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: Eq> Eq for Indirect<T> {}

impl<T: PartialOrd> PartialOrd for Indirect<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.get().partial_cmp(other.get())
    }
}

impl<T: Ord> Ord for Indirect<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(other.get())
    }
}

impl<T: Hash> Hash for Indirect<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get().hash(state)
    }
}

impl<T> Alternative for Indirect<T> {
    type Target = T;

    const INDIRECT: bool = true;
    const NOTHROW_TAKE: bool = true;

    fn wrap(value: T) -> Self {
        Indirect::new(value)
    }

    fn unwrap(self) -> T {
        self.into_inner()
    }

    fn pierce(&self) -> &T {
        self.get()
    }

    fn pierce_mut(&mut self) -> &mut T {
        self.get_mut()
    }

    fn is_vacated(&self) -> bool {
        self.is_transferred()
    }
}

/// Hands the allocation over; `T` is neither built nor moved.
impl<T> Take for Indirect<T> {
    fn take(&mut self) -> Self {
        self.transfer()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        rc::Rc,
        string::{String, ToString},
    };

    use super::*;

    #[test]
    fn copies_are_independent() {
        let original = Indirect::new("left".to_string());
        let mut copy = original.clone();
        assert!(!core::ptr::eq(original.get(), copy.get()));

        copy.push_str(" alone");
        assert_eq!(original.into_inner(), "left");
        assert_eq!(copy.into_inner(), "left alone");
    }

    #[test]
    fn set_keeps_allocation() {
        let mut w = Indirect::new(1u64);
        let before: *const u64 = w.get();
        w.set(2);
        assert_eq!(*w, 2);
        assert!(core::ptr::eq(before, w.get()));
    }

    #[test]
    fn clone_from_reallocates() {
        let source = Indirect::new(7u64);
        let mut target = Indirect::new(1u64);
        let before: *const u64 = target.get();
        target.clone_from(&source);
        assert_eq!(*target, 7);
        assert!(!core::ptr::eq(before, target.get()));
        assert!(!core::ptr::eq(source.get(), target.get()));
    }

    #[test]
    fn transfer_empties_source() {
        let counter = Rc::new(());
        let mut a = Indirect::new(counter.clone());
        let b = a.transfer();

        assert!(a.is_transferred());
        assert!(!b.is_transferred());
        assert_eq!(Rc::strong_count(&counter), 2);

        drop(a);
        assert_eq!(Rc::strong_count(&counter), 2);
        drop(b);
        assert_eq!(Rc::strong_count(&counter), 1);
    }

    #[test]
    fn set_refills_emptied() {
        let mut a = Indirect::new(String::from("x"));
        let _b = a.transfer();
        a.set(String::from("y"));
        assert_eq!(a.get(), "y");
    }

    #[test]
    #[should_panic = "transferred out"]
    fn emptied_access_panics() {
        let mut a = Indirect::new(5u8);
        let _b = a.transfer();
        let _value = *a;
    }

    #[test]
    fn facts() {
        assert!(<Indirect<String>>::INDIRECT);
        assert!(<Indirect<String>>::NOTHROW_TAKE);
        assert!(!<Indirect<u8>>::NOTHROW_CLONE);
    }

    struct NoDefault(u8);

    #[test]
    fn take_hands_over_pointer() {
        let mut a = Indirect::new(NoDefault(9));
        let before: *const NoDefault = a.get();
        let b = Take::take(&mut a);

        assert!(a.is_vacated());
        assert!(!b.is_vacated());
        assert!(core::ptr::eq(before, b.get()));
        assert_eq!(b.0, 9);
    }
}
