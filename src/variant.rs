//! The tagged union itself.

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    hint::unreachable_unchecked,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

use crate::{
    Alternative, NarrowRem, Rem, Slot, Take,
    dispatch::{
        self, Dispatch, DispatchMut, DispatchOwned, DispatchSlot, DispatchSlotMut, Visitor,
    },
    index::Index,
    ops::{
        CloneAssign, CloneInto, CmpWith, DebugWith, DisplayWith, EqWith, HashWith, PartialCmpWith,
        TakeAssign, TakeInto,
    },
    policy::{AbortOnUnwind, Policy},
    repr::{Split, SplitList, SumList},
    storage::Storage,
};

/// A value of exactly one of the alternatives listed in `S`.
///
/// `S` is a list built with [`T!`](crate::T), and the whole type is normally
/// spelled with [`Variant!`](crate::Variant!). Alternatives are looked up by
/// type, an alternative held through [`Indirect<T>`](crate::Indirect) by its
/// `T`:
///
/// ```rust
/// use tvariant::{Indirect, Variant};
///
/// let mut v: Variant![i32, String, Indirect<Vec<u8>>] = Variant::new(5i32);
/// assert_eq!(v.which(), 0);
///
/// v.emplace(vec![1u8, 2]);
/// assert_eq!(v.get::<Vec<u8>, _>(), Some(&vec![1, 2]));
/// assert_eq!(v.get::<i32, _>(), None);
/// ```
///
/// Types that are not in the list, or are listed twice, cannot be looked up:
///
/// ```rust,compile_fail
/// use tvariant::Variant;
///
/// let v: Variant![i32, String] = Variant::new(1.5f64);
/// ```
///
/// ```rust,compile_fail
/// use tvariant::Variant;
///
/// let v: Variant![i32, i32] = Variant::new(1i32);
/// ```
///
/// A list holds at most 32 alternatives:
///
/// ```rust,compile_fail
/// use core::marker::PhantomData as P;
/// use tvariant::Variant;
///
/// type Wide = Variant![
///     P<[(); 0]>, P<[(); 1]>, P<[(); 2]>, P<[(); 3]>, P<[(); 4]>, P<[(); 5]>,
///     P<[(); 6]>, P<[(); 7]>, P<[(); 8]>, P<[(); 9]>, P<[(); 10]>, P<[(); 11]>,
///     P<[(); 12]>, P<[(); 13]>, P<[(); 14]>, P<[(); 15]>, P<[(); 16]>,
///     P<[(); 17]>, P<[(); 18]>, P<[(); 19]>, P<[(); 20]>, P<[(); 21]>,
///     P<[(); 22]>, P<[(); 23]>, P<[(); 24]>, P<[(); 25]>, P<[(); 26]>,
///     P<[(); 27]>, P<[(); 28]>, P<[(); 29]>, P<[(); 30]>, P<[(); 31]>,
///     P<[(); 32]>,
/// ];
///
/// let v = Wide::new(P::<[(); 0]>);
/// ```
pub struct Variant<S: SumList> {
    pub(crate) tag: u8,
    pub(crate) storage: Storage<S>,
}

impl<S: SumList> Variant<S> {
    /// # Safety
    ///
    /// `storage` must hold a live element of `S` at index `tag`.
    #[inline]
    unsafe fn from_parts(tag: u8, storage: Storage<S>) -> Self {
        let this = Variant { tag, storage };
        this.check();
        this
    }

    #[inline]
    fn from_slot<E>(tag: u8, slot: E) -> Self {
        let mut storage = Storage::uninit();
        unsafe {
            storage.initialize(slot);
            Self::from_parts(tag, storage)
        }
    }

    #[inline]
    fn check(&self) {
        strict_assert!(
            usize::from(self.tag) < S::LEN,
            "discriminant {} out of range for {} alternatives",
            self.tag,
            S::LEN,
        );
        strict_assert!(
            !unsafe { self.storage.is_vacated(self.tag) },
            "alternative {} holds a value that was moved out",
            self.tag,
        );
    }

    /// Destroys the live alternative and puts `slot` in its place.
    ///
    /// # Safety
    ///
    /// `E` must be the element at index `tag`.
    pub(crate) unsafe fn replace<E>(&mut self, tag: u8, slot: E) {
        let guard = AbortOnUnwind;
        unsafe {
            self.storage.drop_tag(self.tag);
            self.storage.initialize(slot);
        }
        self.tag = tag;
        guard.defuse();
        self.check();
    }

    /// Builds a variant holding `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// type V = Variant![i32, String];
    ///
    /// let v: V = Variant::new(String::from("text"));
    /// assert_eq!(v.which(), 1);
    /// ```
    pub fn new<T, U>(value: T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::from_slot(U::TAG, Slot::<S, T, U>::wrap(value))
    }

    pub fn new_with<T, U>(f: impl FnOnce() -> T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::new(f())
    }

    /// The index of the live alternative.
    #[inline]
    pub fn which(&self) -> usize {
        usize::from(self.tag)
    }

    pub fn holds<T, U>(&self) -> bool
    where
        S: Split<T, U>,
        U: Index,
    {
        self.tag == U::TAG
    }

    /// # Examples
    ///
    /// ```rust
    /// use tvariant::{Variant, index::U1};
    ///
    /// let v: Variant![i32, String] = Variant::new(String::from("text"));
    /// assert_eq!(v.get::<i32, _>(), None);
    /// assert_eq!(v.get::<_, U1>().map(String::as_str), Some("text"));
    /// ```
    pub fn get<T, U>(&self) -> Option<&T>
    where
        S: Split<T, U>,
        U: Index,
    {
        (self.tag == U::TAG).then(|| unsafe { self.storage.value::<Slot<S, T, U>>() })
    }

    pub fn get_mut<T, U>(&mut self) -> Option<&mut T>
    where
        S: Split<T, U>,
        U: Index,
    {
        (self.tag == U::TAG).then(|| unsafe { self.storage.value_mut::<Slot<S, T, U>>() })
    }

    /// Replaces the live alternative with `value`.
    ///
    /// The stored element for `value` is built before the old alternative is
    /// destroyed, so a panic while building it leaves the variant as it was.
    pub fn emplace<T, U>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        let slot = Slot::<S, T, U>::wrap(value);
        unsafe {
            self.replace(U::TAG, slot);
            self.storage.value_mut::<Slot<S, T, U>>()
        }
    }

    /// Replaces the live alternative with the value built by `f`. `f` runs
    /// before anything else happens to the variant.
    pub fn emplace_with<T, U>(&mut self, f: impl FnOnce() -> T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        self.emplace(f())
    }

    /// Replaces the live alternative with a default `T`.
    ///
    /// When building the default element cannot panic it is built directly
    /// over the old alternative; otherwise it is built first.
    pub fn emplace_default<T, U>(&mut self) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
        T: Default,
    {
        if !Slot::<S, T, U>::NOTHROW_DEFAULT {
            return self.emplace(T::default());
        }

        let guard = AbortOnUnwind;
        unsafe {
            self.storage.drop_tag(self.tag);
            self.storage.initialize(Slot::<S, T, U>::wrap(T::default()));
        }
        self.tag = U::TAG;
        guard.defuse();
        self.check();
        unsafe { self.storage.value_mut::<Slot<S, T, U>>() }
    }

    /// Returns the `T` alternative, switching to `value` first if another
    /// alternative is live.
    pub fn get_or_insert<T, U>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        if self.tag != U::TAG {
            return self.emplace(value);
        }
        unsafe { self.storage.value_mut::<Slot<S, T, U>>() }
    }

    pub fn get_or_insert_with<T, U>(&mut self, f: impl FnOnce() -> T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        if self.tag != U::TAG {
            return self.emplace(f());
        }
        unsafe { self.storage.value_mut::<Slot<S, T, U>>() }
    }

    /// Returns the `T` alternative, switching to a default `T` first if
    /// another alternative is live.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let mut v: Variant![i32, String] = Variant::new(3i32);
    /// v.get_or_default::<String, _>().push_str("now a string");
    /// assert_eq!(v.get::<String, _>().unwrap(), "now a string");
    /// ```
    pub fn get_or_default<T, U>(&mut self) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
        T: Default,
    {
        if self.tag != U::TAG {
            return self.emplace_default();
        }
        unsafe { self.storage.value_mut::<Slot<S, T, U>>() }
    }
}

impl<S: SumList> Variant<S> {
    /// Moves the live alternative out into a new variant.
    ///
    /// `self` keeps the same alternative, left valid but unspecified as
    /// [`Take`] describes: a directly held value is replaced by its default,
    /// and an [`Indirect`](crate::Indirect) hands its pointer over without
    /// building or moving the `T` behind it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::{Indirect, Variant};
    ///
    /// struct Huge([u8; 4096]);
    ///
    /// let mut a: Variant![u8, Indirect<Huge>] = Variant::new(Huge([7; 4096]));
    /// let b = a.take();
    /// assert_eq!(b.get::<Huge, _>().map(|h| h.0[0]), Some(7));
    /// assert_eq!(a.which(), 1);
    /// ```
    pub fn take(&mut self) -> Self
    where
        S: DispatchSlotMut<TakeInto>,
    {
        let mut storage = Storage::uninit();
        unsafe {
            dispatch::dispatch_slot_mut::<S, _>(
                self.tag,
                self.storage.as_mut_ptr(),
                TakeInto::new(storage.as_mut_ptr()),
            );
            Self::from_parts(self.tag, storage)
        }
    }

    /// Assigns the live alternative of `source` to `self` by taking it.
    ///
    /// If both hold the same alternative, the taken element is assigned over
    /// the live one. Otherwise the old alternative is destroyed and the taken
    /// one built in its place, directly when taking cannot panic and through
    /// a temporary when it can. A panic leaves `self` unchanged. Taking an
    /// [`Indirect`](crate::Indirect) only hands over its pointer, so it never
    /// panics. `source` is left as [`Variant::take`] leaves it.
    ///
    /// Lists in which some alternative can panic while being taken and is
    /// not held through a pointer are rejected at compile time:
    ///
    #[cfg_attr(not(feature = "assume-take-nothrow"), doc = "```rust,compile_fail")]
    #[cfg_attr(feature = "assume-take-nothrow", doc = "```rust,ignore")]
    /// use tvariant::{Alternative, Variant};
    ///
    /// #[derive(Alternative, Default)]
    /// #[alternative(take)]
    /// struct Ledger(Vec<u64>);
    ///
    /// let mut a: Variant![u32, Ledger] = Variant::new(1u32);
    /// let mut b: Variant![u32, Ledger] = Variant::new(Ledger::default());
    /// a.take_from(&mut b);
    /// ```
    pub fn take_from(&mut self, source: &mut Self)
    where
        S: DispatchSlotMut<TakeAssign<S>>,
    {
        const {
            assert!(
                S::ASSIGNABLE,
                "every alternative must be nothrow-take or held through a pointer",
            )
        };
        let tag = source.tag;
        unsafe {
            dispatch::dispatch_slot_mut::<S, _>(
                tag,
                source.storage.as_mut_ptr(),
                TakeAssign::new(self, tag),
            )
        };
        self.check();
    }

    pub fn visit<V: Visitor>(&self, visitor: V) -> V::Output
    where
        S: Dispatch<V>,
    {
        unsafe { dispatch::dispatch::<S, V>(self.tag, self.storage.as_ptr(), visitor) }
    }

    pub fn visit_mut<V: Visitor>(&mut self, visitor: V) -> V::Output
    where
        S: DispatchMut<V>,
    {
        unsafe { dispatch::dispatch_mut::<S, V>(self.tag, self.storage.as_mut_ptr(), visitor) }
    }

    pub fn visit_owned<V: Visitor>(self, visitor: V) -> V::Output
    where
        S: DispatchOwned<V>,
    {
        let mut this = ManuallyDrop::new(self);
        let tag = this.tag;
        unsafe { dispatch::dispatch_owned::<S, V>(tag, this.storage.as_mut_ptr(), visitor) }
    }
}

/// Applies `visitor` to the live alternative of `variant`.
pub fn visit<S, V>(visitor: V, variant: &Variant<S>) -> V::Output
where
    S: Dispatch<V>,
    V: Visitor,
{
    variant.visit(visitor)
}

pub fn visit_mut<S, V>(visitor: V, variant: &mut Variant<S>) -> V::Output
where
    S: DispatchMut<V>,
    V: Visitor,
{
    variant.visit_mut(visitor)
}

pub fn visit_owned<S, V>(visitor: V, variant: Variant<S>) -> V::Output
where
    S: DispatchOwned<V>,
    V: Visitor,
{
    variant.visit_owned(visitor)
}

impl<S: SumList> Variant<S> {
    /// Moves the `T` alternative out, or returns the variant over the
    /// remaining alternatives.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let v: Variant![i32, String, u8] = Variant::new(7u8);
    /// let rest: Variant![i32, u8] = v.try_unwrap::<String, _>().unwrap_err();
    /// assert_eq!(rest.try_unwrap::<u8, _>().ok(), Some(7));
    /// ```
    pub fn try_unwrap<T, U>(self) -> Result<T, Variant<Rem<S, T, U>>>
    where
        S: Split<T, U>,
        U: Index,
    {
        let this = ManuallyDrop::new(self);
        match S::inner_tag(this.tag) {
            None => Ok(Slot::<S, T, U>::unwrap(unsafe {
                this.storage.read::<Slot<S, T, U>>()
            })),
            Some(tag) => Err(unsafe { Variant::from_parts(tag, this.storage.relocate()) }),
        }
    }

    /// Moves the variant into the wider list `S2`.
    ///
    /// The live element is relocated as is; nothing is cloned or taken.
    pub fn broaden<S2, UList>(self) -> Variant<S2>
    where
        S2: SplitList<S, UList>,
    {
        let this = ManuallyDrop::new(self);
        let tag = <S2 as SplitList<S, UList>>::broaden_tag(this.tag);
        unsafe { Variant::from_parts(tag, this.storage.relocate()) }
    }

    /// Builds a variant over the wider list `S2` holding a clone of the live
    /// alternative.
    pub fn broaden_clone<S2, UList>(&self) -> Variant<S2>
    where
        S: DispatchSlot<CloneInto>,
        S2: SplitList<S, UList>,
    {
        let mut storage = Storage::<S2>::uninit();
        unsafe {
            dispatch::dispatch_slot::<S, _>(
                self.tag,
                self.storage.as_ptr(),
                CloneInto::new(storage.as_mut_ptr()),
            );
            let tag = <S2 as SplitList<S, UList>>::broaden_tag(self.tag);
            Variant::from_parts(tag, storage)
        }
    }

    /// Builds a variant over the wider list `S2` by taking the live
    /// alternative, as [`Variant::take`] does.
    pub fn broaden_take<S2, UList>(&mut self) -> Variant<S2>
    where
        S: DispatchSlotMut<TakeInto>,
        S2: SplitList<S, UList>,
    {
        let mut storage = Storage::<S2>::uninit();
        unsafe {
            dispatch::dispatch_slot_mut::<S, _>(
                self.tag,
                self.storage.as_mut_ptr(),
                TakeInto::new(storage.as_mut_ptr()),
            );
            let tag = <S2 as SplitList<S, UList>>::broaden_tag(self.tag);
            Variant::from_parts(tag, storage)
        }
    }

    /// Moves the variant into the narrower list `S2` if its live alternative
    /// is listed there, or into the list of the remaining alternatives.
    pub fn narrow<S2, UList>(self) -> Result<Variant<S2>, Variant<NarrowRem<S, S2, UList>>>
    where
        S: SplitList<S2, UList>,
        S2: SumList,
    {
        let this = ManuallyDrop::new(self);
        match <S as SplitList<S2, UList>>::narrow_tag(this.tag) {
            Ok(tag) => Ok(unsafe { Variant::from_parts(tag, this.storage.relocate()) }),
            Err(tag) => Err(unsafe { Variant::from_parts(tag, this.storage.relocate()) }),
        }
    }
}

impl<E: Alternative> Variant<(E, ())> {
    pub fn into_inner(self) -> E::Target {
        let this = ManuallyDrop::new(self);
        E::unwrap(unsafe { this.storage.read::<E>() })
    }
}

impl<E: Alternative> Deref for Variant<(E, ())> {
    type Target = E::Target;

    fn deref(&self) -> &E::Target {
        unsafe { self.storage.value::<E>() }
    }
}

impl<E: Alternative> DerefMut for Variant<(E, ())> {
    fn deref_mut(&mut self) -> &mut E::Target {
        unsafe { self.storage.value_mut::<E>() }
    }
}

impl Variant<()> {
    /// A variant over no alternatives has no values; code holding one is
    /// unreachable.
    pub fn unreachable(self) -> ! {
        // No constructor of `Variant` accepts an empty list.
        unsafe { unreachable_unchecked() }
    }
}

impl<S: SumList> Drop for Variant<S> {
    fn drop(&mut self) {
        unsafe { self.storage.drop_tag(self.tag) }
    }
}

impl<Head, Tail> Default for Variant<(Head, Tail)>
where
    Head: Alternative + Default,
    Tail: SumList,
{
    /// Builds a default first alternative.
    fn default() -> Self {
        Variant::from_slot(0, Head::default())
    }
}

impl<S> Clone for Variant<S>
where
    S: DispatchSlot<CloneInto> + DispatchSlot<CloneAssign<S>>,
{
    /// Clones the live alternative. A panic while cloning leaves nothing
    /// behind.
    fn clone(&self) -> Self {
        let mut storage = Storage::uninit();
        unsafe {
            dispatch::dispatch_slot::<S, _>(
                self.tag,
                self.storage.as_ptr(),
                CloneInto::new(storage.as_mut_ptr()),
            );
            Self::from_parts(self.tag, storage)
        }
    }

    /// Assigns a clone of the live alternative of `source`.
    ///
    /// If both hold the same alternative, its own `clone_from` is used.
    /// Otherwise the old alternative is destroyed and the clone built in its
    /// place, directly when cloning cannot panic and through a temporary when
    /// it can. A panic while cloning leaves `self` unchanged.
    ///
    /// Like [`Variant::take_from`], this requires every alternative to be
    /// nothrow-take or held through a pointer:
    ///
    #[cfg_attr(not(feature = "assume-take-nothrow"), doc = "```rust,compile_fail")]
    #[cfg_attr(feature = "assume-take-nothrow", doc = "```rust,ignore")]
    /// use tvariant::{Alternative, Variant};
    ///
    /// #[derive(Alternative, Clone)]
    /// struct Ledger(Vec<u64>);
    ///
    /// let mut a: Variant![u32, Ledger] = Variant::new(1u32);
    /// a.clone_from(&Variant::new(Ledger(vec![1])));
    /// ```
    ///
    /// Holding it through [`Indirect`](crate::Indirect) makes the list
    /// assignable:
    ///
    /// ```rust
    /// use tvariant::{Alternative, Indirect, Variant};
    ///
    /// #[derive(Alternative, Clone)]
    /// struct Ledger(Vec<u64>);
    ///
    /// let mut a: Variant![u32, Indirect<Ledger>] = Variant::new(1u32);
    /// a.clone_from(&Variant::new(Ledger(vec![1])));
    /// assert_eq!(a.which(), 1);
    /// ```
    fn clone_from(&mut self, source: &Self) {
        const {
            assert!(
                S::ASSIGNABLE,
                "every alternative must be nothrow-take or held through a pointer",
            )
        };
        let tag = source.tag;
        unsafe {
            dispatch::dispatch_slot::<S, _>(
                tag,
                source.storage.as_ptr(),
                CloneAssign::new(self, tag),
            )
        };
        self.check();
    }
}

impl<S: DispatchSlot<EqWith>> PartialEq for Variant<S> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && unsafe {
                dispatch::dispatch_slot::<S, _>(
                    self.tag,
                    self.storage.as_ptr(),
                    EqWith::new(other.storage.as_ptr()),
                )
            }
    }
}

impl<S: DispatchSlot<EqWith> + Eq> Eq for Variant<S> {}

impl<S> PartialOrd for Variant<S>
where
    S: DispatchSlot<EqWith> + DispatchSlot<PartialCmpWith>,
{
    /// Orders by discriminant first, then by value.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.tag.cmp(&other.tag) {
            Ordering::Equal => unsafe {
                dispatch::dispatch_slot::<S, _>(
                    self.tag,
                    self.storage.as_ptr(),
                    PartialCmpWith::new(other.storage.as_ptr()),
                )
            },
            ordering => Some(ordering),
        }
    }
}

impl<S> Ord for Variant<S>
where
    S: DispatchSlot<EqWith> + DispatchSlot<PartialCmpWith> + DispatchSlot<CmpWith> + Eq,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag.cmp(&other.tag).then_with(|| unsafe {
            dispatch::dispatch_slot::<S, _>(
                self.tag,
                self.storage.as_ptr(),
                CmpWith::new(other.storage.as_ptr()),
            )
        })
    }
}

impl<S> Hash for Variant<S>
where
    S: for<'a> DispatchSlot<HashWith<'a>>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        unsafe {
            dispatch::dispatch_slot::<S, _>(self.tag, self.storage.as_ptr(), HashWith::new(state))
        }
    }
}

impl<S> fmt::Debug for Variant<S>
where
    S: for<'a, 'b> Dispatch<DebugWith<'a, 'b>>,
{
    /// Formats the live alternative alone.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.visit(DebugWith::new(f))
    }
}

impl<S> fmt::Display for Variant<S>
where
    S: for<'a, 'b> Dispatch<DisplayWith<'a, 'b>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.visit(DisplayWith::new(f))
    }
}

impl<S: SumList> Alternative for Variant<S> {
    type Target = Self;

    const NOTHROW_DEFAULT: bool = <S as Policy>::NOTHROW_DEFAULT;
    const NOTHROW_CLONE: bool = <S as Policy>::NOTHROW_CLONE;
    const NOTHROW_TAKE: bool = <S as Policy>::NOTHROW_TAKE;

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

impl<S: DispatchSlotMut<TakeInto>> Take for Variant<S> {
    fn take(&mut self) -> Self {
        Variant::take(self)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        format,
        rc::Rc,
        string::{String, ToString},
        vec,
        vec::Vec,
    };

    use crate::{Indirect, T, Variant, index::*};

    type V = Variant![i32, String, Indirect<Vec<u8>>];

    #[test]
    fn basic() {
        type T0 = T![u32];
        type T1 = T![u32, String];
        type T2 = T![u32, String, u64];

        let v: Variant<T0> = Variant::new(12345u32);
        assert_eq!(v.get(), Some(&12345u32));

        let mut v: Variant<T1> = v.broaden();
        assert_eq!(v.get::<u32, _>(), Some(&12345));
        assert_eq!(v.get::<_, U1>(), None);

        v = Variant::new("Hello World!".to_string());
        assert_eq!(v.get(), Some(&"Hello World!".to_string()));

        let v: Variant<T2> = v.broaden::<_, T![U0, U0]>();
        assert_eq!(v.get(), Some(&"Hello World!".to_string()));

        let v: Variant<T1> = v.narrow::<_, T![U0, U0]>().unwrap();
        let v: Variant<T![String]> = v.narrow::<T0, _>().unwrap_err();
        assert_eq!(*v, "Hello World!");
    }

    #[test]
    fn default_is_first() {
        let v = V::default();
        assert_eq!(v.which(), 0);
        assert_eq!(v.get::<i32, _>(), Some(&0));

        let w = <Variant![Indirect<String>, u8]>::default();
        assert_eq!(w.get::<String, _>().map(String::as_str), Some(""));
    }

    #[test]
    fn pierced_lookup() {
        let mut v = V::new(vec![1u8]);
        assert!(v.holds::<Vec<u8>, _>());
        v.get_mut::<Vec<u8>, _>().unwrap().push(2);
        assert_eq!(v.get::<_, U2>(), Some(&vec![1, 2]));
    }

    #[test]
    fn emplace_switches() {
        let mut v = V::new(1i32);
        *v.emplace(String::from("a")) += "b";
        assert_eq!(v.get::<String, _>().unwrap(), "ab");
        assert_eq!(v.which(), 1);

        v.emplace_default::<Vec<u8>, _>().push(3);
        assert_eq!(v.get::<Vec<u8>, _>(), Some(&vec![3]));

        v.emplace_with(|| 9i32);
        assert_eq!(v.get::<i32, _>(), Some(&9));
    }

    #[test]
    fn get_or_insert_keeps_match() {
        let mut v = V::new(4i32);
        *v.get_or_insert(10i32) += 1;
        assert_eq!(v.get::<i32, _>(), Some(&5));

        v.get_or_default::<String, _>().push('x');
        assert_eq!(v.get::<String, _>().unwrap(), "x");
        v.get_or_insert_with(|| String::from("unused")).push('y');
        assert_eq!(v.get::<String, _>().unwrap(), "xy");
    }

    #[test]
    fn clone_is_deep() {
        let a = V::new(vec![1u8]);
        let mut b = a.clone();
        b.get_mut::<Vec<u8>, _>().unwrap().push(2);
        assert_eq!(a.get::<Vec<u8>, _>(), Some(&vec![1]));
        assert_eq!(b.get::<Vec<u8>, _>(), Some(&vec![1, 2]));
    }

    #[test]
    fn clone_from_all_paths() {
        let mut a = V::new(String::from("old"));

        a.clone_from(&V::new(String::from("same")));
        assert_eq!(a.get::<String, _>().unwrap(), "same");

        a.clone_from(&V::new(3i32));
        assert_eq!(a.get::<i32, _>(), Some(&3));

        a.clone_from(&V::new(vec![7u8]));
        assert_eq!(a.get::<Vec<u8>, _>(), Some(&vec![7]));
    }

    fn vacated(v: &V) -> bool {
        unsafe { v.storage.is_vacated(v.tag) }
    }

    #[test]
    fn take_leaves_moved_from() {
        let mut a = V::new(String::from("moved"));
        let b = a.take();
        assert_eq!(b.get::<String, _>().unwrap(), "moved");
        assert_eq!(a.get::<String, _>().unwrap(), "");

        let mut c = V::new(vec![1u8]);
        let before: *const Vec<u8> = c.get::<Vec<u8>, _>().unwrap();
        let d = c.take();
        assert_eq!(c.which(), 2);
        assert!(vacated(&c));
        assert!(core::ptr::eq(before, d.get::<Vec<u8>, _>().unwrap()));
    }

    #[test]
    fn take_from_same_alternative_adopts_pointer() {
        let mut a = V::new(vec![1u8]);
        let mut b = V::new(vec![2u8]);
        let incoming: *const Vec<u8> = b.get::<Vec<u8>, _>().unwrap();
        a.take_from(&mut b);
        assert_eq!(a.get::<Vec<u8>, _>(), Some(&vec![2]));
        assert!(core::ptr::eq(incoming, a.get::<Vec<u8>, _>().unwrap()));
        assert!(vacated(&b));

        b.emplace(vec![3u8]);
        assert_eq!(b.get::<Vec<u8>, _>(), Some(&vec![3]));
    }

    #[test]
    fn take_from_other_alternative_adopts_pointer() {
        let mut a = V::new(String::from("old"));
        let mut b = V::new(vec![4u8]);
        let incoming: *const Vec<u8> = b.get::<Vec<u8>, _>().unwrap();
        a.take_from(&mut b);
        assert_eq!(a.which(), 2);
        assert!(core::ptr::eq(incoming, a.get::<Vec<u8>, _>().unwrap()));
        assert!(vacated(&b));
    }

    #[test]
    #[cfg(feature = "debug-checks")]
    #[should_panic = "was moved out"]
    fn moved_from_wrapper_is_caught() {
        let mut a = V::new(vec![1u8]);
        let _b = a.take();
        let _c = a.take();
    }

    #[test]
    fn try_unwrap_and_rest() {
        let v = V::new(String::from("s"));
        let rest = v.try_unwrap::<i32, _>().unwrap_err();
        let rest = rest.try_unwrap::<Vec<u8>, _>().unwrap_err();
        assert_eq!(rest.into_inner(), "s");
    }

    #[test]
    fn drops_once() {
        let counter = Rc::new(());
        {
            let v: Variant![u8, Indirect<Rc<()>>] = Variant::new(counter.clone());
            let w = v.clone();
            assert_eq!(Rc::strong_count(&counter), 3);
            drop(v);
            assert_eq!(Rc::strong_count(&counter), 2);
            let _ = w.try_unwrap::<Rc<()>, _>();
        }
        assert_eq!(Rc::strong_count(&counter), 1);
    }

    #[test]
    fn ordering_and_equality() {
        let a = V::new(1i32);
        let b = V::new(2i32);
        let c = V::new(String::from("a"));
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a, V::new(1i32));
        assert_ne!(a, c);
    }

    #[test]
    fn formats_transparently() {
        let v = V::new(String::from("text"));
        assert_eq!(format!("{v:?}"), "\"text\"");
        let w = V::new(vec![1u8]);
        assert_eq!(format!("{w:?}"), "[1]");

        let shown: Variant![i32, String, Indirect<char>] = Variant::new('c');
        assert_eq!(format!("{shown}"), "c");
        let shown: Variant![i32, String, Indirect<char>] = Variant::new(-4i32);
        assert_eq!(format!("{shown}"), "-4");
    }

    #[test]
    fn nested_variant() {
        type Inner = Variant![u8, String];
        let mut outer: Variant![Inner, i64] = Variant::new(Inner::new(3u8));
        assert_eq!(outer.get::<Inner, _>().and_then(|v| v.get::<u8, _>()), Some(&3));
        outer.emplace(5i64);
        assert_eq!(outer.which(), 1);
    }
}
