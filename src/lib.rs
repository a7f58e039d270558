#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(rust_2024_compatibility)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;
#[cfg(test)]
extern crate std;

// Lets derives inside the crate's own tests name `::tvariant`.
#[cfg(test)]
extern crate self as tvariant;

#[macro_use]
mod macros;

mod alternative;
pub mod dispatch;
pub mod index;
mod indirect;
#[doc(hidden)]
pub mod ops;
pub mod policy;
pub mod repr;
pub mod storage;
mod variant;

pub use tvariant_macros::{Alternative, match_variant};

pub use self::{
    alternative::{Alternative, Take},
    dispatch::{Visit, VisitMut, VisitOwned, Visitor},
    indirect::Indirect,
    variant::{Variant, visit, visit_mut, visit_owned},
};

/// The list `S` without the alternative `T` at index `U`.
pub type Rem<S, T, U> = <S as repr::Split<T, U>>::Remainder;

/// The element that stores the alternative `T` at index `U` of `S`.
pub type Slot<S, T, U> = <S as repr::Split<T, U>>::Slot;

/// The list `S` without the alternatives of `S2`.
pub type NarrowRem<S, S2, UList> = <S as repr::SplitList<S2, UList>>::Remainder;
