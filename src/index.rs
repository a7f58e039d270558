//! Type-level alternative indices.
//!
//! An index names a position in an alternative list at compile time. Most
//! calls leave it to inference (`variant.get::<String, _>()`); naming it
//! selects an alternative by position instead (`variant.get::<_, U1>()`).

#![allow(missing_docs)]

use core::marker::PhantomData;

pub struct UTerm;

pub struct UInt<U>(PhantomData<U>);

pub trait Index: 'static {
    const TAG: u8;
}

impl Index for UTerm {
    const TAG: u8 = 0;
}

impl<U: Index> Index for UInt<U> {
    const TAG: u8 = 1 + U::TAG;
}

pub type U0 = UTerm;
pub type U1 = UInt<U0>;
pub type U2 = UInt<U1>;
pub type U3 = UInt<U2>;
pub type U4 = UInt<U3>;
pub type U5 = UInt<U4>;
pub type U6 = UInt<U5>;
pub type U7 = UInt<U6>;
pub type U8 = UInt<U7>;
pub type U9 = UInt<U8>;

pub type U10 = UInt<U9>;
pub type U11 = UInt<U10>;
pub type U12 = UInt<U11>;
pub type U13 = UInt<U12>;
pub type U14 = UInt<U13>;
pub type U15 = UInt<U14>;
pub type U16 = UInt<U15>;
pub type U17 = UInt<U16>;
pub type U18 = UInt<U17>;
pub type U19 = UInt<U18>;

pub type U20 = UInt<U19>;
pub type U21 = UInt<U20>;
pub type U22 = UInt<U21>;
pub type U23 = UInt<U22>;
pub type U24 = UInt<U23>;
pub type U25 = UInt<U24>;
pub type U26 = UInt<U25>;
pub type U27 = UInt<U26>;
pub type U28 = UInt<U27>;
pub type U29 = UInt<U28>;

pub type U30 = UInt<U29>;
pub type U31 = UInt<U30>;
