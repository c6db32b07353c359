//! Discrete keys with well-defined neighbours.
//!
//! The interval store places repaired boundary markers one step away from a
//! cut point, so its keys must know their immediate predecessor and successor.

use std::fmt::Debug;

/// An ordered key type that can step to its neighbours.
///
/// Both methods return `None` at the limits of the domain instead of wrapping.
pub trait StepKey: Ord + Clone + Debug {
    /// The key immediately before this one.
    fn predecessor(&self) -> Option<Self>;

    /// The key immediately after this one.
    fn successor(&self) -> Option<Self>;
}

macro_rules! impl_step_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StepKey for $ty {
                #[inline]
                fn predecessor(&self) -> Option<Self> {
                    self.checked_sub(1)
                }

                #[inline]
                fn successor(&self) -> Option<Self> {
                    self.checked_add(1)
                }
            }
        )*
    };
}

impl_step_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
