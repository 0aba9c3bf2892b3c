/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

// A unit whose values can be added together, such as a duration or a size.
// Timestamps are not relative units: only their difference is.
macro_rules! relative_unit {
    ($ty:ident) => {
        crate::api::units::unit_base!($ty);

        impl $ty {
            /// Adds two finite values, returning `None` when either side is
            /// infinite or the result does not fit in a finite value.
            pub fn checked_add(self, rhs: Self) -> Option<Self> {
                if !self.is_finite() || !rhs.is_finite() {
                    return None;
                }
                self.0
                    .checked_add(rhs.0)
                    .filter(|value| *value != i64::MAX && *value != i64::MIN)
                    .map(Self)
            }

            /// Sums finite values. An empty sequence sums to zero.
            pub fn checked_sum<I: IntoIterator<Item = Self>>(values: I) -> Option<Self> {
                values.into_iter().try_fold(Self::zero(), Self::checked_add)
            }
        }

        impl ::std::ops::Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                if self.is_plus_infinity() || rhs.is_plus_infinity() {
                    assert!(!self.is_minus_infinity());
                    assert!(!rhs.is_minus_infinity());
                    return Self::plus_infinity();
                } else if self.is_minus_infinity() || rhs.is_minus_infinity() {
                    return Self::minus_infinity();
                }
                Self::from_value(self.0 + rhs.0)
            }
        }

        impl ::std::ops::Sub for $ty {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                if self.is_plus_infinity() || rhs.is_minus_infinity() {
                    assert!(!self.is_minus_infinity());
                    assert!(!rhs.is_plus_infinity());
                    return Self::plus_infinity();
                } else if self.is_minus_infinity() || rhs.is_plus_infinity() {
                    return Self::minus_infinity();
                }
                Self::from_value(self.0 - rhs.0)
            }
        }

        // Integer division truncates towards zero.
        impl ::std::ops::Div<i64> for $ty {
            type Output = Self;

            fn div(self, rhs: i64) -> Self::Output {
                Self::from_value(self.to_value() / rhs)
            }
        }
    };
}

pub(crate) use relative_unit;
