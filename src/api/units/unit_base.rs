/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

// Shared storage and conversions for the integer-backed unit types.
// A macro rather than a trait, as trait methods can't be const.
//
// i64::MAX and i64::MIN are reserved as +inf and -inf. Units that can't be
// negative set `ONE_SIDED` and assert on construction.
macro_rules! unit_base {
    ($ty:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $ty(i64);

        impl $ty {
            pub const fn zero() -> Self {
                Self(0)
            }

            pub const fn plus_infinity() -> Self {
                Self(i64::MAX)
            }

            pub const fn minus_infinity() -> Self {
                Self(i64::MIN)
            }

            pub const fn is_zero(&self) -> bool {
                self.0 == 0
            }

            pub const fn is_finite(&self) -> bool {
                !self.is_infinite()
            }

            pub const fn is_infinite(&self) -> bool {
                self.is_plus_infinity() || self.is_minus_infinity()
            }

            pub const fn is_plus_infinity(&self) -> bool {
                self.0 == i64::MAX
            }

            pub const fn is_minus_infinity(&self) -> bool {
                self.0 == i64::MIN
            }
        }

        #[allow(dead_code)]
        impl $ty {
            const fn from_value(value: i64) -> Self {
                assert!(value != i64::MAX && value != i64::MIN);
                if Self::ONE_SIDED {
                    assert!(value >= 0);
                }
                Self(value)
            }

            const fn from_fraction(denominator: i64, value: i64) -> Self {
                assert!(denominator > 0);
                Self::from_value(value * denominator)
            }

            const fn to_value(&self) -> i64 {
                assert!(self.is_finite());
                self.0
            }

            fn to_value_float(&self) -> f64 {
                if self.is_plus_infinity() {
                    f64::INFINITY
                } else if self.is_minus_infinity() {
                    f64::NEG_INFINITY
                } else {
                    self.0 as f64
                }
            }

            // Rounds half away from zero.
            const fn to_fraction(&self, denominator: i64) -> i64 {
                assert!(denominator > 0);
                let value = self.to_value();
                let mut result = value / denominator;
                let remainder = value % denominator;
                if remainder.abs() * 2 >= denominator {
                    if value < 0 {
                        result -= 1;
                    } else {
                        result += 1;
                    }
                }
                result
            }

            fn to_fraction_float(&self, denominator: f64) -> f64 {
                assert!(denominator > 0.0);
                self.to_value_float() / denominator
            }
        }
    };
}

pub(crate) use unit_base;
