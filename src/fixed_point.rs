//! Fixed-point arithmetic and table-driven trigonometry.
//!
//! Three scales are used throughout the shape code:
//! - [`Q5`]: 5 fractional bits, the vertex format fed to the rasterizer
//! - [`Q10`]: product of two `Q5` values
//! - [`Q15`]: product of a `Q10` and a `Q5`, also the scale of the sine
//!   table (`0x8000` is 1.0)
//!
//! Angles are in whole degrees (or `Q5` degrees), with 0 pointing up and
//! angles growing clockwise, which is the orientation used by circles and
//! arcs.

use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::basics::{POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

const ONE: i32 = POLY_SUBPIXEL_SCALE as i32;

// ============================================================================
// Q5
// ============================================================================

/// Signed fixed-point value with 5 fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Q5(pub i32);

impl Q5 {
    pub const ZERO: Q5 = Q5(0);

    /// Convert a whole number.
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Q5(v * ONE)
    }

    /// Convert a float, truncating toward zero.
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Q5((v * ONE as f32) as i32)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, truncated toward zero.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 / ONE
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE as f32
    }

    /// Smallest whole number not below this value (for positive values).
    pub const fn ceil(self) -> i32 {
        if self.0 < 0 {
            self.to_int()
        } else {
            (self.0 + ONE - 1) / ONE
        }
    }

    /// Round half away from zero.
    pub const fn round(self) -> i32 {
        if self.0 < 0 {
            Q5(self.0 + 1 - ONE / 2).to_int()
        } else {
            Q5(self.0 + ONE / 2).to_int()
        }
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Q5(self.0.abs())
    }
}

impl Neg for Q5 {
    type Output = Q5;
    #[inline]
    fn neg(self) -> Q5 {
        Q5(-self.0)
    }
}

impl Add for Q5 {
    type Output = Q5;
    #[inline]
    fn add(self, rhs: Q5) -> Q5 {
        Q5(self.0 + rhs.0)
    }
}

impl Sub for Q5 {
    type Output = Q5;
    #[inline]
    fn sub(self, rhs: Q5) -> Q5 {
        Q5(self.0 - rhs.0)
    }
}

impl Mul for Q5 {
    type Output = Q10;
    #[inline]
    fn mul(self, rhs: Q5) -> Q10 {
        Q10(self.0 * rhs.0)
    }
}

impl Mul<Q15> for Q5 {
    type Output = Q5;
    #[inline]
    fn mul(self, rhs: Q15) -> Q5 {
        Q5(muldiv(self.0, rhs.0, ONE * ONE * ONE).0)
    }
}

impl Mul<i32> for Q5 {
    type Output = Q5;
    #[inline]
    fn mul(self, rhs: i32) -> Q5 {
        Q5(self.0 * rhs)
    }
}

impl Div<i32> for Q5 {
    type Output = Q5;
    #[inline]
    fn div(self, rhs: i32) -> Q5 {
        Q5(self.0 / rhs)
    }
}

impl Div for Q5 {
    type Output = Q5;
    #[inline]
    fn div(self, rhs: Q5) -> Q5 {
        Q5(self.0 * ONE / rhs.0)
    }
}

impl From<Q10> for Q5 {
    #[inline]
    fn from(q: Q10) -> Q5 {
        Q5(q.0 / ONE)
    }
}

// ============================================================================
// Q10
// ============================================================================

/// Signed fixed-point value with 10 fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Q10(pub i32);

impl Q10 {
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Q10(v * ONE * ONE)
    }

    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 / (ONE * ONE)
    }
}

impl Neg for Q10 {
    type Output = Q10;
    #[inline]
    fn neg(self) -> Q10 {
        Q10(-self.0)
    }
}

impl Add for Q10 {
    type Output = Q10;
    #[inline]
    fn add(self, rhs: Q10) -> Q10 {
        Q10(self.0 + rhs.0)
    }
}

impl Mul<Q5> for Q10 {
    type Output = Q15;
    #[inline]
    fn mul(self, rhs: Q5) -> Q15 {
        Q15(self.0 * rhs.0)
    }
}

impl Div<Q5> for Q10 {
    type Output = Q5;
    #[inline]
    fn div(self, rhs: Q5) -> Q5 {
        Q5(self.0 / rhs.0)
    }
}

// ============================================================================
// Q15
// ============================================================================

/// Signed fixed-point value with 15 fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Q15(pub i32);

impl Q15 {
    pub const ONE: Q15 = Q15(1 << 15);
}

impl Neg for Q15 {
    type Output = Q15;
    #[inline]
    fn neg(self) -> Q15 {
        Q15(-self.0)
    }
}

impl Add for Q15 {
    type Output = Q15;
    #[inline]
    fn add(self, rhs: Q15) -> Q15 {
        Q15(self.0 + rhs.0)
    }
}

impl Sub for Q15 {
    type Output = Q15;
    #[inline]
    fn sub(self, rhs: Q15) -> Q15 {
        Q15(self.0 - rhs.0)
    }
}

impl Div<Q5> for Q15 {
    type Output = Q10;
    #[inline]
    fn div(self, rhs: Q5) -> Q10 {
        Q10(self.0 / rhs.0)
    }
}

// ============================================================================
// Integer helpers
// ============================================================================

/// `(a * b) / divisor` computed in 64 bits, truncated toward zero.
/// Returns the quotient and the remainder.
#[inline]
pub fn muldiv(a: i32, b: i32, divisor: i32) -> (i32, i32) {
    let p = a as i64 * b as i64;
    ((p / divisor as i64) as i32, (p % divisor as i64) as i32)
}

/// Integer square root, truncated.
pub fn isqrt(mut n: u32) -> u32 {
    let mut root = 0u32;
    let mut bit: u32 = if n >= 0x10000 { 1 << 30 } else { 1 << 14 };
    while bit != 0 {
        let trial = root + bit;
        if n >= trial {
            n -= trial;
            root = trial + bit;
        }
        root >>= 1;
        bit >>= 2;
    }
    root
}

/// Square root of a `Q10`, yielding a `Q5`.
#[inline]
pub fn sqrt_q10(value: Q10) -> Q5 {
    Q5(isqrt(value.0.max(0) as u32) as i32)
}

/// `factor1 * factor2 / divisor`, all in `Q5`.
#[inline]
pub fn muldiv_q5(factor1: Q5, factor2: Q5, divisor: Q5) -> Q5 {
    Q5(muldiv(factor1.0, factor2.0, divisor.0).0)
}

/// `factor1 * factor2 / divisor` on plain integers, keeping the fraction of
/// the quotient as a `Q5`.
pub fn muldiv_to_q5(factor1: i32, factor2: i32, divisor: i32) -> Q5 {
    let (result, remainder) = muldiv(factor1, factor2, divisor);
    // The remainder carries the sign of the quotient.
    Q5::from_int(result) + muldiv_q5(Q5(ONE), Q5(remainder), Q5(divisor))
}

/// Product of two `Q5` values.
#[inline]
pub fn mul_q5(factor1: Q5, factor2: Q5) -> Q5 {
    muldiv_q5(factor1, factor2, Q5::from_int(1))
}

// ============================================================================
// Trigonometry
// ============================================================================

/// `sin(i)` for `i` in 0..=90 degrees, `Q15`.
const SINE_TABLE: [u16; 91] = [
    0x0000, 0x023C, 0x0478, 0x06B3, 0x08EE, 0x0B28, 0x0D61, 0x0F99, 0x11D0, 0x1406, 0x163A,
    0x186C, 0x1A9D, 0x1CCB, 0x1EF7, 0x2121, 0x2348, 0x256C, 0x278E, 0x29AC, 0x2BC7, 0x2DDF,
    0x2FF3, 0x3203, 0x3410, 0x3618, 0x381D, 0x3A1C, 0x3C18, 0x3E0E, 0x4000, 0x41ED, 0x43D4,
    0x45B7, 0x4794, 0x496B, 0x4B3D, 0x4D08, 0x4ECE, 0x508E, 0x5247, 0x53FA, 0x55A6, 0x574C,
    0x58EB, 0x5A82, 0x5C13, 0x5D9D, 0x5F1F, 0x609A, 0x620E, 0x637A, 0x64DE, 0x663A, 0x678E,
    0x68DA, 0x6A1E, 0x6B5A, 0x6C8D, 0x6DB8, 0x6EDA, 0x6FF4, 0x7104, 0x720D, 0x730C, 0x7402,
    0x74EF, 0x75D3, 0x76AE, 0x7780, 0x7848, 0x7907, 0x79BC, 0x7A68, 0x7B0B, 0x7BA3, 0x7C33,
    0x7CB8, 0x7D34, 0x7DA6, 0x7E0E, 0x7E6D, 0x7EC1, 0x7F0C, 0x7F4C, 0x7F83, 0x7FB0, 0x7FD3,
    0x7FEC, 0x7FFB, 0x8000,
];

/// `asin(q7 / 128)` in degrees, indexed by a `Q7` ratio in 0..=90.
const ARCSINE_TABLE: [u8; 91] = [
    0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 9, 10, 10, 11, 11, 12, 12,
    13, 13, 14, 14, 14, 15, 15, 16, 16, 17, 17, 18, 18, 19, 19, 20, 20, 21, 21, 22, 22, 23, 23,
    23, 24, 24, 25, 25, 26, 26, 27, 27, 28, 28, 29, 29, 30, 31, 31, 32, 32, 33, 33, 34, 34, 35,
    35, 36, 36, 37, 38, 38, 39, 39, 40, 40, 41, 42, 42, 43, 43, 44, 45,
];

/// Sine of a whole-degree angle.
pub fn sine(deg: i32) -> Q15 {
    let i = deg.rem_euclid(360);
    let v = if i <= 90 {
        SINE_TABLE[i as usize] as i32
    } else if i <= 180 {
        SINE_TABLE[(180 - i) as usize] as i32
    } else if i <= 270 {
        -(SINE_TABLE[(i - 180) as usize] as i32)
    } else {
        -(SINE_TABLE[(360 - i) as usize] as i32)
    };
    Q15(v)
}

/// Sine of a `Q5` angle, linearly interpolated between whole degrees.
pub fn sine_q5(deg: Q5) -> Q15 {
    let i = deg.0.rem_euclid(Q5::from_int(360).0);
    let whole = i >> POLY_SUBPIXEL_SHIFT;
    let fraction = i & (ONE - 1);
    let low = sine(whole);
    if fraction == 0 {
        return low;
    }
    let high = sine(whole + 1);
    Q15(muldiv((high - low).0, fraction, ONE).0) + low
}

/// Cosine of a whole-degree angle.
#[inline]
pub fn cosine(deg: i32) -> Q15 {
    sine(90 - deg)
}

/// Cosine of a `Q5` angle.
#[inline]
pub fn cosine_q5(deg: Q5) -> Q15 {
    sine_q5(Q5::from_int(90) - deg)
}

/// Arcsine in whole degrees of a `Q10` ratio in `-1.0..=1.0`.
/// Out-of-range input yields 0.
pub fn arcsine(q10: Q10) -> i32 {
    if q10.0 < 0 {
        return -arcsine(-q10);
    }
    if q10 > Q10::from_int(1) {
        return 0;
    }
    // Beyond ~45 degrees the table loses precision; mirror via cos.
    if q10.0 > 724 {
        let rest = (1i32 << (POLY_SUBPIXEL_SHIFT * 4)) - q10.0 * q10.0;
        return 90 - arcsine(Q10(isqrt(rest as u32) as i32));
    }
    let q7 = (q10.0 + 3) >> 3;
    ARCSINE_TABLE[q7 as usize] as i32
}

/// Angle in degrees of the vector `(x, y)` together with its length.
///
/// 0 degrees points up (negative y) and angles grow clockwise, so `(1, 0)`
/// is 90 and `(0, 1)` is 180.
pub fn angle(x: Q5, y: Q5) -> (i32, Q5) {
    if x.0 >= 0 {
        if y.0 >= 0 {
            let (a, d) = first_quadrant_angle(x, y);
            (90 + a, d)
        } else {
            let (a, d) = first_quadrant_angle(x, -y);
            (90 - a, d)
        }
    } else if y.0 >= 0 {
        let (a, d) = first_quadrant_angle(-x, y);
        (270 - a, d)
    } else {
        let (a, d) = first_quadrant_angle(-x, -y);
        (270 + a, d)
    }
}

fn first_quadrant_angle(x: Q5, y: Q5) -> (i32, Q5) {
    debug_assert!(x.0 >= 0 && y.0 >= 0);
    if x < y {
        let (a, d) = first_quadrant_angle(y, x);
        return (90 - a, d);
    }
    let d = sqrt_q10(x * x + y * y);
    if d.0 == 0 {
        return (0, d);
    }
    let one = Q5::from_int(1);
    let dy = Q10(muldiv(y.0, (one * one).0, d.0).0);
    (arcsine(dy), d)
}

// ============================================================================
// Tests
// ============================================================================
