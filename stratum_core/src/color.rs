// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed 32-bit colors.

use core::fmt;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A non-premultiplied color packed as `0xAARRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Creates a color from its four channels.
    #[inline]
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Alpha channel.
    #[inline]
    #[must_use]
    pub const fn a(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Red channel.
    #[inline]
    #[must_use]
    pub const fn r(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    /// Green channel.
    #[inline]
    #[must_use]
    pub const fn g(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    /// Blue channel.
    #[inline]
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0.to_be_bytes()[3]
    }

    /// Interpolates between `from` and `to` in premultiplied-alpha space.
    ///
    /// `t` is clamped to `[0, 1]`. A result with zero alpha is
    /// [`TRANSPARENT`](Self::TRANSPARENT).
    #[must_use]
    pub fn mix_premultiplied(from: Self, to: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let fa = f64::from(from.a()) / 255.0;
        let ta = f64::from(to.a()) / 255.0;
        let a = fa + (ta - fa) * t;
        if a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let channel = |f: u8, e: u8| -> u8 {
            let pf = f64::from(f) * fa;
            let pe = f64::from(e) * ta;
            to_byte((pf + (pe - pf) * t) / a)
        };
        Self::from_argb(
            to_byte(a * 255.0),
            channel(from.r(), to.r()),
            channel(from.g(), to.g()),
            channel(from.b(), to.b()),
        )
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is rounded and clamped to the u8 range first"
)]
fn to_byte(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08x})", self.0)
    }
}

impl From<u32> for Color {
    #[inline]
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}
