//! 64-bit interleaved quadkeys.
//!
//! A quadkey packs the bits of a tile's x and y into one integer, reading
//! from the most significant end as `Y(z-1) X(z-1) Y(z-2) X(z-2) … Y0 X0`.
//! Bit `i` of x lands on bit `2i`, bit `i` of y on bit `2i + 1`.
//!
//! ```text
//! zoom 2, x = 0b10, y = 0b11
//!
//!   quadkey bits:  Y1 X1 Y0 X0
//!                   1  1  1  0   = 0b1110 = 14
//! ```
//!
//! Each pair of bits selects one quadrant, so dropping the lowest `2·dz` bits
//! of a quadkey gives the quadkey of the ancestor `dz` levels up. Sorting
//! quadkeys groups the descendants of every ancestor into one contiguous run,
//! which is what [`super::CollapsedTiles`] relies on.

/// Encodes tile `(x, y)` at `zoom` into a quadkey.
///
/// Only the lowest `zoom` bits of x and y are used; `zoom` must be at most 32.
#[inline]
pub fn encode(x: u32, y: u32, zoom: u8) -> u64 {
    let (x, y) = (x as u64, y as u64);
    let mut quadkey = 0u64;
    for z in 0..zoom as u32 {
        quadkey |= (x & (1 << z)) << z;
        quadkey |= (y & (1 << z)) << (z + 1);
    }
    quadkey
}

/// Decodes a quadkey at `zoom` back into `(x, y)`.
#[inline]
pub fn decode(quadkey: u64, zoom: u8) -> (u32, u32) {
    let mut x = 0u64;
    let mut y = 0u64;
    for z in 0..zoom as u32 {
        x |= (quadkey >> z) & (1 << z);
        y |= (quadkey >> (z + 1)) & (1 << z);
    }
    (x as u32, y as u32)
}

/// Quadkey of the ancestor `dz` levels up.
#[inline]
pub fn ancestor(quadkey: u64, dz: u8) -> u64 {
    quadkey.checked_shr(2 * dz as u32).unwrap_or(0)
}
