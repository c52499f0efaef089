/// Z-Order (Morton) space-filling curve codec.
///
/// Interleaves two 16-bit coordinates into a single 32-bit code that
/// approximately preserves spatial locality: points close in 2D tend to get
/// close codes. Sorting particles by code keeps spatial neighbors adjacent
/// in memory, which pays off in the cache-sensitive pair pass.
pub struct ZOrder;

impl ZOrder {
    /// Spreads the low 16 bits of `n` so that bit `i` lands at bit `2i`.
    #[inline]
    pub fn interleave(n: u32) -> u32 {
        let n = (n | (n << 8)) & 0x00FF_00FF;
        let n = (n | (n << 4)) & 0x0F0F_0F0F;
        let n = (n | (n << 2)) & 0x3333_3333;
        (n | (n << 1)) & 0x5555_5555
    }

    /// Inverse of [`ZOrder::interleave`]: compacts the even bit positions
    /// of `n` back into the low 16 bits.
    #[inline]
    pub fn deinterleave(n: u32) -> u32 {
        let n = n & 0x5555_5555;
        let n = (n | (n >> 1)) & 0x3333_3333;
        let n = (n | (n >> 2)) & 0x0F0F_0F0F;
        let n = (n | (n >> 4)) & 0x00FF_00FF;
        (n | (n >> 8)) & 0x0000_FFFF
    }

    /// Encodes `(x, y)` into a Z-order code, `x` on the even bit positions
    /// and `y` on the odd ones.
    ///
    /// Precondition: `x <= 0xFFFF` and `y <= 0xFFFF`. Out-of-range input
    /// yields a well-defined but meaningless bit pattern; this is a raw bit
    /// transform, not a bounds-checked API.
    #[inline]
    pub fn encode(x: u32, y: u32) -> u32 {
        debug_assert!(x <= 0xFFFF, "x exceeds 16-bit range");
        debug_assert!(y <= 0xFFFF, "y exceeds 16-bit range");
        Self::interleave(x) | (Self::interleave(y) << 1)
    }

    /// Decodes a Z-order code back into `(x, y)`.
    #[inline]
    pub fn decode(code: u32) -> (u32, u32) {
        (Self::deinterleave(code), Self::deinterleave(code >> 1))
    }

    /// Maps a position inside `[0, width) x [0, height)` onto the full
    /// 16-bit-per-axis code space. Positions outside the box clamp to its
    /// edge rather than wrapping.
    #[inline]
    pub fn normalized(x: f32, y: f32, width: f32, height: f32) -> u32 {
        let gx = ((x / width).clamp(0.0, 1.0) * f32::from(u16::MAX)) as u32;
        let gy = ((y / height).clamp(0.0, 1.0) * f32::from(u16::MAX)) as u32;
        Self::encode(gx, gy)
    }
}
