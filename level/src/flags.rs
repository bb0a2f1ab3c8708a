/// Linedef flags, as stored in `LineDef::flags` and tested with
/// `flags & LineDefFlags::X as u32`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDefFlags {
    /// Players and monsters cannot cross this line
    Blocking = 1,
    /// Monsters cannot cross this line
    BlockMonsters = 1 << 1,
    /// The linedef has a back side and the renderer treats it as a portal.
    /// Textures on either side may be "-" meaning transparent.
    TwoSided = 1 << 2,
    /// The upper texture is pasted on to the wall from the top down instead
    /// of from the bottom up
    UnpegTop = 1 << 3,
    /// Lower and middle textures are drawn from the bottom up instead of
    /// from the top down
    UnpegBottom = 1 << 4,
    /// Shown as a one sided wall on the automap
    Secret = 1 << 5,
    /// Sound rays do not cross
    BlockSound = 1 << 6,
    /// Never drawn on the automap
    DontDraw = 1 << 7,
    /// Already seen, so drawn on the automap
    Mapped = 1 << 8,
}

impl LineDefFlags {
    #[inline]
    pub const fn is_set(self, flags: u32) -> bool {
        flags & self as u32 != 0
    }
}
