use bitflags::bitflags;

bitflags! {
    /// Scope of a dependency edge. `PRIVATE` and `INTERFACE` join to
    /// `PUBLIC`; the empty value means the edge does not exist.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Visibility: u8 {
        const PRIVATE = 0b01;
        const INTERFACE = 0b10;
    }
}

impl Visibility {
    pub const NONE: Self = Self::empty();
    pub const PUBLIC: Self = Self::PRIVATE.union(Self::INTERFACE);
}
