/// Can a visitor move through this map tile?
///
/// Search only needs this view of a tile; any tile type which converts
/// `Into<Traversable>` can be planned over.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Traversable {
    /// Obstructed tiles cannot be moved into.
    Obstructed,
    /// Free tiles can be moved through.
    Free,
}

impl Traversable {
    #[inline]
    pub fn is_free(self) -> bool {
        self == Traversable::Free
    }
}
