use serde::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn new(x: u8, y: u8) -> Self {
        Location {
            packed: ((x as u16) << 8) | y as u16,
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Squared Euclidean distance to an unchecked coordinate pair.
    /// Weapon ranges are circle tests against squared distance, so the
    /// square root is never taken.
    pub fn dist_sq_to_xy(self, x: i32, y: i32) -> u32 {
        let dx = self.x() as i32 - x;
        let dy = self.y() as i32 - y;

        (dx * dx + dy * dy) as u32
    }

    pub fn dist_sq(self, other: Self) -> u32 {
        self.dist_sq_to_xy(other.x() as i32, other.y() as i32)
    }

    /// Signed offset coordinates, possibly out of map bounds.
    pub fn offset(self, dx: i32, dy: i32) -> (i32, i32) {
        (self.x() as i32 + dx, self.y() as i32 + dy)
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Location::from_packed)
    }
}
