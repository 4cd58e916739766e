use glam::{ivec2, IVec2};

/// 4 directions, clock face order.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 0]),
];

pub trait VecExt: Sized + Default {
    /// Absolute size of vector in taxicab metric.
    fn taxi_len(&self) -> i32;

    /// Absolute size of vector in chessboard metric.
    fn chess_len(&self) -> i32;

    /// Euclidean length.
    fn euclid_len(&self) -> f32;

    /// Vec points to an adjacent cell, left, right, up or down.
    fn is_adjacent(&self) -> bool {
        self.taxi_len() == 1
    }

    /// Vec points to any of the eight surrounding cells.
    fn is_adjacent_8(&self) -> bool {
        self.chess_len() == 1
    }
}

impl VecExt for IVec2 {
    fn taxi_len(&self) -> i32 {
        self[0].abs() + self[1].abs()
    }

    fn chess_len(&self) -> i32 {
        self[0].abs().max(self[1].abs())
    }

    fn euclid_len(&self) -> f32 {
        self.as_vec2().length()
    }
}

/// Largest coordinate value that fits in a packed position key.
pub const MAX_PACKED_COORD: i32 = 0xffff;

/// Pack a non-negative grid position into a single integer key.
///
/// Both coordinates must be in `0..=MAX_PACKED_COORD`.
pub fn pack(p: IVec2) -> u32 {
    debug_assert!(
        (0..=MAX_PACKED_COORD).contains(&p.x)
            && (0..=MAX_PACKED_COORD).contains(&p.y),
        "pack: {p} out of range"
    );
    ((p.x as u32) << 16) | (p.y as u32 & 0xffff)
}

pub fn unpack(key: u32) -> IVec2 {
    ivec2((key >> 16) as i32, (key & 0xffff) as i32)
}
