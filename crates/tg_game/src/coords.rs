//! Pixel <-> tile coordinate conversion.
//!
//! Tiles are 64×64 pixels. Conversion uses an arithmetic shift so negative
//! pixel positions floor toward negative infinity (-1 px is tile -1, not 0).

pub const TILE_SIZE: i32 = 64;
pub const TILE_SIZE_BITS: u32 = 6;

/// Tile index containing the pixel `pixels`.
pub fn pixels_to_tiles(pixels: i32) -> i32 {
    pixels >> TILE_SIZE_BITS
}

/// Tile index containing a fractional pixel position, rounded to the nearest
/// pixel first.
pub fn pixels_to_tiles_f(pixels: f32) -> i32 {
    pixels_to_tiles(round_px(pixels))
}

/// Pixel position of the top/left edge of tile `tiles`.
pub fn tiles_to_pixels(tiles: i32) -> i32 {
    tiles << TILE_SIZE_BITS
}

/// Round half up (toward positive infinity), so -0.5 rounds to 0 rather than
/// -1. Sprite positions and bounding boxes all snap through this.
pub fn round_px(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_size_matches_shift() {
        assert_eq!(1 << TILE_SIZE_BITS, TILE_SIZE);
    }

    #[test]
    fn round_trip_tiles_to_pixels() {
        for t in -200..200 {
            assert_eq!(pixels_to_tiles(tiles_to_pixels(t)), t);
        }
    }

    #[test]
    fn every_pixel_lies_inside_its_tile() {
        for p in -1000..1000 {
            let t = pixels_to_tiles(p);
            assert!(tiles_to_pixels(t) <= p);
            assert!(p < tiles_to_pixels(t + 1));
        }
    }

    #[test]
    fn negative_pixels_floor() {
        assert_eq!(pixels_to_tiles(-1), -1);
        assert_eq!(pixels_to_tiles(-64), -1);
        assert_eq!(pixels_to_tiles(-65), -2);
        assert_eq!(pixels_to_tiles(63), 0);
        assert_eq!(pixels_to_tiles(64), 1);
    }

    #[test]
    fn fractional_pixels_round_before_shift() {
        assert_eq!(pixels_to_tiles_f(63.4), 0);
        assert_eq!(pixels_to_tiles_f(63.5), 1);
        assert_eq!(pixels_to_tiles_f(-0.5), 0);
        assert_eq!(pixels_to_tiles_f(-0.6), -1);
    }

    #[test]
    fn round_px_is_half_up() {
        assert_eq!(round_px(2.5), 3);
        assert_eq!(round_px(-2.5), -2);
        assert_eq!(round_px(-2.6), -3);
    }
}
