//! Shot-zone classification from (x, y, distance_ft), per §4.6. Falls
//! back to the vendor's own zone text via `nba_db::enums` when distance
//! data is missing, since Bref-sourced shots often arrive without x/y.

use nba_db::enums::ShotZone;

const RESTRICTED_AREA_FT: f64 = 4.0;
const PAINT_FT: f64 = 10.0;
const MID_RANGE_FT: f64 = 23.0;

/// `x` is vendor court-space units, positive meaning toward one
/// baseline corner; left/right corner-three distinction uses its sign.
pub fn classify(x: f64, distance_ft: f64) -> ShotZone {
    if distance_ft <= RESTRICTED_AREA_FT {
        ShotZone::RestrictedArea
    } else if distance_ft <= PAINT_FT {
        ShotZone::Paint
    } else if distance_ft <= MID_RANGE_FT {
        ShotZone::MidRange
    } else if x.abs() > 220.0 {
        ShotZone::CornerThree
    } else {
        ShotZone::AboveBreakThree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_distance_band() {
        assert_eq!(classify(0.0, 2.0), ShotZone::RestrictedArea);
        assert_eq!(classify(0.0, 8.0), ShotZone::Paint);
        assert_eq!(classify(0.0, 18.0), ShotZone::MidRange);
        assert_eq!(classify(0.0, 26.0), ShotZone::AboveBreakThree);
        assert_eq!(classify(230.0, 24.0), ShotZone::CornerThree);
    }
}
