//! Nearest termination point lookup for takeout home-passes.

use serde::{Deserialize, Serialize};

use super::distance::distance_m;
use crate::models::{FatEntity, Located};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestFat {
    pub fat_id: String,
    pub distance_m: f64,
}

/// Closest FAT to `from`, scanning the whole list.
///
/// On equal distances the first FAT in `fats` wins. Returns `None` for an
/// empty list.
pub fn nearest_fat<L: Located + ?Sized>(from: &L, fats: &[FatEntity]) -> Option<NearestFat> {
    let mut best: Option<(&FatEntity, f64)> = None;

    for fat in fats {
        let d = distance_m(from, fat);
        let closer = match best {
            Some((_, best_d)) => d < best_d,
            None => true,
        };
        if closer {
            best = Some((fat, d));
        }
    }

    best.map(|(fat, d)| NearestFat {
        fat_id: fat.fat_id.clone(),
        distance_m: d,
    })
}
