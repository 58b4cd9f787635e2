//! Split raw placemarks into home-pass and termination entity lists.

use tracing::debug;

use super::classify::{Classification, ClassifierPolicy};
use crate::models::{FatEntity, GeoPoint, HpEntity};

/// Home-pass entities among `points`, in input order.
pub fn extract_hp(points: &[GeoPoint], policy: ClassifierPolicy) -> Vec<HpEntity> {
    let hps: Vec<HpEntity> = points
        .iter()
        .filter(|p| policy.classify(&p.name, &p.group_label) == Classification::Hp)
        .map(HpEntity::from_point)
        .collect();

    debug!("Extracted {} HP of {} points ({})", hps.len(), points.len(), policy);
    hps
}

/// Termination entities among `points`, in input order.
pub fn extract_fat(points: &[GeoPoint], policy: ClassifierPolicy) -> Vec<FatEntity> {
    let fats: Vec<FatEntity> = points
        .iter()
        .filter(|p| policy.classify(&p.name, &p.group_label) == Classification::Fat)
        .map(FatEntity::from_point)
        .collect();

    debug!("Extracted {} FAT of {} points ({})", fats.len(), points.len(), policy);
    fats
}
