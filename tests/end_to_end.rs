use std::io::{Cursor, Write};

use hp_takeout::export::{read_csv, to_csv_string};
use hp_takeout::kml::points_from_bytes;
use hp_takeout::{reconcile, ClassifierPolicy, GeoPoint, ReconcileConfig, Session};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const SURVEY_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <Folder><name>CLUSTER MELATI</name>
    <Folder><name>HP</name>
      <Placemark><name>HP-001</name><Point><coordinates>106.80000,-6.20000,0</coordinates></Point></Placemark>
      <Placemark><name>HP-002</name><Point><coordinates>106.80050,-6.20000,0</coordinates></Point></Placemark>
      <Placemark><name>HP-003</name><Point><coordinates>106.81000,-6.21000,0</coordinates></Point></Placemark>
      <Placemark><name>HP-004</name><Point><coordinates>106.82000,-6.22000,0</coordinates></Point></Placemark>
      <Placemark><name>HP-005</name><Point><coordinates>bad</coordinates></Point></Placemark>
    </Folder>
    <Folder><name>POLE</name>
      <Placemark><name>P-01</name><Point><coordinates>106.80010,-6.20010,0</coordinates></Point></Placemark>
    </Folder>
  </Folder>
</Document></kml>"#;

const DESIGN_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <Folder><name>CLUSTER MELATI</name>
    <Folder><name>HOME-BIZ</name>
      <Placemark><name>HP-001</name><Point><coordinates>106.90000,-6.30000,0</coordinates></Point></Placemark>
      <Placemark><name>HP-0X</name><Point><coordinates>106.81002,-6.21000,0</coordinates></Point></Placemark>
    </Folder>
    <Folder><name>FAT</name>
      <Placemark><name>FAT-A</name><Point><coordinates>106.82010,-6.22000,0</coordinates></Point></Placemark>
      <Placemark><name>FAT-B</name><Point><coordinates>106.80050,-6.20100,0</coordinates></Point></Placemark>
    </Folder>
  </Folder>
</Document></kml>"#;

fn kmz(kml: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("doc.kml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(kml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn config(radius_meters: f64) -> ReconcileConfig {
    ReconcileConfig {
        radius_meters,
        ..ReconcileConfig::default()
    }
}

#[test]
fn test_kmz_survey_against_kml_design() {
    let survey = points_from_bytes(&kmz(SURVEY_KML), "survey.kmz").unwrap();
    let design = points_from_bytes(DESIGN_KML.as_bytes(), "design.kml").unwrap();

    // HP-005 has no usable coordinates
    assert_eq!(survey.len(), 5);

    let result = reconcile(&survey, &design, &config(5.0));
    let stats = result.stats;

    assert_eq!(stats.survey_hp_count, 4);
    assert_eq!(stats.design_hp_count, 2);
    assert_eq!(stats.fat_count, 2);
    // HP-001 by id although ~15 km away, HP-003 within ~2 m of HP-0X
    assert_eq!(stats.matched_by_id_count, 1);
    assert_eq!(stats.matched_by_distance_count, 1);
    assert_eq!(stats.takeout_count, 2);

    let ids: Vec<&str> = result.rows.iter().map(|r| r.hp_id.as_str()).collect();
    assert_eq!(ids, vec!["HP-002", "HP-004"]);

    assert_eq!(result.rows[0].nearest_fat_id.as_deref(), Some("FAT-B"));
    assert_eq!(result.rows[1].nearest_fat_id.as_deref(), Some("FAT-A"));
    assert_eq!(result.rows[0].group_label, "CLUSTER MELATI/HP");
}

#[test]
fn test_zero_radius_only_matches_ids() {
    let survey = points_from_bytes(SURVEY_KML.as_bytes(), "survey.kml").unwrap();
    let design = points_from_bytes(DESIGN_KML.as_bytes(), "design.kml").unwrap();

    let result = reconcile(&survey, &design, &config(0.0));
    assert_eq!(result.stats.matched_by_id_count, 1);
    assert_eq!(result.stats.matched_by_distance_count, 0);
    assert_eq!(result.stats.takeout_count, 3);
}

#[test]
fn test_export_round_trip() {
    let survey = vec![
        GeoPoint::new("HP001", -6.2, 106.8, "AREA/HOME"),
        GeoPoint::new("", -6.123456789, 106.987654321, "AREA/HOME"),
    ];
    let design = vec![GeoPoint::new("FAT01", -6.2001, 106.8001, "AREA/FAT")];

    let result = reconcile(&survey, &design, &config(0.0));
    let csv = to_csv_string(&result.rows).unwrap();
    let back = read_csv(csv.as_bytes()).unwrap();

    assert_eq!(back.len(), result.rows.len());
    for (orig, parsed) in result.rows.iter().zip(&back) {
        assert_eq!(parsed.hp_id, orig.hp_id);
        assert_eq!(parsed.lat, orig.lat);
        assert_eq!(parsed.lon, orig.lon);
        assert_eq!(parsed.reason, orig.reason);
        let (a, b) = (
            parsed.distance_to_fat_m.unwrap(),
            orig.distance_to_fat_m.unwrap(),
        );
        assert!((a - b).abs() <= 0.005);
    }
    assert_eq!(back[1].hp_id, "(NO_NAME)");
}

#[test]
fn test_name_blacklist_policy_end_to_end() {
    let survey = vec![
        GeoPoint::new("12A", -6.2, 106.8, ""),
        GeoPoint::new("TIANG 3", -6.2, 106.8, "AREA/HP"),
        GeoPoint::new("HOMEPASS 9", -6.3, 106.9, ""),
    ];
    let design = vec![
        GeoPoint::new("HOMEPASS 9", -6.3, 106.9, ""),
        GeoPoint::new("FAT 1", -6.2, 106.8, ""),
    ];
    let cfg = ReconcileConfig {
        policy: ClassifierPolicy::NameBlacklist,
        ..ReconcileConfig::default()
    };

    let result = reconcile(&survey, &design, &cfg);
    assert_eq!(result.stats.survey_hp_count, 2);
    assert_eq!(result.stats.matched_by_id_count, 1);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].hp_id, "12A");
    assert_eq!(result.rows[0].nearest_fat_id.as_deref(), Some("FAT 1"));
    assert_eq!(result.rows[0].distance_to_fat_m, Some(0.0));
}

#[tokio::test]
async fn test_session_over_kmz_files() {
    let dir = tempfile::tempdir().unwrap();
    let survey = dir.path().join("survey.kmz");
    let design = dir.path().join("design.KMZ");
    std::fs::write(&survey, kmz(SURVEY_KML)).unwrap();
    std::fs::write(&design, kmz(DESIGN_KML)).unwrap();

    let mut session = Session::new();
    let result = session
        .run(Some(survey.as_path()), Some(design.as_path()), &config(5.0))
        .await
        .unwrap();
    assert_eq!(result.stats.takeout_count, 2);

    let mut out = Vec::new();
    session.export_csv(&mut out).unwrap();
    let rows = read_csv(out.as_slice()).unwrap();
    assert_eq!(rows.len(), 2);
}
