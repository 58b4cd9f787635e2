//! Streaming KML parser for point placemarks.

use quick_xml::errors::IllFormedError;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::models::GeoPoint;

/// Where character data inside the current element goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    FolderName,
    PlacemarkName,
    Coordinates,
}

#[derive(Debug, Default)]
struct PlacemarkState {
    name: String,
    coordinates: Option<String>,
    in_point: bool,
}

/// Parse every point placemark in a KML document.
///
/// The group label of a point is the chain of enclosing `Folder` names,
/// outermost first, joined with `/`. Placemarks without a `Point` or whose
/// coordinates do not parse to finite numbers are skipped. A document that
/// ends with elements still open is an error.
pub fn parse(kml: &str) -> Result<Vec<GeoPoint>, quick_xml::Error> {
    let mut reader = Reader::from_str(kml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut points = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut folders: Vec<Option<String>> = Vec::new();
    let mut placemark: Option<PlacemarkState> = None;
    let mut target: Option<TextTarget> = None;
    let mut text = String::new();
    let mut skipped = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.local_name().as_ref().to_vec();
                let parent = stack.last().map(Vec::as_slice);

                match name.as_slice() {
                    b"Folder" => folders.push(None),
                    b"Placemark" => placemark = Some(PlacemarkState::default()),
                    b"Point" => {
                        if let Some(pm) = placemark.as_mut() {
                            pm.in_point = true;
                        }
                    }
                    b"name" if parent == Some(b"Folder".as_slice()) => {
                        target = Some(TextTarget::FolderName);
                        text.clear();
                    }
                    b"name" if parent == Some(b"Placemark".as_slice()) => {
                        target = Some(TextTarget::PlacemarkName);
                        text.clear();
                    }
                    b"coordinates" => {
                        let wanted = placemark
                            .as_ref()
                            .is_some_and(|pm| pm.in_point && pm.coordinates.is_none());
                        if wanted {
                            target = Some(TextTarget::Coordinates);
                            text.clear();
                        }
                    }
                    _ => {}
                }

                stack.push(name);
            }
            Event::End(ref e) => {
                stack.pop();

                match e.local_name().as_ref() {
                    b"Folder" => {
                        folders.pop();
                    }
                    b"Point" => {
                        if let Some(pm) = placemark.as_mut() {
                            pm.in_point = false;
                        }
                    }
                    b"Placemark" => {
                        if let Some(pm) = placemark.take() {
                            match point_from_placemark(pm, &folders) {
                                Some(p) => points.push(p),
                                None => skipped += 1,
                            }
                        }
                    }
                    b"name" | b"coordinates" => {
                        if let Some(t) = target.take() {
                            commit_text(t, text.trim(), &mut folders, placemark.as_mut());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) if target.is_some() => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::CData(ref e) if target.is_some() => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::GeneralRef(ref e) if target.is_some() => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(c) => text.push(c),
                    None => {
                        text.push('&');
                        text.push_str(&entity);
                        text.push(';');
                    }
                }
            }
            Event::Eof => {
                // A document cut off between tags still has open elements
                if let Some(open) = stack.last() {
                    let open = String::from_utf8_lossy(open).into_owned();
                    return Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(open)));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    debug!(
        "Parsed {} point placemarks ({} placemarks skipped)",
        points.len(),
        skipped
    );

    Ok(points)
}

fn commit_text(
    target: TextTarget,
    value: &str,
    folders: &mut [Option<String>],
    placemark: Option<&mut PlacemarkState>,
) {
    match target {
        TextTarget::FolderName => {
            if let Some(slot) = folders.last_mut() {
                if !value.is_empty() {
                    *slot = Some(value.to_string());
                }
            }
        }
        TextTarget::PlacemarkName => {
            if let Some(pm) = placemark {
                pm.name = value.to_string();
            }
        }
        TextTarget::Coordinates => {
            if let Some(pm) = placemark {
                pm.coordinates = Some(value.to_string());
            }
        }
    }
}

fn point_from_placemark(pm: PlacemarkState, folders: &[Option<String>]) -> Option<GeoPoint> {
    let (lat, lon) = parse_coordinates(pm.coordinates.as_deref()?)?;
    let group_label = folders
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/");

    Some(GeoPoint::new(pm.name, lat, lon, group_label))
}

/// Parse the first `lon,lat[,alt]` tuple of a coordinates literal into `(lat, lon)`.
pub fn parse_coordinates(text: &str) -> Option<(f64, f64)> {
    let mut parts = text.trim().split(',');
    let lon: f64 = parts.next()?.trim().parse().ok()?;
    // A following tuple may start after whitespace: "lon,lat lon,lat"
    let lat: f64 = parts.next()?.split_whitespace().next()?.parse().ok()?;

    if lat.is_finite() && lon.is_finite() {
        Some((lat, lon))
    } else {
        None
    }
}

fn resolve_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }

    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Cluster Mawar</name>
    <Folder>
      <name>CLUSTER A</name>
      <Folder>
        <name>HP</name>
        <Placemark>
          <name> HP-001 </name>
          <Point><coordinates>106.8,-6.2,0</coordinates></Point>
        </Placemark>
        <Placemark>
          <name>HP-002</name>
          <LineString><coordinates>106.8,-6.2,0 106.9,-6.3,0</coordinates></LineString>
        </Placemark>
        <Placemark>
          <Point><coordinates>106.81,-6.21</coordinates></Point>
        </Placemark>
      </Folder>
      <Folder>
        <name>FAT</name>
        <Placemark>
          <name>FAT &amp; Co &#65;</name>
          <Point>
            <coordinates>
              106.8001,-6.2001,12
            </coordinates>
          </Point>
        </Placemark>
        <Placemark>
          <name>BROKEN</name>
          <Point><coordinates>abc,def</coordinates></Point>
        </Placemark>
      </Folder>
    </Folder>
    <Placemark>
      <name><![CDATA[Loose <1>]]></name>
      <Point><coordinates>100,5</coordinates></Point>
    </Placemark>
  </Document>
</kml>"#;

    #[test]
    fn test_parse_points_and_folders() {
        let points = parse(SAMPLE).unwrap();
        assert_eq!(points.len(), 4);

        assert_eq!(points[0].name, "HP-001");
        assert_eq!(points[0].lat, -6.2);
        assert_eq!(points[0].lon, 106.8);
        assert_eq!(points[0].group_label, "CLUSTER A/HP");

        assert_eq!(points[1].name, "");
        assert_eq!(points[1].group_label, "CLUSTER A/HP");

        assert_eq!(points[2].name, "FAT & Co A");
        assert_eq!(points[2].lat, -6.2001);
        assert_eq!(points[2].group_label, "CLUSTER A/FAT");

        assert_eq!(points[3].name, "Loose <1>");
        assert_eq!(points[3].group_label, "");
    }

    #[test]
    fn test_namespaced_tags() {
        let kml = r#"<kml:kml xmlns:kml="http://www.opengis.net/kml/2.2">
            <kml:Folder><kml:name>HOME</kml:name>
              <kml:Placemark><kml:name>H1</kml:name>
                <kml:Point><kml:coordinates>1.5,2.5</kml:coordinates></kml:Point>
              </kml:Placemark>
            </kml:Folder></kml:kml>"#;
        let points = parse(kml).unwrap();
        assert_eq!(points, vec![GeoPoint::new("H1", 2.5, 1.5, "HOME")]);
    }

    #[test]
    fn test_unnamed_folder_is_skipped_in_label() {
        let kml = r#"<kml><Folder><name>A</name><Folder>
              <Folder><name>C</name>
                <Placemark><name>P</name><Point><coordinates>0,0</coordinates></Point></Placemark>
              </Folder></Folder></Folder></kml>"#;
        let points = parse(kml).unwrap();
        assert_eq!(points[0].group_label, "A/C");
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(parse_coordinates("106.8,-6.2"), Some((-6.2, 106.8)));
        assert_eq!(parse_coordinates(" 106.8, -6.2 ,30 "), Some((-6.2, 106.8)));
        assert_eq!(parse_coordinates("106.8,-6.2 107,-7"), Some((-6.2, 106.8)));
        assert_eq!(parse_coordinates("106.8"), None);
        assert_eq!(parse_coordinates("inf,1"), None);
        assert_eq!(parse_coordinates(""), None);
    }

    #[test]
    fn test_mismatched_tags_are_an_error() {
        assert!(parse("<kml><Folder></Placemark></kml>").is_err());
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let kml = r#"<kml><Folder><name>A</name><Folder><name>HP</name>
              <Placemark><name>H1</name><Point><coordinates>1,2</coordinates></Point></Placemark>"#;
        let err = parse(kml).unwrap_err();
        assert!(matches!(
            err,
            quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(ref tag)) if tag == "Folder"
        ));

        let closed = format!("{}</Folder></Folder></kml>", kml);
        assert_eq!(parse(&closed).unwrap().len(), 1);
    }
}
