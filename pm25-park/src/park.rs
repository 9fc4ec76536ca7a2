use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Embedded coordinates for the Bangkok public parks that report PM2.5.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/park_coordinates.csv");

static PARKS: OnceLock<Vec<Park>> = OnceLock::new();

/// A public park in Bangkok with its location metadata.
///
/// `name` is the Thai park name followed by its district, exactly as it
/// appears in the location column of the PM2.5 dataset.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Park {
    pub name: String,
    /// Latitude in decimal degrees
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub name_en: String,
    /// Administrative district (khet)
    pub district: String,
}

impl Park {
    /// The park directory, parsed from the embedded CSV on first use.
    pub fn all() -> &'static [Park] {
        PARKS.get_or_init(|| match Park::parse_park_csv(CSV_OBJECT) {
            Ok(parks) => parks,
            Err(e) => panic!("failed to parse embedded park coordinates: {e}"),
        })
    }

    /// Find a park by the location string used in the PM2.5 dataset.
    ///
    /// A location missing from the directory simply has no coordinates.
    pub fn lookup(name: &str) -> Option<&'static Park> {
        let name = name.trim();
        Park::all().iter().find(|park| park.name == name)
    }

    /// Parse a CSV string of park data into a vector of Parks.
    ///
    /// Expected CSV columns: name, lat, lon, name_en, district
    pub fn parse_park_csv(csv_object: &str) -> Result<Vec<Park>, csv::Error> {
        ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes())
            .deserialize()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::park::Park;

    #[test]
    fn test_park_directory() {
        let parks = Park::all();
        assert_eq!(parks.len(), 20);
        assert!(parks
            .iter()
            .all(|p| (13.0..14.5).contains(&p.latitude) && (100.0..101.0).contains(&p.longitude)));
    }

    #[test]
    fn test_lookup() {
        let lumphini = Park::lookup("สวนลุมพินี เขตปทุมวัน").unwrap();
        assert_eq!(lumphini.name_en, "Lumphini Park");
        assert_eq!(lumphini.district, "Pathumwan");
        assert_eq!(lumphini.latitude, 13.7250);
    }

    #[test]
    fn test_lookup_miss_is_not_fatal() {
        assert!(Park::lookup("ParkA").is_none());
        assert!(Park::lookup("").is_none());
    }

    #[test]
    fn test_parse_custom_csv() {
        let csv = "name,lat,lon,name_en,district\nParkA, 13.5 ,100.5,Park A,Somewhere\n";
        let parks = Park::parse_park_csv(csv).unwrap();
        assert_eq!(parks.len(), 1);
        assert_eq!(parks[0].latitude, 13.5);
        assert_eq!(parks[0].name_en, "Park A");
    }
}
