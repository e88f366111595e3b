//! GeoJSON projection of notes, for map clients.

use crate::model::Note;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: String,
    /// `(longitude, latitude)`, the GeoJSON axis order.
    pub coordinates: (f64, f64),
}

impl GeoJsonPoint {
    pub fn new(long: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: (long, lat),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteGeoJsonProperties {
    pub url: String,
    pub creator: Option<String>,
    pub country: Option<String>,
    pub code: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteGeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: GeoJsonPoint,
    pub properties: NoteGeoJsonProperties,
}

impl From<&Note> for NoteGeoJsonFeature {
    fn from(note: &Note) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: GeoJsonPoint::new(note.long, note.lat),
            properties: NoteGeoJsonProperties {
                url: note.url.clone(),
                creator: note.creator.clone(),
                country: note.country.clone(),
                code: note.code.clone(),
                text: note.text.clone(),
            },
        }
    }
}

pub fn notes_to_features(notes: &[Note]) -> Vec<NoteGeoJsonFeature> {
    notes.iter().map(NoteGeoJsonFeature::from).collect()
}
