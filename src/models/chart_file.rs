//! On-disk JSON chart format and its validation into a [`Song`].

use crate::error::ChartError;
use crate::models::chart::{Chart, ChartTiming, Note, Song};
use crate::models::engine::constants::{DEFAULT_BPM, DEFAULT_SCROLL_SPEED};
use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the `chart` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(deserialize_with = "millis")]
    pub time: i64,
    pub lane: usize,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_millis"
    )]
    pub duration: Option<i64>,
}

/// Top-level `chart.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFile {
    pub title: String,
    #[serde(default = "unknown_artist")]
    pub artist: String,
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub audio_file: String,
    #[serde(default)]
    pub use_custom_start: bool,
    #[serde(default, deserialize_with = "millis")]
    pub start_offset_ms: i64,
    pub chart: Vec<NoteRecord>,
}

fn unknown_artist() -> String {
    "Unknown".to_string()
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

fn default_speed() -> f64 {
    DEFAULT_SCROLL_SPEED
}

/// Older editors wrote snapped times as floats (`1562.5`); round them.
fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Ok(value.round() as i64)
}

fn optional_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|v| v.round() as i64))
}

impl ChartFile {
    /// Parses and validates a JSON document.
    pub fn parse(json: &str, lane_count: usize) -> Result<Song, ChartError> {
        let file: ChartFile = serde_json::from_str(json)?;
        file.into_song(lane_count)
    }

    /// Validates every field and sorts the notes.
    pub fn into_song(self, lane_count: usize) -> Result<Song, ChartError> {
        if !(self.bpm > 0.0) {
            return Err(ChartError::InvalidBpm(self.bpm));
        }
        if !(self.speed > 0.0) {
            return Err(ChartError::InvalidSpeed(self.speed));
        }

        let mut notes = Vec::with_capacity(self.chart.len());
        for (index, record) in self.chart.into_iter().enumerate() {
            if record.lane >= lane_count {
                return Err(ChartError::LaneOutOfRange {
                    index,
                    lane: record.lane,
                    lane_count,
                });
            }
            if record.time < 0 {
                return Err(ChartError::NegativeTime {
                    index,
                    time: record.time,
                });
            }
            if let Some(duration) = record.duration
                && duration <= 0
            {
                return Err(ChartError::NegativeDuration { index, duration });
            }
            notes.push(Note {
                lane: record.lane,
                time: record.time,
                duration: record.duration,
            });
        }

        let mut timing = ChartTiming::new(self.bpm, self.speed);
        timing.use_custom_start = self.use_custom_start;
        timing.set_start_offset_ms(self.start_offset_ms);

        Ok(Song {
            title: self.title,
            artist: self.artist,
            audio_file: self.audio_file,
            chart: Chart::with_timing(notes, timing),
            folder: None,
        })
    }

    pub fn from_song(song: &Song) -> Self {
        let timing = &song.chart.timing;
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            bpm: timing.bpm(),
            speed: timing.scroll_speed(),
            audio_file: song.audio_file.clone(),
            use_custom_start: timing.use_custom_start,
            start_offset_ms: timing.start_offset_ms(),
            chart: song
                .chart
                .notes()
                .iter()
                .map(|n| NoteRecord {
                    time: n.time,
                    lane: n.lane,
                    duration: n.duration,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "title": "Sample",
        "bpm": 150,
        "speed": 8.5,
        "audio_file": "song.ogg",
        "use_custom_start": true,
        "start_offset_ms": 1200,
        "chart": [
            {"time": 2000, "lane": 3},
            {"time": 1562.5, "lane": 0, "duration": 400},
            {"time": 500, "lane": 1}
        ]
    }"#;

    #[test]
    fn parses_and_sorts() {
        let song = ChartFile::parse(SAMPLE, 4).unwrap();
        assert_eq!(song.title, "Sample");
        assert_eq!(song.artist, "Unknown");
        assert_eq!(song.chart.timing.bpm(), 150.0);
        assert_eq!(song.chart.timing.start_offset_ms(), 1200);
        assert!(song.chart.timing.use_custom_start);
        assert_eq!(
            song.chart.notes(),
            &[Note::tap(1, 500), Note::hold(0, 1563, 400), Note::tap(3, 2000)]
        );
    }

    #[test]
    fn rejects_lane_outside_layout() {
        let err = ChartFile::parse(SAMPLE, 3).unwrap_err();
        assert!(matches!(
            err,
            ChartError::LaneOutOfRange {
                lane: 3,
                lane_count: 3,
                ..
            }
        ));
    }

    #[test]
    fn rejects_missing_chart_field() {
        let err = ChartFile::parse(r#"{"title": "x", "bpm": 120}"#, 4).unwrap_err();
        assert!(matches!(err, ChartError::Json(_)));
    }

    #[test]
    fn rejects_non_positive_bpm() {
        let err = ChartFile::parse(r#"{"title": "x", "bpm": 0, "chart": []}"#, 4).unwrap_err();
        assert!(matches!(err, ChartError::InvalidBpm(_)));
    }

    #[test]
    fn omits_duration_for_taps() {
        let song = ChartFile::parse(SAMPLE, 4).unwrap();
        let json = ChartFile::from_song(&song).to_json().unwrap();
        let reparsed = ChartFile::parse(&json, 4).unwrap();
        assert_eq!(reparsed.chart, song.chart);
        assert_eq!(json.matches("duration").count(), 1);
    }
}
