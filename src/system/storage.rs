//! Chart persistence: one `chart.json` per song folder.

use crate::error::ChartError;
use crate::models::chart::{Chart, Song};
use crate::models::chart_file::ChartFile;
use std::fs;
use std::path::{Path, PathBuf};

pub const CHART_FILE: &str = "chart.json";
pub const DEFAULT_SONG_FOLDER: &str = "default_song";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ChartError + '_ {
    move |source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Accepts either a song folder or the chart file itself.
pub fn chart_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CHART_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Reads and validates a chart, remembering the folder it came from.
pub fn load_song(path: &Path, lane_count: usize) -> Result<Song, ChartError> {
    let path = chart_path(path);
    let json = fs::read_to_string(&path).map_err(io_error(&path))?;
    let mut song = ChartFile::parse(&json, lane_count)?;
    song.folder = path.parent().map(Path::to_path_buf);
    log::info!(
        "STORAGE: Loaded '{}' ({} notes) from {:?}",
        song.title,
        song.chart.len(),
        path
    );
    Ok(song)
}

/// Like [`load_song`], but an unreadable chart becomes an empty one.
///
/// The title is taken from the folder name and the timing uses the defaults.
pub fn load_song_or_default(path: &Path, lane_count: usize) -> Song {
    match load_song(path, lane_count) {
        Ok(song) => song,
        Err(e) => {
            log::error!("STORAGE: {}; starting from an empty chart", e);
            let path = chart_path(path);
            let folder = path.parent().map(Path::to_path_buf);
            let title = folder
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Untitled".to_string());
            let mut song = Song::new(title);
            song.chart = Chart::default();
            song.folder = folder;
            song
        }
    }
}

/// Writes the song to `<folder>/chart.json`, creating the folder if needed.
pub fn save_song(song: &Song) -> Result<PathBuf, ChartError> {
    let folder = song.folder.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&folder).map_err(io_error(&folder))?;

    let path = folder.join(CHART_FILE);
    let json = ChartFile::from_song(song).to_json()?;
    fs::write(&path, json).map_err(io_error(&path))?;

    log::info!("STORAGE: Chart saved to {:?}", path);
    Ok(path)
}

/// Lists every loadable song under `songs_dir`, sorted by folder name.
///
/// Broken charts are skipped with an error log. When nothing is found a
/// `default_song` folder is created so there is always something to open.
pub fn scan_songs(songs_dir: &Path, lane_count: usize) -> Result<Vec<Song>, ChartError> {
    fs::create_dir_all(songs_dir).map_err(io_error(songs_dir))?;

    let mut folders: Vec<PathBuf> = fs::read_dir(songs_dir)
        .map_err(io_error(songs_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.join(CHART_FILE).is_file())
        .collect();
    folders.sort();

    let mut songs = Vec::with_capacity(folders.len());
    for folder in folders {
        match load_song(&folder, lane_count) {
            Ok(song) => songs.push(song),
            Err(e) => log::error!("STORAGE: Skipping {:?}: {}", folder, e),
        }
    }

    if songs.is_empty() {
        log::info!("STORAGE: No songs found, creating a default song");
        let mut song = Song::new("Default Song");
        song.artist = "Tapline".to_string();
        song.folder = Some(songs_dir.join(DEFAULT_SONG_FOLDER));
        save_song(&song)?;
        songs.push(song);
    }

    Ok(songs)
}

/// Initialises a new song folder with an empty chart.
///
/// `audio_source` is copied into the folder. The title defaults to the
/// folder name.
pub fn create_song(
    folder: &Path,
    audio_source: Option<&Path>,
    title: Option<&str>,
) -> Result<Song, ChartError> {
    fs::create_dir_all(folder).map_err(io_error(folder))?;

    let title = match title {
        Some(title) => title.to_string(),
        None => folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string()),
    };
    let mut song = Song::new(title);
    song.folder = Some(folder.to_path_buf());

    if let Some(source) = audio_source
        && let Some(file_name) = source.file_name()
    {
        let target = folder.join(file_name);
        if source != target {
            fs::copy(source, &target).map_err(io_error(source))?;
        }
        song.audio_file = file_name.to_string_lossy().into_owned();
    }

    save_song(&song)?;
    Ok(song)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::Note;
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tapline-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn save_then_load() {
        let dir = scratch_dir("storage-save");
        let mut song = Song::new("Song");
        song.folder = Some(dir.join("song"));
        song.audio_file = "track.ogg".into();
        song.chart = Chart::from_notes(vec![Note::tap(1, 500), Note::hold(0, 250, 300)]);
        song.chart.timing.set_bpm(150.0);

        let path = save_song(&song).unwrap();
        assert_eq!(path, dir.join("song").join(CHART_FILE));

        let loaded = load_song(&dir.join("song"), 4).unwrap();
        assert_eq!(loaded, song);
        assert_eq!(loaded.audio_path(), Some(dir.join("song").join("track.ogg")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn broken_chart_falls_back_to_defaults() {
        let dir = scratch_dir("storage-broken");
        let folder = dir.join("broken");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join(CHART_FILE), "{ not json").unwrap();

        assert!(matches!(load_song(&folder, 4), Err(ChartError::Json(_))));

        let song = load_song_or_default(&folder, 4);
        assert_eq!(song.title, "broken");
        assert!(song.chart.is_empty());
        assert_eq!(song.chart.timing.bpm(), 120.0);
        assert_eq!(song.chart.timing.scroll_speed(), 7.0);
        assert_eq!(song.folder, Some(folder));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = scratch_dir("storage-missing");
        assert!(matches!(
            load_song(&dir.join("nope.json"), 4),
            Err(ChartError::Io { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_library_gets_default_song() {
        let dir = scratch_dir("storage-scan");
        let songs = scan_songs(&dir, 4).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Default Song");
        assert!(dir.join(DEFAULT_SONG_FOLDER).join(CHART_FILE).is_file());

        // A second scan finds the saved default instead of creating another.
        assert_eq!(scan_songs(&dir, 4).unwrap().len(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn scan_skips_broken_charts() {
        let dir = scratch_dir("storage-skip");
        create_song(&dir.join("a"), None, Some("A")).unwrap();
        fs::create_dir_all(dir.join("b")).unwrap();
        fs::write(dir.join("b").join(CHART_FILE), "[]").unwrap();

        let songs = scan_songs(&dir, 4).unwrap();
        let titles: Vec<&str> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn create_song_copies_audio() {
        let dir = scratch_dir("storage-create");
        let audio = dir.join("input.ogg");
        fs::write(&audio, b"OggS").unwrap();

        let song = create_song(&dir.join("new_song"), Some(&audio), None).unwrap();
        assert_eq!(song.title, "new_song");
        assert_eq!(song.artist, "Unknown");
        assert_eq!(song.audio_file, "input.ogg");
        assert!(dir.join("new_song").join("input.ogg").is_file());
        assert!(song.chart.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }
}
