use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{AvailabilityMatch, DateWindow, ScanError};

/// Writes matches to `results_{start}_{end}.csv` inside a results directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    results_dir: PathBuf,
}

impl CsvExporter {
    /// Export into `results_dir`, created on first write
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// Directory the files go to
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// File a run over `window` is written to
    pub fn path_for(&self, window: &DateWindow) -> PathBuf {
        self.results_dir
            .join(format!("results_{}_{}.csv", window.start, window.end))
    }

    /// Write `matches` as `park,date,url` rows, replacing any previous file.
    pub fn write(
        &self,
        window: &DateWindow,
        matches: &[AvailabilityMatch],
    ) -> Result<PathBuf, ScanError> {
        fs::create_dir_all(&self.results_dir)?;

        let path = self.path_for(window);
        let mut writer = csv::Writer::from_path(&path)?;
        for availability in matches {
            writer.serialize(availability)?;
        }
        writer.flush()?;

        info!("Saved {} matches to {}", matches.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn matches() -> Vec<AvailabilityMatch> {
        vec![
            AvailabilityMatch {
                park: "UPPER PINES".to_string(),
                date: "2019-07-05 (Friday)".to_string(),
                url: "https://www.recreation.gov/camping/campsites/70926".to_string(),
            },
            AvailabilityMatch {
                park: "NORTH PINES".to_string(),
                date: "2019-07-06 (Saturday)".to_string(),
                url: "https://www.recreation.gov/camping/campsites/1".to_string(),
            },
        ]
    }

    #[test]
    fn test_path_uses_window_dates() {
        let exporter = CsvExporter::new("results");
        let window = DateWindow::parse("2019-07-04", Some("2019-09-04")).unwrap();

        assert_eq!(
            exporter.path_for(&window),
            PathBuf::from("results/results_2019-07-04_2019-09-04.csv")
        );
    }

    #[test]
    fn test_write_creates_directory_and_rows() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(temp_dir.path().join("results"));
        let window = DateWindow::parse("2019-07-04", None).unwrap();

        let path = exporter.write(&window, &matches()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "park,date,url\n\
             UPPER PINES,2019-07-05 (Friday),https://www.recreation.gov/camping/campsites/70926\n\
             NORTH PINES,2019-07-06 (Saturday),https://www.recreation.gov/camping/campsites/1\n"
        );
    }

    #[test]
    fn test_write_overwrites_previous_results() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(temp_dir.path());
        let window = DateWindow::parse("2019-07-04", None).unwrap();

        exporter.write(&window, &matches()).unwrap();
        let path = exporter.write(&window, &matches()[..1]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(!contents.contains("NORTH PINES"));
    }
}
