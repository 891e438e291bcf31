//! Dataset discovery, integrity verification and CSV loading.
//!
//! Probes a fixed ordered list of candidate locations for the ratings CSV,
//! hashes the raw bytes against the published reference digest and parses
//! the delimited text into [`ProjectRecord`]s for downstream analysis.

use std::path::{Path, PathBuf};

use report_core::error::{ReportError, Result};
use report_core::models::ProjectRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Canonical file name of the published ratings dataset.
pub const DATASET_FILE: &str = "ieg_world_bank_project_performance_ratings_01-17-2026.csv";

/// Known-good MD5 digest of the published dataset bytes.
pub const EXPECTED_MD5: &str = "5a13fbabd3f9e26698cb591aba560793";

// ── Public API ────────────────────────────────────────────────────────────────

/// Outcome of the dataset integrity check.
///
/// A mismatch is informational, never fatal: the dataset may have been
/// legitimately updated since the reference digest was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetVerification {
    /// Path the dataset was loaded from.
    pub path: PathBuf,
    /// MD5 digest of the file bytes, lowercase hex.
    pub computed_md5: String,
    /// The hard-coded reference digest.
    pub expected_md5: String,
    /// Whether computed and expected digests agree.
    pub matches: bool,
}

/// Ordered candidate locations for the ratings CSV.
///
/// The CLI override comes first when given, then the canonical file name in
/// the working directory, next to the executable, under `data/`, under
/// `/mnt/user-data/uploads/` and finally in the platform download directory.
pub fn candidate_paths(override_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(p) = override_path {
        candidates.push(p.to_path_buf());
    }
    candidates.push(PathBuf::from(DATASET_FILE));
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(DATASET_FILE));
        }
    }
    candidates.push(PathBuf::from("data").join(DATASET_FILE));
    candidates.push(PathBuf::from("/mnt/user-data/uploads").join(DATASET_FILE));
    if let Some(downloads) = dirs::download_dir() {
        candidates.push(downloads.join(DATASET_FILE));
    }
    candidates
}

/// First existing candidate path, or `None` when the dataset is nowhere to
/// be found.
pub fn find_dataset(override_path: Option<&Path>) -> Option<PathBuf> {
    candidate_paths(override_path)
        .into_iter()
        .find(|p| p.exists())
}

/// Like [`find_dataset`], but folds absence into
/// [`ReportError::DatasetNotFound`] carrying the tried candidate list.
/// Absence is the caller's only fatal condition.
pub fn locate_dataset(override_path: Option<&Path>) -> Result<PathBuf> {
    find_dataset(override_path)
        .ok_or_else(|| ReportError::DatasetNotFound(candidate_paths(override_path)))
}

/// Read the full dataset into memory.
///
/// The same buffer feeds both the integrity hash and the CSV parser, so the
/// file is read exactly once.
pub fn read_dataset_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Hash the raw file bytes and compare against [`EXPECTED_MD5`].
pub fn verify_dataset(path: &Path, bytes: &[u8]) -> DatasetVerification {
    let computed_md5 = format!("{:x}", md5::compute(bytes));
    let matches = computed_md5 == EXPECTED_MD5;
    if !matches {
        warn!(
            "Dataset digest mismatch for {}: computed {}, expected {}",
            path.display(),
            computed_md5,
            EXPECTED_MD5
        );
    }
    DatasetVerification {
        path: path.to_path_buf(),
        computed_md5,
        expected_md5: EXPECTED_MD5.to_string(),
        matches,
    }
}

/// Parse the dataset bytes into records.
///
/// A leading UTF-8 byte-order mark is stripped before parsing. The header
/// row maps column names to fields; a missing column loads as `None` for
/// every row rather than failing. Values are trimmed, and blank cells
/// collapse to `None`.
pub fn load_records(bytes: &[u8]) -> Result<Vec<ProjectRecord>> {
    let data = strip_bom(bytes);
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let columns = ColumnIndex::from_headers(reader.headers()?);
    if columns.outcome.is_none() {
        warn!("Dataset has no 'Outcome' column; outcome analyses will be empty");
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(columns.record_from_row(&row));
    }

    debug!("Loaded {} records", records.len());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Strip a leading UTF-8 byte-order mark, if present.
fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes)
}

/// Resolved positions of the expected columns in the header row.
#[derive(Debug, Default)]
struct ColumnIndex {
    outcome: Option<usize>,
    quality_at_entry: Option<usize>,
    quality_of_supervision: Option<usize>,
    me_quality: Option<usize>,
    evaluation_type: Option<usize>,
    country: Option<usize>,
    global_practice: Option<usize>,
    practice_group: Option<usize>,
    wb_region: Option<usize>,
    approval_fy: Option<usize>,
    lending_group: Option<usize>,
    fcs_status: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Self {
            outcome: find("Outcome"),
            quality_at_entry: find("Quality at Entry"),
            quality_of_supervision: find("Quality of Supervision"),
            me_quality: find("M&E Quality"),
            evaluation_type: find("Evaluation Type"),
            country: find("Country / Economy"),
            global_practice: find("Global Practice"),
            practice_group: find("Practice Group"),
            wb_region: find("WB Region"),
            approval_fy: find("Approval FY"),
            lending_group: find("Country / Economy Lending Group"),
            fcs_status: find("Country / Economy FCS Status"),
        }
    }

    fn record_from_row(&self, row: &csv::StringRecord) -> ProjectRecord {
        let field = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        // Unparseable fiscal years collapse to None, which excludes the
        // record from decade analysis only.
        let approval_fy = field(self.approval_fy).and_then(|s| s.parse::<i32>().ok());

        ProjectRecord {
            outcome: field(self.outcome),
            quality_at_entry: field(self.quality_at_entry),
            quality_of_supervision: field(self.quality_of_supervision),
            me_quality: field(self.me_quality),
            evaluation_type: field(self.evaluation_type),
            country: field(self.country),
            global_practice: field(self.global_practice),
            practice_group: field(self.practice_group),
            wb_region: field(self.wb_region),
            approval_fy,
            lending_group: field(self.lending_group),
            fcs_status: field(self.fcs_status),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
