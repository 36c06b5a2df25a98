//! Dataset loading for the ALRAGE benchmark.
//!
//! Records come either from a local JSON file or from the Hugging Face
//! datasets server, paged through its `/rows` endpoint and cached on disk.

use crate::document::{Candidates, DatasetRecord};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Hugging Face repository the benchmark rows live in.
pub const HF_REPO: &str = "OALL/ALRAGE";

/// The only split the benchmark publishes.
pub const HF_SPLIT: &str = "train";

const ROWS_ENDPOINT: &str = "https://datasets-server.huggingface.co/rows";
const PAGE_SIZE: usize = 100;

/// A collection of QA records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name (usually the source repository).
    pub name: String,
    /// The records.
    pub records: Vec<DatasetRecord>,
}

impl Dataset {
    /// Create a new empty dataset.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: Vec::new(),
        }
    }

    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a subset of records (for quick runs).
    pub fn take(&self, n: usize) -> Self {
        Self {
            name: self.name.clone(),
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    /// Load from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {:?}", path))?;
        let dataset: Dataset =
            serde_json::from_str(&content).with_context(|| "Failed to parse dataset JSON")?;
        Ok(dataset)
    }

    /// Load records from a JSONL file (one JSON record per line).
    ///
    /// Blank lines are skipped. The dataset name is the file stem.
    pub fn load_jsonl(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {:?}", path))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_string();

        let mut records = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record: DatasetRecord = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse record at line {}", line_num + 1))?;
            records.push(record);
        }

        Ok(Self { name, records })
    }

    /// Save to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write dataset file: {:?}", path))?;
        Ok(())
    }
}

/// One page of the datasets-server `/rows` response.
#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEntry>,
    num_rows_total: usize,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: DatasetRecord,
}

/// Download all rows of a split from the Hugging Face datasets server.
pub async fn download_dataset(repo: &str, split: &str) -> Result<Dataset> {
    let mut records = Vec::new();
    let mut offset = 0;

    loop {
        let url = format!(
            "{}?dataset={}&config=default&split={}&offset={}&length={}",
            ROWS_ENDPOINT, repo, split, offset, PAGE_SIZE
        );
        log::debug!("Fetching dataset rows at offset {}", offset);

        let response = reqwest::get(&url)
            .await
            .with_context(|| format!("Failed to fetch dataset rows from {}", url))?;

        if !response.status().is_success() {
            bail!(
                "Dataset server returned {} for {}/{}",
                response.status(),
                repo,
                split
            );
        }

        let page: RowsPage = response
            .json()
            .await
            .context("Failed to parse dataset server response")?;

        let fetched = page.rows.len();
        records.extend(page.rows.into_iter().map(|entry| entry.row));
        offset += fetched;

        if fetched == 0 || offset >= page.num_rows_total {
            break;
        }
    }

    log::info!("Downloaded {} records from {}", records.len(), repo);

    Ok(Dataset {
        name: repo.to_string(),
        records,
    })
}

/// Default on-disk location for a cached copy of a split.
pub fn cache_path(repo: &str, split: &str) -> Option<PathBuf> {
    let file_name = format!("{}_{}.json", repo.replace('/', "_"), split);
    directories::ProjectDirs::from("", "", "alrage-eval")
        .map(|dirs| dirs.cache_dir().join(file_name))
}

/// Load a split from the cache, downloading it first if necessary.
pub async fn load_or_download(repo: &str, split: &str) -> Result<Dataset> {
    if let Some(path) = cache_path(repo, split) {
        if path.exists() {
            log::info!("Loading cached dataset from {:?}", path);
            return Dataset::load_json(&path);
        }

        let dataset = download_dataset(repo, split).await?;
        dataset.save_json(&path)?;
        log::info!("Cached dataset at {:?}", path);
        return Ok(dataset);
    }

    download_dataset(repo, split).await
}

/// Create a small built-in dataset for offline runs and testing.
pub fn create_sample_dataset() -> Dataset {
    let mut dataset = Dataset::new("sample");

    dataset.records.push(DatasetRecord {
        question: "ما هي عاصمة مصر؟".to_string(),
        candidates: Candidates::Many(vec![
            "القاهرة هي عاصمة جمهورية مصر العربية وأكبر مدنها.".to_string(),
            "الإسكندرية مدينة ساحلية تقع على البحر الأبيض المتوسط.".to_string(),
        ]),
        gold_answer: "القاهرة".to_string(),
    });

    dataset.records.push(DatasetRecord {
        question: "ما هو أطول نهر في العالم؟".to_string(),
        candidates: Candidates::Many(vec![
            "يمتد نهر النيل لأكثر من 6600 كيلومتر ويعد أطول أنهار العالم.".to_string(),
            "نهر الأمازون هو الأكبر من حيث كمية التدفق المائي.".to_string(),
        ]),
        gold_answer: "نهر النيل".to_string(),
    });

    dataset.records.push(DatasetRecord {
        question: "في أي عام تأسس الجامع الأزهر؟".to_string(),
        candidates: Candidates::Many(vec![
            "تأسس الجامع الأزهر في القاهرة عام 970 ميلادية في عهد الدولة الفاطمية.".to_string(),
            "تأسست جامعة القرويين في مدينة فاس عام 859 ميلادية.".to_string(),
        ]),
        gold_answer: "تأسس الجامع الأزهر عام 970 ميلادية".to_string(),
    });

    dataset
}
