use super::myio;
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Fixed output file names consumed by the downstream workflow.
pub const PE_MANIFEST: &str = "samples_pe.json";
pub const SE_MANIFEST: &str = "samples_se.json";

/// FASTQ files of one paired-end sample, keyed by mate.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PairedFiles {
    #[serde(rename = "R1")]
    pub r1: Vec<String>,
    #[serde(rename = "R2")]
    pub r2: Vec<String>,
}

/// FASTQ files of one single-end sample.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SingleFiles {
    #[serde(rename = "R1")]
    pub r1: Vec<String>,
}

/// All samples found in a folder, split by sequencing layout.
#[derive(Debug, Default)]
pub struct SampleManifest {
    pub paired: BTreeMap<String, PairedFiles>,
    pub single: BTreeMap<String, SingleFiles>,
}

/// Extract the sample name from a FASTQ path, i.e. the basename up to the
/// first `.`.
/// # Example
/// ```
/// use genoprep::manifest::sample_name;
/// assert_eq!(sample_name("fastq/sampleA.R1.fastq.gz"), Some("sampleA".to_string()));
/// assert_eq!(sample_name("sampleB.R2.fastq.gz"), Some("sampleB".to_string()));
/// ```
pub fn sample_name(path: &str) -> Option<String> {
    let base = Path::new(path).file_name()?.to_string_lossy();
    Some(base.split('.').next().unwrap_or(&base).to_string())
}

impl SampleManifest {
    /// Partition FASTQ paths into paired-end and single-end samples.
    ///
    /// A path belongs to a mate when the sample name and the mate marker
    /// (`R1`/`R2`) both occur as substrings of the path, so a sample name
    /// that is a substring of another sample's name also collects that
    /// sample's files. This matches the established manifest semantics and
    /// is a known limitation, not a feature.
    pub fn from_paths(fastqs: &[String]) -> SampleManifest {
        let samples: BTreeSet<String> =
            fastqs.iter().filter_map(|f| sample_name(f)).collect();

        let mut manifest = SampleManifest::default();
        for sample in samples {
            let mate = |marker: &str| -> Vec<String> {
                fastqs
                    .iter()
                    .filter(|f| f.contains(&sample) && f.contains(marker))
                    .cloned()
                    .sorted()
                    .collect()
            };
            let r1 = mate("R1");
            let r2 = mate("R2");
            if r2.is_empty() {
                manifest.single.insert(sample, SingleFiles { r1 });
            } else {
                manifest.paired.insert(sample, PairedFiles { r1, r2 });
            }
        }
        manifest
    }

    /// Scan a folder for `*.fastq.gz` files and build the manifest.
    pub fn from_folder(folder: &str) -> Result<SampleManifest> {
        let mut fastqs = Vec::new();
        let entries = fs::read_dir(folder)
            .with_context(|| format!("couldn't read folder {}", folder))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("couldn't read folder {}", folder))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".fastq.gz") {
                fastqs.push(Path::new(folder).join(name).to_string_lossy().into_owned());
            }
        }
        log::info!("{} fastq files found in {}", fastqs.len(), folder);
        Ok(SampleManifest::from_paths(&fastqs))
    }

    /// Write `samples_pe.json` and `samples_se.json` into `outdir` as pretty
    /// JSON with sorted keys.
    pub fn write_json(&self, outdir: &str) -> Result<()> {
        let pe_path = Path::new(outdir).join(PE_MANIFEST);
        let se_path = Path::new(outdir).join(SE_MANIFEST);
        let mut pe_file = myio::writer(&pe_path.to_string_lossy())?;
        pe_file.write_all(serde_json::to_string_pretty(&self.paired)?.as_bytes())?;
        pe_file.flush()?;
        let mut se_file = myio::writer(&se_path.to_string_lossy())?;
        se_file.write_all(serde_json::to_string_pretty(&self.single)?.as_bytes())?;
        se_file.flush()?;
        log::info!(
            "wrote {} and {}",
            pe_path.to_string_lossy(),
            se_path.to_string_lossy()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("fastq/{}", n)).collect()
    }

    #[test]
    fn test_paired_end_sample() {
        let manifest = SampleManifest::from_paths(&paths(&[
            "sampleA.R2.fastq.gz",
            "sampleA.R1.fastq.gz",
        ]));
        let rec = &manifest.paired["sampleA"];
        assert_eq!(rec.r1, vec!["fastq/sampleA.R1.fastq.gz"]);
        assert_eq!(rec.r2, vec!["fastq/sampleA.R2.fastq.gz"]);
        assert!(manifest.single.is_empty());
    }

    #[test]
    fn test_single_end_sample() {
        let manifest = SampleManifest::from_paths(&paths(&["sampleB.R1.fastq.gz"]));
        assert!(manifest.paired.is_empty());
        assert_eq!(
            manifest.single["sampleB"].r1,
            vec!["fastq/sampleB.R1.fastq.gz"]
        );
    }

    #[test]
    fn test_mixed_layouts_and_sorted_lists() {
        let manifest = SampleManifest::from_paths(&paths(&[
            "tumor.L2.R1.fastq.gz",
            "tumor.L1.R1.fastq.gz",
            "tumor.L1.R2.fastq.gz",
            "tumor.L2.R2.fastq.gz",
            "input.R1.fastq.gz",
        ]));
        let tumor = &manifest.paired["tumor"];
        assert_eq!(
            tumor.r1,
            vec!["fastq/tumor.L1.R1.fastq.gz", "fastq/tumor.L2.R1.fastq.gz"]
        );
        assert_eq!(
            tumor.r2,
            vec!["fastq/tumor.L1.R2.fastq.gz", "fastq/tumor.L2.R2.fastq.gz"]
        );
        assert_eq!(manifest.single["input"].r1, vec!["fastq/input.R1.fastq.gz"]);
    }

    #[test]
    fn test_substring_sample_names_collide() {
        // "A" is a substring of "A2", so sample A also collects A2's files.
        let manifest =
            SampleManifest::from_paths(&paths(&["A.R1.fastq.gz", "A2.R1.fastq.gz"]));
        assert_eq!(
            manifest.single["A"].r1,
            vec!["fastq/A.R1.fastq.gz", "fastq/A2.R1.fastq.gz"]
        );
        assert_eq!(manifest.single["A2"].r1, vec!["fastq/A2.R1.fastq.gz"]);
    }

    #[test]
    fn test_from_folder_fixture() {
        let manifest = SampleManifest::from_folder("test/fastq").unwrap();
        assert!(manifest.paired.contains_key("sampleA"));
        assert!(manifest.single.contains_key("sampleB"));
        assert!(!manifest.single.contains_key("sampleA"));
    }
}
