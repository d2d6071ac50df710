use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;

lazy_static! {
    // matched against the start of the name only, a trailing remainder
    // after .fastq.gz still counts
    static ref REPLICATE_RE: Regex =
        Regex::new(r"^(.+)_(\d+)\.R\d+\.fastq\.gz").unwrap();
}

/// Replicate groups keyed by base sample name, each holding the sorted,
/// deduplicated `<sample>_<replicate>` identifiers.
pub type ReplicateGroups = BTreeMap<String, Vec<String>>;

/// Group file names of the form `<sample>_<replicate>.R<mate>.fastq.gz`
/// under their base sample name.
/// # Example
/// ```
/// use genoprep::groups::group_replicates;
/// let groups = group_replicates(["sample1_2.R1.fastq.gz", "sample1_1.R1.fastq.gz"]);
/// assert_eq!(groups["sample1"], vec!["sample1_1", "sample1_2"]);
/// ```
pub fn group_replicates<I, S>(filenames: I) -> ReplicateGroups
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups = ReplicateGroups::new();
    for filename in filenames {
        if let Some(caps) = REPLICATE_RE.captures(filename.as_ref()) {
            let sample = caps.get(1).unwrap().as_str();
            let replicate = caps.get(2).unwrap().as_str();
            let full_sample = format!("{}_{}", sample, replicate);

            let reps = groups.entry(sample.to_string()).or_default();
            if !reps.contains(&full_sample) {
                reps.push(full_sample);
            }
        }
    }
    for reps in groups.values_mut() {
        reps.sort();
    }
    groups
}

/// List a folder and group every matching file name.
pub fn group_replicates_in_folder(folder: &str) -> Result<ReplicateGroups> {
    let mut names = Vec::new();
    let entries =
        fs::read_dir(folder).with_context(|| format!("couldn't read folder {}", folder))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("couldn't read folder {}", folder))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    log::debug!("{} directory entries in {}", names.len(), folder);
    Ok(group_replicates(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicates_grouped_and_sorted() {
        let groups = group_replicates([
            "sample1_2.R1.fastq.gz",
            "sample1_1.R1.fastq.gz",
            "sample2_1.R2.fastq.gz",
        ]);
        assert_eq!(groups["sample1"], vec!["sample1_1", "sample1_2"]);
        assert_eq!(groups["sample2"], vec!["sample2_1"]);
    }

    #[test]
    fn test_mates_deduplicated() {
        let groups = group_replicates([
            "sample1_1.R1.fastq.gz",
            "sample1_1.R2.fastq.gz",
        ]);
        assert_eq!(groups["sample1"], vec!["sample1_1"]);
    }

    #[test]
    fn test_non_matching_names_skipped() {
        let groups = group_replicates([
            "sample.R1.fastq.gz",   // no _<replicate>
            "sample_x.R1.fastq.gz", // replicate is not a number
            "notes.txt",
        ]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_prefix_match_keeps_trailing_remainder() {
        // only the start of the name is anchored
        let groups = group_replicates(["sample1_1.R1.fastq.gz.part"]);
        assert_eq!(groups["sample1"], vec!["sample1_1"]);
    }

    #[test]
    fn test_nested_underscores_group_greedily() {
        let groups = group_replicates(["ko_day7_1.R1.fastq.gz", "ko_day7_2.R1.fastq.gz"]);
        assert_eq!(groups["ko_day7"], vec!["ko_day7_1", "ko_day7_2"]);
    }

    #[test]
    fn test_folder_fixture() {
        let groups = group_replicates_in_folder("test/reps").unwrap();
        assert_eq!(groups["sample1"], vec!["sample1_1", "sample1_2"]);
        assert_eq!(groups["sample2"], vec!["sample2_1"]);
    }
}
