use super::myio;
use anyhow::{bail, Context, Result};
use needletail::parse_fastx_file;
use std::io::{BufRead, Write};
use std::path::Path;

/// Sequences are rewrapped at this width on output.
const FASTA_LINE_WIDTH: usize = 60;
/// Gene reported when no `gene=` segment is present in a header.
pub const NO_GENE: &str = "UNKNOWN";

/// One CDS record with its rewritten header. The free-text description of
/// the original record is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdsRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// One `species_id<TAB>fasta_path` manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub species: String,
    pub fasta_path: String,
}

/// Extract the gene ID from a `;`-delimited FASTA header segment of the form
/// `gene=<id>`.
/// # Example
/// ```
/// use genoprep::cds::extract_gene_id;
/// assert_eq!(extract_gene_id("id1 gene=XYZ;other=1"), "XYZ");
/// assert_eq!(extract_gene_id("id1 product=kinase"), "UNKNOWN");
/// ```
pub fn extract_gene_id(header: &str) -> &str {
    for segment in header.split(';') {
        let segment = segment.trim();
        if segment.starts_with("gene=") {
            return segment.rsplit('=').next().unwrap();
        }
    }
    NO_GENE
}

/// Derive the line ID from a FASTA path, the basename without `.CDS.fasta`.
pub fn line_id_from_path(fasta_path: &str) -> String {
    let base = Path::new(fasta_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.replace(".CDS.fasta", "")
}

/// Rewrite a record header as
/// `<id> gene=<gene> species=<species_id> line=<line_id>`.
pub fn rewrite_header(header: &str, species: &str, line_id: &str) -> String {
    let header_main = header.split_whitespace().next().unwrap_or("");
    format!(
        "{} gene={} species={} line={}",
        header_main,
        extract_gene_id(header),
        species,
        line_id
    )
}

/// Read the `species_id<TAB>fasta_path` manifest, skipping blank lines and
/// `#` comments.
pub fn read_manifest(input: &str) -> Result<Vec<ManifestEntry>> {
    let reader = myio::reader(input)?;
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("couldn't read manifest {}", input))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 {
            bail!(
                "manifest line {}: expected species_id<TAB>fasta_path, got {:?}",
                idx + 1,
                line
            );
        }
        entries.push(ManifestEntry {
            species: fields[0].to_string(),
            fasta_path: fields[1].to_string(),
        });
    }
    Ok(entries)
}

/// Collect every record named by the manifest, headers rewritten, in
/// manifest order then within-file order.
pub fn collect_records(entries: &[ManifestEntry]) -> Result<Vec<CdsRecord>> {
    let mut records = Vec::new();
    for entry in entries {
        let line_id = line_id_from_path(&entry.fasta_path);
        let mut reader = parse_fastx_file(&entry.fasta_path)
            .with_context(|| format!("couldn't open fasta file {}", entry.fasta_path))?;
        let mut n_recs = 0;
        while let Some(record) = reader.next() {
            let record = record
                .with_context(|| format!("invalid fasta record in {}", entry.fasta_path))?;
            let header = String::from_utf8_lossy(record.id()).into_owned();
            records.push(CdsRecord {
                id: rewrite_header(&header, &entry.species, &line_id),
                seq: record.seq().into_owned(),
            });
            n_recs += 1;
        }
        log::debug!(
            "{} records from {} (species={}, line={})",
            n_recs,
            entry.fasta_path,
            entry.species,
            line_id
        );
    }
    Ok(records)
}

/// Write the records as FASTA, sequences wrapped at 60 columns.
pub fn write_fasta<W: Write>(out: &mut W, records: &[CdsRecord]) -> Result<()> {
    for record in records {
        writeln!(out, ">{}", record.id)?;
        for chunk in record.seq.chunks(FASTA_LINE_WIDTH) {
            out.write_all(chunk)?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Concatenate every manifest FASTA into one output FASTA with rewritten
/// headers.
pub fn prep_cds(input: &str, output: &str) -> Result<()> {
    let entries = read_manifest(input)?;
    log::info!("{} manifest entries read from {}", entries.len(), input);
    let records = collect_records(&entries)?;
    log::info!("{} CDS records collected", records.len());
    let mut out = myio::writer(output)?;
    write_fasta(&mut out, &records)
}
