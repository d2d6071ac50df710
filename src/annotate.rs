use super::myio;
use anyhow::{anyhow, Context, Result};
use needletail::parse_fastx_file;
use std::collections::HashMap;
use std::io;

/// Name of the table column holding the transcript ID.
pub const TRANSCRIPT_COLUMN: &str = "TRANSCRIPT";
/// Name of the prepended output column.
pub const GENE_COLUMN: &str = "GENE";
/// Gene reported for transcripts without a `gene=` annotation or without a
/// FASTA record at all.
pub const NO_GENE: &str = "NA";

/// Split a FASTA header into its transcript ID (first whitespace token) and
/// gene ID (`gene=` token value, `NA` if absent).
/// # Example
/// ```
/// use genoprep::annotate::parse_header;
/// assert_eq!(parse_header("rna-X1 gene=ABC db=refseq"), ("rna-X1", "ABC".to_string()));
/// assert_eq!(parse_header("rna-X2 product=kinase"), ("rna-X2", "NA".to_string()));
/// ```
pub fn parse_header(header: &str) -> (&str, String) {
    let mut tokens = header.split_whitespace();
    let transcript = tokens.next().unwrap_or("");
    let mut gene = NO_GENE.to_string();
    for token in tokens {
        if let Some((key, value)) = token.split_once('=') {
            if key == "gene" {
                gene = value.to_string();
            }
        }
    }
    (transcript, gene)
}

/// Build the transcript to gene lookup from a FASTA file.
/// The first record seen for a transcript wins, later duplicates are ignored.
pub fn gene_map_from_fasta(fasta: &str) -> Result<HashMap<String, String>> {
    let mut reader = parse_fastx_file(fasta)
        .with_context(|| format!("couldn't open fasta file {}", fasta))?;
    let mut transcript_to_gene = HashMap::new();
    while let Some(record) = reader.next() {
        let record = record.with_context(|| format!("invalid fasta record in {}", fasta))?;
        let header = String::from_utf8_lossy(record.id());
        let (transcript, gene) = parse_header(&header);
        transcript_to_gene
            .entry(transcript.to_string())
            .or_insert(gene);
    }
    log::info!(
        "{} transcripts mapped from {}",
        transcript_to_gene.len(),
        fasta
    );
    Ok(transcript_to_gene)
}

/// Stream the table and write it back out with a leading GENE column.
/// The header must contain a TRANSCRIPT column and every row must have the
/// header's field count; anything else is a fatal error.
pub fn annotate_table<R: io::Read, W: io::Write>(
    transcript_to_gene: &HashMap<String, String>,
    reader: &mut csv::Reader<R>,
    writer: &mut csv::Writer<W>,
) -> Result<()> {
    let headers = reader.headers()?.clone();
    let transcript_idx = headers
        .iter()
        .position(|field| field == TRANSCRIPT_COLUMN)
        .ok_or_else(|| anyhow!("table has no {} column", TRANSCRIPT_COLUMN))?;

    let mut out_headers = csv::StringRecord::new();
    out_headers.push_field(GENE_COLUMN);
    out_headers.extend(&headers);
    writer.write_record(&out_headers)?;

    for (idx, row) in reader.records().enumerate() {
        // header is line 1
        let row = row.with_context(|| format!("malformed table row at line {}", idx + 2))?;
        let transcript = row
            .get(transcript_idx)
            .ok_or_else(|| anyhow!("no {} field at line {}", TRANSCRIPT_COLUMN, idx + 2))?;
        let gene = transcript_to_gene
            .get(transcript)
            .map(String::as_str)
            .unwrap_or(NO_GENE);

        let mut out_row = csv::StringRecord::new();
        out_row.push_field(gene);
        out_row.extend(&row);
        writer.write_record(&out_row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Annotate a tab-separated table with a GENE column looked up from a FASTA.
pub fn add_gene_column(fasta: &str, table: &str, output: &str) -> Result<()> {
    let transcript_to_gene = gene_map_from_fasta(fasta)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(myio::reader(table)?);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(myio::writer(output)?);
    annotate_table(&transcript_to_gene, &mut reader, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tsv_reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(data.as_bytes())
    }

    fn tsv_writer() -> csv::Writer<Vec<u8>> {
        csv::WriterBuilder::new().delimiter(b'\t').from_writer(vec![])
    }

    fn annotate(map: &HashMap<String, String>, table: &str) -> Result<String> {
        let mut reader = tsv_reader(table);
        let mut writer = tsv_writer();
        annotate_table(map, &mut reader, &mut writer)?;
        Ok(String::from_utf8(writer.into_inner().unwrap()).unwrap())
    }

    #[test]
    fn test_gene_prepended_by_lookup() {
        let map = HashMap::from([("rna-X1".to_string(), "ABC".to_string())]);
        let out = annotate(
            &map,
            "TRANSCRIPT\tPN\tPS\nrna-X1\t4\t2\nrna-missing\t0\t1\n",
        )
        .unwrap();
        assert_eq!(
            out,
            "GENE\tTRANSCRIPT\tPN\tPS\nABC\trna-X1\t4\t2\nNA\trna-missing\t0\t1\n"
        );
    }

    #[test]
    fn test_missing_transcript_column_is_fatal() {
        let map = HashMap::new();
        let err = annotate(&map, "ID\tPN\nrna-X1\t4\n").unwrap_err();
        assert!(err.to_string().contains("TRANSCRIPT"));
    }

    #[test]
    fn test_ragged_row_is_fatal() {
        let map = HashMap::new();
        assert!(annotate(&map, "TRANSCRIPT\tPN\nrna-X1\t4\t9\n").is_err());
    }

    #[test]
    fn test_header_parsing() {
        assert_eq!(
            parse_header("rna-XM_070211082.1 gene=LOC1 product=x"),
            ("rna-XM_070211082.1", "LOC1".to_string())
        );
        // later gene= tokens override earlier ones
        assert_eq!(parse_header("t1 gene=A gene=B"), ("t1", "B".to_string()));
        assert_eq!(parse_header("t2"), ("t2", "NA".to_string()));
    }

    #[test]
    fn test_gene_map_first_record_wins() {
        let map = gene_map_from_fasta("test/transcripts.fa").unwrap();
        assert_eq!(map["rna-X1"], "ABC");
        assert_eq!(map["rna-X2"], "DEF");
        // rna-X3 has no gene= annotation
        assert_eq!(map["rna-X3"], "NA");
    }
}
