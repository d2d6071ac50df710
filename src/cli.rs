use clap::IntoApp;
use clap::{AppSettings, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    propagate_version = true,
    subcommand_required = true,
    infer_subcommands = true,
    arg_required_else_help = true,
    help_expected = true
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
pub struct Cli {
    /// Logging level [-v: Info, -vv: Debug, -vvv: Trace].
    #[clap(short, long, parse(from_occurrences), help_heading = "DEBUG")]
    pub verbose: usize,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

///
/// This structure contains all the subcommands for genoprep and their help descriptions.
///
/// Because of naming conventions for rust enums the commands names have
/// different capitalization than on the command line.
/// For example, the `FastqManifest` enum is invoked using
/// `genoprep fastq-manifest` and the `PrepCds` command with `genoprep prep-cds`.
///
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build paired-end and single-end sample manifests from a folder of FASTQ files.
    ///
    /// FASTQ file names should have the following format:
    ///
    /// paired-end: `<sample_name>.R1.fastq.gz` and `<sample_name>.R2.fastq.gz`
    ///
    /// single-end: `<sample_name>.R1.fastq.gz`
    ///
    /// A sample with any matching R2 file is classified paired-end, otherwise
    /// single-end. Writes `samples_pe.json` and `samples_se.json` (sorted keys,
    /// sorted file lists).
    #[clap(visible_aliases = &["manifest", "fm"])]
    FastqManifest {
        /// Folder containing FASTQ files.
        folder: String,
        /// Directory the two JSON manifests are written into.
        #[clap(short = 'd', long, default_value = ".")]
        outdir: String,
    },
    /// Group replicate FASTQ files by biological sample.
    ///
    /// File names matching `<sample>_<replicate>.R<mate>.fastq.gz` are grouped
    /// under `<sample>`, and one JSON object prefixed with `GROUPS: ` is
    /// printed to stdout. The prefix is not JSON; consumers must strip it.
    #[clap(visible_aliases = &["groups", "rg"])]
    RepGroups {
        /// Folder containing FASTQ files.
        folder: String,
    },
    /// Prepend a GENE column to a tab-separated table by transcript lookup.
    ///
    /// The FASTA headers provide the transcript to gene mapping: the first
    /// whitespace token is the transcript ID and a `gene=<id>` token names the
    /// gene (`NA` if absent). Each table row's TRANSCRIPT field is looked up
    /// and the matching gene (or `NA`) is written as a new leading GENE column.
    #[clap(visible_aliases = &["gene", "ag"])]
    AddGene {
        /// FASTA file whose headers provide the transcript to gene mapping.
        #[clap(short, long)]
        fasta: String,
        /// Tab-separated input table with a TRANSCRIPT column.
        #[clap(short, long, default_value = "-")]
        table: String,
        /// Output table, tab-separated, with the GENE column prepended.
        #[clap(short, long, default_value = "-")]
        output: String,
    },
    /// Concatenate per-species CDS FASTA files with rewritten headers.
    ///
    /// Each record ID becomes
    /// `<id> gene=<gene> species=<species_id> line=<line_id>` where the gene
    /// comes from a `gene=` segment of the original header (`UNKNOWN` if
    /// absent) and the line ID is the FASTA basename without `.CDS.fasta`.
    #[clap(visible_aliases = &["cds", "pc"])]
    PrepCds {
        /// Tab-delimited file with species ID and CDS FASTA path per line.
        #[clap(short, long)]
        input: String,
        /// Output concatenated FASTA file.
        #[clap(short, long)]
        output: String,
    },
}

pub fn make_cli_parse() -> Cli {
    Cli::parse()
}

pub fn make_cli_app() -> clap::Command<'static> {
    Cli::command()
}
