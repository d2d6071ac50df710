//! # Command line interface for genoprep
//! [genoprep command line interface, subcommands, and options.](cli::Commands)
//! # README for genoprep
#![doc = include_str!("../README.md")]
/// Prepend a GENE column to tab-separated tables by transcript lookup.
pub mod annotate;
/// Concatenate CDS fasta files with rewritten headers.
pub mod cds;
/// Command line interface for genoprep.
pub mod cli;
/// Group replicate FASTQ files by biological sample.
pub mod groups;
/// Build paired-end and single-end sample manifests from FASTQ folders.
pub mod manifest;
/// Module for automatically reading and writing compressed or uncompressed files.
pub mod myio;
