use colored::Colorize;
use env_logger::{Builder, Target};
use genoprep::cli::Commands;
use genoprep::*;
use log::LevelFilter;
use std::time::Instant;

fn main() {
    if let Err(err) = parse_cli() {
        eprintln!("{}: {:?}", "Error".bright_red().bold(), err);
        std::process::exit(1);
    }
}

pub fn parse_cli() -> anyhow::Result<()> {
    let pg_start = Instant::now();
    let args = cli::make_cli_parse();
    let matches = cli::make_cli_app().get_matches();
    let subcommand = matches.subcommand_name().unwrap();

    // set the logging level
    let min_log_level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .target(Target::Stderr)
        .filter(None, min_log_level)
        .init();

    log::debug!("DEBUG logging enabled");
    log::trace!("TRACE logging enabled");

    match &args.command {
        //
        // Run FastqManifest
        //
        Some(Commands::FastqManifest { folder, outdir }) => {
            let manifest = manifest::SampleManifest::from_folder(folder)?;
            log::info!(
                "{} paired-end and {} single-end samples found in {}",
                manifest.paired.len(),
                manifest.single.len(),
                folder
            );
            manifest.write_json(outdir)?;
        }
        //
        // Run RepGroups
        //
        Some(Commands::RepGroups { folder }) => {
            let groups = groups::group_replicates_in_folder(folder)?;
            log::info!("{} replicate groups found in {}", groups.len(), folder);
            println!("GROUPS: {}", serde_json::to_string_pretty(&groups)?);
        }
        //
        // Run AddGene
        //
        Some(Commands::AddGene {
            fasta,
            table,
            output,
        }) => {
            annotate::add_gene_column(fasta, table, output)?;
        }
        //
        // Run PrepCds
        //
        Some(Commands::PrepCds { input, output }) => {
            cds::prep_cds(input, output)?;
        }
        //
        // no command opt
        //
        None => {}
    };

    let duration = pg_start.elapsed();
    log::info!(
        "{} done! Time elapsed: {}",
        subcommand.bright_green().bold(),
        format!("{:.2?}", duration).bright_yellow().bold()
    );
    Ok(())
}
