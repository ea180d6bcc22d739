#[macro_use]
extern crate log;

use std::collections::BTreeSet;
use std::path::Path;
use std::process;

use clap::ArgMatches;
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use rust_htslib::bam::{self, Read as _};

use covarrect::cli::{build_cli, set_log_level, Config};
use covarrect::correct::ReadCorrector;
use covarrect::dispatch::Dispatcher;
use covarrect::error::Result;
use covarrect::io::{
    check_coordinate_sorted, open_indexed, read_precomputed_stats, reference_length,
    validate_header, write_results,
};
use covarrect::reads::Read as ProjectedRead;
use covarrect::stats::{benjamini_hochberg, max_read_length, ColumnStats};

fn main() {
    let app = build_cli();
    let matches = app.clone().get_matches();

    match matches.subcommand() {
        Some(("correct", m)) => {
            set_log_level(m);
            match run_correct(m) {
                Ok(()) => info!("correction complete."),
                Err(e) => {
                    error!("correction failed: {}", e);
                    process::exit(1);
                }
            }
        }
        Some(("shell-completion", m)) => {
            let shell = *m.get_one::<Shell>("shell").unwrap();
            let output_file = m.get_one::<String>("output-file").unwrap();
            let mut file = std::fs::File::create(output_file).expect("failed to open output file");
            let mut cmd = build_cli();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut file);
        }
        _ => {
            let mut app = build_cli();
            app.print_help().unwrap();
            println!();
        }
    }
}

fn run_correct(m: &ArgMatches) -> Result<()> {
    let config = Config::from_matches(m)?;
    debug!("resolved configuration: {:?}", config);

    info!("opening {}", &config.bam_file);
    let mut indexed = open_indexed(&config.bam_file)?;
    let header = indexed.header().clone();
    validate_header(&header)?;
    check_coordinate_sorted(&config.bam_file, &header)?;
    let ref_len = reference_length(&header) as i64;

    info!("accumulating column statistics over reference length {}", ref_len);
    let mut all_reads = Vec::new();
    indexed.fetch((0, 0, ref_len))?;
    for record in indexed.records() {
        let record = record?;
        if record.is_unmapped() {
            continue;
        }
        all_reads.push(ProjectedRead::from_record(&record)?);
    }

    let mut counts = Array2::<u32>::zeros((ref_len.max(0) as usize, 5));
    for read in &all_reads {
        let (sequence, positions) = read.project();
        ColumnStats::accumulate_projection(&mut counts, 0, &sequence, &positions);
    }
    let stats = ColumnStats::from_counts(0, counts);
    let max_len = max_read_length(&all_reads);
    debug!("max_read_length = {}", max_len);

    let results = if let Some(path) = &config.all_fe_tests {
        info!("loading precomputed statistics from {}", path);
        read_precomputed_stats(Path::new(path))?
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("[{elapsed_precise}] {spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("testing candidate column pairs for covariation");
        pb.enable_steady_tick(std::time::Duration::from_millis(200));

        let dispatcher = Dispatcher::new(config.bam_file.clone(), config.block_size, config.ncpu)?;
        let results = dispatcher.run(&stats, max_len)?;
        pb.finish_with_message(format!("{} pair/character tests complete", results.len()));
        results
    };

    if let Some(path) = &config.write_stats {
        info!("writing full statistical universe to {}", path);
        write_results(Path::new(path), &results)?;
    }

    let covarying_sites: BTreeSet<i64> = benjamini_hochberg(&results, config.fdr);
    info!("{} reference columns selected as covarying", covarying_sites.len());

    let corrector = ReadCorrector::new(&stats, &covarying_sites);
    let mut reader = bam::Reader::from_path(&config.bam_file)?;
    let out_header = bam::Header::from_template(&header);
    let mut writer = bam::Writer::from_path(&config.output, &out_header, bam::Format::Bam)?;

    corrector.correct_all(&mut reader, &mut writer)?;

    Ok(())
}
