use anyhow::{Context, Result};
use chain_gen::config::{
    chains_to_json, check_chains, load_chains, load_inputs, write_chains_to_file, Config,
};
use chain_gen::CandidateEmitter;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(e) = init_logger(&config) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(config: &Config) -> Result<()> {
    let mut logger_builder = env_logger::Builder::from_default_env();
    logger_builder.filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info));

    if let Some(log_file_path) = &config.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(log_file_path)
            .with_context(|| format!("Failed to open log file {:?}", log_file_path))?;

        // Mirror log output to stderr and the file
        struct DualWriter {
            file: std::fs::File,
        }

        impl Write for DualWriter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                std::io::stderr().write_all(buf)?;
                self.file.write_all(buf)?;
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                std::io::stderr().flush()?;
                self.file.flush()
            }
        }

        logger_builder.target(env_logger::Target::Pipe(Box::new(DualWriter { file })));
    }

    logger_builder.init();
    Ok(())
}

fn run(config: &Config) -> Result<ExitCode> {
    info!("Configuration: {:?}", config);

    let (graph, registry) = load_inputs(config).context("Failed to load inputs")?;

    if let Some(path) = &config.check {
        let chains =
            load_chains(path).with_context(|| format!("Failed to load chains from {:?}", path))?;
        let (reports, invalid) = check_chains(&chains, &registry);
        for (chain, report) in &reports {
            let verdict = match report.verdict() {
                Some(mode) => mode.to_string(),
                None => format!(
                    "invalid (distinct: {}, forward reuse: {}, reverse reuse: {})",
                    report.distinct, report.forward_matches, report.reverse_matches
                ),
            };
            let words: Vec<&str> = chain.iter().map(|w| w.as_str()).collect();
            println!("{}: {}", words.join(" "), verdict);
        }
        return Ok(if invalid > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS });
    }

    // Use the given seed, otherwise draw one so the run can be replayed
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Using seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let options = config.emitter_options();
    info!("Mode: {:?}", options.mode);
    let emitter = CandidateEmitter::new(&graph, &registry, options);
    let report = emitter.run(&mut rng)?;

    match &config.output {
        Some(path) => {
            write_chains_to_file(&report.chains, path)
                .with_context(|| format!("Failed to write chains to {:?}", path))?;
            info!("Wrote {} chains to {:?}", report.chains.len(), path);
        }
        None => println!("{}", chains_to_json(&report.chains)?),
    }

    if report.deficit() > 0 {
        eprintln!(
            "Warning: found {} of {} requested chains ({} short)",
            report.chains.len(),
            report.requested,
            report.deficit()
        );
    }

    Ok(ExitCode::SUCCESS)
}
