//! Wordlist Sieve - streaming filter, analyzer and splitter for wordlists
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use wordlist_sieve::cli::{Args, Mode};
use wordlist_sieve::common::CommonEntries;
use wordlist_sieve::processor::{Processor, ProcessorConfig};
use wordlist_sieve::progress::{
    format_number, print_analysis, print_banner, print_error, print_filter_summary, print_header,
    print_info, print_split_summary, print_success, print_warning,
};
use wordlist_sieve::rules::FilterOptions;

fn main() {
    let args = Args::parse();

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
    }

    let mode = args.mode()?;
    let options = args.filter_options();
    let config = args.processor_config()?;

    if args.verbose {
        print_config(&args, &mode, &options, &config);
    }

    let common = if args.needs_common_list() {
        CommonEntries::load_or_default(&args.common_list, args.common_limit)
    } else {
        CommonEntries::builtin()
    };

    let processor = Processor::new(&options, common, config)?;

    match mode {
        Mode::Filter { output } => {
            let summary = processor.filter_file(&args.input, &output)?;
            if !args.quiet {
                print_filter_summary(&summary);
                if summary.filtered == 0 && summary.total > 0 {
                    print_warning("No entries passed the filters");
                }
            }
        }
        Mode::Analyze => {
            let snapshot = processor.analyze_file(&args.input)?;
            if !args.quiet {
                print_analysis(&snapshot);
            }
        }
        Mode::Split { prefix, chunk_size } => {
            let summary = processor.split_file(&args.input, &prefix, chunk_size)?;
            if !args.quiet {
                print_split_summary(&summary);
                print_success(&format!(
                    "{} lines in {} shards",
                    format_number(summary.total_lines),
                    summary.shard_count()
                ));
            }
        }
    }

    Ok(())
}

fn print_config(args: &Args, mode: &Mode, options: &FilterOptions, config: &ProcessorConfig) {
    print_header("Configuration");

    print_info(&format!("Input:        {:?}", args.input));
    match mode {
        Mode::Filter { output } => print_info(&format!("Output:       {:?}", output)),
        Mode::Analyze => print_info("Mode:         analyze"),
        Mode::Split { prefix, chunk_size } => {
            print_info(&format!("Shard prefix: {:?}", prefix));
            print_info(&format!("Shard lines:  {}", chunk_size));
        }
    }

    if let Some(min) = options.min_length {
        print_info(&format!("Min length:   {}", min));
    }
    if let Some(max) = options.max_length {
        print_info(&format!("Max length:   {}", max));
    }
    if let Some(ref pattern) = options.custom_pattern {
        print_info(&format!("Exclude:      {}", pattern));
    }

    print_info(&format!("Dedup:        {}", options.keep_unique));
    print_info(&format!("Mmap:         {}", config.use_mmap));
    print_info(&format!("Parallel:     {}", config.parallel));
    print_info(&format!("Buffer size:  {} MB", config.write_buffer / (1024 * 1024)));
    print_info(&format!("Threads:      {}", args.threads.unwrap_or_else(num_cpus::get)));
}
