use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;
use std::time::Instant;

use image_preprocessor::cli::Args;
use image_preprocessor::image_processing::{ProcessingConfig, ProcessingEngine, Progress};
use image_preprocessor::json_output::JsonMessage;
use image_preprocessor::logging::{level_for, setup_logging};
use image_preprocessor::utils::{create_progress_bar, format_duration, validate_inputs};

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut args = Args::parse();
    let json_mode = args.json_progress;

    // Log lines suspend this bar while they print
    let main_progress = if json_mode {
        ProgressBar::hidden()
    } else {
        create_progress_bar(0)?
    };
    setup_logging(level_for(args.verbose), !json_mode, main_progress.clone())
        .context("Failed to initialize logging")?;

    args.load_and_merge_config()?;

    if !json_mode {
        println!("{}", style("Image Preprocessor").bold().blue());
        println!("{}", style("Resize + denoise + augmentation").dim());
        println!();
    }

    validate_inputs(&args)?;

    let config = ProcessingConfig {
        pipeline: args.pipeline_config(),
        extensions: args.parse_extensions(),
        parallel_jobs: args.parallel_jobs(),
        seed: args.seed,
        dry_run: args.dry_run,
    };

    if args.verbose && !json_mode {
        let augmentation = &config.pipeline.augmentation;
        println!("{}", style("Configuration:").bold());
        println!(
            "  Target size: {}x{}",
            config.pipeline.target_size, config.pipeline.target_size
        );
        println!("  Denoising: {:?}", config.pipeline.blur);
        println!("  Flip probability: {}", augmentation.flip_probability);
        println!("  Rotation: {:?} degrees", augmentation.rotation_degrees);
        println!("  Zoom: {:?}", augmentation.zoom);
        println!("  Brightness: {:?}", augmentation.brightness);
        println!("  Contrast: {:?}", augmentation.contrast);
        println!("  Parallel jobs: {}", config.parallel_jobs);
        println!("  Extensions: {:?}", config.extensions);
        match config.seed {
            Some(seed) => println!("  Seed: {}", seed),
            None => println!("  Seed: random"),
        }
        if config.dry_run {
            println!("  Dry run mode: enabled (simulation only - no files will be created)");
        }
        println!();
    }

    let dry_run_mode = config.dry_run;
    let engine = ProcessingEngine::new(config)?;

    let report = if json_mode {
        engine.process_directory(&args.input_dir, &args.output_dir, JsonMessage::progress)?
    } else {
        main_progress.set_message("Processing images");

        let report = engine.process_directory(
            &args.input_dir,
            &args.output_dir,
            |progress: &Progress| {
                // Workers finish out of order, so count rather than seek
                main_progress.set_length(progress.total as u64);
                main_progress.inc(1);
                main_progress.set_message(progress.filename.clone());
            },
        )?;

        main_progress.finish_with_message("Processing complete!");
        println!();
        report
    };

    if json_mode {
        JsonMessage::report(&report);
        return Ok(());
    }

    let header = if dry_run_mode {
        style("Dry Run Results Summary:").bold().cyan()
    } else {
        style("Results Summary:").bold().green()
    };
    println!("{}", header);

    let processed_label = if dry_run_mode {
        "Would be processed"
    } else {
        "Successfully processed"
    };
    println!(
        "  {}: {}/{}",
        processed_label,
        style(report.processed()).bold().green(),
        report.total()
    );
    if report.failed() > 0 {
        println!("  Failed: {}", style(report.failed()).bold().red());
    }
    println!(
        "  Success rate: {}",
        style(format!("{:.1}%", report.success_rate())).bold()
    );

    let total_time = start_time.elapsed();
    println!();
    println!("{}", style("Performance:").bold().blue());
    println!(
        "  Total processing time: {}",
        style(format_duration(total_time)).bold()
    );
    if report.total() > 0 {
        println!(
            "  Average time per image: {}",
            style(format_duration(report.duration / report.total() as u32)).dim()
        );
    }

    println!();
    let location_label = if dry_run_mode {
        "Would be saved to"
    } else {
        "Output directory"
    };
    println!("  {}: {}", location_label, args.output_dir.display());

    if report.failed() > 0 {
        println!();
        println!("{}", style("Errors encountered:").bold().red());
        for (i, (path, error)) in report.failures().enumerate() {
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("unknown");
            println!(
                "  {}: {} - {}",
                style(format!("#{}", i + 1)).dim(),
                style(filename).bold().red(),
                error
            );
        }
        println!();
        println!("  Check image files and try again with --verbose for more details");
    }

    Ok(())
}
