use box_compiler::config::RuntimeConfig;
use box_compiler::{batch, logging, pipeline};
use std::env;
use std::path::{Path, PathBuf};
use std::process;

/// Options collected from the command line after the input path
#[derive(Debug)]
struct CliOptions {
    batch: batch::BatchConfig,
    write_dump: bool,
    quiet: bool,
    config_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("box_compiler");

    if args.len() < 2 {
        print_usage(program_name);
        process::exit(1);
    }

    if args[1] == "--help" {
        print_help(program_name);
        return Ok(());
    }

    let mut options = parse_options(&args[2..]);
    let runtime = load_runtime_config(&options)?;

    // Preferences must be installed before the logging service is built
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    options.batch.runtime = runtime;
    if options.write_dump {
        options.batch.runtime.lexical.write_token_dump = true;
    }

    let input_path = Path::new(&args[1]);

    if input_path.is_file() {
        process_single_file(input_path, &options);
    } else if input_path.is_dir() {
        process_directory_batch(input_path, &options.batch);
    } else {
        eprintln!("File not found: {}", input_path.display());
        process::exit(1);
    }

    Ok(())
}

fn load_runtime_config(options: &CliOptions) -> Result<RuntimeConfig, Box<dyn std::error::Error>> {
    match &options.config_file {
        Some(path) => Ok(RuntimeConfig::load(path)?),
        None => Ok(RuntimeConfig::default()),
    }
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <input.box|directory> [options]", program_name);
    eprintln!("       {} --help", program_name);
}

fn print_help(program_name: &str) {
    println!("Box Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Scanner and package declaration checker for box source files");
    println!();
    println!("USAGE:");
    println!(
        "    {} <input.box> [options]          # Process single file",
        program_name
    );
    println!(
        "    {} <directory> [options]          # Process directory",
        program_name
    );
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --dump              Write the .bo token dump next to each source file");
    println!("    --sequential        Force sequential processing (no parallelism)");
    println!("    --threads N         Set maximum number of threads (default: auto)");
    println!("    --no-recursive      Don't search subdirectories");
    println!("    --max-files N       Limit maximum files to process");
    println!("    --fail-fast         Stop on first error");
    println!("    --quiet             Suppress token lines and progress reporting");
    println!("    --config FILE       Load runtime preferences from a TOML file");
    println!();
    println!("SINGLE FILE OUTPUT:");
    println!("    One line per accepted token:");
    println!("    Line: <line>, Offset: <column>, Type: <kind>, Value: <value>");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} main.box --dump                 # Single file with token dump",
        program_name
    );
    println!(
        "    {} src/ --threads 4                # 4 threads max",
        program_name
    );
    println!(
        "    {} src/ --sequential --fail-fast   # Sequential with early exit",
        program_name
    );
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE CAPABILITIES:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
}

fn parse_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        batch: batch::BatchConfig::default(),
        write_dump: false,
        quiet: false,
        config_file: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dump" => {
                options.write_dump = true;
            }
            "--sequential" => {
                options.batch.max_threads = 1;
            }
            "--threads" => match args.get(i + 1).map(|n| n.parse::<usize>()) {
                Some(Ok(threads)) => {
                    options.batch.max_threads = threads.max(1);
                    i += 1;
                }
                Some(Err(_)) => {
                    eprintln!("Warning: Invalid thread count '{}', using default", args[i + 1]);
                    i += 1;
                }
                None => eprintln!("Warning: --threads requires a number"),
            },
            "--max-files" => match args.get(i + 1).map(|n| n.parse::<usize>()) {
                Some(Ok(max_files)) => {
                    options.batch.max_files = Some(max_files);
                    i += 1;
                }
                Some(Err(_)) => {
                    eprintln!("Warning: Invalid max files '{}', ignoring", args[i + 1]);
                    i += 1;
                }
                None => eprintln!("Warning: --max-files requires a number"),
            },
            "--config" => match args.get(i + 1) {
                Some(path) => {
                    options.config_file = Some(PathBuf::from(path));
                    i += 1;
                }
                None => eprintln!("Warning: --config requires a file path"),
            },
            "--no-recursive" => {
                options.batch.recursive = false;
            }
            "--fail-fast" => {
                options.batch.fail_fast = true;
            }
            "--quiet" => {
                options.quiet = true;
            }
            other => {
                eprintln!("Warning: Unknown option '{}'", other);
            }
        }
        i += 1;
    }

    options.batch.progress_reporting = !options.quiet;
    options
}

fn process_single_file(file_path: &Path, options: &CliOptions) {
    let quiet = options.quiet;
    let mut print_token = |token: &box_compiler::tokens::Token| {
        if !quiet {
            println!("{}", token.classification_line());
        }
    };

    match pipeline::process_file_with_observer(file_path, &options.batch.runtime, &mut print_token)
    {
        Ok(result) => {
            println!(
                "\nSUCCESS: {} declaration(s), {} token(s) accepted",
                result.declarations, result.token_count
            );
            if let Some(dump_path) = &result.dump_path {
                println!("Token dump: {}", dump_path.display());
            }
            logging::print_cargo_style_summary();
        }
        Err(error) => {
            if error.is_file_not_found() {
                eprintln!("File not found: {}", file_path.display());
            } else {
                eprintln!("\nFAILED: {}", error);
                print_detailed_error(&error);
            }
            logging::print_cargo_style_summary();
            process::exit(1);
        }
    }
}

fn process_directory_batch(dir_path: &Path, config: &batch::BatchConfig) {
    println!("Starting batch processing: {}", dir_path.display());
    println!(
        "Configuration: {} threads, recursive={}, fail_fast={}, dump={}",
        config.effective_threads(),
        config.recursive,
        config.fail_fast,
        config.runtime.lexical.write_token_dump
    );

    match batch::process_directory_with_config(dir_path, config) {
        Ok(results) => {
            println!("\nBatch processing completed!");
            print_batch_results(&results);
            logging::print_cargo_style_summary();

            if results.failure_count() > 0 {
                process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("Batch processing failed: {}", error);
            logging::print_cargo_style_summary();
            process::exit(1);
        }
    }
}

fn print_batch_results(results: &batch::BatchResults) {
    println!("Batch Processing Summary:");
    println!("  Files discovered: {}", results.files_discovered);
    println!("  Files processed: {}", results.files_processed);
    println!(
        "  Successful: {} ({:.1}%)",
        results.success_count(),
        results.success_rate() * 100.0
    );
    println!("  Failed: {}", results.failure_count());
    println!("  Declarations: {}", results.total_declarations());
    println!(
        "  Total time: {:.2}s",
        results.processing_duration.as_secs_f64()
    );

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            println!("  {}: {}", file_path.display(), get_error_summary(error));
        }
    }

    if results.success_count() > 0 && results.success_count() <= 10 {
        println!("\nSuccessful Files:");
        for (file_path, result) in &results.successful_files {
            println!(
                "  {}: {} tokens, {} declarations",
                file_path.display(),
                result.token_count,
                result.declarations
            );
        }
    } else if results.success_count() > 10 {
        println!(
            "\n{} files processed successfully",
            results.success_count()
        );
    }
}

fn get_error_summary(error: &pipeline::PipelineError) -> String {
    let stage = match error {
        pipeline::PipelineError::FileProcessing(_) => "File processing error",
        pipeline::PipelineError::LexicalAnalysis(_) => "Lexical analysis error",
        pipeline::PipelineError::SyntaxValidation(_) => "Syntax validation error",
        pipeline::PipelineError::TokenDump(_) => "Token dump error",
        pipeline::PipelineError::Pipeline { .. } => "Pipeline error",
    };

    match error.position() {
        Some(position) => format!("{} at {}", stage, position),
        None => stage.to_string(),
    }
}

fn print_detailed_error(error: &pipeline::PipelineError) {
    match error {
        pipeline::PipelineError::FileProcessing(file_err) => {
            eprintln!("File processing stage failed:");
            eprintln!("  {}", file_err);
        }
        pipeline::PipelineError::LexicalAnalysis(lex_err) => {
            eprintln!("Lexical analysis stage failed:");
            eprintln!("  {}", lex_err);
        }
        pipeline::PipelineError::SyntaxValidation(syntax_err) => {
            eprintln!("Syntax validation stage failed:");
            eprintln!("  {}", syntax_err);
            eprintln!("  Action: {}", syntax_err.recommended_action());
        }
        pipeline::PipelineError::TokenDump(dump_err) => {
            eprintln!("Token dump stage failed:");
            eprintln!("  {}", dump_err);
        }
        pipeline::PipelineError::Pipeline { message } => {
            eprintln!("Pipeline error: {}", message);
        }
    }
}
