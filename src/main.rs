//! Command line host for the incremental Game of Life engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use incremental_life::{
    config::{CliOverrides, Settings},
    game_of_life::{
        create_example_patterns, save_grid_as_pattern, EngineValidator, FrameScheduler,
        SimulationEngine,
    },
    utils::{ColorOutput, GridFormatter},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "incremental_life")]
#[command(about = "Incremental Game of Life simulator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct GridArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Life 1.05 pattern file (overrides config)
    #[arg(short, long)]
    pattern: Option<PathBuf>,

    /// Rule string such as 23/3 (overrides config)
    #[arg(short, long)]
    rules: Option<String>,

    /// Surface width in pixels (overrides config)
    #[arg(long)]
    width: Option<usize>,

    /// Surface height in pixels (overrides config)
    #[arg(long)]
    height: Option<usize>,

    /// Cell size in pixels (overrides config)
    #[arg(long)]
    resolution: Option<usize>,

    /// Toroidal wraparound (overrides config)
    #[arg(long)]
    wrap: Option<bool>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        #[command(flatten)]
        grid: GridArgs,

        /// Number of generations to run
        #[arg(short, long, default_value_t = 100)]
        generations: usize,

        /// Generations per second (overrides config)
        #[arg(short, long)]
        frame_rate: Option<f64>,

        /// Print the grid after every generation
        #[arg(long)]
        show_evolution: bool,

        /// Print a JSON summary instead of the grid
        #[arg(long)]
        json: bool,

        /// Save the final state as a Life 1.05 pattern
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the incremental engine against a full-grid recomputation
    Verify {
        #[command(flatten)]
        grid: GridArgs,

        /// Number of generations to compare
        #[arg(short, long, default_value_t = 100)]
        generations: usize,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            grid,
            generations,
            frame_rate,
            show_evolution,
            json,
            output,
        } => run_command(grid, generations, frame_rate, show_evolution, json, output),
        Commands::Verify { grid, generations } => verify_command(grid, generations),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(args: &GridArgs, frame_rate: Option<f64>) -> Result<Settings> {
    let mut settings = if args.config.exists() {
        Settings::from_file(&args.config)
            .with_context(|| format!("Failed to load config from {}", args.config.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                args.config.display()
            ))
        );
        Settings::default()
    };

    settings.merge_with_cli(&CliOverrides {
        width: args.width,
        height: args.height,
        resolution: args.resolution,
        wrap: args.wrap,
        rules: args.rules.clone(),
        pattern: args.pattern.clone(),
        frame_rate,
    });
    settings
        .validate()
        .context("Configuration validation failed")?;
    Ok(settings)
}

fn build_engine(settings: &Settings) -> Result<(SimulationEngine, FrameScheduler)> {
    let config = settings.resolve()?;
    let engine = SimulationEngine::new(&config).context("Failed to build simulation")?;
    Ok((engine, FrameScheduler::from_config(&config)))
}

fn run_command(
    args: GridArgs,
    generations: usize,
    frame_rate: Option<f64>,
    show_evolution: bool,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings(&args, frame_rate)?;
    let (mut engine, scheduler) = build_engine(&settings)?;

    if !json {
        println!("{}", ColorOutput::info(&GridFormatter::format_status(&engine)));
    }

    let start_time = Instant::now();
    for _ in 0..generations {
        scheduler.tick(&mut engine);
        if show_evolution && !json {
            println!("{}", GridFormatter::format_status(&engine));
            println!("{}", GridFormatter::format_grid_compact(engine.grid()));
        }
    }
    let total_time = start_time.elapsed();

    if json {
        let summary = GridFormatter::summary(&engine);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        if !show_evolution {
            println!("{}", GridFormatter::format_grid_compact(engine.grid()));
        }
        println!(
            "{}",
            ColorOutput::success(&format!(
                "Ran {} generation(s) in {:.3}s, population {}",
                generations,
                total_time.as_secs_f64(),
                engine.population()
            ))
        );
    }

    if let Some(path) = output {
        save_grid_as_pattern(engine.grid(), &path)?;
        if !json {
            println!("Saved final state to {}", path.display());
        }
    }

    Ok(())
}

fn verify_command(args: GridArgs, generations: usize) -> Result<()> {
    let settings = load_settings(&args, None)?;
    let (mut engine, _) = build_engine(&settings)?;

    println!(
        "{}",
        ColorOutput::info(&format!(
            "Comparing {} generation(s) on a {}x{} grid...",
            generations,
            engine.columns(),
            engine.rows()
        ))
    );

    let report = EngineValidator::verify(&mut engine, generations);
    println!("{}", report);

    if report.is_consistent() {
        println!("{}", ColorOutput::success("Engine matches the reference"));
        Ok(())
    } else {
        println!("{}", ColorOutput::error("Engine diverged from the reference"));
        anyhow::bail!(
            "{} discrepancies at generation {}",
            report.discrepancies.len(),
            report.generations_checked
        )
    }
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let pattern_dir = directory.join("patterns");

    for dir in [&config_dir, &pattern_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    write_settings(&config_dir.join("default.yaml"), &Settings::default(), force)?;

    create_example_patterns(&pattern_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", pattern_dir.display());

    let mut rpentomino = Settings::default();
    rpentomino.pattern = Some(PathBuf::from("patterns/rpentomino.lif"));
    rpentomino.frame_rate = Some(30.0);
    write_settings(&config_dir.join("rpentomino.yaml"), &rpentomino, force)?;

    let mut replicator = Settings::default();
    replicator.grid.wrap = false;
    replicator.pattern = Some(PathBuf::from("patterns/highlife_replicator.lif"));
    write_settings(&config_dir.join("highlife.yaml"), &replicator, force)?;

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add Life 1.05 patterns to {}", pattern_dir.display());
    println!("3. Run: cargo run -- run --config config/rpentomino.yaml");

    Ok(())
}

fn write_settings(path: &Path, settings: &Settings, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Skipped: {} (already exists)", path.display());
        return Ok(());
    }
    settings
        .to_file(&path.to_path_buf())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "incremental_life",
            "run",
            "--config",
            "test.yaml",
            "--generations",
            "5",
            "--rules",
            "23/36",
            "--wrap",
            "false",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["incremental_life", "verify", "-g", "10"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("patterns/rpentomino.lif").exists());
    }

    #[test]
    fn test_verify_command_with_pattern() {
        let temp_dir = tempdir().unwrap();
        create_example_patterns(temp_dir.path()).unwrap();

        let args = GridArgs {
            config: temp_dir.path().join("missing.yaml"),
            pattern: Some(temp_dir.path().join("acorn.lif")),
            width: Some(300),
            height: Some(300),
            ..Default::default()
        };
        verify_command(args, 30).unwrap();
    }
}
