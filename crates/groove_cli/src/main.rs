use std::fs;
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use groove_core::fitness::{evaluate, TargetTable, DEFAULT_TARGETS};
use groove_core::{generate, Genre, PatternParams};

#[derive(Parser)]
#[command(name = "groove-cli", about = "Explore and benchmark the groove pattern core off-device")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run `generate()` once and print the resulting pattern.
    Generate(ParamArgs),
    /// Run `generate()` then `evaluate()` and print the fitness report.
    Evaluate {
        #[command(flatten)]
        params: ParamArgs,
        /// Path to a TargetTable JSON override.
        #[arg(long)]
        targets: Option<String>,
    },
    /// Benchmark `generate()` in a tight loop.
    Bench {
        #[command(flatten)]
        params: ParamArgs,
        #[arg(long, default_value_t = 100_000)]
        iterations: u32,
    },
    /// Sweep one parameter across [0, 1] at a fixed seed.
    Scan {
        #[command(flatten)]
        params: ParamArgs,
        /// Which field to sweep.
        #[arg(long, value_enum, default_value_t = ScanField::Energy)]
        field: ScanField,
        #[arg(long, default_value_t = 21)]
        steps: u32,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ScanField {
    Energy,
    Shape,
    AxisX,
    AxisY,
    Balance,
}

#[derive(Parser)]
struct ParamArgs {
    #[arg(long, default_value_t = 0.5)]
    energy: f32,
    #[arg(long, default_value_t = 0.3)]
    shape: f32,
    #[arg(long = "axis-x", default_value_t = 0.5)]
    axis_x: f32,
    #[arg(long = "axis-y", default_value_t = 0.5)]
    axis_y: f32,
    #[arg(long, default_value_t = 0.0)]
    drift: f32,
    #[arg(long, default_value_t = 0.5)]
    accent: f32,
    #[arg(long, default_value_t = 0.5)]
    balance: f32,
    #[arg(long, default_value_t = 0.5)]
    build: f32,
    #[arg(long, default_value_t = 0.0)]
    swing: f32,
    #[arg(long = "phrase-progress", default_value_t = 0.0)]
    phrase_progress: f32,
    #[arg(long, value_enum, default_value_t = GenreArg::Techno)]
    genre: GenreArg,
    #[arg(long = "pattern-length", default_value_t = 32)]
    pattern_length: u8,
    #[arg(long, default_value_t = 0xDEAD_BEEF)]
    seed: u32,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum GenreArg {
    Techno,
    Tribal,
    Idm,
}

impl From<GenreArg> for Genre {
    fn from(g: GenreArg) -> Genre {
        match g {
            GenreArg::Techno => Genre::Techno,
            GenreArg::Tribal => Genre::Tribal,
            GenreArg::Idm => Genre::Idm,
        }
    }
}

impl From<&ParamArgs> for PatternParams {
    fn from(a: &ParamArgs) -> PatternParams {
        PatternParams {
            energy: a.energy,
            shape: a.shape,
            axis_x: a.axis_x,
            axis_y: a.axis_y,
            drift: a.drift,
            accent: a.accent,
            balance: a.balance,
            build: a.build,
            swing: a.swing,
            phrase_progress: a.phrase_progress,
            genre: a.genre.into(),
            pattern_length: a.pattern_length,
            seed: a.seed,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => run_generate(&args),
        Command::Evaluate { params, targets } => run_evaluate(&params, targets.as_deref()),
        Command::Bench { params, iterations } => run_bench(&params, iterations),
        Command::Scan {
            params,
            field,
            steps,
        } => run_scan(&params, field, steps),
    }
}

fn run_generate(args: &ParamArgs) {
    let params: PatternParams = args.into();
    let result = generate(params);
    print_pattern(&result);
}

fn print_pattern(result: &groove_core::PatternResult) {
    for (label, mask, vel) in [
        ("anchor", result.anchor_mask, &result.anchor_vel),
        ("shimmer", result.shimmer_mask, &result.shimmer_vel),
        ("aux", result.aux_mask, &result.aux_vel),
    ] {
        let mut row = String::new();
        for step in 0..result.pattern_length {
            if mask.is_set(step) {
                row.push_str(&format!("{:.2} ", vel[step as usize]).green().to_string());
            } else {
                row.push_str("-.-- ".dimmed().to_string().as_str());
            }
        }
        println!("{:>8}: {}", label.bold(), row);
    }
    println!("{:>8}: {:.3}", "swing".bold(), result.swing_amount);
}

fn load_targets(path: Option<&str>) -> TargetTable {
    match path {
        None => DEFAULT_TARGETS,
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("{}: {e}", "failed to read targets file".red());
                std::process::exit(1);
            });
            TargetTable::from_json(&text).unwrap_or_else(|e| {
                eprintln!("{}: {e}", "invalid target table".red());
                std::process::exit(1);
            })
        }
    }
}

fn run_evaluate(args: &ParamArgs, targets_path: Option<&str>) {
    let params: PatternParams = args.into();
    let result = generate(params);
    let targets = load_targets(targets_path);
    let report = evaluate(&result, &params, &targets);

    println!("{}", "raw".bold());
    println!("  syncopation:      {:.3}", report.raw.syncopation);
    println!("  density:          {:.3}", report.raw.density);
    println!("  velocity range:   {:.3}", report.raw.velocity_range);
    println!("  voice separation: {:.3}", report.raw.voice_separation);
    println!("  regularity:       {:.3}", report.raw.regularity);
    println!("{}", "scores".bold());
    println!("  syncopation:      {:.3}", report.scores.syncopation);
    println!("  density:          {:.3}", report.scores.density);
    println!("  velocity range:   {:.3}", report.scores.velocity_range);
    println!("  voice separation: {:.3}", report.scores.voice_separation);
    println!("  regularity:       {:.3}", report.scores.regularity);
    println!("{}: {:.3}", "composite".bold(), report.composite);
}

fn run_bench(args: &ParamArgs, iterations: u32) {
    let params: PatternParams = args.into();
    tracing::info!(iterations, "starting bench run");

    // Warm up before timing individual calls.
    for _ in 0..1000 {
        std::hint::black_box(generate(params));
    }

    let mut min_ns = u64::MAX;
    let mut max_ns = 0u64;
    let mut total_ns: u128 = 0;
    for _ in 0..iterations {
        let start = Instant::now();
        std::hint::black_box(generate(params));
        let elapsed = start.elapsed().as_nanos() as u64;
        min_ns = min_ns.min(elapsed);
        max_ns = max_ns.max(elapsed);
        total_ns += elapsed as u128;
    }
    let avg_ns = total_ns / iterations.max(1) as u128;

    println!("{} {iterations} iterations", "ran".bold());
    println!("  min: {min_ns} ns");
    println!("  avg: {avg_ns} ns");
    println!("  max: {max_ns} ns");
}

fn run_scan(args: &ParamArgs, field: ScanField, steps: u32) {
    let steps = steps.max(2);
    for i in 0..steps {
        let t = i as f32 / (steps - 1) as f32;
        let mut params: PatternParams = args.into();
        match field {
            ScanField::Energy => params.energy = t,
            ScanField::Shape => params.shape = t,
            ScanField::AxisX => params.axis_x = t,
            ScanField::AxisY => params.axis_y = t,
            ScanField::Balance => params.balance = t,
        }
        let result = generate(params);
        println!(
            "{t:>5.2}  anchor={:>2}  shimmer={:>2}  aux={:>2}",
            result.anchor_mask.popcount(),
            result.shimmer_mask.popcount(),
            result.aux_mask.popcount(),
        );
    }
}
