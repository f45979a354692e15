mod app;
mod button;
mod coloring;
mod config;
mod input;
mod model;
mod pair_sum;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{load_settings, project_paths, Args};
use env_logger::{Env, Target, WriteStyle};
use log::info;
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

const DEMO_A: [i64; 4] = [10, 40, 5, 280];
const DEMO_B: [i64; 5] = [234, 5, 2, 148, 23];
const DEMO_V: i64 = 42;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print {
        init_logging(None)?;
        log_pair_sum_check();
        return print_once(&args);
    }

    let paths = project_paths()?;
    // the UI owns the terminal, so logs go to a file
    init_logging(Some(&paths.log_path))?;
    log_pair_sum_check();
    app::run(&args, paths)
}

fn init_logging(file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {:<5} {}] {}",
            buf.timestamp_millis(),
            record.level(),
            record.target(),
            record.args()
        )
    });
    if let Some(path) = file {
        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(f)));
        builder.write_style(WriteStyle::Never);
    }
    builder.try_init()?;
    Ok(())
}

fn log_pair_sum_check() {
    let found = pair_sum::can_sum_to(Some(&DEMO_A[..]), Some(&DEMO_B[..]), Some(DEMO_V));
    info!("can_sum_to({DEMO_A:?}, {DEMO_B:?}, {DEMO_V}) = {found}");
}

fn print_once(args: &Args) -> Result<()> {
    let (Some(x), Some(y)) = (args.x, args.y) else {
        bail!("--print needs both --x and --y");
    };

    // settings only matter here for the seed and color choice
    let mut settings = project_paths()
        .map(|p| load_settings(&p.settings_path))
        .unwrap_or_default();
    settings.apply_args(args);

    let mut grid = model::Grid::new();
    let mut rng = app::make_rng(settings.seed);
    let params = coloring::recolor(&mut grid, x, y, &mut rng)
        .with_context(|| format!("cannot paint with x={x} y={y}"))?;
    info!("painted grid with x={} y={}", params.x(), params.y());

    render::print_grid(&mut io::stdout().lock(), &grid, settings.enable_color)?;
    Ok(())
}
