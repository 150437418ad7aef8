//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::color::parse_color;
use crate::document::{export_grid_pretty, import_grid};
use crate::grid::Grid;
use crate::raster::{rasterize, rasterize_display, save_png};
use crate::tools::{flood_fill, stamp};
use crate::transform::parse_transform_str;

/// Exit codes per Pixedit spec
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Pixedit - edit and render pixel grid documents
#[derive(Parser)]
#[command(name = "pxe")]
#[command(about = "Pixedit - edit pixel grid JSON documents and render them to PNG")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty grid document
    New {
        /// Grid dimensions as WxH, e.g. "16x16"
        size: String,

        /// Output file. If omitted, the document is printed to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a grid document to PNG
    Render {
        /// Input grid document (JSON)
        input: PathBuf,

        /// Output PNG path. Defaults to the input path with a .png extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-128, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=128))]
        scale: u8,

        /// Bake the transparency checkerboard into the output instead of
        /// exporting with alpha
        #[arg(long)]
        checker: bool,
    },

    /// Apply a geometric transform to a grid document
    Transform {
        /// Input grid document (JSON)
        input: PathBuf,

        /// Operation: flip-h, flip-v, rotate:90, rotate:270 (aliases: mirror-h, cw, ccw)
        op: String,

        /// Output file. Defaults to rewriting the input in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply drawing operations to a grid document
    Draw {
        /// Input grid document (JSON)
        input: PathBuf,

        /// Paint cells: x,y=#RRGGBB[AA] (repeatable)
        #[arg(long, value_name = "X,Y=#COLOR")]
        set: Vec<String>,

        /// Erase cells to transparent: x,y (repeatable)
        #[arg(long, value_name = "X,Y")]
        erase: Vec<String>,

        /// Flood fill from a seed cell: x,y=#RRGGBB[AA] (repeatable)
        #[arg(long, value_name = "X,Y=#COLOR")]
        flood: Vec<String>,

        /// Square brush side length for --set and --erase
        #[arg(long, default_value = "1")]
        size: u32,

        /// Output file. Defaults to rewriting the input in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a grid document and report the first problem found
    Validate {
        /// Input grid document (JSON)
        input: PathBuf,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::New { size, output } => run_new(&size, output.as_deref()),
        Commands::Render { input, output, scale, checker } => {
            run_render(&input, output.as_deref(), scale as u32, checker)
        }
        Commands::Transform { input, op, output } => {
            run_transform(&input, &op, output.as_deref())
        }
        Commands::Draw { input, set, erase, flood, size, output } => {
            run_draw(&input, &set, &erase, &flood, size, output.as_deref())
        }
        Commands::Validate { input } => run_validate(&input),
    }
}

fn run_new(size: &str, output: Option<&Path>) -> ExitCode {
    let (width, height) = match parse_size(size) {
        Ok(dims) => dims,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let grid = match Grid::new(width, height) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let json = export_grid_pretty(&grid);
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            eprintln!("Wrote: {}", path.display());
        }
        None => println!("{}", json),
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn run_render(input: &Path, output: Option<&Path>, scale: u32, checker: bool) -> ExitCode {
    let grid = match load_grid(input) {
        Ok(g) => g,
        Err(code) => return code,
    };

    let image = if checker {
        rasterize_display(&grid, scale)
    } else {
        rasterize(&grid, scale)
    };

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension("png"),
    };

    if let Err(e) = save_png(&image, &output_path) {
        eprintln!("Error: failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {}", output_path.display());
    ExitCode::from(EXIT_SUCCESS)
}

fn run_transform(input: &Path, op: &str, output: Option<&Path>) -> ExitCode {
    let op = match parse_transform_str(op) {
        Ok(op) => op,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let grid = match load_grid(input) {
        Ok(g) => g,
        Err(code) => return code,
    };
    let transformed = op.apply(&grid);
    write_grid(&transformed, output.unwrap_or(input))
}

fn run_draw(
    input: &Path,
    set: &[String],
    erase: &[String],
    flood: &[String],
    size: u32,
    output: Option<&Path>,
) -> ExitCode {
    let mut grid = match load_grid(input) {
        Ok(g) => g,
        Err(code) => return code,
    };

    for arg in set {
        let ((x, y), color) = match parse_point_color(arg) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error: --set {}: {}", arg, e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        };
        if !stamp(&mut grid, x, y, size, color) {
            eprintln!("Warning: --set {} touched no cells (out of bounds)", arg);
        }
    }

    for arg in erase {
        let (x, y) = match parse_point(arg) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error: --erase {}: {}", arg, e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        };
        if !stamp(&mut grid, x, y, size, crate::grid::TRANSPARENT) {
            eprintln!("Warning: --erase {} touched no cells (out of bounds)", arg);
        }
    }

    for arg in flood {
        let ((x, y), color) = match parse_point_color(arg) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error: --flood {}: {}", arg, e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        };
        if !flood_fill(&mut grid, x, y, color) {
            eprintln!("Warning: --flood {} was a no-op", arg);
        }
    }

    write_grid(&grid, output.unwrap_or(input))
}

fn run_validate(input: &Path) -> ExitCode {
    match load_grid(input) {
        Ok(grid) => {
            println!("OK: {}x{} grid", grid.width(), grid.height());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(code) => code,
    }
}

/// Read and validate a grid document from disk.
fn load_grid(input: &Path) -> Result<Grid, ExitCode> {
    let json = std::fs::read_to_string(input).map_err(|e| {
        eprintln!("Error: cannot open input file '{}': {}", input.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    import_grid(&json).map_err(|e| {
        eprintln!("Error: {}: {}", input.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Write a grid document to disk.
fn write_grid(grid: &Grid, path: &Path) -> ExitCode {
    if let Err(e) = std::fs::write(path, export_grid_pretty(grid)) {
        eprintln!("Error: cannot write '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    eprintln!("Wrote: {}", path.display());
    ExitCode::from(EXIT_SUCCESS)
}

/// Parse `"WxH"` into dimensions.
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid size '{}', expected WxH", s));
    }
    let w = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("cannot parse '{}' as width", parts[0]))?;
    let h = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("cannot parse '{}' as height", parts[1]))?;
    Ok((w, h))
}

/// Parse `"x,y"` into cell coordinates.
fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("invalid point '{}', expected X,Y", s));
    }
    let x = parts[0]
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("cannot parse '{}' as X", parts[0]))?;
    let y = parts[1]
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("cannot parse '{}' as Y", parts[1]))?;
    Ok((x, y))
}

/// Parse `"x,y=#COLOR"` into a point and a color.
fn parse_point_color(s: &str) -> Result<((i32, i32), image::Rgba<u8>), String> {
    let (point, color) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid argument '{}', expected X,Y=#COLOR", s))?;
    let point = parse_point(point)?;
    let color = parse_color(color.trim()).map_err(|e| e.to_string())?;
    Ok((point, color))
}
