use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use structopt::StructOpt;
use tracing::info;

use camkit::{
    init_logging, load_file, AdaptiveClearingGenerator, BoundingBox, Config, DialectKind,
    LoadedFile, Material, PlaybackEngine, Point3, ProgramGenerator, Tool, Units,
};
use camkit_playback::{Direction, TickOutcome};

#[derive(Debug, StructOpt)]
#[structopt(name = "camkit", about = "CNC toolpath toolkit")]
struct Opt {
    /// Configuration file (.toml or .json); defaults to the platform config
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Summarize a G-code or binary toolpath file
    Info {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
    },

    /// Encode a G-code or binary toolpath file for a controller
    Post {
        #[structopt(parse(from_os_str))]
        input: PathBuf,

        /// Controller dialect: fanuc, haas or grbl
        #[structopt(short, long)]
        dialect: Option<DialectKind>,

        /// Program units: mm or in
        #[structopt(short, long)]
        units: Option<Units>,

        /// Output file; stdout when omitted
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },

    /// Generate an adaptive clearing program for a rectangular stock
    Clear {
        /// Stock size along X
        #[structopt(long)]
        width: f64,

        /// Stock size along Y
        #[structopt(long)]
        length: f64,

        /// Depth to clear below the top surface
        #[structopt(long)]
        depth: f64,

        /// Tool diameter
        #[structopt(long, default_value = "6")]
        tool_diameter: f64,

        /// Depth per layer; half the diameter when omitted
        #[structopt(long)]
        stepdown: Option<f64>,

        #[structopt(long, default_value = "2")]
        flutes: u32,

        #[structopt(long, default_value = "12000")]
        rpm: f64,

        /// Chip load per tooth
        #[structopt(long, default_value = "0.04")]
        feed_per_tooth: f64,

        /// Tool number for the cut
        #[structopt(long, default_value = "1")]
        tool: u32,

        /// Controller dialect: fanuc, haas or grbl
        #[structopt(short, long)]
        dialect: Option<DialectKind>,

        /// Output file; stdout when omitted
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },

    /// Play a file back and print every frame
    Play {
        #[structopt(parse(from_os_str))]
        input: PathBuf,

        /// Play from the last point towards the first
        #[structopt(long)]
        reverse: bool,

        /// Points advanced per frame
        #[structopt(long)]
        speed: Option<f64>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::load_or_default()?),
    }
}

fn write_output(output: Option<&Path>, program: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, program)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", program),
    }
    Ok(())
}

fn print_summary(input: &Path, loaded: &LoadedFile) {
    println!("{}: {:?} ({})", input.display(), loaded.kind, loaded.units);
    println!("  toolpaths: {}", loaded.toolpaths.len());
    println!("  points:    {}", loaded.toolpaths.point_count());
    if !loaded.entities.is_empty() {
        println!("  entities:  {}", loaded.entities.len());
    }
    if loaded.skipped > 0 {
        println!("  skipped:   {}", loaded.skipped);
    }
    if let Some(bounds) = loaded.toolpaths.bounds() {
        println!(
            "  bounds:    {:.3} x {:.3} x {:.3} {}",
            bounds.width(),
            bounds.height(),
            bounds.depth(),
            loaded.units
        );
    }
    for (index, toolpath) in loaded.toolpaths.iter().enumerate() {
        println!(
            "  [{}] T{}: {} points, {:.3} {}",
            index,
            toolpath.tool_number,
            toolpath.len(),
            toolpath.length(),
            toolpath.units
        );
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let opt = Opt::from_args();
    let mut config = load_config(opt.config.as_deref())?;

    match opt.command {
        Command::Info { input } => {
            let loaded = load_file(&input, &config.parser)?;
            print_summary(&input, &loaded);
        }
        Command::Post {
            input,
            dialect,
            units,
            output,
        } => {
            let loaded = load_file(&input, &config.parser)?;
            let mut setup = config.post.to_setup();
            if units.is_some() {
                setup.units = units;
            }
            let generator =
                ProgramGenerator::for_kind(dialect.unwrap_or(config.post.dialect), setup);
            let program = generator.generate(&loaded.toolpaths, &[])?;
            write_output(output.as_deref(), &program)?;
        }
        Command::Clear {
            width,
            length,
            depth,
            tool_diameter,
            stepdown,
            flutes,
            rpm,
            feed_per_tooth,
            tool,
            dialect,
            output,
        } => {
            let mut cutter = Tool::new(tool, tool_diameter)
                .with_flutes(flutes)
                .with_rpm(rpm);
            if let Some(stepdown) = stepdown {
                cutter = cutter.with_stepdown(stepdown);
            }
            let units = config.generator.units;
            let bounds = BoundingBox::new(
                Point3::new(0.0, 0.0, -depth.abs()),
                Point3::new(width, length, 0.0),
            );

            let generated = AdaptiveClearingGenerator::new()
                .with_bounds(bounds)
                .with_tool(cutter.clone())
                .with_material(Material::new("Stock", feed_per_tooth))
                .with_units(units)
                .generate()?;

            let mut setup = config.post.to_setup();
            setup.units = setup.units.or(Some(units));
            let program =
                ProgramGenerator::for_kind(dialect.unwrap_or(config.post.dialect), setup)
                    .with_tools([cutter])
                    .generate(&[generated.toolpath], &generated.operations)?;
            write_output(output.as_deref(), &program)?;
        }
        Command::Play {
            input,
            reverse,
            speed,
        } => {
            if let Some(speed) = speed {
                config.playback.speed = speed;
            }
            let loaded = load_file(&input, &config.parser)?;
            let mut engine = PlaybackEngine::with_config(config.playback);
            engine.load(loaded.toolpaths);

            let direction = if reverse {
                Direction::Reverse
            } else {
                Direction::Forward
            };
            let token = engine.play(direction);
            loop {
                let (frame, done) = match engine.tick(token) {
                    TickOutcome::Frame(frame) => (Some(frame), false),
                    TickOutcome::Finished(frame) => (frame, true),
                    TickOutcome::Cancelled => (None, true),
                };
                if let Some(f) = frame {
                    println!(
                        "{:>4} {:>6} T{:<3} X{:.3} Y{:.3} Z{:.3}",
                        f.path, f.point, f.tool_number, f.position.x, f.position.y, f.position.z
                    );
                }
                if done {
                    break;
                }
            }
        }
    }

    Ok(())
}
