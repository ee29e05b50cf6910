#![deny(unsafe_code)]
//! CLI binary for the Palette Tin color core.
//!
//! Subcommands:
//! - `list`: print mixing and clipping strategies
//! - `mix <strategy> <base> <mixer>`: mix two hex colors
//! - `convert <color>`: show a color in every supported space
//! - `clip <r> <g> <b>`: gamut-clip a linear RGB triple
//! - `palette list|show`: browse a palette directory
//! - `settings`: show effective settings

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use palette_tin_core::color::{linear_to_srgb, rgb_to_oklab};
use palette_tin_core::gamut::DEFAULT_ALPHA;
use palette_tin_core::hsv::rgb8_to_hsv;
use palette_tin_core::naming::color_name;
use palette_tin_core::okhsl::{srgb_to_okhsl, srgb_to_okhsv};
use palette_tin_core::{
    clip_to_gamut, ClipStrategy, ColorError, LinearRgb, PaletteStore, Rgb8, Settings,
};
use palette_tin_mixers::{LinearLightMix, MixerRegistry};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "palette-tin", version, about = "Perceptual color mixing and gamut tools")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List mixing strategies and gamut clip strategies.
    List {
        /// Include strategies that are disabled by default.
        #[arg(long)]
        all: bool,
    },
    /// Mix a mixer color into a base color.
    Mix {
        /// Strategy name (e.g. "Weighted average").
        strategy: String,

        /// Base color as hex ("#rrggbb").
        base: String,

        /// Mixer color as hex.
        mixer: String,

        /// Mixer share in [0, 1].
        #[arg(short, long, default_value_t = 0.5)]
        rate: f64,

        /// Allow strategies that are disabled by default.
        #[arg(long)]
        all: bool,
    },
    /// Show a hex color in OKLab, Okhsl, Okhsv, and device HSV, with its name.
    Convert {
        /// Color as hex ("#rrggbb").
        color: String,
    },
    /// Clip a linear RGB color into the sRGB gamut.
    Clip {
        #[arg(allow_negative_numbers = true)]
        r: f64,
        #[arg(allow_negative_numbers = true)]
        g: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,

        /// preserve-chroma, project-0.5, project-cusp, adaptive-0.5, adaptive-cusp.
        #[arg(short, long, default_value = "preserve-chroma")]
        strategy: String,

        /// Alpha for the adaptive strategies.
        #[arg(long, default_value_t = DEFAULT_ALPHA)]
        alpha: f64,
    },
    /// Browse saved palettes.
    Palette {
        /// Palette directory.
        #[arg(long, global = true, default_value = "palettes")]
        dir: PathBuf,

        #[command(subcommand)]
        action: PaletteAction,
    },
    /// Show effective settings and the selected mixing strategy.
    Settings {
        /// Settings file; defaults are used when it does not exist.
        #[arg(short, long, default_value = "settings.json")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum PaletteAction {
    /// List palette names.
    List,
    /// Print one palette's grid.
    Show {
        /// Palette name.
        name: String,
    },
}

fn parse_color(s: &str) -> Result<Rgb8, CliError> {
    Rgb8::from_hex(s).map_err(|e| CliError::input(&format!("{s:?}"), e))
}

fn registry(all: bool) -> MixerRegistry {
    let spectral = Arc::new(LinearLightMix);
    if all {
        MixerRegistry::with_disabled(spectral)
    } else {
        MixerRegistry::new(spectral)
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_settings(file: &Path) -> Result<Settings, CliError> {
    match Settings::load(file) {
        Ok(s) => Ok(s),
        Err(ColorError::Io(msg)) if !file.exists() => {
            tracing::info!(path = %file.display(), %msg, "no settings file, using defaults");
            Ok(Settings::default())
        }
        Err(e) => Err(e.into()),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List { all } => {
            let registry = registry(all);
            let mixers = registry.list_names();
            let clips = ClipStrategy::list_names();
            if cli.json {
                print_json(&serde_json::json!({
                    "mixers": mixers,
                    "clip_strategies": clips,
                }))?;
            } else {
                println!("Mixers:");
                for name in mixers {
                    println!("  {name}");
                }
                println!("Clip strategies:");
                println!("  {}", clips.join(", "));
            }
        }
        Command::Mix {
            strategy,
            base,
            mixer,
            rate,
            all,
        } => {
            let base = parse_color(&base)?;
            let mixer = parse_color(&mixer)?;
            let out = registry(all).mix(&strategy, base, mixer, rate)?;
            if cli.json {
                print_json(&serde_json::json!({
                    "strategy": strategy,
                    "base": base.to_hex(),
                    "mixer": mixer.to_hex(),
                    "rate": rate,
                    "result": out.to_hex(),
                    "rgb": out.channels(),
                }))?;
            } else {
                println!("{}", out.to_hex());
            }
        }
        Command::Convert { color } => {
            let c = parse_color(&color)?;
            let srgb = c.to_srgb();
            let lab = rgb_to_oklab(srgb);
            let hsl = srgb_to_okhsl(srgb);
            let hsv = srgb_to_okhsv(srgb);
            let device = rgb8_to_hsv(c);
            let name = color_name(device);
            if cli.json {
                print_json(&serde_json::json!({
                    "hex": c.to_hex(),
                    "oklab": { "l": lab.l, "a": lab.a, "b": lab.b },
                    "okhsl": { "h": hsl.h, "s": hsl.s, "l": hsl.l },
                    "okhsv": { "h": hsv.h, "s": hsv.s, "v": hsv.v },
                    "hsv": {
                        "h": device.hue,
                        "s": device.saturation,
                        "v": device.value,
                    },
                    "name": name,
                }))?;
            } else {
                println!("hex    {}", c.to_hex());
                println!("oklab  L={:.4} a={:.4} b={:.4}", lab.l, lab.a, lab.b);
                println!("okhsl  h={:.4} s={:.4} l={:.4}", hsl.h, hsl.s, hsl.l);
                println!("okhsv  h={:.4} s={:.4} v={:.4}", hsv.h, hsv.s, hsv.v);
                match device.hue {
                    Some(h) => println!(
                        "hsv    h={h} s={} v={}",
                        device.saturation, device.value
                    ),
                    None => println!("hsv    h=- s={} v={}", device.saturation, device.value),
                }
                println!("name   {name}");
            }
        }
        Command::Clip {
            r,
            g,
            b,
            strategy,
            alpha,
        } => {
            let strategy = ClipStrategy::from_name_with_alpha(&strategy, alpha)
                .map_err(|e| CliError::input("clip strategy", e))?;
            let clipped = clip_to_gamut(LinearRgb { r, g, b }, strategy);
            let hex = linear_to_srgb(clipped).to_rgb8().to_hex();
            if cli.json {
                print_json(&serde_json::json!({
                    "strategy": strategy.name(),
                    "input": [r, g, b],
                    "linear": [clipped.r, clipped.g, clipped.b],
                    "hex": hex,
                }))?;
            } else {
                println!(
                    "linear {:.6} {:.6} {:.6}",
                    clipped.r, clipped.g, clipped.b
                );
                println!("hex    {hex}");
            }
        }
        Command::Palette { dir, action } => {
            let store = PaletteStore::new(dir);
            match action {
                PaletteAction::List => {
                    let names = store.list()?;
                    if cli.json {
                        print_json(&serde_json::json!({ "palettes": names }))?;
                    } else {
                        for name in names {
                            println!("{name}");
                        }
                    }
                }
                PaletteAction::Show { name } => {
                    let doc = store.load(&name)?;
                    if cli.json {
                        print_json(&serde_json::to_value(&doc)?)?;
                    } else {
                        println!(
                            "{} ({}x{}, {} filled)",
                            doc.name,
                            doc.palette.rows(),
                            doc.palette.cols(),
                            doc.palette.filled_count()
                        );
                        for row in doc.palette.iter_rows() {
                            let cells: Vec<String> = row
                                .iter()
                                .map(|c| c.map_or_else(|| "-------".to_owned(), Rgb8::to_hex))
                                .collect();
                            println!("  {}", cells.join(" "));
                        }
                    }
                }
            }
        }
        Command::Settings { file } => {
            let settings = load_settings(&file)?;
            let registry = registry(false);
            let names = registry.list_names();
            let strategy = settings.mixing_strategy(&names);
            if cli.json {
                print_json(&serde_json::json!({
                    "settings": settings.to_value(),
                    "mixing_strategy": strategy,
                }))?;
            } else {
                println!("mixing mode        {}", settings.mixing_mode);
                println!("mixing strategy    {}", strategy.unwrap_or("(out of range)"));
                println!("history size       {}", settings.history_size);
                println!("retain width       {}", settings.minimize_retain_width);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
