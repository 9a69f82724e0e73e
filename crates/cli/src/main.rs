#![deny(unsafe_code)]
//! CLI binary for the swatch color picker core.
//!
//! Subcommands:
//! - `convert <color>`: show a hex color as RGB, HSL and HSV
//! - `position`: place a panel next to an anchor inside a viewport
//! - `drag <control>`: map a pointer on the surface or hue track to a color
//! - `edit <field> <text>`: apply a text-field edit to a color
//! - `sample <png> <x> <y>`: eyedropper over a screenshot
//! - `recent add|list`: the recent-colors list in a JSON file

mod error;
mod store;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use serde_json::Value;
use store::JsonFileStore;
use swatch_core::color::rgb_to_hsv;
use swatch_core::format::apply_edit;
use swatch_core::{
    Control, ControlRects, FormatField, Frame, Picker, PickerConfig, PickerError, PickerView,
    RecentColors, Rect, Rgb,
};

#[derive(Parser)]
#[command(name = "swatch", about = "Color picker math, placement and sampling")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log picker decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Picker settings as a JSON file.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a hex color in every representation.
    Convert {
        /// Six-digit hex, with or without '#'.
        color: String,
    },
    /// Compute the panel position for an anchor element.
    Position {
        /// Anchor box as x,y,width,height (viewport-relative).
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        anchor: Rect,

        /// Panel size as width,height.
        #[arg(long, value_parser = parse_pair)]
        panel: DVec2,

        /// Viewport size as width,height.
        #[arg(long, value_parser = parse_pair)]
        viewport: DVec2,

        /// Page scroll offset as x,y.
        #[arg(long, value_parser = parse_pair, default_value = "0,0", allow_hyphen_values = true)]
        scroll: DVec2,
    },
    /// Press the pointer on a control and report the resulting color.
    Drag {
        /// "saturation" or "hue".
        #[arg(value_parser = parse_control)]
        control: Control,

        /// Control box as x,y,width,height.
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        rect: Rect,

        /// Pointer position as x,y.
        #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
        pointer: DVec2,

        /// Starting color (defaults to the configured default color).
        #[arg(long)]
        color: Option<String>,
    },
    /// Type text into one of the picker's fields.
    Edit {
        /// Field name: hex, red, green, blue, hue, saturation or lightness.
        field: String,

        /// The typed text.
        #[arg(allow_hyphen_values = true)]
        text: String,

        /// Starting color (defaults to the configured default color).
        #[arg(long)]
        color: Option<String>,
    },
    /// Read the color under a point of a PNG screenshot.
    Sample {
        image: PathBuf,

        /// Point in CSS pixels.
        x: f64,
        y: f64,

        /// Device pixel ratio of the screenshot.
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,
    },
    /// Manage the recent-colors list.
    Recent {
        /// JSON file holding the list.
        #[arg(long, default_value = "swatch-recent.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: RecentAction,
    },
}

#[derive(Subcommand)]
enum RecentAction {
    /// Put a color at the front of the list.
    Add { color: String },
    /// Print the list, most recent first.
    List,
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("not a number: '{part}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[f64; N]>::try_from(values)
        .map_err(|v| format!("expected {N} comma-separated numbers, got {}", v.len()))
}

fn parse_pair(s: &str) -> Result<DVec2, String> {
    let [x, y] = parse_numbers::<2>(s)?;
    Ok(DVec2::new(x, y))
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let [x, y, w, h] = parse_numbers::<4>(s)?;
    Ok(Rect::from_origin_size(DVec2::new(x, y), DVec2::new(w, h)))
}

fn parse_control(s: &str) -> Result<Control, String> {
    Control::from_name(s).ok_or_else(|| format!("unknown control '{s}' (saturation, hue)"))
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PickerConfig, CliError> {
    let Some(path) = path else {
        return Ok(PickerConfig::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let settings: Value = serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid settings JSON: {e}")))?;
    Ok(PickerConfig::from_json(&settings))
}

fn print_view(view: &PickerView, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }
    let hsl: Vec<String> = [FormatField::Hue, FormatField::Saturation, FormatField::Lightness]
        .into_iter()
        .map(|f| f.text(view.rgb, view.hsl))
        .collect();
    println!("hex  {}", view.hex);
    println!("rgb  {}, {}, {}", view.rgb.r, view.rgb.g, view.rgb.b);
    println!("hsl  {}, {}%, {}%", hsl[0], hsl[1], hsl[2]);
    println!("hsv  {:.1}, {:.1}%, {:.1}%", view.hsv.h, view.hsv.s, view.hsv.v);
    Ok(())
}

fn print_recent(recent: &RecentColors, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(recent.list())?);
    } else {
        for color in recent.list() {
            println!("{color}");
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.settings.as_deref())?;

    match cli.command {
        Command::Convert { color } => {
            let rgb = Rgb::from_hex(color.trim())?;
            print_view(&Picker::with_hsv(rgb_to_hsv(rgb)).view(), cli.json)?;
        }
        Command::Position {
            anchor,
            panel,
            viewport,
            scroll,
        } => {
            let position = config.placement.position(panel, anchor, viewport, scroll);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&position)?);
            } else {
                let (top, left) = position.to_css();
                println!("top: {top}; left: {left};");
            }
        }
        Command::Drag {
            control,
            rect,
            pointer,
            color,
        } => {
            let mut picker = Picker::open(color.as_deref(), &config);
            let rects = ControlRects {
                saturation: rect,
                hue: rect,
            };
            let update = picker
                .pointer_down(control, pointer, &rects)
                .ok_or(PickerError::InvalidDimensions)?;
            picker.pointer_up();
            print_view(&update.view, cli.json)?;
        }
        Command::Edit { field, text, color } => {
            let field = FormatField::from_name(&field)
                .ok_or_else(|| CliError::Input(format!("unknown field '{field}'")))?;
            let mut picker = Picker::open(color.as_deref(), &config);
            let hsv = apply_edit(field, &text, picker.hsv())?;
            print_view(&picker.set_hsv(hsv).view, cli.json)?;
        }
        Command::Sample {
            image: path,
            x,
            y,
            dpr,
        } => {
            let frame = Frame::from_rgba_image(image::open(&path)?.to_rgba8())?;
            let hex = frame.sample_hex(DVec2::new(x, y), dpr).ok_or_else(|| {
                CliError::Input(format!(
                    "point ({x}, {y}) at {dpr}x is outside the {}x{} image",
                    frame.width(),
                    frame.height()
                ))
            })?;
            if cli.json {
                let info = serde_json::json!({ "hex": hex, "x": x, "y": y, "dpr": dpr });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{hex}");
            }
        }
        Command::Recent { store, action } => {
            let mut file = JsonFileStore::new(&store);
            let mut recent =
                RecentColors::load(&file, &config.storage_key, config.recent_capacity);
            if let RecentAction::Add { color } = action {
                let color = color.trim();
                Rgb::from_hex(color)?;
                if !recent.record(color, &mut file, &config.storage_key) {
                    return Err(CliError::Io(format!(
                        "could not write {}",
                        store.display()
                    )));
                }
            }
            print_recent(&recent, cli.json)?;
        }
    }

    Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("swatch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parse_pair_and_rect() {
        assert_eq!(parse_pair("3, -4").unwrap(), DVec2::new(3.0, -4.0));
        let rect = parse_rect("100,100,100,30").unwrap();
        assert_eq!(rect.bottom, 130.0);
        assert_eq!(rect.right, 200.0);
    }

    #[test]
    fn parse_numbers_reports_bad_input() {
        assert!(parse_pair("1").unwrap_err().contains("expected 2"));
        assert!(parse_rect("1,2,x,4").unwrap_err().contains("'x'"));
        assert!(parse_pair("1,NaN").is_err());
    }

    #[test]
    fn convert_rejects_short_hex() {
        let err = run(cli(&["convert", "#fff"])).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn position_accepts_negative_scroll() {
        let args = [
            "position", "--anchor", "100,100,100,30", "--panel", "200,150", "--viewport",
            "800,600", "--scroll", "-5,0",
        ];
        assert!(run(cli(&args)).is_ok());
    }

    #[test]
    fn drag_on_flat_control_is_a_color_error() {
        let args = ["drag", "hue", "--rect", "0,0,0,10", "--pointer", "5,5"];
        let err = run(cli(&args)).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn edit_rejects_unknown_field() {
        let err = run(cli(&["edit", "alpha", "50"])).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn edit_rejects_non_numeric_text() {
        let err = run(cli(&["edit", "red", "lots"])).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn sample_reads_png_pixel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let img = image::RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        img.save(&path).unwrap();

        let p = path.to_str().unwrap();
        assert!(run(cli(&["sample", p, "1", "1", "--dpr", "2"])).is_ok());
        let err = run(cli(&["sample", p, "2", "0", "--dpr", "2"])).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn sample_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("absent.png");
        let err = run(cli(&["sample", p.to_str().unwrap(), "0", "0"])).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn recent_add_persists_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        let p = path.to_str().unwrap();
        run(cli(&["recent", "--store", p, "add", "#FF0000"])).unwrap();
        run(cli(&["recent", "--store", p, "add", "00ff00"])).unwrap();
        run(cli(&["recent", "--store", p, "add", "#ff0000"])).unwrap();

        let loaded = RecentColors::load(&JsonFileStore::new(&path), "recentColors", 14);
        assert_eq!(loaded.list(), ["#ff0000", "00ff00"]);
    }

    #[test]
    fn recent_add_keeps_the_typed_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        let p = path.to_str().unwrap();
        run(cli(&["recent", "--store", p, "add", "  #C0FFEE "])).unwrap();

        let loaded = RecentColors::load(&JsonFileStore::new(&path), "recentColors", 14);
        assert_eq!(loaded.list(), ["#C0FFEE"]);
    }

    #[test]
    fn recent_add_rejects_non_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        let err = run(cli(&["recent", "--store", path.to_str().unwrap(), "add", "red"]))
            .unwrap_err();
        assert_eq!(err.exit_code(), 10);
        assert!(!path.exists());
    }

    #[test]
    fn settings_file_changes_capacity_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        fs::write(&settings, r#"{"recent_capacity": 1, "storage_key": "mine"}"#).unwrap();
        let store = dir.path().join("recent.json");
        let (s, p) = (settings.to_str().unwrap(), store.to_str().unwrap());
        for color in ["#111111", "#222222"] {
            run(cli(&["--settings", s, "recent", "--store", p, "add", color])).unwrap();
        }
        let loaded = RecentColors::load(&JsonFileStore::new(&store), "mine", 14);
        assert_eq!(loaded.list(), ["#222222"]);
    }

    #[test]
    fn malformed_settings_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        fs::write(&settings, "{nope").unwrap();
        let err = run(cli(&["--settings", settings.to_str().unwrap(), "convert", "#000000"]))
            .unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }
}
