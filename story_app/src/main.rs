//! Headless dialogue previewer
//!
//! Plays the dialogue mode against the software text backend for a fixed
//! number of frames, pressing the first choice key at a regular interval,
//! and writes the last frame to a PNG.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use play_engine::foundation::logging;
use play_engine::prelude::*;

const DEFAULT_CONFIG: &str = "story.toml";

#[derive(Debug)]
struct PreviewOptions {
    config: PathBuf,
    data: Option<PathBuf>,
    frames: u32,
    dt: f32,
    press_every: u32,
    width: u32,
    height: u32,
    snapshot: Option<PathBuf>,
}

fn parse_args() -> Result<PreviewOptions> {
    let matches = Command::new("story_preview")
        .about("Plays the dialogue screens headlessly and snapshots the result")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file (.toml or .ron); defaults are used if it does not exist")
                .default_value(DEFAULT_CONFIG),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("DIR")
                .help("Override the asset data directory"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("COUNT")
                .help("Frames to simulate")
                .value_parser(clap::value_parser!(u32))
                .default_value("600"),
        )
        .arg(
            Arg::new("dt")
                .long("dt")
                .value_name("SECONDS")
                .help("Frame time")
                .value_parser(clap::value_parser!(f32))
                .default_value("0.016666668"),
        )
        .arg(
            Arg::new("press-every")
                .short('p')
                .long("press-every")
                .value_name("FRAMES")
                .help("Press the first choice key every N frames (0 never presses)")
                .value_parser(clap::value_parser!(u32))
                .default_value("180"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .value_parser(clap::value_parser!(u32))
                .default_value("1280"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .value_parser(clap::value_parser!(u32))
                .default_value("720"),
        )
        .arg(
            Arg::new("snapshot")
                .short('o')
                .long("snapshot")
                .value_name("PNG")
                .help("Write the final frame to this file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log per-transition detail")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    logging::init(if matches.get_flag("verbose") { "debug" } else { "info" });

    let number = |name: &str| -> Result<u32> {
        matches
            .get_one::<u32>(name)
            .copied()
            .with_context(|| format!("missing --{name}"))
    };

    Ok(PreviewOptions {
        config: matches
            .get_one::<String>("config")
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from),
        data: matches.get_one::<String>("data").map(PathBuf::from),
        frames: number("frames")?,
        dt: matches.get_one::<f32>("dt").copied().context("missing --dt")?,
        press_every: number("press-every")?,
        width: number("width")?,
        height: number("height")?,
        snapshot: matches.get_one::<String>("snapshot").map(PathBuf::from),
    })
}

fn main() -> Result<()> {
    let options = parse_args()?;
    log::debug!("Preview options: {:?}", options);

    let mut config = PlayConfig::load_or_default(&options.config)
        .with_context(|| format!("loading {}", options.config.display()))?;
    if let Some(data) = &options.data {
        config.assets.root = data.clone();
    }
    config.validate().context("invalid configuration")?;

    let size = UVec2::new(options.width.max(1), options.height.max(1));
    let mut backend = SoftwareBackend::new(size.x, size.y);
    let mut mode = DialogueMode::from_config(&config, &mut backend).context("starting dialogue")?;
    let choice_key = config.dialogue.choice_keys[0];

    for frame_index in 1..=options.frames {
        if options.press_every > 0 && frame_index % options.press_every == 0 {
            mode.handle_event(&InputEvent::KeyDown(choice_key), size);
            mode.handle_event(&InputEvent::KeyUp(choice_key), size);
        }

        let before = mode.session().progression().clone();
        if let Err(e) = mode.update(options.dt) {
            log::error!("Frame {}: {}", frame_index, e);
        }
        let after = mode.session().progression();
        if *after != before {
            log::info!(
                "Frame {}: {} -> {} ({:?})",
                frame_index,
                before.current_id(),
                after.current_id(),
                after.phase()
            );
        }

        let mut frame = Frame::new(size, &mut backend);
        mode.draw(&mut frame).with_context(|| format!("drawing frame {frame_index}"))?;
    }

    let stats = backend.stats();
    let session = mode.session();
    log::info!(
        "Finished on {} with {} of {} characters revealed ({} draw calls total)",
        session.progression().current_id(),
        session.reveal().revealed().min(session.buffer().character_count()),
        session.buffer().character_count(),
        stats.draw_calls
    );

    if let Some(path) = &options.snapshot {
        backend
            .save_png(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    mode.cleanup(&mut backend);
    Ok(())
}
