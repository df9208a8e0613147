#![warn(clippy::all, rust_2018_idioms)]

//! # petro-chart
//!
//! Headless front end of the well-log pad viewer.
//!
//! ```bash
//! # list the curves of some LAS files
//! petro-chart curves Files/well_1.las Files/well_2.las
//!
//! # one pad per curve, saved as a template
//! petro-chart template -f Files/well_1.las -p "'GR' well_1" -p "'RHOB' well_1" session.json
//!
//! # draw a template between 1200 and 1450 m
//! petro-chart render -t session.json --start 1200 --end 1450 out.svg
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use petro_chart::{export, Config, CurveKey, LasReader, Session};

/// petro-chart - well-log pads rendered to SVG
#[derive(Parser)]
#[command(name = "petro-chart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the curves of LAS files
    Curves {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// Build a session from LAS files and save it as a template
    Template {
        /// LAS file to load, repeatable
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Curve key shown in its own pad, repeatable
        #[arg(short, long = "pad")]
        pads: Vec<String>,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Render a template or a set of LAS files to SVG
    Render {
        /// Template to load
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// LAS file to load, repeatable
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Curve key shown in its own pad, repeatable
        #[arg(short, long = "pad")]
        pads: Vec<String>,

        /// Top of the depth window
        #[arg(long, requires = "end")]
        start: Option<f64>,

        /// Bottom of the depth window
        #[arg(long, requires = "start")]
        end: Option<f64>,

        #[arg(value_name = "OUTPUT", default_value = "petro_chart.svg")]
        output: PathBuf,
    },
}

fn build_session(config: &Config, files: &[PathBuf], pads: &[String]) -> Result<Session> {
    let mut session = Session::with_scroll_cooldown(config.scroll_cooldown);
    for file in files {
        session
            .add_file(file, &LasReader)
            .with_context(|| format!("could not load {:?}", file))?;
    }
    for key in pads {
        session
            .add_pad_with_curve(CurveKey::from(key.as_str()))
            .with_context(|| format!("could not add pad for {key}"))?;
    }
    if pads.is_empty() {
        if let Some(key) = session.store().default_curve().cloned() {
            session.add_pad_with_curve(key)?;
        }
    }
    Ok(session)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = if let Ok(config) = Config::from_config_file() {
        config
    } else {
        log::warn!("unable to load config file \".petro_chart\" from home directory");
        Config::default()
    };

    match cli.command {
        Commands::Curves { files } => {
            let session = build_session(&config, &files, &[])?;
            for key in session.store().keys() {
                let unit = session
                    .store()
                    .curve(key)
                    .map(|c| c.unit())
                    .unwrap_or_default();
                println!("{key}\t{unit}");
            }
        }
        Commands::Template {
            files,
            pads,
            output,
        } => {
            let session = build_session(&config, &files, &pads)?;
            session
                .save_template_to(&output, &config.project())
                .with_context(|| format!("could not save template {:?}", output))?;
            info!("saved {} pads to {:?}", session.pads().len(), output);
        }
        Commands::Render {
            template,
            files,
            pads,
            start,
            end,
            output,
        } => {
            let mut session = match template {
                Some(path) => {
                    let mut session = Session::with_scroll_cooldown(config.scroll_cooldown);
                    session
                        .load_template(&path, &config.project(), &LasReader)
                        .with_context(|| format!("could not load template {:?}", path))?;
                    session
                }
                None => build_session(&config, &files, &pads)?,
            };
            if let (Some(start), Some(end)) = (start, end) {
                if !session.set_window(start, end) {
                    log::warn!("depth window [{start}, {end}] rejected, showing the full extent");
                }
            }
            let render = session.render()?;
            export::save_svg(&render, &config, &output).map_err(|e| anyhow!(e))?;
            info!("wrote {:?}", output);
        }
    }
    Ok(())
}
