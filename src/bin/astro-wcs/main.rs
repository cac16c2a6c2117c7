use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, warn};

use astro_rs::fits::HduList;
use astro_rs::frames::{parse_crs, SkyPosition};
use astro_rs::log::{LogLevel, LogSink};
use astro_rs::wcs::{FitsKeywordSource, Wcs};

mod args;
use args::CliArgs;

/// Bridges the core's injected [`LogSink`] to the ecosystem `log` crate, per
/// design note 9: the core never calls `log` directly, only the CLI does.
struct EcosystemLogSink;

impl LogSink for EcosystemLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!("{message}"),
            LogLevel::Warn => warn!("{message}"),
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if std::env::var("RUST_LOG").is_err() {
        // SAFETY: single-threaded at this point, before any other code reads the environment.
        unsafe { std::env::set_var("RUST_LOG", &args.debug) };
    }
    pretty_env_logger::init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    if args.gui {
        return Err("--gui is not implemented by this crate".to_owned());
    }

    let mut actions = 0;
    if args.project.is_some() {
        actions += 1;
    }
    if args.unproject.is_some() {
        actions += 1;
    }
    if args.convert.is_some() {
        actions += 1;
    }
    if actions == 0 {
        return Err("one of --project, --unproject, --convert or --gui is required".to_owned());
    }
    if actions > 1 {
        return Err("only one of --project, --unproject, --convert may be given".to_owned());
    }

    if let Some(spec) = &args.project {
        return do_project(spec);
    }
    if let Some(spec) = &args.unproject {
        return do_unproject(spec);
    }
    if let Some(spec) = &args.convert {
        return do_convert(spec);
    }
    unreachable!("exactly one action was selected above")
}

fn load_wcs(header_path: &str) -> Result<Wcs, String> {
    let file = File::open(header_path)
        .map_err(|e| format!("could not open {header_path:?}: {e}"))?;
    let mut hdu_list = HduList::new(BufReader::new(file));
    let hdu = hdu_list
        .get_by_index(0)
        .ok_or_else(|| format!("{header_path:?} has no primary HDU"))?;
    let source = FitsKeywordSource::new(hdu.header.clone());
    Wcs::init_logged(&source, &EcosystemLogSink).map_err(|e| e.to_string())
}

/// `--project "<fits-file> <x> <y>"`.
fn do_project(spec: &str) -> Result<(), String> {
    let (header_path, x, y) = parse_hdr_and_pair(spec)?;
    let wcs = load_wcs(header_path)?;
    let sky = wcs.pixel_to_sky(x, y).map_err(|e| e.to_string())?;
    println!("(ra,dec)=({}, {})", sky.longitude_deg, sky.latitude_deg);
    Ok(())
}

/// `--unproject "<fits-file> <ra> <dec>"`.
fn do_unproject(spec: &str) -> Result<(), String> {
    let (header_path, ra, dec) = parse_hdr_and_pair(spec)?;
    let wcs = load_wcs(header_path)?;
    let (x, y) = wcs.sky_to_pixel(ra, dec).map_err(|e| e.to_string())?;
    println!("(x,y)=({x}, {y})");
    Ok(())
}

/// `--convert "<ra>,<dec> <src-crs> <tgt-crs>"`.
fn do_convert(spec: &str) -> Result<(), String> {
    let mut tokens = spec.split_whitespace();
    let pair = tokens
        .next()
        .ok_or_else(|| "missing \"ra,dec\" argument".to_owned())?;
    let src_str = tokens
        .next()
        .ok_or_else(|| "missing source CRS argument".to_owned())?;
    let tgt_str = tokens
        .next()
        .ok_or_else(|| "missing target CRS argument".to_owned())?;

    let (ra_str, dec_str) = pair
        .split_once(',')
        .ok_or_else(|| format!("expected \"ra,dec\", got {pair:?}"))?;
    let ra: f64 = ra_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid ra {ra_str:?}"))?;
    let dec: f64 = dec_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid dec {dec_str:?}"))?;

    let src = parse_crs(src_str).map_err(|e| e.to_string())?;
    let tgt = parse_crs(tgt_str).map_err(|e| e.to_string())?;

    let position = SkyPosition::new(ra, dec, src);
    let converted = position.convert_to(tgt, &EcosystemLogSink);
    println!("{} {}", converted.longitude_deg, converted.latitude_deg);
    Ok(())
}

/// Splits `"<hdr> <a> <b>"` into the header path and a numeric pair.
fn parse_hdr_and_pair(spec: &str) -> Result<(&str, f64, f64), String> {
    let mut tokens = spec.split_whitespace();
    let header_path = tokens
        .next()
        .ok_or_else(|| "missing header file argument".to_owned())?;
    let a: f64 = tokens
        .next()
        .ok_or_else(|| "missing first numeric argument".to_owned())?
        .parse()
        .map_err(|_| "first numeric argument is not a valid number".to_owned())?;
    let b: f64 = tokens
        .next()
        .ok_or_else(|| "missing second numeric argument".to_owned())?
        .parse()
        .map_err(|_| "second numeric argument is not a valid number".to_owned())?;
    if tokens.next().is_some() {
        return Err(format!("unexpected extra tokens in {spec:?}"));
    }
    Ok((header_path, a, b))
}
