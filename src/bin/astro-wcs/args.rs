use clap::Parser;

/// Pixel↔sky projection and celestial frame conversion over FITS WCS headers.
#[derive(Parser, Debug)]
#[clap(name = "astro-wcs", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Projects a pixel to a sky position: "<fits-file> <x> <y>".
    #[clap(long, value_name = "HDR X Y")]
    pub project: Option<String>,

    /// Unprojects a sky position to a pixel: "<fits-file> <ra> <dec>".
    #[clap(long, value_name = "HDR RA DEC")]
    pub unproject: Option<String>,

    /// Converts a sky position between reference frames: "<ra>,<dec> <src-crs> <tgt-crs>".
    #[clap(long, value_name = "RA,DEC SRC TGT")]
    pub convert: Option<String>,

    /// Opens the projection viewer. Not implemented by this crate; always errors.
    #[clap(long)]
    pub gui: bool,

    /// Sets the advisory log level (error, warn, info, debug, trace).
    #[clap(long, value_name = "LEVEL", default_value = "warn")]
    pub debug: String,
}
