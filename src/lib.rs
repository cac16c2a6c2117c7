#![deny(missing_docs)]
#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod error;
pub mod log;
pub mod time;

#[cfg(feature = "wcs")]
#[cfg_attr(docsrs, doc(cfg(feature = "wcs")))]
pub mod wcs;

#[cfg(feature = "frames")]
#[cfg_attr(docsrs, doc(cfg(feature = "frames")))]
pub mod frames;

#[cfg(feature = "fits")]
#[cfg_attr(docsrs, doc(cfg(feature = "fits")))]
pub mod fits;

pub use error::WcsError;
