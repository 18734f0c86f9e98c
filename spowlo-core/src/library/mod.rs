//! Client for the external download library (spotDL).
//!
//! The library is an opaque subprocess: it takes command-style options and
//! returns its output. Nothing here downloads or converts media itself.

mod formats;
mod options;
mod process;
mod request;

pub use formats::{AudioFormat, AudioQuality};
pub use options::{build_download_request, DownloadOptions};
pub use process::{library_version, DownloadLibrary, LibraryError, ProcessLibrary};
pub use request::{SpotDlRequest, SpotDlResponse};
