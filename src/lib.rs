//! # superres
//!
//! Single-image 4x super-resolution against a pretrained ESRGAN checkpoint.
//!
//! The crate wraps one fixed transformation: decode an 8-bit color image,
//! normalize it into the NCHW/RGB tensor layout the network expects, run a
//! forward pass on the selected device, and write the 4x-upscaled
//! reconstruction back to disk. It is meant as the post-processing stage of
//! a larger image pipeline, not as a general image-processing library.
//!
//! ## Example
//!
//! ```no_run
//! use superres::{Config, Pipeline};
//!
//! # fn main() -> superres::Result<()> {
//! let mut pipeline = Pipeline::new(&Config::default())?;
//!
//! pipeline.process("images/out.png", "images/out_sp.png")?;
//! # Ok(())
//! # }
//! ```

pub mod device;
pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;

pub use device::{select_device, Device};
pub use error::{Error, Result};
pub use pipeline::{Config, Pipeline};
