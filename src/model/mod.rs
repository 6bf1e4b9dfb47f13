//! The super-resolution network, seen through a narrow capability interface.
//!
//! The pipeline never depends on the network's internal topology. It only
//! needs something that upscales an NCHW tensor by a fixed factor, which
//! keeps the core testable against a lightweight fake.

mod loader;

pub use loader::EsrganModel;

use crate::error::Result;
use crate::image::ImageTensor;

/// Fixed architecture hyperparameters the checkpoint must have been
/// exported with. A mismatched export is rejected by the runtime's graph
/// validation at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hyperparams {
    /// Input channels.
    pub in_channels: usize,
    /// Output channels.
    pub out_channels: usize,
    /// Base feature width.
    pub num_features: usize,
    /// Number of residual-in-residual dense blocks.
    pub num_blocks: usize,
    /// Growth channels inside each dense block.
    pub growth_channels: usize,
    /// Spatial upscale factor.
    pub scale: u32,
}

/// The RRDB ESRGAN x4 architecture this pipeline is built for.
pub const RRDB_ESRGAN_X4: Hyperparams = Hyperparams {
    in_channels: 3,
    out_channels: 3,
    num_features: 64,
    num_blocks: 23,
    growth_channels: 32,
    scale: 4,
};

/// Capability interface for the super-resolution network.
///
/// `forward` maps a (1, 3, H, W) tensor with values in [0, 1] to a
/// (1, 3, scale*H, scale*W) tensor on the same value scale. Implementations
/// run in inference mode only: no gradient tracking, no stochastic layers.
pub trait Network {
    /// Fixed factor by which `forward` grows each spatial dimension.
    fn scale(&self) -> u32;

    /// Run the forward pass.
    ///
    /// # Errors
    ///
    /// Returns a compute-kind error if the runtime fails or the output
    /// violates the shape contract.
    fn forward(&mut self, input: &ImageTensor) -> Result<ImageTensor>;
}
