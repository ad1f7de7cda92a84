//! Network parameters: per-layer filter/bias blocks and the model aggregate.
//!
//! Weights are produced outside this crate by the training pipeline's
//! exporter, which emits a `VadModel` literal. The per-layer shapes live in
//! the field types, so an export from a differently shaped network fails to
//! compile instead of silently mis-indexing. Numeric sanity (finiteness) is
//! checked once at engine construction via [`VadModel::validate`].

use crate::common::{NUM_FEATURES, WINDOW_FRAMES};
use crate::tensor::{Array1d, Array2d, Array4d};

/// Filters in the first (strided) convolution stage.
pub const CONV1_FILTERS: usize = 32;

/// Filter width of the first convolution stage.
pub const CONV1_FILTER_WIDTH: usize = 5;

/// Frames out of the first stage: `(74 - 5 + 3) / 3`.
pub const CONV1_OUT_FRAMES: usize =
    (WINDOW_FRAMES - CONV1_FILTER_WIDTH + CONV1_STRIDE) / CONV1_STRIDE;

/// Horizontal stride of the first convolution stage.
pub const CONV1_STRIDE: usize = 3;

/// Channel count after the first pointwise expansion.
pub const HIDDEN_CHANNELS: usize = 48;

/// Filter width of the second (depthwise) stage.
pub const DCONV2_FILTER_WIDTH: usize = 5;

/// Frames after the second stage: `24 - 5 + 1`.
pub const DCONV2_OUT_FRAMES: usize = CONV1_OUT_FRAMES - DCONV2_FILTER_WIDTH + 1;

/// Filter width of the fourth (depthwise) stage.
pub const DCONV4_FILTER_WIDTH: usize = 8;

/// Frames after the fourth stage: `20 - 8 + 1`.
pub const DCONV4_OUT_FRAMES: usize = DCONV2_OUT_FRAMES - DCONV4_FILTER_WIDTH + 1;

/// Filter width of the sixth (depthwise) stage; collapses 13 frames to 1.
pub const DCONV6_FILTER_WIDTH: usize = DCONV4_OUT_FRAMES;

/// Parameters of one convolution stage (pointwise or strided).
#[derive(Clone, derive_more::Debug)]
pub struct ConvParams<const FILTERS: usize, const FILTER_W: usize, const CHANNELS: usize> {
    #[debug(skip)]
    pub filter: Array4d<FILTERS, FILTER_W, 1, CHANNELS>,
    #[debug(skip)]
    pub bias: Array1d<FILTERS>,
}

impl<const FILTERS: usize, const FILTER_W: usize, const CHANNELS: usize>
    ConvParams<FILTERS, FILTER_W, CHANNELS>
{
    /// All-zero placeholder parameters.
    pub const fn zeroed() -> Self {
        Self {
            filter: [[[[0.0; CHANNELS]; 1]; FILTER_W]; FILTERS],
            bias: [0.0; FILTERS],
        }
    }

    fn all_finite(&self) -> bool {
        let filter = self.filter.as_flattened().as_flattened().as_flattened();
        filter.iter().chain(&self.bias).all(|v| v.is_finite())
    }
}

/// Parameters of one depthwise convolution stage.
#[derive(Clone, derive_more::Debug)]
pub struct DepthwiseParams<const FILTER_W: usize, const CHANNELS: usize> {
    #[debug(skip)]
    pub filter: Array4d<1, FILTER_W, 1, CHANNELS>,
    #[debug(skip)]
    pub bias: Array1d<CHANNELS>,
}

impl<const FILTER_W: usize, const CHANNELS: usize> DepthwiseParams<FILTER_W, CHANNELS> {
    /// All-zero placeholder parameters.
    pub const fn zeroed() -> Self {
        Self {
            filter: [[[[0.0; CHANNELS]; 1]; FILTER_W]; 1],
            bias: [0.0; CHANNELS],
        }
    }

    fn all_finite(&self) -> bool {
        let filter = self.filter.as_flattened().as_flattened().as_flattened();
        filter.iter().chain(&self.bias).all(|v| v.is_finite())
    }
}

/// Parameters of the fully-connected readout.
#[derive(Clone, derive_more::Debug)]
pub struct DenseParams<const BATCH: usize, const CHANNELS: usize> {
    #[debug(skip)]
    pub weights: Array2d<BATCH, CHANNELS>,
    #[debug(skip)]
    pub bias: Array1d<BATCH>,
}

impl<const BATCH: usize, const CHANNELS: usize> DenseParams<BATCH, CHANNELS> {
    /// All-zero placeholder parameters.
    pub const fn zeroed() -> Self {
        Self {
            weights: [[0.0; CHANNELS]; BATCH],
            bias: [0.0; BATCH],
        }
    }

    fn all_finite(&self) -> bool {
        let weights = self.weights.as_flattened();
        weights.iter().chain(&self.bias).all(|v| v.is_finite())
    }
}

/// The eight parameter blocks of the fixed network topology.
///
/// Adjacent stages agree on channel counts and frame widths through the
/// field types; the executor wires them without any runtime shape checks.
#[derive(Clone, derive_more::Debug)]
pub struct VadModel {
    pub conv1: ConvParams<CONV1_FILTERS, CONV1_FILTER_WIDTH, NUM_FEATURES>,
    pub dconv2: DepthwiseParams<DCONV2_FILTER_WIDTH, CONV1_FILTERS>,
    pub conv3: ConvParams<HIDDEN_CHANNELS, 1, CONV1_FILTERS>,
    pub dconv4: DepthwiseParams<DCONV4_FILTER_WIDTH, HIDDEN_CHANNELS>,
    pub conv5: ConvParams<HIDDEN_CHANNELS, 1, HIDDEN_CHANNELS>,
    pub dconv6: DepthwiseParams<DCONV6_FILTER_WIDTH, HIDDEN_CHANNELS>,
    pub conv7: ConvParams<HIDDEN_CHANNELS, 1, HIDDEN_CHANNELS>,
    pub dense8: DenseParams<1, HIDDEN_CHANNELS>,
}

impl VadModel {
    /// All-zero placeholder model.
    ///
    /// Validates cleanly and produces a constant probability of 0.5; useful
    /// for wiring tests and as the template the weight exporter fills in.
    pub const fn zeroed() -> Self {
        Self {
            conv1: ConvParams::zeroed(),
            dconv2: DepthwiseParams::zeroed(),
            conv3: ConvParams::zeroed(),
            dconv4: DepthwiseParams::zeroed(),
            conv5: ConvParams::zeroed(),
            dconv6: DepthwiseParams::zeroed(),
            conv7: ConvParams::zeroed(),
            dense8: DenseParams::zeroed(),
        }
    }

    /// Rejects NaN/infinite parameters; run once at engine construction.
    pub fn validate(&self) -> Result<(), ModelError> {
        let layers = [
            ("conv1", self.conv1.all_finite()),
            ("dconv2", self.dconv2.all_finite()),
            ("conv3", self.conv3.all_finite()),
            ("dconv4", self.dconv4.all_finite()),
            ("conv5", self.conv5.all_finite()),
            ("dconv6", self.dconv6.all_finite()),
            ("conv7", self.conv7.all_finite()),
            ("dense8", self.dense8.all_finite()),
        ];
        for (layer, finite) in layers {
            if !finite {
                return Err(ModelError::NonFiniteParameter { layer });
            }
        }
        Ok(())
    }
}

/// Error returned when model parameters fail load-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// A parameter block contains a NaN or infinite value.
    NonFiniteParameter { layer: &'static str },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::NonFiniteParameter { layer } => {
                write!(f, "model layer {layer} contains a non-finite parameter")
            }
        }
    }
}

impl std::error::Error for ModelError {}
