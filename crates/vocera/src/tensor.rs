//! Fixed-shape tensor containers and the convolution/dense operators.
//!
//! Every extent is a const generic, so operator wiring is checked when the
//! call sites are instantiated: an output buffer whose width violates the
//! convolution shape law fails to compile. The operators are pure, allocate
//! nothing, and *accumulate into* the caller-provided output — callers zero
//! their buffers between runs.

/// 1-dimensional fixed-size array.
pub type Array1d<const D1: usize> = [f32; D1];

/// 2-dimensional fixed-size array.
pub type Array2d<const D1: usize, const D2: usize> = [[f32; D2]; D1];

/// 4-dimensional fixed-size array, laid out `[batch][width][height][channel]`.
pub type Array4d<const D1: usize, const D2: usize, const D3: usize, const D4: usize> =
    [[[[f32; D4]; D3]; D2]; D1];

/// 2D convolution over a height-1 input with horizontal stride `STRIDE`.
///
/// Accumulates `input * filter` into `output`, then adds the per-filter bias
/// and applies ReLU at each output position.
///
/// Assumes:
/// - Input and filter heights are 1
/// - No vertical stride
/// - Filter width >= horizontal stride
pub fn conv_2d<
    const STRIDE: usize,
    const BATCH: usize,
    const IN_W: usize,
    const CHANNELS: usize,
    const FILTERS: usize,
    const FILTER_W: usize,
    const OUT_W: usize,
>(
    input: &Array4d<BATCH, IN_W, 1, CHANNELS>,
    filter: &Array4d<FILTERS, FILTER_W, 1, CHANNELS>,
    bias: &Array1d<FILTERS>,
    output: &mut Array4d<BATCH, OUT_W, 1, FILTERS>,
) {
    const {
        assert!(STRIDE >= 1, "horizontal stride must be at least 1");
        assert!(FILTER_W >= STRIDE, "filter width must cover the stride");
        assert!(
            OUT_W == (IN_W - FILTER_W + STRIDE) / STRIDE,
            "output width must equal (IN_W - FILTER_W + STRIDE) / STRIDE"
        );
    }

    for batch_idx in 0..BATCH {
        for filter_idx in 0..FILTERS {
            let mut input_x = 0;
            let mut output_x = 0;
            while input_x + FILTER_W <= IN_W {
                let mut acc = output[batch_idx][output_x][0][filter_idx];
                for filter_offset in 0..FILTER_W {
                    for channel_idx in 0..CHANNELS {
                        acc += input[batch_idx][input_x + filter_offset][0][channel_idx]
                            * filter[filter_idx][filter_offset][0][channel_idx];
                    }
                }
                // bias + ReLU
                output[batch_idx][output_x][0][filter_idx] = (acc + bias[filter_idx]).max(0.0);

                input_x += STRIDE;
                output_x += 1;
            }
        }
    }
}

/// [`conv_2d`] with horizontal stride 1.
pub fn conv_2d_s1<
    const BATCH: usize,
    const IN_W: usize,
    const CHANNELS: usize,
    const FILTERS: usize,
    const FILTER_W: usize,
    const OUT_W: usize,
>(
    input: &Array4d<BATCH, IN_W, 1, CHANNELS>,
    filter: &Array4d<FILTERS, FILTER_W, 1, CHANNELS>,
    bias: &Array1d<FILTERS>,
    output: &mut Array4d<BATCH, OUT_W, 1, FILTERS>,
) {
    conv_2d::<1, BATCH, IN_W, CHANNELS, FILTERS, FILTER_W, OUT_W>(input, filter, bias, output);
}

/// [`conv_2d`] with horizontal stride 3.
pub fn conv_2d_s3<
    const BATCH: usize,
    const IN_W: usize,
    const CHANNELS: usize,
    const FILTERS: usize,
    const FILTER_W: usize,
    const OUT_W: usize,
>(
    input: &Array4d<BATCH, IN_W, 1, CHANNELS>,
    filter: &Array4d<FILTERS, FILTER_W, 1, CHANNELS>,
    bias: &Array1d<FILTERS>,
    output: &mut Array4d<BATCH, OUT_W, 1, FILTERS>,
) {
    conv_2d::<3, BATCH, IN_W, CHANNELS, FILTERS, FILTER_W, OUT_W>(input, filter, bias, output);
}

/// Depthwise 2D convolution with horizontal stride 1.
///
/// Each channel is convolved independently against its own filter slice.
/// The per-channel bias is added with no activation — unlike [`conv_2d`],
/// no ReLU is applied.
pub fn depthwise_conv_2d_s1<
    const BATCH: usize,
    const IN_W: usize,
    const CHANNELS: usize,
    const FILTER_W: usize,
    const OUT_W: usize,
>(
    input: &Array4d<BATCH, IN_W, 1, CHANNELS>,
    filter: &Array4d<1, FILTER_W, 1, CHANNELS>,
    bias: &Array1d<CHANNELS>,
    output: &mut Array4d<BATCH, OUT_W, 1, CHANNELS>,
) {
    const {
        assert!(
            OUT_W == IN_W - FILTER_W + 1,
            "output width must equal IN_W - FILTER_W + 1"
        );
    }

    for batch_idx in 0..BATCH {
        for channel_idx in 0..CHANNELS {
            let mut input_x = 0;
            let mut output_x = 0;
            while input_x + FILTER_W <= IN_W {
                let mut acc = output[batch_idx][output_x][0][channel_idx];
                for filter_offset in 0..FILTER_W {
                    acc += input[batch_idx][input_x + filter_offset][0][channel_idx]
                        * filter[0][filter_offset][0][channel_idx];
                }
                output[batch_idx][output_x][0][channel_idx] = acc + bias[channel_idx];

                input_x += 1;
                output_x += 1;
            }
        }
    }
}

/// Fully-connected layer: per-batch dot product plus bias, no activation.
pub fn fully_connected<const BATCH: usize, const CHANNELS: usize>(
    input: &Array4d<BATCH, 1, 1, CHANNELS>,
    weights: &Array2d<BATCH, CHANNELS>,
    bias: &Array1d<BATCH>,
    output: &mut Array2d<BATCH, 1>,
) {
    for batch_idx in 0..BATCH {
        let mut acc = output[batch_idx][0];
        for channel_idx in 0..CHANNELS {
            acc += input[batch_idx][0][0][channel_idx] * weights[batch_idx][channel_idx];
        }
        output[batch_idx][0] = acc + bias[batch_idx];
    }
}

/// Logistic function, `1 / (1 + e^-x)`.
#[inline]
pub fn logistic(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}
