//! Eight-layer network executor.
//!
//! Strided convolution funnels the 74-frame window down to 24 frames, then
//! depthwise/pointwise pairs narrow it to a single 48-channel vector that a
//! fully-connected readout maps to one logit. Each stage's output tensor is
//! the next stage's input type, so the wiring is fixed at compile time.

use bytemuck::Zeroable;

use crate::common::{NUM_FEATURES, WINDOW_FRAMES};
use crate::model::{
    CONV1_FILTERS, CONV1_OUT_FRAMES, DCONV2_OUT_FRAMES, DCONV4_OUT_FRAMES, HIDDEN_CHANNELS,
    VadModel,
};
use crate::tensor::{
    Array2d, Array4d, conv_2d_s1, conv_2d_s3, depthwise_conv_2d_s1, fully_connected, logistic,
};

/// Scratch output tensors, one per stage, owned exclusively by the engine.
///
/// The convolution operators accumulate into their outputs, so every run
/// starts by zeroing the whole block; nothing carries over between chunks.
#[derive(Zeroable)]
pub(crate) struct Network {
    conv1_out: Array4d<1, CONV1_OUT_FRAMES, 1, CONV1_FILTERS>,
    dconv2_out: Array4d<1, DCONV2_OUT_FRAMES, 1, CONV1_FILTERS>,
    conv3_out: Array4d<1, DCONV2_OUT_FRAMES, 1, HIDDEN_CHANNELS>,
    dconv4_out: Array4d<1, DCONV4_OUT_FRAMES, 1, HIDDEN_CHANNELS>,
    conv5_out: Array4d<1, DCONV4_OUT_FRAMES, 1, HIDDEN_CHANNELS>,
    dconv6_out: Array4d<1, 1, 1, HIDDEN_CHANNELS>,
    conv7_out: Array4d<1, 1, 1, HIDDEN_CHANNELS>,
    dense8_out: Array2d<1, 1>,
}

impl Network {
    pub(crate) fn new() -> Self {
        Self::zeroed()
    }

    /// Runs the window through all eight stages; returns the speech
    /// probability. Pure with respect to `model` and `window`.
    pub(crate) fn infer(
        &mut self,
        model: &VadModel,
        window: &Array4d<1, WINDOW_FRAMES, 1, NUM_FEATURES>,
    ) -> f32 {
        *self = Self::zeroed();

        conv_2d_s3(window, &model.conv1.filter, &model.conv1.bias, &mut self.conv1_out);
        depthwise_conv_2d_s1(
            &self.conv1_out,
            &model.dconv2.filter,
            &model.dconv2.bias,
            &mut self.dconv2_out,
        );
        conv_2d_s1(
            &self.dconv2_out,
            &model.conv3.filter,
            &model.conv3.bias,
            &mut self.conv3_out,
        );
        depthwise_conv_2d_s1(
            &self.conv3_out,
            &model.dconv4.filter,
            &model.dconv4.bias,
            &mut self.dconv4_out,
        );
        conv_2d_s1(
            &self.dconv4_out,
            &model.conv5.filter,
            &model.conv5.bias,
            &mut self.conv5_out,
        );
        depthwise_conv_2d_s1(
            &self.conv5_out,
            &model.dconv6.filter,
            &model.dconv6.bias,
            &mut self.dconv6_out,
        );
        conv_2d_s1(
            &self.dconv6_out,
            &model.conv7.filter,
            &model.conv7.bias,
            &mut self.conv7_out,
        );
        fully_connected(
            &self.conv7_out,
            &model.dense8.weights,
            &model.dense8.bias,
            &mut self.dense8_out,
        );

        logistic(self.dense8_out[0][0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_window(value: f32) -> Box<Array4d<1, WINDOW_FRAMES, 1, NUM_FEATURES>> {
        Box::new([[[[value; NUM_FEATURES]; 1]; WINDOW_FRAMES]; 1])
    }

    #[test]
    fn zero_model_zero_window_is_midpoint() {
        let model = VadModel::zeroed();
        let mut network = Network::new();
        let p = network.infer(&model, &uniform_window(0.0));
        assert_eq!(p, 0.5);
    }

    #[test]
    fn readout_bias_reaches_logistic_unchanged() {
        // With all filters zero, only the dense bias survives:
        // logistic(ln 3) = 0.75.
        let mut model = VadModel::zeroed();
        model.dense8.bias[0] = 3.0f32.ln();
        let mut network = Network::new();
        let p = network.infer(&model, &uniform_window(1.0));
        assert!((p - 0.75).abs() < 1e-6, "got {p}");
    }

    #[test]
    fn conv_bias_feeds_through_rectified_path() {
        // Zero filters, conv7 bias 1.0: the readout sees 48 ones. With
        // uniform dense weights w the logit is 48w + b.
        let mut model = VadModel::zeroed();
        model.conv7.bias = [1.0; HIDDEN_CHANNELS];
        model.dense8.weights = [[0.25; HIDDEN_CHANNELS]];
        model.dense8.bias = [-12.0];
        let mut network = Network::new();
        let p = network.infer(&model, &uniform_window(0.3));
        assert!((p - 0.5).abs() < 1e-6, "48 * 0.25 - 12 = 0, got {p}");
    }

    #[test]
    fn negative_conv_bias_is_clamped_before_readout() {
        // conv7's ReLU clamps the negative bias, so the readout sees zeros.
        let mut model = VadModel::zeroed();
        model.conv7.bias = [-1.0; HIDDEN_CHANNELS];
        model.dense8.weights = [[100.0; HIDDEN_CHANNELS]];
        let mut network = Network::new();
        let p = network.infer(&model, &uniform_window(0.0));
        assert_eq!(p, 0.5);
    }

    #[test]
    fn scratch_does_not_leak_between_runs() {
        let mut model = VadModel::zeroed();
        model.conv1.filter[0][0][0][0] = 1.0;
        model.dconv2.filter[0][0][0][0] = 1.0;
        model.conv3.filter[0][0][0][0] = 1.0;
        model.dconv4.filter[0][0][0][0] = 1.0;
        model.conv5.filter[0][0][0][0] = 1.0;
        model.dconv6.filter[0][0][0][0] = 1.0;
        model.conv7.filter[0][0][0][0] = 1.0;
        model.dense8.weights[0][0] = 1.0;

        let mut network = Network::new();
        let window = uniform_window(0.7);
        let first = network.infer(&model, &window);
        // Stale accumulator contents would shift every later result.
        for _ in 0..3 {
            assert_eq!(network.infer(&model, &window), first);
        }
    }
}
