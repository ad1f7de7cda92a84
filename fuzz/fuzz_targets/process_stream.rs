#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vocera::common::{NUM_FEATURES, SAMPLES_PER_CHUNK, WINDOW_FRAMES};
use vocera::{FeatureExtractor, Vad, VadModel};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Per-chunk front-end behaviour: Some(frame seed) or "not ready".
    yields: Vec<Option<[i8; 4]>>,
    /// Raw audio feeding each chunk.
    samples: Vec<i16>,
    /// Reset the engine after this many chunks.
    reset_after: u8,
}

/// Front end replaying the fuzzer's yield script.
struct ScriptedFrontend {
    yields: Vec<Option<[i8; 4]>>,
    next: usize,
}

impl FeatureExtractor for ScriptedFrontend {
    fn extract(&mut self, _samples: &[i16; SAMPLES_PER_CHUNK]) -> Option<[f32; NUM_FEATURES]> {
        let step = self.yields.get(self.next).copied().flatten();
        self.next = (self.next + 1) % self.yields.len().max(1);
        step.map(|seed| {
            let mut frame = [0.0f32; NUM_FEATURES];
            for (i, value) in frame.iter_mut().enumerate() {
                *value = f32::from(seed[i % seed.len()]) / 16.0;
            }
            frame
        })
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

/// Small uniform weights keep activations bounded for bounded features.
fn fuzz_model() -> VadModel {
    let mut model = VadModel::zeroed();
    model.conv1.filter = [[[[0.01; NUM_FEATURES]; 1]; 5]; 32];
    model.dconv2.filter = [[[[0.05; 32]; 1]; 5]; 1];
    model.conv3.filter = [[[[0.01; 32]; 1]; 1]; 48];
    model.dconv4.filter = [[[[0.05; 48]; 1]; 8]; 1];
    model.conv5.filter = [[[[0.01; 48]; 1]; 1]; 48];
    model.dconv6.filter = [[[[0.05; 48]; 1]; 13]; 1];
    model.conv7.filter = [[[[0.01; 48]; 1]; 1]; 48];
    model.dense8.weights = [[0.01; 48]];
    model.dense8.bias = [0.01];
    model
}

fuzz_target!(|input: FuzzInput| {
    if input.yields.is_empty() {
        return;
    }

    let frontend = ScriptedFrontend {
        yields: input.yields,
        next: 0,
    };
    let mut vad = Vad::new(fuzz_model(), Box::new(frontend)).expect("finite model");

    let mut chunk = [0i16; SAMPLES_PER_CHUNK];
    for (i, sample) in chunk.iter_mut().enumerate() {
        *sample = input.samples.get(i).copied().unwrap_or(0);
    }

    for step in 0..2 * WINDOW_FRAMES {
        if step == usize::from(input.reset_after) {
            vad.reset();
        }
        if let Some(p) = vad.process_10ms(&chunk) {
            // A decision can only appear once a full window was observed.
            assert!(vad.is_ready());
            assert!(p.is_finite());
            assert!(p > 0.0 && p < 1.0, "probability {p} left (0, 1)");
        }
    }
});
