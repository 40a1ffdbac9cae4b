use super::meter::AmplitudeEstimator;

/// Walk interleaved `data` frame by frame and hand each mono average to `sink`
/// so the estimator sees a single channel regardless of the microphone layout.
pub(crate) fn for_each_mono_sample<T, F, S>(data: &[T], channels: usize, mut convert: F, mut sink: S)
where
    T: Copy,
    F: FnMut(T) -> f32,
    S: FnMut(f32),
{
    if channels <= 1 {
        for sample in data.iter().copied() {
            sink(convert(sample));
        }
        return;
    }

    let mut acc = 0.0f32;
    let mut count = 0usize;
    for sample in data.iter().copied() {
        acc += convert(sample);
        count += 1;
        if count == channels {
            sink(acc / channels as f32);
            acc = 0.0;
            count = 0;
        }
    }
    if count > 0 {
        sink(acc / count as f32);
    }
}

/// Downmix interleaved input into a fresh mono buffer.
pub fn downmix_to_mono<T, F>(data: &[T], channels: usize, convert: F) -> Vec<f32>
where
    T: Copy,
    F: FnMut(T) -> f32,
{
    let mut out = Vec::with_capacity(data.len() / channels.max(1) + 1);
    for_each_mono_sample(data, channels, convert, |sample| out.push(sample));
    out
}

/// Cuts an arbitrary callback stream into fixed-size blocks for the estimator.
///
/// The block buffer is allocated once; pushing from the audio callback only
/// copies into it.
pub struct BlockDispatcher {
    estimator: AmplitudeEstimator,
    block: Vec<f32>,
    block_size: usize,
    blocks_processed: u64,
}

impl BlockDispatcher {
    pub fn new(estimator: AmplitudeEstimator) -> Self {
        let block_size = estimator.block_size().max(1);
        Self {
            estimator,
            block: Vec::with_capacity(block_size),
            block_size,
            blocks_processed: 0,
        }
    }

    pub fn push<T, F>(&mut self, data: &[T], channels: usize, convert: F)
    where
        T: Copy,
        F: FnMut(T) -> f32,
    {
        let Self {
            estimator,
            block,
            block_size,
            blocks_processed,
        } = self;
        for_each_mono_sample(data, channels, convert, |sample| {
            block.push(sample);
            if block.len() == *block_size {
                estimator.process_block(block.as_slice());
                block.clear();
                *blocks_processed += 1;
            }
        });
    }

    /// Samples waiting for the current block to fill.
    pub fn pending(&self) -> usize {
        self.block.len()
    }

    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }

    pub fn estimator(&self) -> &AmplitudeEstimator {
        &self.estimator
    }
}
