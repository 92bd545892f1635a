// Purpose - output buffers and unit conversions at the edge of the core

pub mod converter;

/// Multi-channel, non-interleaved float buffer that voices accumulate into.
///
/// Allocated once by the host; voices only ever add into it, so the host
/// decides when to clear it.
#[derive(Debug, Default, Clone)]
pub struct AudioOutput {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioOutput {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; num_samples]; num_channels],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.buffers.len()
    }

    pub fn num_samples(&self) -> usize {
        self.buffers.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn sample(&self, channel: usize, index: usize) -> f32 {
        self.buffers[channel][index]
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.buffers[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.buffers[channel]
    }

    /// Set every sample of every channel to `value`.
    pub fn fill(&mut self, value: f32) {
        for buffer in &mut self.buffers {
            buffer.fill(value);
        }
    }

    pub fn clear(&mut self) {
        self.fill(0.0);
    }
}
