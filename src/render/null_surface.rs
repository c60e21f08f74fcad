use crate::error::ChartResult;
use crate::render::{DrawingSurface, RenderFrame};

/// Headless surface used by tests and by hosts that only need geometry.
///
/// It still validates mounted frames so invalid geometry surfaces as an error
/// before a real backend sees it.
#[derive(Debug, Default)]
pub struct NullSurface {
    pub mounted_frames: usize,
    pub clear_count: usize,
    pub last_mark_count: usize,
    pub last_text_count: usize,
}

impl DrawingSurface for NullSurface {
    fn clear(&mut self) {
        self.clear_count += 1;
        self.mounted_frames = 0;
        self.last_mark_count = 0;
        self.last_text_count = 0;
    }

    fn mount(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.mounted_frames += 1;
        self.last_mark_count = frame.mark_primitive_count();
        self.last_text_count = frame.texts.len();
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.mounted_frames == 0
    }
}
