use std::thread;
use std::time::{Duration, Instant};

use snes_console::{Hardware, HardwareError, Register, Rgb15};
use tracing::warn;

/// NTSC frame period, 1/60.0988 s.
pub const NTSC_FRAME: Duration = Duration::from_nanos(16_639_267);

/// Wraps a backend whose vblank wait returns immediately and sleeps so that
/// frames arrive at a fixed rate.
pub struct Paced<H> {
    inner: H,
    period: Option<Duration>,
    next_frame: Option<Instant>,
}

impl<H: Hardware> Paced<H> {
    pub fn ntsc(inner: H) -> Self {
        Self::with_period(inner, NTSC_FRAME)
    }

    pub fn with_period(inner: H, period: Duration) -> Self {
        Self {
            inner,
            period: Some(period),
            next_frame: None,
        }
    }

    /// No sleeping; frames run as fast as the backend allows.
    pub fn unpaced(inner: H) -> Self {
        Self {
            inner,
            period: None,
            next_frame: None,
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    fn pace(&mut self, period: Duration) {
        let now = Instant::now();
        let deadline = self.next_frame.unwrap_or(now) + period;

        if deadline > now {
            thread::sleep(deadline - now);
            self.next_frame = Some(deadline);
        } else {
            let behind = now - deadline;
            if behind > period {
                warn!(behind_ms = behind.as_millis() as u64, "frame pacing fell behind, resyncing");
                self.next_frame = Some(now);
            } else {
                self.next_frame = Some(deadline);
            }
        }
    }
}

impl<H: Hardware> Hardware for Paced<H> {
    fn probe(&mut self) -> Result<(), HardwareError> {
        self.inner.probe()
    }

    fn reset(&mut self) -> Result<(), HardwareError> {
        self.next_frame = None;
        self.inner.reset()
    }

    fn write_register(&mut self, reg: Register, value: u8) {
        self.inner.write_register(reg, value)
    }

    fn write_vram(&mut self, word_addr: u16, data: &[u16]) {
        self.inner.write_vram(word_addr, data)
    }

    fn write_cgram(&mut self, index: u8, color: Rgb15) {
        self.inner.write_cgram(index, color)
    }

    fn wait_for_vblank(&mut self) {
        self.inner.wait_for_vblank();
        if let Some(period) = self.period {
            self.pace(period);
        }
    }
}
