use crate::bus::{IoBus, IoRegister};
use crate::FaultCode;

/// Default frame buffer width in pixels.
pub const MONITOR_WIDTH: usize = 256;
/// Default frame buffer height in pixels.
pub const MONITOR_HEIGHT: usize = 256;

const MONITOR_CMD_WRITE: u32 = 1;

/// What one monitor service pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorEvent {
    /// No write requested.
    Idle,
    /// A pixel was stored.
    PixelWritten {
        /// Pixel row.
        row: usize,
        /// Pixel column.
        col: usize,
        /// Stored luminance byte.
        value: u8,
    },
    /// The requested address fell outside the frame buffer.
    Rejected(FaultCode),
}

/// Byte-per-pixel frame buffer driven through `monitoraddr`, `monitordata`
/// and `monitorcmd`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Monitor {
    width: usize,
    height: usize,
    pixels: Box<[u8]>,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(MONITOR_WIDTH, MONITOR_HEIGHT)
    }
}

impl Monitor {
    /// Creates a blank monitor. A zero dimension is bumped to one pixel.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![0; width * height].into_boxed_slice(),
        }
    }

    /// Frame buffer width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Frame buffer height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Reads one pixel, or `None` outside the frame buffer.
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            self.pixels.get(row * self.width + col).copied()
        } else {
            None
        }
    }

    /// Returns the frame buffer in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Services a pending write request.
    ///
    /// `monitorcmd` is cleared whether or not the write landed.
    pub fn service(&mut self, bus: &mut IoBus) -> MonitorEvent {
        if bus.get(IoRegister::MonitorCmd) != MONITOR_CMD_WRITE {
            return MonitorEvent::Idle;
        }
        bus.set(IoRegister::MonitorCmd, 0);

        let Ok(addr) = usize::try_from(bus.get(IoRegister::MonitorAddr)) else {
            return MonitorEvent::Rejected(FaultCode::InvalidMonitorAddress);
        };
        let row = addr / self.width;
        let col = addr % self.width;
        if row >= self.height {
            return MonitorEvent::Rejected(FaultCode::InvalidMonitorAddress);
        }

        let value = bus.get(IoRegister::MonitorData).to_le_bytes()[0];
        self.pixels[row * self.width + col] = value;
        MonitorEvent::PixelWritten { row, col, value }
    }
}

#[cfg(test)]
mod tests {
    use super::{Monitor, MonitorEvent, MONITOR_HEIGHT, MONITOR_WIDTH};
    use crate::bus::{IoBus, IoRegister};
    use crate::FaultCode;

    fn request(bus: &mut IoBus, addr: u32, data: u32) {
        bus.set(IoRegister::MonitorAddr, addr);
        bus.set(IoRegister::MonitorData, data);
        bus.set(IoRegister::MonitorCmd, 1);
    }

    #[test]
    fn default_geometry_is_256_square() {
        let monitor = Monitor::default();
        assert_eq!(monitor.width(), MONITOR_WIDTH);
        assert_eq!(monitor.height(), MONITOR_HEIGHT);
        assert_eq!(monitor.pixels().len(), 256 * 256);
    }

    #[test]
    fn valid_write_stores_pixel_and_clears_command() {
        let mut monitor = Monitor::default();
        let mut bus = IoBus::default();
        request(&mut bus, 0x0203, 0x7F);

        let event = monitor.service(&mut bus);

        assert_eq!(
            event,
            MonitorEvent::PixelWritten {
                row: 2,
                col: 3,
                value: 0x7F
            }
        );
        assert_eq!(monitor.pixel(2, 3), Some(0x7F));
        assert_eq!(bus.get(IoRegister::MonitorCmd), 0);
    }

    #[test]
    fn out_of_range_write_clears_command_without_drawing() {
        let mut monitor = Monitor::new(16, 16);
        let mut bus = IoBus::default();
        request(&mut bus, 16 * 16, 0xFF);

        let event = monitor.service(&mut bus);

        assert_eq!(event, MonitorEvent::Rejected(FaultCode::InvalidMonitorAddress));
        assert_eq!(bus.get(IoRegister::MonitorCmd), 0);
        assert!(monitor.pixels().iter().all(|p| *p == 0));
    }

    #[test]
    fn idle_without_command() {
        let mut monitor = Monitor::default();
        let mut bus = IoBus::default();
        bus.set(IoRegister::MonitorAddr, 5);
        bus.set(IoRegister::MonitorData, 9);

        assert_eq!(monitor.service(&mut bus), MonitorEvent::Idle);
        assert_eq!(monitor.pixel(0, 5), Some(0));
    }

    #[test]
    fn pixel_accessor_rejects_outside_coordinates() {
        let monitor = Monitor::new(4, 2);
        assert_eq!(monitor.pixel(1, 3), Some(0));
        assert_eq!(monitor.pixel(2, 0), None);
        assert_eq!(monitor.pixel(0, 4), None);
    }
}
