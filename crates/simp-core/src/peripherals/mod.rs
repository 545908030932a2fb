//! Memory-mapped devices stepped once per cycle.

/// Block disk controller with busy/ready handshaking.
pub mod disk;
/// External interrupt (IRQ2) schedule.
pub mod external;
/// Pixel-addressable monitor.
pub mod monitor;
/// Programmable interval timer.
pub mod timer;

pub use disk::{
    Disk, DiskCommand, DiskEvent, DiskState, DEFAULT_DISK_LATENCY_CYCLES, DISK_BYTES,
    DISK_SECTORS, SECTOR_SIZE,
};
pub use external::Irq2Schedule;
pub use monitor::{Monitor, MonitorEvent, MONITOR_HEIGHT, MONITOR_WIDTH};
