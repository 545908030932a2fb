//! Text trace writers fed by core trace events.

use std::fmt::Write as _;
use std::io::{self, Write};

use simp_core::{IoRegister, TraceEvent, TraceSink};

/// Which trace stream a write failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceStream {
    /// Per-instruction trace.
    Instructions,
    /// Hardware register access trace.
    HwRegisters,
    /// LED writes.
    Leds,
    /// Seven-segment display writes.
    Display7Seg,
}

/// Trace sink writing the four text traces.
///
/// The first I/O error is latched and every later event is dropped; call
/// [`TraceFiles::finish`] to flush and collect it.
#[derive(Debug)]
pub struct TraceFiles<W: Write> {
    trace: W,
    hwregtrace: W,
    leds: W,
    display7seg: W,
    error: Option<(TraceStream, io::Error)>,
}

impl<W: Write> TraceFiles<W> {
    /// Wraps the four trace outputs.
    pub const fn new(trace: W, hwregtrace: W, leds: W, display7seg: W) -> Self {
        Self {
            trace,
            hwregtrace,
            leds,
            display7seg,
            error: None,
        }
    }

    /// Flushes every stream and hands the writers back.
    ///
    /// # Errors
    ///
    /// Returns the first error seen while tracing or flushing, tagged with
    /// its stream.
    pub fn finish(mut self) -> Result<[W; 4], (TraceStream, io::Error)> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let streams = [
            (TraceStream::Instructions, &mut self.trace),
            (TraceStream::HwRegisters, &mut self.hwregtrace),
            (TraceStream::Leds, &mut self.leds),
            (TraceStream::Display7Seg, &mut self.display7seg),
        ];
        for (stream, out) in streams {
            out.flush().map_err(|error| (stream, error))?;
        }
        Ok([self.trace, self.hwregtrace, self.leds, self.display7seg])
    }

    fn write_line(&mut self, stream: TraceStream, line: &str) {
        if self.error.is_some() {
            return;
        }
        let out = match stream {
            TraceStream::Instructions => &mut self.trace,
            TraceStream::HwRegisters => &mut self.hwregtrace,
            TraceStream::Leds => &mut self.leds,
            TraceStream::Display7Seg => &mut self.display7seg,
        };
        if let Err(error) = writeln!(out, "{line}") {
            self.error = Some((stream, error));
        }
    }
}

impl<W: Write> TraceSink for TraceFiles<W> {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionStart {
                pc, raw, registers, ..
            } => {
                let mut line = format!("{pc:03X} {raw:012X}");
                for value in registers {
                    let _ = write!(line, " {value:08X}");
                }
                self.write_line(TraceStream::Instructions, &line);
            }
            TraceEvent::IoAccess {
                cycle,
                register,
                value,
                is_write,
            } => {
                let action = if is_write { "WRITE" } else { "READ" };
                let line = format!("{cycle} {action} {} {value:08X}", register.name());
                self.write_line(TraceStream::HwRegisters, &line);

                let display = match register {
                    IoRegister::Leds if is_write => Some(TraceStream::Leds),
                    IoRegister::Display7Seg if is_write => Some(TraceStream::Display7Seg),
                    _ => None,
                };
                if let Some(stream) = display {
                    self.write_line(stream, &format!("{cycle} {value:08X}"));
                }
            }
            TraceEvent::InterruptEntered { .. } | TraceEvent::Fault { .. } => {}
        }
    }
}
