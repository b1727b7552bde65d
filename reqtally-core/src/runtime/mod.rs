mod clock;
mod shutdown;


pub use clock::{Clock, ManualClock, SystemClock, display_time, quantize};
pub use shutdown::{InterruptFlag, StopToken, Worker, install_interrupt_handler};
