mod powermeter;

pub use powermeter::*;
