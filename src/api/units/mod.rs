mod unit_base;
mod relative_unit;

mod data_size;
mod time_delta;
mod timestamp;

pub use data_size::*;
pub use time_delta::*;
pub use timestamp::*;

pub(crate) use relative_unit::relative_unit;
pub(crate) use unit_base::unit_base;
