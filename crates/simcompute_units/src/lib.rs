//! Human-readable quantity literals for simcompute.
//!
//! Capacities are configured as strings like `"2GHz"` or `"512MiB"` and
//! resolved to a canonical `u64` in the base unit of their family:
//!
//! - [`DataSize`] - data sizes, in bits (`b`, `B`, `kb`, `KiB`, `MB`, ...)
//! - [`CpuSize`] - clock rates, in hertz (`Hz`, `kHz`, `KiHz`, `GHz`, ...)
//!
//! # Example
//!
//! ```
//! use simcompute_units::{CpuSize, DataSize, parse_cpu_size, parse_data_size};
//!
//! assert_eq!(parse_data_size("1kb"), Ok(1000));
//! assert_eq!(parse_data_size("1KiB"), Ok(8192));
//! assert_eq!(parse_cpu_size("1MiHz"), Ok(1_048_576));
//! assert!(parse_data_size("abc").is_err());
//!
//! let rate = CpuSize::from_literal("500Hz");
//! let mem = DataSize::from_literal("300b");
//! assert_eq!((rate.hz(), mem.bits()), (500, 300));
//! ```

mod cpu_size;
mod data_size;
mod parse;

pub use cpu_size::CpuSize;
pub use data_size::DataSize;
pub use parse::{ParseError, UnitKind, parse_cpu_size, parse_data_size, parse_quantity};
