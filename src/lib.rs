//! Route evaluation and ranking engine for Elite Dangerous laser
//! mining, plus the thin clients that feed it live data.

pub mod domain;
pub mod infra;
pub mod scan;
pub mod util;
