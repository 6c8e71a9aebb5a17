//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了分层缓存的并发协调机制。

pub mod single_flight;

pub use single_flight::SingleFlight;
