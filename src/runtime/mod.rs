//! Runtime system
//!
//! Values and names shared by the composition engine and the host.

pub mod value;
