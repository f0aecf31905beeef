//! Pixel rendering engine for the Portal display board
//!
//! This crate provides:
//! - [`Framebuffer`]: 6 pages of 128 columns with per-page versions
//! - [`Screen`]: line renderer with glyph tables, alignment, blinking
//!   glyphs and QR codes
//! - [`Drain`]: incremental streaming of dirty pages to a [`Controller`]
//!
//! # Architecture
//!
//! ```text
//! put_line ──► Screen ──► write_bits ──► Framebuffer ──► Drain ──► Controller
//!                 ▲                                        (one column per step)
//!            blink_tick
//! ```
//!
//! Rows run top to bottom; bit 0 of a page byte is the top row of that
//! page. Each page carries a wrapping version that the drain compares
//! against the version it last sent.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod blink;
pub mod drain;
pub mod framebuffer;
pub mod glyph;
pub mod layout;
pub mod line;
pub mod qr;
pub mod screen;

// Re-export key types
pub use backend::Controller;
pub use drain::{Drain, DrainStatus};
pub use framebuffer::{Framebuffer, COLUMNS, PAGES, ROWS};
pub use layout::{LayoutError, LineLayout, LineSpec, LINES};
pub use line::{Alignment, Format};
pub use screen::{RenderError, Screen};
