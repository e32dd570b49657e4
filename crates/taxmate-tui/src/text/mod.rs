//! Text rendering utilities.
//!
//! This module provides shared text rendering functionality:
//! - [`render_markdown`] - Render assistant markdown to styled ratatui Lines
//! - [`wrap_text`], [`wrap_lines`] - Width-aware wrapping
//! - [`visual_width`], [`truncate_to_width`] - Terminal cell measurements

mod markdown;
mod wrap;

pub use markdown::{render_markdown, MarkdownStyles};
pub use wrap::{truncate_to_width, visual_width, wrap_lines, wrap_text};
