//! Verification score plotting jobs.
//!
//! Compact score strings from the command line are compiled into a
//! [`setup::PlotSetup`], matched against ATAB score files on disk, and
//! combined with tabulated axis bounds and colormaps into
//! [`plan::FigureJob`]s for a [`render::Renderer`].

pub mod axis;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod metadata;
pub mod plan;
pub mod render;
pub mod setup;
