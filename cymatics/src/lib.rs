//! Closed-form acoustic field visualisations.
//!
//! Two figures are produced: a grid of Chladni-plate interference patterns
//! (sums of cosine standing-wave modes) and the "acoustic anode", a rotating
//! potential on a disc whose numerical gradient is drawn as streamlines.

pub mod anode;
pub mod chladni;
pub mod colormap;
pub mod config;
pub mod contour;
pub mod figures;
pub mod grid;
pub mod mask;
pub mod streamlines;
pub mod vector_field;
pub mod visualisation;

pub use anode::{AcousticAnode, AnodeField, FieldLayout};
pub use chladni::{chladni_pattern, ChladniMode};
pub use config::Config;
pub use grid::Grid;
pub use mask::DiscMask;
pub use streamlines::{trace_streamlines, Streamline, StreamlineParams};
pub use vector_field::VectorField;
