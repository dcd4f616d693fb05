//! Text diff engine for string-valued property changes.
//!
//! ## Entry point
//!
//! ```
//! use node_history_core::diff::{HtmlArrayRenderer, TextDiffer};
//!
//! let diff = TextDiffer::default().diff(
//!     "<p>Hello  world</p>",
//!     "<p>Hello, world</p>",
//!     &HtmlArrayRenderer,
//! );
//! assert_eq!(diff.hunks.len(), 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical hunks.
//! - **Markup noise suppression**: `&nbsp;`, `<br>` variants and space runs are
//!   normalized before lines are compared.
//! - **Whole-side marking**: blocks whose base side is blank have every changed
//!   line wrapped in the renderer's insertion markers, and vice versa.

pub mod human_summary;
pub mod line_diff;
pub mod model;
pub mod normalize;
pub mod renderer;
pub mod text;

pub use human_summary::render_human_summary;
pub use model::{BlockSide, DiffBlock, DiffHunk, DiffTag, TextDiff};
pub use renderer::{DiffRenderer, HtmlArrayRenderer, PlainArrayRenderer};
pub use text::TextDiffer;
