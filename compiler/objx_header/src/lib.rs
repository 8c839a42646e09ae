//! objx header - the single header file for an exported module
//!
//! Takes the independently rendered declarations and lays them out:
//! Foundation imports, forward declarations, diagnostic pragmas, the
//! support prelude, then every declaration after the declarations it
//! requires.
//!
//! Also renders the C launcher that starts a managed entry point through
//! the `objx_rt` bridge.

mod emitter;
mod header;
mod launcher;
mod order;
mod prelude;

pub use emitter::{Emitter, FileEmitter, StringEmitter};
pub use header::{emit_header, render_header, FOUNDATION_IMPORTS};
pub use launcher::render_launcher;
pub use order::{order, Ordering};
pub use prelude::{prelude, prelude_classes};
