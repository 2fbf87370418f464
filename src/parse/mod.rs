pub mod exports;
pub mod scan;
pub mod types;
pub mod value;

pub use exports::bare_exports;
pub use scan::{assignments, leftover};
pub use types::{Assignment, BareExport, Quote};
pub use value::{quote_style, resolve};
