use crate::options::LoadOptions;

/// Load `./.env` into the process environment at program start.
///
/// Meant to be the first call in `main`. Any failure is fatal: the error is
/// printed to stderr and the process exits with status 1.
pub fn init() {
    if let Err(err) = crate::load(&LoadOptions::default()) {
        eprintln!("dotenv failed to autoload: {err}");
        std::process::exit(1);
    }
}
