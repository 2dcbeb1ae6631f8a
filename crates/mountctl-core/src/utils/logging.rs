/// Print a user-facing line only when `--verbose` is active.
///
/// Diagnostics meant for developers go through the `log` macros instead and
/// are controlled by `RUST_LOG`.
pub fn print_verbose(verbose: bool, msg: &str) {
    if verbose {
        println!("Verbose: {}", msg);
    }
}

/// Default log filter for the binary's subscriber
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "mountctl_core=debug,mountctl=debug,warn"
    } else {
        "warn"
    }
}
