//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `adminkit_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("adminkit_core ping={}", adminkit_core::ping());
    println!("adminkit_core version={}", adminkit_core::core_version());
}
