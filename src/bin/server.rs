//! SafeGuard server binary.
//! Run with: cargo run --bin safeguard-server

use std::process::ExitCode;

use safeguard::start_safeguard;

fn main() -> ExitCode {
    start_safeguard::run()
}
