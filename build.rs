use std::fs;
use std::path::Path;

fn main() {
    let path = Path::new("BUILD_NUMBER");
    let current: u64 = fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);

    let next = current + 1;
    // A read-only checkout (e.g. a packaged crate) keeps the old number.
    let build = match fs::write(path, format!("{next}\n")) {
        Ok(()) => next,
        Err(e) => {
            println!("cargo:warning=could not update BUILD_NUMBER: {e}");
            current
        }
    };

    println!("cargo:rustc-env=BUILD_NUMBER={build}");
    println!("cargo:rerun-if-changed=build.rs");
}
