// Slint sources live under `ui/`; components are imported by file name.
const UI_ENTRY: &str = "ui/app.slint";
const UI_INCLUDE_DIRS: [&str; 2] = ["ui", "ui/components"];

use std::path::PathBuf;

fn main() {
    let config = slint_build::CompilerConfiguration::new()
        .with_style("fluent".into())
        .with_include_paths(UI_INCLUDE_DIRS.into_iter().map(PathBuf::from).collect());

    if let Err(e) = slint_build::compile_with_config(UI_ENTRY, config) {
        panic!("failed to compile {UI_ENTRY}: {e}");
    }
}
