use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    // OUT_DIR is typically: target/debug/build/reporting-xxx/out
    // The binary lands in: target/debug
    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();
    let out_path = Path::new(&out_dir);
    let Some(target_dir) = out_path.ancestors().find(|p| p.ends_with(&profile)) else {
        println!("cargo:warning=target profile directory not found, config.toml not copied");
        return;
    };

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root");

    let source_config = workspace_root.join("config.toml");
    let dest_config = target_dir.join("config.toml");

    if source_config.exists() {
        let contents = fs::read_to_string(&source_config)
            .unwrap_or_else(|e| panic!("Failed to read config.toml: {}", e));
        // The copy keeps resolving relative paths against the workspace root
        let root_line = format!("root = {:?}\n", workspace_root.to_string_lossy());
        let has_root = contents.lines().any(|l| l.trim_start().starts_with("root"));
        let copied = if has_root {
            contents
        } else {
            root_line + &contents
        };
        fs::write(&dest_config, copied)
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    } else {
        println!(
            "cargo:warning=config.toml not found at {:?}, the embedded default will be used",
            source_config
        );
    }
}
