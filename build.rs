use std::{env, process::Command};

const WEB_NAME: &str = "location_picker";
const WEB_PKG_DIR: &str = "picker-web";
const WEB_PKG_SRC: &str = "picker-web/src";
const WEB_FEATURE_NAME: &str = "web";

fn main() {
    let build_web = env::var(format!("CARGO_FEATURE_{}", WEB_FEATURE_NAME.to_uppercase())).is_ok();
    if !build_web {
        return;
    }
    assert_wasm_pack_is_installed();

    let status = Command::new("wasm-pack")
        .args([
            "build",
            "--target",
            "web",
            "--release",
            "--out-name",
            WEB_NAME,
            WEB_PKG_DIR,
        ])
        .status()
        .expect("Unable to execute wasm-pack");
    assert!(status.success(), "wasm-pack failed: {status}");

    println!("cargo:rerun-if-changed={WEB_PKG_SRC}");
    for entry in walkdir::WalkDir::new(WEB_PKG_SRC)
        .into_iter()
        .filter_map(Result::ok)
    {
        println!("cargo:rerun-if-changed={}", entry.path().display());
    }
}

fn assert_wasm_pack_is_installed() {
    let output = Command::new("cargo")
        .args(["install", "--list"])
        .output()
        .expect("Unable to check wasm-pack installation");
    let output_string = String::from_utf8_lossy(&output.stdout);
    if !output_string.contains("wasm-pack") {
        Command::new("cargo")
            .args(["install", "wasm-pack"])
            .status()
            .expect("Unable to install wasm-pack");
    }
}
