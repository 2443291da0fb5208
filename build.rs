use std::{env, fs, path::PathBuf};

fn main() {
    // 1) Handle memory.x based on target
    let target = env::var("TARGET").unwrap_or_default();
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo always sets OUT_DIR"));

    if target.starts_with("thumbv8m") {
        // Pico 2 ARM: copy memory-pico2.x to OUT_DIR as memory.x
        copy_memory_x("memory-pico2.x", &out_dir);
    } else if target.starts_with("thumbv6m") {
        // Pico 1W: copy memory-pico1w.x to OUT_DIR as memory.x
        copy_memory_x("memory-pico1w.x", &out_dir);
    }
    if target.starts_with("thumbv") {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
            println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
        }
    }

    // 2) Load optional env files (still supported for convenience)
    let _ = dotenvy::from_filename(".env");
    load_home_env(".pico.env");
    load_home_env(".env");

    // 3) Provide fallbacks so the clock compiles without .env
    let wifi_ssid = env_or_default("WIFI_SSID", "");
    let wifi_pass = env_or_default("WIFI_PASS", "");
    let hostname = env_or_default("CLOCK_HOSTNAME", "dcf-clock");

    // Warn only if Wi-Fi was explicitly enabled but credentials are missing.
    if env::var_os("CARGO_FEATURE_WIFI").is_some() && wifi_ssid.is_empty() {
        println!(
            "cargo:warning=WIFI feature enabled but WIFI_SSID is not set; the clock will start offline"
        );
    }

    // 4) Expose as compile-time constants
    println!("cargo:rustc-env=WIFI_SSID={wifi_ssid}");
    println!("cargo:rustc-env=WIFI_PASS={wifi_pass}");
    println!("cargo:rustc-env=CLOCK_HOSTNAME={hostname}");

    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASS");
    println!("cargo:rerun-if-env-changed=CLOCK_HOSTNAME");
    println!("cargo:rerun-if-changed=.env");
}

fn copy_memory_x(source: &str, out_dir: &PathBuf) {
    let memory_x = fs::read_to_string(source).unwrap_or_else(|err| panic!("read {source}: {err}"));
    let dest = out_dir.join("memory.x");
    fs::write(&dest, memory_x).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={source}");
}

fn load_home_env(file: &str) {
    let home = match env::var_os("USERPROFILE").or_else(|| env::var_os("HOME")) {
        Some(path) => PathBuf::from(path),
        None => return,
    };
    let path = home.join(file);
    let _ = dotenvy::from_path(&path);
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
