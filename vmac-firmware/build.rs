//! Build script for vmac-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bridge.toml at compile time
//! - Links the emulator core library

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Colour framebuffer capacity in pixels (see `FRAMEBUFFER_PIXELS` in main.rs)
const MAX_PIXELS: i64 = 512 * 342;

/// Physical panel size
const PANEL_WIDTH: i64 = 640;
const PANEL_HEIGHT: i64 = 480;

fn main() {
    setup_linker();
    validate_config();
    link_emulator();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Link the prebuilt emulator core if one is provided
///
/// `VMAC_EMULATOR_LIB_DIR` must contain `libvmac_emulator.a`, built for the
/// same target with the hook functions in `src/emulator.rs` as its
/// platform layer.
fn link_emulator() {
    println!("cargo:rerun-if-env-changed=VMAC_EMULATOR_LIB_DIR");

    match env::var("VMAC_EMULATOR_LIB_DIR") {
        Ok(dir) => {
            println!("cargo:rustc-link-search=native={}", dir);
            println!("cargo:rustc-link-lib=static=vmac_emulator");
        }
        Err(_) => {
            println!("cargo:warning=VMAC_EMULATOR_LIB_DIR not set, emulator core will not be linked");
        }
    }
}

/// Validate bridge.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=bridge.toml");

    let config_path = Path::new("bridge.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: bridge.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a bridge.toml configuration file.         ║\n\
            ║  Please create one in the vmac-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read bridge.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in bridge.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_link(&config, &mut errors);
    validate_video(&config, &mut errors);
    report("Invalid bridge configuration", &errors);

    println!("cargo:warning=bridge.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Look up `[section] key` as an integer, recording an error if it has the wrong type
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => None,
    }
}

/// Validate the [link] section
fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    match config.get("link") {
        Some(toml::Value::Table(_)) => {}
        Some(_) => {
            errors.push("[link] must be a table".to_string());
            return;
        }
        None => {
            errors.push("Missing [link] section".to_string());
            return;
        }
    }

    if let Some(baud) = integer(config, "link", "baudrate", errors) {
        if !(9_600..=4_000_000).contains(&baud) {
            errors.push("[link] baudrate must be 9600-4000000".to_string());
        }
    }

    if let Some(capacity) = integer(config, "link", "payload_capacity", errors) {
        // Keyboard reports need 3 bytes, pointer reports 5
        if !(5..=1024).contains(&capacity) {
            errors.push("[link] payload_capacity must be 5-1024".to_string());
        }
    }

    for key in ["discard_timeout_ms", "poll_interval_ms"] {
        if let Some(ms) = integer(config, "link", key, errors) {
            if !(0..=1000).contains(&ms) {
                errors.push(format!("[link] {} must be 0-1000", key));
            }
        }
    }
}

/// Validate the [video] section
fn validate_video(config: &toml::Value, errors: &mut Vec<String>) {
    match config.get("video") {
        Some(toml::Value::Table(_)) => {}
        Some(_) => {
            errors.push("[video] must be a table".to_string());
            return;
        }
        None => {
            errors.push("Missing [video] section".to_string());
            return;
        }
    }

    let width = integer(config, "video", "width", errors).unwrap_or(512);
    let height = integer(config, "video", "height", errors).unwrap_or(342);
    let x_offset = integer(config, "video", "x_offset", errors).unwrap_or(64);
    let y_offset = integer(config, "video", "y_offset", errors).unwrap_or(69);

    if width <= 0 || height <= 0 {
        errors.push("[video] width and height must be positive".to_string());
    } else {
        if width % 8 != 0 {
            errors.push("[video] width must be a multiple of 8".to_string());
        }
        if width * height > MAX_PIXELS {
            errors.push(format!("[video] width * height must not exceed {}", MAX_PIXELS));
        }
    }

    if x_offset < 0 || y_offset < 0 {
        errors.push("[video] offsets must not be negative".to_string());
    } else if x_offset + width > PANEL_WIDTH || y_offset + height > PANEL_HEIGHT {
        errors.push(format!("[video] image does not fit the {}x{} panel", PANEL_WIDTH, PANEL_HEIGHT));
    }

    for key in ["foreground", "background"] {
        if let Some(colour) = integer(config, "video", key, errors) {
            if !(0..=0xFFFF).contains(&colour) {
                errors.push(format!("[video] {} must be an RGB565 value", key));
            }
        }
    }
}
