//! Build script for portal-display-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use portal_core::config::{parse_config, PanelConfig};

/// Sections the on-device parser understands
const SECTIONS: [&str; 7] = [
    "firmware", "serial", "display", "line", "buzzer", "keys", "timing",
];

/// Display height in rows
const ROWS: i64 = 48;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds panel.toml and parses it at boot.           ║\n\
            ║  Please create one in the portal-display-fw directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    validate_sections(&config);
    validate_display(&config);
    validate_lines(&config);
    validate_buzzer(&config);
    validate_parsers(&config_content);

    println!("cargo:warning=panel.toml validated successfully");
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

/// Abort the build with a list of problems
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

/// Reject sections the firmware would refuse at boot
fn validate_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    if let Some(table) = config.as_table() {
        for (name, value) in table {
            if !SECTIONS.contains(&name.as_str()) {
                errors.push(format!("Unknown section [{}]", name));
                continue;
            }
            let shape_ok = match name.as_str() {
                "line" => value.is_array(),
                _ => value.is_table(),
            };
            if !shape_ok {
                errors.push(format!("[{}] has the wrong shape", name));
            }
        }
    }

    report("Invalid sections in panel.toml", &errors);
}

/// Validate the [display] section
fn validate_display(config: &toml::Value) {
    let display = match config.get("display") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    let mut errors = Vec::new();

    if let Some(toml::Value::Integer(contrast)) = display.get("contrast") {
        if !(0..=255).contains(contrast) {
            errors.push("[display] contrast must be 0-255".to_string());
        }
    }

    if let Some(toml::Value::Integer(version)) = display.get("boot_qr") {
        if !(3..=7).contains(version) {
            errors.push("[display] boot_qr must be a QR version 3-7".to_string());
        }
    }

    if let Some(toml::Value::Integer(offset)) = display.get("qr_offset") {
        // A QR code is 45 columns wide
        if !(0..=83).contains(offset) {
            errors.push("[display] qr_offset must be 0-83".to_string());
        }
    }

    if let Some(toml::Value::Integer(period)) = display.get("blink_ms") {
        if *period <= 0 {
            errors.push("[display] blink_ms must be positive".to_string());
        }
    }

    report("Invalid display configuration", &errors);
}

/// Validate the [[line]] tables
fn validate_lines(config: &toml::Value) {
    let lines = match config.get("line") {
        Some(toml::Value::Array(lines)) => lines,
        _ => return,
    };

    let mut errors = Vec::new();

    if lines.len() > 4 {
        errors.push(format!("{} [[line]] tables, the display has 4 lines", lines.len()));
    }

    let mut rows = 0;
    for (i, line) in lines.iter().enumerate() {
        let line = match line.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[[line]] {} must be a table", i));
                continue;
            }
        };

        let indent = line
            .get("upper_indent")
            .and_then(|v| v.as_integer())
            .unwrap_or(0);
        let height = line.get("height").and_then(|v| v.as_integer()).unwrap_or(12);

        if !(1..=16).contains(&height) {
            errors.push(format!("[[line]] {} height must be 1-16", i));
        }
        if indent < 0 {
            errors.push(format!("[[line]] {} upper_indent cannot be negative", i));
        }
        rows += indent + height;
    }

    // Lines left out keep the default 12 rows
    rows += 12 * 4_i64.saturating_sub(lines.len() as i64);
    if rows > ROWS {
        errors.push(format!("Lines need {} rows, the display has {}", rows, ROWS));
    }

    report("Invalid line layout", &errors);
}

/// Validate the [buzzer] section
fn validate_buzzer(config: &toml::Value) {
    let buzzer = match config.get("buzzer") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    let mut errors = Vec::new();

    if let Some(toml::Value::Integer(hz)) = buzzer.get("frequency_hz") {
        if !(0..=20_000).contains(hz) {
            errors.push("[buzzer] frequency_hz must be 0-20000".to_string());
        }
    }

    if let Some(toml::Value::Integer(duty)) = buzzer.get("duty_percent") {
        if !(0..=100).contains(duty) {
            errors.push("[buzzer] duty_percent must be 0-100".to_string());
        }
    }

    report("Invalid buzzer configuration", &errors);
}

/// Check that the on-device parser reads the file the way serde does
fn validate_parsers(content: &str) {
    let mut errors = Vec::new();

    let typed: Option<PanelConfig> = match toml::from_str(content) {
        Ok(config) => Some(config),
        Err(e) => {
            errors.extend(e.to_string().lines().map(str::to_string));
            None
        }
    };

    let on_device = match parse_config(content) {
        Ok(config) => Some(config),
        Err(e) => {
            errors.push(format!("On-device parser rejects the file: {:?}", e));
            None
        }
    };

    if let (Some(typed), Some(on_device)) = (typed, on_device) {
        if typed != on_device {
            errors.push("On-device parser reads different values".to_string());
            errors.push("(hex/octal integers and inline tables are unsupported)".to_string());
        }
        if let Err(e) = typed.layout() {
            errors.push(format!("Line layout does not fit: {:?}", e));
        }
    }

    report("panel.toml does not load on the device", &errors);
}
