//! Build script for domotica-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates installation.toml at compile time

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest zone id
const MAX_ZONE: i64 = 32;

/// Highest terminal count a 7-bit address can reach
const MAX_TERMINALS: i64 = 128;

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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate installation.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=installation.toml");

    let config_path = Path::new("installation.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: installation.toml not found!                             ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds the installation layout at build time.      ║\n\
            ║  Please create one in the domotica-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read installation.toml                         ║\n\
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
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in installation.toml                 ║\n\
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
    let terminal_count = validate_bus(&config, &mut errors);
    validate_dimming(&config, &mut errors);
    let zones = validate_zones(&config, &mut errors);
    validate_terminals(&config, terminal_count, &zones, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid installation.toml                                ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=installation.toml validated successfully");
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

/// Check an optional integer key against a range
fn check_int(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(v)) if range.contains(v) => Some(*v),
        Some(_) => {
            errors.push(format!(
                "[{}] {} must be an integer in {}..={}",
                section,
                key,
                range.start(),
                range.end()
            ));
            None
        }
    }
}

/// Validate the [bus] section, returning the terminal count
fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) -> i64 {
    let Some(bus) = config.get("bus") else {
        return 13;
    };
    let Some(bus) = bus.as_table() else {
        errors.push("[bus] must be a table".to_string());
        return 13;
    };

    check_int(bus, "bus", "poll_timeout_ms", 1..=10_000, errors);
    check_int(bus, "bus", "conn_timeout_ms", 1..=10_000, errors);
    check_int(bus, "bus", "baudrate", 1200..=1_000_000, errors);
    check_int(bus, "bus", "terminal_count", 0..=MAX_TERMINALS, errors).unwrap_or(13)
}

/// Validate the [dimming] section
fn validate_dimming(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(dimming) = config.get("dimming").and_then(|d| d.as_table()) else {
        return;
    };

    check_int(dimming, "dimming", "fade_ms", 0..=u16::MAX as i64, errors);
    check_int(dimming, "dimming", "default_duty", 0..=1023, errors);

    match dimming.get("gamma") {
        None => {}
        Some(toml::Value::Float(g)) if *g > 0.0 => {}
        Some(toml::Value::Integer(g)) if *g > 0 => {}
        Some(_) => errors.push("[dimming] gamma must be a positive number".to_string()),
    }
}

/// Read a list of zone ids
fn zone_list(value: &toml::Value, context: &str, errors: &mut Vec<String>) -> Vec<i64> {
    let Some(items) = value.as_array() else {
        errors.push(format!("{} must be an array of zone ids", context));
        return Vec::new();
    };
    let mut zones = Vec::new();
    for item in items {
        match item.as_integer() {
            Some(id) if (1..=MAX_ZONE).contains(&id) => zones.push(id),
            _ => errors.push(format!("{} zone ids must be 1..={}", context, MAX_ZONE)),
        }
    }
    zones
}

/// Validate the [zones] section, returning zone id -> is PWM
fn validate_zones(config: &toml::Value, errors: &mut Vec<String>) -> BTreeMap<i64, bool> {
    let mut zones = BTreeMap::new();

    let Some(table) = config.get("zones").and_then(|z| z.as_table()) else {
        errors.push("Missing [zones] section".to_string());
        return zones;
    };

    for (key, is_pwm) in [("pwm", true), ("digital", false)] {
        let Some(value) = table.get(key) else {
            continue;
        };
        for id in zone_list(value, &format!("[zones] {}", key), errors) {
            if zones.insert(id, is_pwm).is_some() {
                errors.push(format!("[zones] zone {} listed twice", id));
            }
        }
    }

    zones
}

/// Validate every [terminal.N] section
fn validate_terminals(
    config: &toml::Value,
    terminal_count: i64,
    zones: &BTreeMap<i64, bool>,
    errors: &mut Vec<String>,
) {
    let Some(terminals) = config.get("terminal").and_then(|t| t.as_table()) else {
        return;
    };

    let button_keys: BTreeSet<String> = (1..=3)
        .flat_map(|n| {
            [
                format!("button{}", n),
                format!("button{}_pressed", n),
                format!("button{}_double", n),
                format!("button{}_held", n),
            ]
        })
        .collect();

    for (name, terminal) in terminals {
        match name.parse::<i64>() {
            Ok(device) if device < terminal_count => {}
            _ => {
                errors.push(format!(
                    "[terminal.{}] must be below terminal_count ({})",
                    name, terminal_count
                ));
                continue;
            }
        }

        let Some(terminal) = terminal.as_table() else {
            errors.push(format!("[terminal.{}] must be a table", name));
            continue;
        };

        for (key, value) in terminal {
            let is_trimmer = key == "trimmer";
            if !is_trimmer && !button_keys.contains(key) {
                errors.push(format!("[terminal.{}] unknown key '{}'", name, key));
                continue;
            }

            let context = format!("[terminal.{}] {}", name, key);
            let ids = zone_list(value, &context, errors);
            if ids.len() > 2 {
                errors.push(format!("{} binds more than 2 zones", context));
            }
            for id in ids {
                match zones.get(&id) {
                    None => errors.push(format!("{} references unknown zone {}", context, id)),
                    Some(false) if is_trimmer => {
                        errors.push(format!("{} cannot dim digital zone {}", context, id))
                    }
                    Some(_) => {}
                }
            }
        }
    }
}
