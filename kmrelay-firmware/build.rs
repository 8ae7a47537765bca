//! Build script for kmrelay-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates relay.toml at compile time and generates the config constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use kmrelay_core::config::{RelayConfig, ReportMode};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    let config = validate_config();
    generate_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate relay.toml configuration at compile time
fn validate_config() -> RelayConfig {
    println!("cargo:rerun-if-changed=relay.toml");

    let config_path = Path::new("relay.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: relay.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a relay.toml configuration file.          ║\n\
            ║  Please create one in the kmrelay-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read relay.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: RelayConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid relay.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate() {
        let reason = format!("{:?}", e);
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: relay.toml values out of range                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&reason)
        );
    }

    println!("cargo:warning=relay.toml validated successfully");
    config
}

/// Write the validated config as a Rust constant
fn generate_config(out_dir: &Path, config: &RelayConfig) {
    let report_mode = match config.report_mode {
        ReportMode::Auto => "Auto",
        ReportMode::Manual => "Manual",
    };

    let code = format!(
        "/// Relay configuration from relay.toml\n\
         pub const RELAY_CONFIG: kmrelay_core::config::RelayConfig = \
         kmrelay_core::config::RelayConfig {{\n    \
             baud_rate: {},\n    \
             width: {},\n    \
             height: {},\n    \
             report_mode: kmrelay_core::config::ReportMode::{},\n\
         }};\n",
        config.baud_rate, config.width, config.height, report_mode
    );

    fs::write(out_dir.join("relay_config.rs"), code).unwrap();
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
