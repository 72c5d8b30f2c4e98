//! Build script for modsy-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates carousel.toml, then generates the config constant

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use modsy_core::config::{CarouselConfig, LinkConfig, MountConfig, PollConfig, StepperConfig};
use modsy_core::motion::Mount;
use serde::Deserialize;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    setup_linker(&out_dir);
    let config = load_config(Path::new("carousel.toml"));
    generate_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).expect("write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    mount: MountTable,
    stepper: StepperTable,
    poll: PollTable,
    link: LinkTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MountTable {
    superior: Option<MountEntry>,
    inferior: Option<MountEntry>,
    #[serde(rename = "calçado", alias = "calcado")]
    footwear: Option<MountEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MountEntry {
    pins: [u8; 4],
    #[serde(default)]
    inverted: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StepperTable {
    steps_per_revolution: Option<u16>,
    step_delay_ms: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PollTable {
    idle_pause_ms: Option<u32>,
    command_pause_ms: Option<u32>,
    status_write_attempts: Option<u8>,
    status_retry_backoff_ms: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LinkTable {
    baudrate: Option<u32>,
    read_timeout_ms: Option<u32>,
    write_timeout_ms: Option<u32>,
}

impl FileConfig {
    /// Overlay the file onto the built-in defaults
    fn resolve(&self) -> CarouselConfig {
        let d = CarouselConfig::DEFAULT;
        let mount = |entry: &Option<MountEntry>, mount: Mount| match entry {
            Some(e) => MountConfig {
                pins: e.pins,
                inverted: e.inverted,
            },
            None => d.mounts[mount.index()],
        };
        CarouselConfig {
            mounts: [
                mount(&self.mount.superior, Mount::Upper),
                mount(&self.mount.inferior, Mount::Lower),
                mount(&self.mount.footwear, Mount::Footwear),
            ],
            stepper: StepperConfig {
                steps_per_revolution: self.stepper.steps_per_revolution.unwrap_or(d.stepper.steps_per_revolution),
                step_delay_ms: self.stepper.step_delay_ms.unwrap_or(d.stepper.step_delay_ms),
            },
            poll: PollConfig {
                idle_pause_ms: self.poll.idle_pause_ms.unwrap_or(d.poll.idle_pause_ms),
                command_pause_ms: self.poll.command_pause_ms.unwrap_or(d.poll.command_pause_ms),
                status_write_attempts: self.poll.status_write_attempts.unwrap_or(d.poll.status_write_attempts),
                status_retry_backoff_ms: self
                    .poll
                    .status_retry_backoff_ms
                    .unwrap_or(d.poll.status_retry_backoff_ms),
            },
            link: LinkConfig {
                baudrate: self.link.baudrate.unwrap_or(d.link.baudrate),
                read_timeout_ms: self.link.read_timeout_ms.unwrap_or(d.link.read_timeout_ms),
                write_timeout_ms: self.link.write_timeout_ms.unwrap_or(d.link.write_timeout_ms),
            },
        }
    }
}

/// Read, parse and validate carousel.toml
fn load_config(path: &Path) -> CarouselConfig {
    println!("cargo:rerun-if-changed={}", path.display());

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read carousel.toml", &e.to_string()),
    };

    let file: FileConfig = match toml::from_str(&content) {
        Ok(file) => file,
        Err(e) => fail("Invalid carousel.toml", &e.to_string()),
    };

    let config = file.resolve();
    if let Err(e) = config.validate() {
        fail("carousel.toml failed validation", &format!("{:?}", e));
    }
    config
}

/// Abort the build with a boxed diagnostic
fn fail(title: &str, detail: &str) -> ! {
    let lines = detail
        .lines()
        .map(|line| {
            let line = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, lines
    );
}

/// Write `carousel_config.rs` with the resolved config as a constant
fn generate_config(out_dir: &Path, config: &CarouselConfig) {
    let mounts = config
        .mounts
        .iter()
        .map(|m| {
            format!(
                "        MountConfig {{ pins: {:?}, inverted: {} }},\n",
                m.pins, m.inverted
            )
        })
        .collect::<String>();

    let code = format!(
        "// Generated from carousel.toml by build.rs\n\
         pub const CAROUSEL: CarouselConfig = CarouselConfig {{\n\
         \x20   mounts: [\n{mounts}    ],\n\
         \x20   stepper: StepperConfig {{ steps_per_revolution: {spr}, step_delay_ms: {sd} }},\n\
         \x20   poll: PollConfig {{ idle_pause_ms: {ip}, command_pause_ms: {cp}, status_write_attempts: {wa}, status_retry_backoff_ms: {rb} }},\n\
         \x20   link: LinkConfig {{ baudrate: {br}, read_timeout_ms: {rt}, write_timeout_ms: {wt} }},\n\
         }};\n",
        spr = config.stepper.steps_per_revolution,
        sd = config.stepper.step_delay_ms,
        ip = config.poll.idle_pause_ms,
        cp = config.poll.command_pause_ms,
        wa = config.poll.status_write_attempts,
        rb = config.poll.status_retry_backoff_ms,
        br = config.link.baudrate,
        rt = config.link.read_timeout_ms,
        wt = config.link.write_timeout_ms,
    );

    fs::write(out_dir.join("carousel_config.rs"), code).expect("write carousel_config.rs");
}
