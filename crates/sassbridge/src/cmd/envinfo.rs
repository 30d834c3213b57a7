use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::cmd::EnvinfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

/// Variables that change how the bridge finds or runs the compiler.
const WATCHED_ENV: [&str; 3] = ["SASSBRIDGE_COMPILER", "SASSBRIDGE_LOADER", "RUST_LOG"];

#[derive(Serialize)]
struct EnvInfoOutput {
    version: &'static str,
    target: String,
    rustc: &'static str,
    os: &'static str,
    arch: &'static str,
    features: Vec<&'static str>,
    /// Interpreter used when the compiler cannot be executed directly.
    program_loader: Option<String>,
    protocol_crates: BTreeMap<&'static str, &'static str>,
    environment: BTreeMap<&'static str, Option<String>>,
}

impl EnvInfoOutput {
    fn collect() -> Self {
        let protocol_crates = BTreeMap::from([
            ("prost", "0.14"),
            ("bytes", "1"),
            ("tracing", "0.1"),
        ]);
        let environment = WATCHED_ENV
            .iter()
            .map(|key| (*key, std::env::var(key).ok()))
            .collect();
        let program_loader = sassbridge_transport::loader::host_interpreter()
            .ok()
            .flatten()
            .map(|path| path.display().to_string());

        Self {
            version: env!("CARGO_PKG_VERSION"),
            target: target_triple(),
            rustc: option_env!("RUSTC_VERSION").unwrap_or("unknown"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            features: active_features(),
            program_loader,
            protocol_crates,
            environment,
        }
    }
}

pub fn run(_args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    print_envinfo(&EnvInfoOutput::collect(), format);
    Ok(SUCCESS)
}

fn target_triple() -> String {
    option_env!("SASSBRIDGE_BUILD_TARGET")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-unknown-{}", std::env::consts::ARCH, std::env::consts::OS))
}

fn active_features() -> Vec<&'static str> {
    let mut features = vec!["cli"];
    if cfg!(feature = "async") {
        features.push("async");
    }
    features
}

fn print_envinfo(output: &EnvInfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KEY", "VALUE"]);
            for (key, value) in summary_rows(output) {
                table.add_row(vec![key.to_string(), value]);
            }
            for (key, value) in &output.environment {
                table.add_row(vec![
                    key.to_string(),
                    value.clone().unwrap_or_else(|| "(not set)".to_string()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (key, value) in summary_rows(output) {
                println!("{key:<16} {value}");
            }
            for (name, version) in &output.protocol_crates {
                println!("{:<16} {version}", format!("crate {name}"));
            }
            for (key, value) in &output.environment {
                println!("{key:<16} {}", value.as_deref().unwrap_or("(not set)"));
            }
        }
        OutputFormat::Raw => println!("{}", output.target),
    }
}

fn summary_rows(output: &EnvInfoOutput) -> Vec<(&'static str, String)> {
    vec![
        ("version", output.version.to_string()),
        ("target", output.target.clone()),
        ("rustc", output.rustc.to_string()),
        ("platform", format!("{} ({})", output.os, output.arch)),
        ("features", output.features.join(", ")),
        (
            "program loader",
            output
                .program_loader
                .clone()
                .unwrap_or_else(|| "(none)".to_string()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_unset_variables() {
        let mut out = EnvInfoOutput::collect();
        out.environment.insert("SASSBRIDGE_COMPILER", None);
        out.program_loader = Some("/lib/ld-musl-x86_64.so.1".to_string());

        let json = serde_json::to_value(&out).expect("envinfo output should serialize");
        assert_eq!(json["environment"]["SASSBRIDGE_COMPILER"], serde_json::Value::Null);
        assert_eq!(json["program_loader"], "/lib/ld-musl-x86_64.so.1");
        assert_eq!(json["features"][0], "cli");
    }

    #[test]
    fn every_watched_variable_is_reported() {
        let out = EnvInfoOutput::collect();
        for key in WATCHED_ENV {
            assert!(out.environment.contains_key(key), "{key} missing");
        }
    }

    #[test]
    fn target_looks_like_triple() {
        assert!(target_triple().split('-').count() >= 3);
    }
}
