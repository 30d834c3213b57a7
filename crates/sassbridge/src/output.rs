use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sassbridge_protocol::{CompileError, CompileResult};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CompileOutput<'a> {
    success: bool,
    #[serde(flatten)]
    result: &'a CompileResult,
}

#[derive(Serialize)]
struct CompileFailureOutput<'a> {
    success: bool,
    error: &'a CompileError,
}

pub fn print_compile_result(result: &CompileResult, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = CompileOutput {
                success: true,
                result,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CSS BYTES", "SOURCE MAP", "LOADED URLS"])
                .add_row(vec![
                    result.css.len().to_string(),
                    if result.source_map.is_some() { "yes" } else { "no" }.to_string(),
                    result.loaded_urls.join("\n"),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", result.css);
            if let Some(map) = &result.source_map {
                println!("/* source map: {} bytes */", map.len());
            }
        }
        OutputFormat::Raw => {
            print_raw(result.css.as_bytes());
        }
    }
}

/// Report a stylesheet error. JSON goes to stdout so scripts can parse it;
/// every other format writes the compiler's message to stderr.
pub fn print_compile_error(err: &CompileError, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = CompileFailureOutput {
                success: false,
                error: err,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        _ => {
            eprintln!("{}", err.message);
            if !err.sass_stack.is_empty() {
                eprintln!("{}", err.sass_stack.trim_end());
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
