use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sassbridge_protocol::proto::{self, outbound_message};
use serde::Serialize;

use crate::cmd::{parse_duration, ProbeArgs};
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::OutputFormat;
use crate::session::Session;

/// Version requests are compiler-global and travel under id 0.
const VERSION_REQUEST_ID: u32 = 0;

#[derive(Serialize)]
struct ProbeOutput {
    compiler: String,
    pid: u32,
    protocol_version: String,
    compiler_version: String,
    implementation_name: String,
    implementation_version: String,
}

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.compiler.timeout)?;
    let compiler = args.compiler.compiler.display().to_string();

    let session = Session::open(args.compiler.compiler, args.compiler.loader, timeout)?;
    let pid = session.pid();
    session.send(
        VERSION_REQUEST_ID,
        proto::VersionRequest {
            id: VERSION_REQUEST_ID,
        },
    )?;
    let reply = session.await_reply(VERSION_REQUEST_ID)?;
    session.close()?;

    let version = match reply {
        outbound_message::Message::VersionResponse(version) => version,
        other => {
            return Err(CliError::new(
                DATA_INVALID,
                format!("expected version_response, got {}", other.slot_name()),
            ))
        }
    };

    let out = ProbeOutput {
        compiler,
        pid,
        protocol_version: version.protocol_version,
        compiler_version: version.compiler_version,
        implementation_name: version.implementation_name,
        implementation_version: version.implementation_version,
    };
    print_probe(&out, format);
    Ok(SUCCESS)
}

fn print_probe(out: &ProbeOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["compiler", out.compiler.as_str()])
                .add_row(vec!["protocol", out.protocol_version.as_str()])
                .add_row(vec!["compiler version", out.compiler_version.as_str()])
                .add_row(vec!["implementation", out.implementation_name.as_str()])
                .add_row(vec![
                    "implementation version",
                    out.implementation_version.as_str(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} {} (protocol {}, compiler {})",
                out.implementation_name,
                out.implementation_version,
                out.protocol_version,
                out.compiler_version
            );
        }
        OutputFormat::Raw => println!("{}", out.compiler_version),
    }
}
