use std::io::Read;
use std::path::Path;

use sassbridge_protocol::proto::{self, outbound_message};
use sassbridge_protocol::{
    output_style_to_wire, syntax_to_wire, translate_compile_response, ResponseError,
};

use crate::cmd::{parse_duration, CompileArgs};
use crate::exit::{
    codec_error, io_error, CliError, CliResult, COMPILE_ERROR, DATA_INVALID, SUCCESS,
};
use crate::output::{print_compile_error, print_compile_result, OutputFormat};
use crate::session::Session;

/// The only compilation this command runs.
const COMPILATION_ID: u32 = 1;

pub fn run(args: CompileArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.compiler.timeout)?;
    let request = build_request(&args)?;

    let session = Session::open(args.compiler.compiler, args.compiler.loader, timeout)?;
    session.send(COMPILATION_ID, request)?;
    let reply = session.await_reply(COMPILATION_ID)?;
    session.close()?;

    let response = match reply {
        outbound_message::Message::CompileResponse(response) => response,
        other => {
            return Err(CliError::new(
                DATA_INVALID,
                format!("expected compile_response, got {}", other.slot_name()),
            ))
        }
    };

    match translate_compile_response(response) {
        Ok(result) => {
            print_compile_result(&result, format);
            Ok(SUCCESS)
        }
        Err(ResponseError::Compile(err)) => {
            print_compile_error(&err, format);
            Ok(COMPILE_ERROR)
        }
        Err(ResponseError::Codec(err)) => Err(codec_error("invalid compile response", err)),
    }
}

fn build_request(args: &CompileArgs) -> CliResult<proto::CompileRequest> {
    let style =
        output_style_to_wire(&args.style).map_err(|err| codec_error("invalid option", err))?;
    let syntax =
        syntax_to_wire(&args.syntax).map_err(|err| codec_error("invalid option", err))?;

    let mut request = if args.input == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|err| io_error("failed reading stdin", err))?;
        proto::CompileRequest::from_string(source, None, syntax, style)
    } else {
        proto::CompileRequest::from_path(resolve_input(Path::new(&args.input))?, style)
    };
    request.source_map = args.source_map;
    request.alert_ascii = true;
    Ok(request)
}

/// The compiler runs in its own working directory, so paths are sent
/// absolute.
fn resolve_input(path: &Path) -> CliResult<String> {
    let absolute = std::path::absolute(path)
        .map_err(|err| io_error(&format!("failed resolving {}", path.display()), err))?;
    if !absolute.is_file() {
        return Err(io_error(
            &format!("failed reading {}", path.display()),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }
    Ok(absolute.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::CompilerArgs;
    use crate::exit::{FAILURE, USAGE};

    fn args(input: &str, style: &str, syntax: &str) -> CompileArgs {
        CompileArgs {
            input: input.to_string(),
            style: style.to_string(),
            syntax: syntax.to_string(),
            source_map: true,
            compiler: CompilerArgs {
                compiler: "sass".into(),
                loader: None,
                timeout: "5s".to_string(),
            },
        }
    }

    #[test]
    fn path_input_is_sent_absolute() {
        let request = build_request(&args("Cargo.toml", "compressed", "scss")).unwrap();

        let Some(proto::compile_request::Input::Path(ref path)) = request.input else {
            panic!("expected path input");
        };
        assert!(Path::new(&path).is_absolute());
        assert!(path.ends_with("Cargo.toml"));
        assert_eq!(request.style(), proto::OutputStyle::Compressed);
        assert!(request.source_map);
    }

    #[test]
    fn unknown_style_is_usage_error() {
        let err = build_request(&args("Cargo.toml", "nested", "scss")).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("expanded, compressed"));
    }

    #[test]
    fn unknown_syntax_is_usage_error() {
        let err = build_request(&args("Cargo.toml", "expanded", "less")).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn missing_input_fails() {
        let err = build_request(&args("does/not/exist.scss", "expanded", "scss")).unwrap_err();
        assert_eq!(err.code, FAILURE);
    }
}
