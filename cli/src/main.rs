use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::Parser;
use serde::Serialize;
use toon_codec::{
    convert_json, decode, DecodeOptions, Delimiter, EncodeOptions, Indent, Value,
};

#[derive(Parser, Debug)]
#[command(name = "toonc", version, about = "TOON encoder/decoder")]
struct Args {
    /// Input file path (.json or .toon). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode (overrides auto-detection).
    #[arg(short = 'e', long)]
    encode: bool,

    /// Force decode mode (overrides auto-detection).
    #[arg(short = 'd', long)]
    decode: bool,

    /// Cell delimiter: , (comma), \t (tab), | (pipe).
    #[arg(long, value_name = "char", value_parser = parse_delimiter)]
    delimiter: Option<Delimiter>,

    /// Indentation size (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Show token statistics after encoding.
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

impl InputSource {
    fn label(&self) -> &str {
        match self {
            InputSource::Stdin => "stdin",
            InputSource::File(path) => path,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(&args, &input_source)?;

    match mode {
        Mode::Encode => run_encode(&args, &input_text, &input_source),
        Mode::Decode => run_decode(&args, &input_text, &input_source),
    }
}

fn run_encode(args: &Args, input: &str, source: &InputSource) -> Result<(), Box<dyn Error>> {
    let mut options = EncodeOptions::new().with_indent(Indent::spaces(args.indent));
    if let Some(delimiter) = args.delimiter {
        options = options.with_delimiter(delimiter);
    }

    let conversion = convert_json(input, &options)?;
    write_output(args.output.as_deref(), &conversion.output)?;
    if let Some(path) = output_path(args) {
        report_status("Encoded", source, path);
    }

    if args.stats {
        println!();
        println!(
            "ℹ Token estimates: ~{} (JSON) → ~{} (TOON)",
            conversion.input_tokens, conversion.output_tokens
        );
        let saved = conversion.input_tokens as i64 - conversion.output_tokens as i64;
        println!("✔ Saved ~{saved} tokens ({}%)", conversion.savings_percent());
    }
    Ok(())
}

fn run_decode(args: &Args, input: &str, source: &InputSource) -> Result<(), Box<dyn Error>> {
    // `--indent 0` selects compact JSON output; parsing keeps the default unit.
    let parse_indent = if args.indent == 0 { 2 } else { args.indent };
    let mut options = DecodeOptions::new().with_indent(Indent::spaces(parse_indent));
    if let Some(delimiter) = args.delimiter {
        options = options.with_delimiter(delimiter);
    }

    let value = decode(input, &options)?;
    let json = render_json(&value, args.indent)?;
    write_output(args.output.as_deref(), &json)?;
    if let Some(path) = output_path(args) {
        report_status("Decoded", source, path);
    }
    Ok(())
}

fn resolve_mode(args: &Args, input_source: &InputSource) -> Result<Mode, Box<dyn Error>> {
    if args.encode {
        return Ok(Mode::Encode);
    }
    if args.decode {
        return Ok(Mode::Decode);
    }
    match input_source {
        InputSource::Stdin => Ok(Mode::Encode),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Mode::Encode),
            Some("toon") => Ok(Mode::Decode),
            _ => Err("unable to auto-detect mode; use --encode or --decode".into()),
        },
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    match raw {
        "," => Ok(Delimiter::Comma),
        "|" => Ok(Delimiter::Pipe),
        "\t" => Ok(Delimiter::Tab),
        _ => Err(format!(
            "invalid delimiter {raw:?}; valid delimiters are: comma (,), tab (\\t), pipe (|)"
        )),
    }
}

fn output_path(args: &Args) -> Option<&str> {
    args.output.as_deref().filter(|path| *path != "-")
}

fn write_output(path: Option<&str>, data: &str) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) if path != "-" => {
            fs::write(path, data)?;
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(data.as_bytes())?;
        }
    }
    Ok(())
}

fn render_json(value: &Value, indent: usize) -> Result<String, Box<dyn Error>> {
    let json = serde_json::Value::from(value.clone());
    if indent == 0 {
        return Ok(serde_json::to_string(&json)?);
    }
    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    json.serialize(&mut serializer)?;
    Ok(String::from_utf8(out)?)
}

fn report_status(verb: &str, source: &InputSource, output_path: &str) {
    println!("✔ {verb} {} → {output_path}", source.label());
}
