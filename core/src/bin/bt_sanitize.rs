use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

fn run(input: PathBuf, output: PathBuf) -> Result<usize, String> {
    let raw = std::fs::read_to_string(&input).map_err(|e| format!("read {}: {}", input.display(), e))?;
    let doc = bt_core::import_json(&raw).map_err(|e| format!("import failed: {}", e))?;
    let before = doc.blocks.len();
    let doc = bt_core::sanitize_doc(doc);
    let file = File::create(&output).map_err(|e| format!("create {}: {}", output.display(), e))?;
    serde_json::to_writer(BufWriter::new(file), &doc).map_err(|e| format!("write failed: {}", e))?;
    Ok(before - doc.blocks.len())
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("Usage: bt_sanitize <input_json> <output_json>");
        return ExitCode::from(2);
    };
    match run(PathBuf::from(input), PathBuf::from(output)) {
        Ok(dropped) => {
            if dropped > 0 {
                eprintln!("dropped {} duplicate block(s)", dropped);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
