use markera_core::error::MarkeraError;
use markera_core::pdf::PdfInfo;
use std::path::PathBuf;

use crate::output;

pub fn run(file: PathBuf, output_format: &str) -> Result<(), MarkeraError> {
    let bytes = std::fs::read(&file)?;
    let info = PdfInfo::from_bytes(&bytes)?;

    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&info)?),
        _ => output::table::print_info(&file, &info),
    }

    Ok(())
}
