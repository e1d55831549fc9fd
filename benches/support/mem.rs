use std::{
    fs::{create_dir_all, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use rosterbench::Variant;

const BASE_DIR: &str = "target/bench-mem";
const MEMORY_FILE: &str = "roster_memory.csv";

/// Appends one `variant,size,bytes` row, header on first use. Failures are
/// reported and otherwise ignored so a bench run never aborts on them.
pub fn record_mem(variant: Variant, size: usize, bytes: usize) {
    let base = Path::new(BASE_DIR);
    if let Err(err) = create_dir_all(base) {
        eprintln!("failed to create metric directory: {err}");
        return;
    }
    let path = base.join(MEMORY_FILE);
    let existed = path.exists();
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("failed to open metric csv {}: {err}", path.display());
            return;
        }
    };
    let mut writer = BufWriter::new(file);
    let header = if existed { "" } else { "variant,size,bytes\n" };
    if let Err(err) = writeln!(writer, "{header}{},{size},{bytes}", variant.name()) {
        eprintln!("failed to record metric row for {}: {err}", path.display());
    }
}
