//! Generates the instruction decoder from the opcode classification table.

use std::env;
use std::fs;
use std::path::PathBuf;

use m6502_decoder::{DecoderTable, GeneratorConfig, InvalidOpcodePolicy, emit};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let policy = if env::var_os("CARGO_FEATURE_INVALID_NOP").is_some() {
        InvalidOpcodePolicy::Nop
    } else {
        InvalidOpcodePolicy::Jam
    };

    let table = match DecoderTable::build() {
        Ok(table) => table,
        Err(e) => panic!("decoder table generation failed: {e}"),
    };
    let source = emit::render_rust(&table, &GeneratorConfig::with_policy(policy));

    let Some(out_dir) = env::var_os("OUT_DIR") else {
        panic!("OUT_DIR not set");
    };
    let path = PathBuf::from(out_dir).join("decoder.rs");
    if let Err(e) = fs::write(&path, source) {
        panic!("failed to write {}: {e}", path.display());
    }
}
