//! Test utilities for lintbridge_plugin.

use std::fmt::Write;

/// Helper to compile WAT to WASM bytes
pub fn wat_to_wasm(wat_source: &str) -> Vec<u8> {
    wat::parse_str(wat_source).expect("Invalid WAT")
}

/// Builds a module whose exports each return a fixed output.
///
/// Every `(export, output)` pair becomes an export that ignores its input and
/// hands `output` back through the Extism kernel's `output_set`.
pub fn fixed_output_wat(exports: &[(&str, &str)]) -> String {
    let mut segments = String::new();
    let mut functions = String::new();
    let mut offset = 0usize;

    for (export, output) in exports {
        let escaped: String = output.bytes().fold(String::new(), |mut acc, byte| {
            let _ = write!(acc, "\\{byte:02x}");
            acc
        });
        let _ = writeln!(segments, r#"(data (i32.const {offset}) "{escaped}")"#);
        let _ = writeln!(
            functions,
            r#"(func (export "{export}") (result i32)
                (call $emit (i32.const {offset}) (i32.const {len}))
                (i32.const 0))"#,
            len = output.len()
        );
        offset += output.len();
    }

    format!(
        r#"
        (module
            (import "extism:host/env" "alloc" (func $alloc (param i64) (result i64)))
            (import "extism:host/env" "store_u8" (func $store_u8 (param i64 i32)))
            (import "extism:host/env" "output_set" (func $output_set (param i64 i64)))
            (memory (export "memory") 1)
            ;; Copies bytes from this module's memory into kernel memory
            (func $emit (param $src i32) (param $len i32)
                (local $dst i64)
                (local $i i32)
                (local.set $dst (call $alloc (i64.extend_i32_u (local.get $len))))
                (block $done
                    (loop $copy
                        (br_if $done (i32.ge_u (local.get $i) (local.get $len)))
                        (call $store_u8
                            (i64.add (local.get $dst) (i64.extend_i32_u (local.get $i)))
                            (i32.load8_u (i32.add (local.get $src) (local.get $i))))
                        (local.set $i (i32.add (local.get $i) (i32.const 1)))
                        (br $copy)))
                (call $output_set (local.get $dst) (i64.extend_i32_u (local.get $len))))
            {segments}
            {functions}
        )
        "#
    )
}

/// A module whose `get_manifest` declares `analyzers` and whose other
/// exports return fixed outputs.
pub fn plugin_wat(analyzers: &[(&str, &str)], exports: &[(&str, &str)]) -> String {
    let descriptors: Vec<serde_json::Value> = analyzers
        .iter()
        .map(|(name, export)| serde_json::json!({ "name": name, "export": export }))
        .collect();
    let manifest = serde_json::json!({
        "name": "test-plugin",
        "version": "1.0.0",
        "analyzers": descriptors,
    })
    .to_string();

    let mut all = vec![("get_manifest", manifest.as_str())];
    all.extend_from_slice(exports);
    fixed_output_wat(&all)
}
