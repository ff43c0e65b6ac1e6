use flate2::Compression;
use flate2::write::GzEncoder;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    let input_path = "data/sample/all_6.js";
    println!("cargo:rerun-if-changed={}", input_path);

    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("sample-search.js.gz");

    let data = fs::read(input_path).expect("Failed to read data/sample/all_6.js");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&data)
        .expect("Failed to compress sample search data");
    let compressed = encoder.finish().expect("Failed to finish compression");

    fs::write(&output_path, &compressed).expect("Failed to write compressed sample");
}
