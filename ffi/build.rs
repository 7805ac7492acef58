use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    println!("cargo:rerun-if-changed=src");

    let header = crate_dir.join("include").join("petfinder.h");
    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("PETFINDER_FFI_H")
        .with_documentation(true)
        .generate();

    // A missing header must not fail the library build.
    match bindings {
        Ok(bindings) => {
            if let Err(e) = std::fs::create_dir_all(header.parent().unwrap_or(&crate_dir)) {
                println!("cargo:warning=cannot create include dir: {e}");
                return;
            }
            bindings.write_to_file(&header);
        }
        Err(e) => println!("cargo:warning=C header not generated: {e}"),
    }
}
