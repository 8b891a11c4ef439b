// dds-wavegen - Build Script

fn main() {
    // ESP-IDF environment setup (MUST run before anything else when
    // cross-compiling for the target). Host builds skip it entirely.
    if std::env::var_os("CARGO_FEATURE_ESP32").is_some() {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rerun-if-changed=build.rs");
}
