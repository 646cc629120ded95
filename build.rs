fn main() {
    // diesel's postgres backend links libpq; homebrew keeps it off the default search path
    if cfg!(target_os = "macos") {
        println!("cargo:rustc-link-arg=-Wl,-rpath,/opt/homebrew/opt/postgresql@16/lib");
        println!("cargo:rustc-link-arg=-Wl,-rpath,/opt/homebrew/opt/libpq/lib");
    }
}
