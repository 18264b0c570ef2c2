//! Version command

/// Run the version command.
pub fn run(json: bool) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if json {
        println!("{}", serde_json::json!({ "name": name, "version": version }));
    } else {
        println!("{name} {version}");
    }
}
