use std::fs;

fn main() {
    // Validate default config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    // render.unterminated_code must name an UnterminatedCode variant
    let policy = table
        .get("render")
        .and_then(|render| render.get("unterminated_code"))
        .and_then(|value| value.as_str());
    if let Some(policy) = policy {
        if policy != "discard" && policy != "flush" {
            panic!("Invalid render.unterminated_code in default_config.toml: {policy}");
        }
    }
}
