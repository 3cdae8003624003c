//! Static texts.

/// Examples shown after the generated help.
pub static HELPTEXT: &'static str = r#"EXAMPLES

    serverstarter start
    serverstarter --config /srv/minecraft/server-setup-config.toml start
    serverstarter install --force
    serverstarter launch-command"#;

/// The program's version info text.
pub static INFOTEXT: &'static str =
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));
