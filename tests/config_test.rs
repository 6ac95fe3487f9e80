use predicates::str::contains;
use std::fs;
use tempfile::tempdir;

#[test]
fn config_shows_defaults_without_sdpack_toml() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("sdpack")
        .current_dir(tmp.path())
        .env("SDPACK_HOME", tmp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(contains("resolution.sdpack_toml=missing"))
        .stdout(contains("plugin.dir=com.cajigas.absence.sdPlugin"))
        .stdout(contains("pack.zip_bin=zip"))
        .stdout(contains("icons.converter_bin=rsvg-convert"))
        .stdout(contains("i18n.fallback_language=en"));
}

#[test]
fn sdpack_toml_then_environment_overrides_apply() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("sdpack.toml"),
        "[plugin]\nid = \"com.example.timer\"\n\n[pack]\nzip_bin = \"/opt/zip\"\n",
    )
    .expect("write sdpack.toml");

    assert_cmd::cargo::cargo_bin_cmd!("sdpack")
        .current_dir(tmp.path())
        .env("SDPACK_HOME", tmp.path())
        .env("SDPACK_ZIP_BIN", "/usr/local/bin/zip")
        .env("SDPACK_LANGUAGES", "en, es, pt-BR")
        .arg("config")
        .assert()
        .success()
        .stdout(contains("plugin.id=com.example.timer"))
        .stdout(contains("plugin.dir=com.example.timer.sdPlugin"))
        .stdout(contains("com.example.timer.streamDeckPlugin"))
        .stdout(contains("pack.zip_bin=/usr/local/bin/zip"))
        .stdout(contains(r#"i18n.languages=["en", "es", "pt-BR"]"#));
}

#[test]
fn malformed_sdpack_toml_fails_with_config_code() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("sdpack.toml"), "[plugin\nid = ").expect("write sdpack.toml");

    assert_cmd::cargo::cargo_bin_cmd!("sdpack")
        .current_dir(tmp.path())
        .env("SDPACK_HOME", tmp.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(contains("code=E006_CONFIG_INVALID"));
}

#[test]
fn invalid_language_in_config_is_rejected() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("sdpack.toml"),
        "[i18n]\nlanguages = [\"en\", \"../etc\"]\n",
    )
    .expect("write sdpack.toml");

    assert_cmd::cargo::cargo_bin_cmd!("sdpack")
        .current_dir(tmp.path())
        .env("SDPACK_HOME", tmp.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(contains("code=E006_CONFIG_INVALID"));
}
