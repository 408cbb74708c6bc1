use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_missing_key_fails() -> Result<()> {
    let test = CliTest::with_page()?;

    let out = test.run(test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("error: missing key: home.subtitle"));
    assert!(out.stdout.contains("--> src/page.tsx:3:39"));
    assert!(!out.stdout.contains("missing key: home.title"));
    assert!(out.stdout.contains(
        "Checked 1 source file against zh-CN: 1 missing key, 1 resolved, 0 unreadable"
    ));

    Ok(())
}

#[test]
fn test_locale_override_passes() -> Result<()> {
    let test = CliTest::with_page()?;

    let mut cmd = test.check_command();
    cmd.args(["--locale", "en-US", "--show-resolved"]);
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("src/page.tsx:3:24 home.title Home"));
    assert!(out.stdout.contains("src/page.tsx:3:39 home.subtitle Welcome"));
    assert!(
        out.stdout
            .contains("Checked 1 source file against en-US - 2 keys resolved, none missing")
    );

    Ok(())
}

#[test]
fn test_unknown_locale_is_an_error() -> Result<()> {
    let test = CliTest::with_page()?;

    let mut cmd = test.check_command();
    cmd.args(["--locale", "fr"]);
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(2));
    assert!(
        out.stderr
            .contains("Locale 'fr' is not one of the supported locales (zh-CN, en-US)")
    );

    Ok(())
}

#[test]
fn test_parse_error_is_an_error() -> Result<()> {
    let test = CliTest::with_page()?;
    test.write_file("src/broken.tsx", "const = ;")?;

    let out = test.run(test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stdout.contains("error: could not analyze src/broken.tsx"));
    assert!(out.stdout.contains("parse error at 1:"));

    Ok(())
}

#[test]
fn test_explicit_path() -> Result<()> {
    let test = CliTest::with_page()?;
    test.write_file(
        "src/other.tsx",
        r#"const t = useI18n("home"); t("nope");"#,
    )?;

    let mut cmd = test.check_command();
    cmd.args(["--locale", "en-US", "src/page.tsx"]);
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert!(!out.stdout.contains("other.tsx"));

    Ok(())
}

#[test]
fn test_config_file_settings() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".i18nlensrc.json",
        r#"{
          "supportedLocales": ["en-US"],
          "hookMatchNames": ["useT"],
          "localePath": "i18n/{locale}.json",
          "includes": ["app"]
        }"#,
    )?;
    test.write_file("i18n/en-US.json", r#"{"nav": {"home": "Home"}}"#)?;
    test.write_file(
        "app/nav.jsx",
        r#"const t = useT("nav"); t("home"); t("about");"#,
    )?;
    test.write_file("src/ignored.tsx", r#"const t = useT("nav"); t("x");"#)?;

    let out = test.run(test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("error: missing key: nav.about"));
    assert!(out.stdout.contains("--> app/nav.jsx:1:"));
    assert!(!out.stdout.contains("ignored.tsx"));

    Ok(())
}

#[test]
fn test_test_files_are_skipped() -> Result<()> {
    let test = CliTest::with_page()?;
    test.write_file(
        "src/page.test.tsx",
        r#"const t = useI18n("home"); t("nope");"#,
    )?;

    let mut cmd = test.check_command();
    cmd.args(["--locale", "en-US"]);
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(0));

    Ok(())
}

#[test]
fn test_disabled_engine_reports_nothing() -> Result<()> {
    let test = CliTest::with_page()?;
    test.write_file(".i18nlensrc.json", r#"{"enabled": false}"#)?;

    let out = test.run(test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("0 keys resolved, none missing"));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_page()?;
    test.write_file(".i18nlensrc.json", r#"{"supportedLocales": []}"#)?;

    let out = test.run(test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert!(
        out.stderr
            .contains("'supportedLocales' must list at least one locale")
    );

    Ok(())
}

#[test]
fn test_broken_locale_file_warns() -> Result<()> {
    let test = CliTest::with_page()?;
    test.write_file("src/locales/zh-CN.json", "{ not json")?;

    let out = test.run(test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("warning: failed to parse locale file"));
    assert!(out.stdout.contains("missing key: home.title"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("--help");
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(0));
    for command in ["check", "keys", "watch", "init"] {
        assert!(out.stdout.contains(command));
    }

    Ok(())
}
