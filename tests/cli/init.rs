use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Created .i18nlensrc.json"));
    assert!(test.root().join(".i18nlensrc.json").exists());

    let content = test.read_file(".i18nlensrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    for field in ["supportedLocales", "hookMatchNames", "localePaths", "includes"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}'", field);
    }

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".i18nlensrc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains(".i18nlensrc.json already exists"));
    assert_eq!(test.read_file(".i18nlensrc.json")?, "{}");

    Ok(())
}
