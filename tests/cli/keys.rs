use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_keys_for_namespace() -> Result<()> {
    let test = CliTest::with_page()?;

    let mut cmd = test.command();
    cmd.args(["keys", "src/page.tsx", "--locale", "en-US"]);
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "subtitle  Welcome\ntitle     Home\n");

    Ok(())
}

#[test]
fn test_keys_without_bindings() -> Result<()> {
    let test = CliTest::with_page()?;
    test.write_file("src/plain.ts", "export const answer = 42;")?;

    let mut cmd = test.command();
    cmd.args(["keys", "src/plain.ts"]);
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("No keys to complete in src/plain.ts for zh-CN"));

    Ok(())
}

#[test]
fn test_keys_missing_file() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["keys", "src/absent.tsx"]);
    let out = test.run(cmd)?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Failed to read file"));

    Ok(())
}
